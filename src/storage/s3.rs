//! S3-compatible object store (MinIO, AWS).

use futures::stream::{BoxStream, StreamExt};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore as _;
use url::Url;

use super::{ObjectStore, StorageError};

/// Lists keys from one bucket.
pub struct S3ObjectStore {
    inner: AmazonS3,
    bucket: String,
}

impl S3ObjectStore {
    /// Connect to `bucket` at `endpoint` (e.g. `https://minio.example:9000`).
    ///
    /// Plain `http://` endpoints are allowed; requests use path-style addressing.
    pub fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Result<Self, StorageError> {
        let url = Url::parse(endpoint)
            .map_err(|e| StorageError::Config(format!("failed to parse S3 endpoint: {}", e)))?;
        let allow_http = url.scheme() != "https";

        let inner = AmazonS3Builder::new()
            .with_endpoint(endpoint.trim_end_matches('/'))
            .with_bucket_name(bucket)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .with_region("us-east-1")
            .with_allow_http(allow_http)
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            inner,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    fn list<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, Result<String, StorageError>> {
        let prefix = ObjectPath::from(prefix);
        self.inner
            .list(Some(&prefix))
            .map(|item| {
                item.map(|meta| meta.location.to_string())
                    .map_err(|e| StorageError::Listing(e.to_string()))
            })
            .boxed()
    }
}
