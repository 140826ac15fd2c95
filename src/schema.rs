// Mirrors the `media` table created by `DbContext::init_schema`.

diesel::table! {
    media (id) {
        id -> Text,
        media_name -> Text,
        creator -> Integer,
        creator_id -> Text,
        #[sql_name = "type"]
        media_type -> Integer,
        source -> Integer,
        source_uri -> Text,
        metadata_id -> Text,
        metadata -> Integer,
        status -> Integer,
    }
}
