//! Subcommand implementations.

pub mod discover;
pub mod init;
pub mod parse;
pub mod sync;
