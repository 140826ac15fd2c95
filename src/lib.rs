//! boardsync - reconciles a kanban request board against the media catalog.
//!
//! Cards are parsed into media descriptors, upserted into the `media`
//! catalog keyed by card id, and every matching file already in storage is
//! announced to the identification service.

pub mod cards;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod events;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod repository;
pub mod schema;
pub mod storage;
