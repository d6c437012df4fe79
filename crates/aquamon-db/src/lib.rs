//! AQUAMON Database — SurrealDB connection management, schema
//! migrations, repository implementations, and filesystem-backed
//! image storage.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Implementations of every `aquamon-core` repository trait
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;
mod storage;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use storage::FsImageStore;
