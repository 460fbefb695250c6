//! athar-db - Database abstraction layer for the Athar schema toolkit
//!
//! This crate provides the `Database` trait and a MySQL implementation,
//! plus an in-memory backend (behind `test-support`) for exercising
//! migrations without a server.

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod mysql;
pub mod traits;

pub use error::{DbError, DbResult};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryBackend;
pub use mysql::MySqlBackend;
pub use traits::{Database, DatabaseCatalog, DatabaseCore, DatabaseSchema};
