//! Database trait definitions
//!
//! The `Database` trait is composed of three sub-traits:
//! - `DatabaseCore`: connection lifecycle and row operations
//! - `DatabaseCatalog`: read-only catalog metadata lookups
//! - `DatabaseSchema`: additive DDL
//!
//! All identifiers arrive as validated [`Ident`]s and all values as bound
//! [`SqlValue`]s, so implementations never splice untrusted text into SQL.

use crate::error::DbResult;
use async_trait::async_trait;
use athar_core::{ColumnDef, ForeignKeyDef, Ident, IndexDef, Row, SqlValue, TableDef};

/// Connection lifecycle and row operations
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// `CREATE DATABASE IF NOT EXISTS`
    async fn create_database_if_not_exists(&self, name: &Ident) -> DbResult<()>;

    /// Point every following operation at `name`. Fails with
    /// `DatabaseMissing` if it does not exist.
    async fn use_database(&self, name: &Ident) -> DbResult<()>;

    /// Count rows matching every `(column, value)` pair with null-safe equality.
    /// An empty filter counts the whole table.
    async fn count_rows(&self, table: &Ident, filter: &[(Ident, SqlValue)]) -> DbResult<u64>;

    /// Insert one row, returning the generated (or explicit) primary key
    async fn insert_row(&self, table: &Ident, row: &Row) -> DbResult<u64>;

    /// Release the connection. Idempotent.
    async fn close(&self) -> DbResult<()>;
}

/// Read-only catalog lookups scoped to the active database.
///
/// Absent metadata yields `Ok(false)`, never an error.
#[async_trait]
pub trait DatabaseCatalog: Send + Sync {
    /// Whether a database (schema) exists on the server. Needs no active database.
    async fn database_exists(&self, name: &Ident) -> DbResult<bool>;

    async fn table_exists(&self, table: &Ident) -> DbResult<bool>;

    async fn column_exists(&self, table: &Ident, column: &Ident) -> DbResult<bool>;

    async fn index_exists(&self, table: &Ident, index: &Ident) -> DbResult<bool>;

    /// Whether `table.column` already references `references`
    async fn foreign_key_exists(
        &self,
        table: &Ident,
        column: &Ident,
        references: &Ident,
    ) -> DbResult<bool>;

    /// Live column names in ordinal order (empty when the table is missing)
    async fn column_names(&self, table: &Ident) -> DbResult<Vec<String>>;
}

/// Additive DDL. Nothing here drops, truncates or deletes.
#[async_trait]
pub trait DatabaseSchema: Send + Sync {
    /// `CREATE TABLE IF NOT EXISTS` with inline keys and indexes
    async fn create_table(&self, def: &TableDef) -> DbResult<()>;

    /// `ALTER TABLE ... ADD COLUMN`
    async fn add_column(&self, table: &Ident, column: &ColumnDef) -> DbResult<()>;

    /// `ALTER TABLE ... ADD INDEX`
    async fn add_index(&self, table: &Ident, index: &IndexDef) -> DbResult<()>;

    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`
    async fn add_foreign_key(&self, table: &Ident, fk: &ForeignKeyDef) -> DbResult<()>;

    /// Rename `from` to `column.name` with `column`'s definition, keeping data
    async fn change_column(&self, table: &Ident, from: &Ident, column: &ColumnDef)
        -> DbResult<()>;
}

/// Full database abstraction.
///
/// Implementations must be Send + Sync for async operation.
pub trait Database: DatabaseCore + DatabaseCatalog + DatabaseSchema {}

impl<T: DatabaseCore + DatabaseCatalog + DatabaseSchema> Database for T {}
