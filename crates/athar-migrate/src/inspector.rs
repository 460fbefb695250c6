//! Schema inspector: catalog existence checks for the mutator and seeder

use crate::error::{MigrateError, MigrateResult};
use athar_core::Ident;
use athar_db::{Database, DbError};

/// Read-only view of the live catalog.
///
/// Every check goes to catalog metadata; nothing is probed by attempting a
/// mutation. A failed lookup is fatal since idempotence can no longer be
/// decided.
#[derive(Clone, Copy)]
pub struct Inspector<'a> {
    db: &'a dyn Database,
}

fn inspection(element: String) -> impl FnOnce(DbError) -> MigrateError {
    move |source| MigrateError::Inspection { element, source }
}

impl<'a> Inspector<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    pub async fn database_exists(&self, name: &Ident) -> MigrateResult<bool> {
        self.db
            .database_exists(name)
            .await
            .map_err(inspection(format!("database {name}")))
    }

    pub async fn table_exists(&self, table: &Ident) -> MigrateResult<bool> {
        self.db
            .table_exists(table)
            .await
            .map_err(inspection(format!("table {table}")))
    }

    pub async fn column_exists(&self, table: &Ident, column: &Ident) -> MigrateResult<bool> {
        self.db
            .column_exists(table, column)
            .await
            .map_err(inspection(format!("column {table}.{column}")))
    }

    pub async fn index_exists(&self, table: &Ident, index: &Ident) -> MigrateResult<bool> {
        self.db
            .index_exists(table, index)
            .await
            .map_err(inspection(format!("index {table}.{index}")))
    }

    pub async fn foreign_key_exists(
        &self,
        table: &Ident,
        column: &Ident,
        references: &Ident,
    ) -> MigrateResult<bool> {
        self.db
            .foreign_key_exists(table, column, references)
            .await
            .map_err(inspection(format!(
                "foreign key {table}.{column} -> {references}"
            )))
    }

    pub async fn column_names(&self, table: &Ident) -> MigrateResult<Vec<String>> {
        self.db
            .column_names(table)
            .await
            .map_err(inspection(format!("columns of {table}")))
    }
}
