//! Idempotent schema mutator.
//!
//! Every `ensure_*` call inspects first and returns a skipped outcome when the
//! element is already in place. Otherwise it issues one additive statement
//! and inspects again; an element that is still absent is a verification
//! failure. Nothing here is retried.

use crate::error::{MigrateError, MigrateResult};
use crate::inspector::Inspector;
use athar_core::{ColumnDef, ForeignKeyDef, Ident, IndexDef, StepKind, StepOutcome, TableDef};
use athar_db::{Database, DbError};

const ALREADY_EXISTS: &str = "already exists";

/// Applies additive DDL through a borrowed connection
#[derive(Clone, Copy)]
pub struct SchemaMutator<'a> {
    db: &'a dyn Database,
    inspector: Inspector<'a>,
}

fn mutation(element: &str) -> impl FnOnce(DbError) -> MigrateError + '_ {
    move |source| MigrateError::Mutation {
        element: element.to_string(),
        source,
    }
}

fn verify(present: bool, element: &str) -> MigrateResult<()> {
    if present {
        Ok(())
    } else {
        Err(MigrateError::Verification {
            element: element.to_string(),
        })
    }
}

impl<'a> SchemaMutator<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self {
            db,
            inspector: Inspector::new(db),
        }
    }

    pub fn inspector(&self) -> Inspector<'a> {
        self.inspector
    }

    async fn require_table(&self, element: &str, table: &Ident) -> MigrateResult<()> {
        if self.inspector.table_exists(table).await? {
            Ok(())
        } else {
            Err(MigrateError::MissingPrerequisite {
                element: element.to_string(),
                missing: format!("table {table}"),
            })
        }
    }

    /// Create the database if missing, then make it the active database
    pub async fn ensure_database(&self, name: &Ident) -> MigrateResult<StepOutcome> {
        let element = name.to_string();
        let outcome = if self.inspector.database_exists(name).await? {
            log::debug!("Database {name} already exists");
            StepOutcome::skipped(StepKind::Database, &element, ALREADY_EXISTS)
        } else {
            self.db
                .create_database_if_not_exists(name)
                .await
                .map_err(mutation(&element))?;
            verify(self.inspector.database_exists(name).await?, &element)?;
            log::info!("Created database {name}");
            StepOutcome::applied(StepKind::Database, &element)
        };

        self.db
            .use_database(name)
            .await
            .map_err(mutation(&element))?;
        Ok(outcome)
    }

    /// Create a table with all of its columns, keys and indexes.
    ///
    /// An existing table is left alone; column evolution belongs to the
    /// named column migrations. Every referenced table must already exist.
    pub async fn ensure_table(&self, def: &TableDef) -> MigrateResult<StepOutcome> {
        let element = def.name.to_string();
        if self.inspector.table_exists(&def.name).await? {
            log::debug!("Table {element} already exists");
            return Ok(StepOutcome::skipped(StepKind::Table, element, ALREADY_EXISTS));
        }

        for referenced in def.referenced_tables() {
            self.require_table(&element, referenced).await?;
        }

        self.db
            .create_table(def)
            .await
            .map_err(mutation(&element))?;
        verify(self.inspector.table_exists(&def.name).await?, &element)?;
        log::info!("Created table {element}");
        Ok(StepOutcome::applied(StepKind::Table, element))
    }

    pub async fn ensure_column(
        &self,
        table: &Ident,
        column: &ColumnDef,
    ) -> MigrateResult<StepOutcome> {
        let element = format!("{table}.{}", column.name);
        self.require_table(&element, table).await?;
        if self.inspector.column_exists(table, &column.name).await? {
            log::debug!("Column {element} already exists");
            return Ok(StepOutcome::skipped(StepKind::Column, element, ALREADY_EXISTS));
        }

        self.db
            .add_column(table, column)
            .await
            .map_err(mutation(&element))?;
        verify(
            self.inspector.column_exists(table, &column.name).await?,
            &element,
        )?;
        log::info!("Added column {element}");
        Ok(StepOutcome::applied(StepKind::Column, element))
    }

    pub async fn ensure_index(
        &self,
        table: &Ident,
        index: &IndexDef,
    ) -> MigrateResult<StepOutcome> {
        let element = format!("{table}.{}", index.name);
        self.require_table(&element, table).await?;
        if self.inspector.index_exists(table, &index.name).await? {
            log::debug!("Index {element} already exists");
            return Ok(StepOutcome::skipped(StepKind::Index, element, ALREADY_EXISTS));
        }

        self.db
            .add_index(table, index)
            .await
            .map_err(mutation(&element))?;
        verify(
            self.inspector.index_exists(table, &index.name).await?,
            &element,
        )?;
        log::info!("Added index {element}");
        Ok(StepOutcome::applied(StepKind::Index, element))
    }

    pub async fn ensure_foreign_key(
        &self,
        table: &Ident,
        fk: &ForeignKeyDef,
    ) -> MigrateResult<StepOutcome> {
        let element = format!("{table}.{} -> {}", fk.column, fk.references_table);
        self.require_table(&element, table).await?;
        self.require_table(&element, &fk.references_table).await?;
        if self
            .inspector
            .foreign_key_exists(table, &fk.column, &fk.references_table)
            .await?
        {
            log::debug!("Foreign key {element} already exists");
            return Ok(StepOutcome::skipped(
                StepKind::ForeignKey,
                element,
                ALREADY_EXISTS,
            ));
        }

        self.db
            .add_foreign_key(table, fk)
            .await
            .map_err(mutation(&element))?;
        verify(
            self.inspector
                .foreign_key_exists(table, &fk.column, &fk.references_table)
                .await?,
            &element,
        )?;
        log::info!("Added foreign key {element}");
        Ok(StepOutcome::applied(StepKind::ForeignKey, element))
    }

    /// Converge `column` onto a table that may still carry it under a legacy
    /// name.
    ///
    /// - `column` present: skipped
    /// - `legacy` present: renamed in place to `column`, data kept
    /// - neither: `fallback` is added
    pub async fn ensure_renamed_column(
        &self,
        table: &Ident,
        legacy: &Ident,
        column: &ColumnDef,
        fallback: &ColumnDef,
    ) -> MigrateResult<StepOutcome> {
        let element = format!("{table}.{}", column.name);
        self.require_table(&element, table).await?;
        if self.inspector.column_exists(table, &column.name).await? {
            log::debug!("Column {element} already exists");
            return Ok(StepOutcome::skipped(StepKind::Column, element, ALREADY_EXISTS));
        }

        if !self.inspector.column_exists(table, legacy).await? {
            return self.ensure_column(table, fallback).await;
        }

        let rename = format!("{table}.{legacy} -> {}", column.name);
        self.db
            .change_column(table, legacy, column)
            .await
            .map_err(mutation(&rename))?;
        verify(
            self.inspector.column_exists(table, &column.name).await?,
            &element,
        )?;
        log::info!("Renamed column {rename}");
        Ok(StepOutcome::applied(StepKind::Rename, rename))
    }
}

#[cfg(test)]
#[path = "mutator_test.rs"]
mod tests;
