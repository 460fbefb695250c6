//! Fixture seeder.
//!
//! Inserts rows only when the chosen presence check says they are absent.
//! Existing rows are never updated or deleted.

use crate::error::{MigrateError, MigrateResult};
use athar_core::{Ident, Row, StepKind, StepOutcome};
use athar_db::{Database, DbError};

/// Granularity of the "already seeded" check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedGate {
    /// Skip the whole set when the table holds any row
    EmptyTable,
    /// Skip each row whose natural key is already present
    NaturalKey(Vec<Ident>),
}

impl SeedGate {
    pub fn natural_key(columns: &[&str]) -> Self {
        SeedGate::NaturalKey(columns.iter().map(|c| Ident::new(*c)).collect())
    }
}

/// What a seeding call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Primary key per input row; `None` for skipped rows
    pub ids: Vec<Option<u64>>,
    pub inserted: u64,
    pub skipped: u64,
}

impl SeedOutcome {
    /// Convert into a report step for `table`
    pub fn step(&self, table: &Ident) -> StepOutcome {
        if self.inserted > 0 {
            StepOutcome::seeded(table.as_str(), self.inserted)
        } else if self.skipped > 0 {
            StepOutcome::skipped(StepKind::Seed, table.as_str(), "already seeded")
        } else {
            StepOutcome::skipped(StepKind::Seed, table.as_str(), "nothing to seed")
        }
    }

    /// Id generated for input row `index`
    pub fn id(&self, table: &Ident, index: usize) -> MigrateResult<u64> {
        self.ids
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| MigrateError::UnresolvedFixture {
                table: table.to_string(),
                index,
            })
    }
}

/// Seeds tables through a borrowed connection
#[derive(Clone, Copy)]
pub struct Seeder<'a> {
    db: &'a dyn Database,
}

fn seed_error(table: &Ident) -> impl FnOnce(DbError) -> MigrateError + '_ {
    move |source| MigrateError::Seed {
        table: table.to_string(),
        source,
    }
}

impl<'a> Seeder<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Number of rows in `table`
    pub async fn row_count(&self, table: &Ident) -> MigrateResult<u64> {
        self.db
            .count_rows(table, &[])
            .await
            .map_err(seed_error(table))
    }

    /// Whether a row with the given key values exists
    pub async fn exists(&self, table: &Ident, row: &Row, key: &[Ident]) -> MigrateResult<bool> {
        let count = self
            .db
            .count_rows(table, &row.key(key))
            .await
            .map_err(seed_error(table))?;
        Ok(count > 0)
    }

    /// Insert `rows` into `table` unless `gate` says they are already there.
    ///
    /// Rows are inserted in order. The first failing insert aborts the call;
    /// rows inserted before it stay committed.
    pub async fn seed_if_empty(
        &self,
        table: &Ident,
        rows: &[Row],
        gate: &SeedGate,
    ) -> MigrateResult<SeedOutcome> {
        let mut outcome = SeedOutcome::default();
        if rows.is_empty() {
            return Ok(outcome);
        }

        if *gate == SeedGate::EmptyTable && self.row_count(table).await? > 0 {
            log::info!("Table {table} already contains data, skipping");
            outcome.ids = vec![None; rows.len()];
            outcome.skipped = rows.len() as u64;
            return Ok(outcome);
        }

        for row in rows {
            if let SeedGate::NaturalKey(key) = gate {
                if self.exists(table, row, key).await? {
                    outcome.ids.push(None);
                    outcome.skipped += 1;
                    continue;
                }
            }
            let id = self
                .db
                .insert_row(table, row)
                .await
                .map_err(seed_error(table))?;
            outcome.ids.push(Some(id));
            outcome.inserted += 1;
        }

        log::info!(
            "Seeded {table}: {} inserted, {} already present",
            outcome.inserted,
            outcome.skipped
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "seeder_test.rs"]
mod tests;
