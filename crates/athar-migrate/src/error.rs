//! Error types for athar-migrate

use athar_core::CoreError;
use athar_db::DbError;
use thiserror::Error;

/// Migration and seeding errors.
///
/// "Already exists" is not represented here; it is a skipped step.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// G001: Catalog lookup failed, idempotence cannot be decided
    #[error("[G001] Inspecting {element} failed: {source}")]
    Inspection {
        element: String,
        #[source]
        source: DbError,
    },

    /// G002: DDL statement failed
    #[error("[G002] Applying {element} failed: {source}")]
    Mutation {
        element: String,
        #[source]
        source: DbError,
    },

    /// G003: Insert or pre-insert check failed
    #[error("[G003] Seeding {table} failed: {source}")]
    Seed {
        table: String,
        #[source]
        source: DbError,
    },

    /// G004: Password hashing failed
    #[error("[G004] Password hashing failed: {0}")]
    Hash(String),

    /// G005: Element still absent after its DDL ran
    #[error("[G005] {element} is still missing after it was applied")]
    Verification { element: String },

    /// G006: Element depends on something that does not exist yet
    #[error("[G006] {element} requires {missing}, which does not exist")]
    MissingPrerequisite { element: String, missing: String },

    /// G007: Fixture data refers to a row that was not inserted
    #[error("[G007] Fixture {table}[{index}] refers to a row that was not seeded")]
    UnresolvedFixture { table: String, index: usize },

    /// Core error (identifiers, catalog DAG)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
