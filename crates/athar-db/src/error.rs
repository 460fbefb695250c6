//! Error types for athar-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Catalog metadata query failed (D003)
    #[error("[D003] Catalog inspection failed: {0}")]
    CatalogError(String),

    /// Statement exceeded the per-statement timeout (D004)
    #[error("[D004] Statement timed out after {seconds}s: {sql}")]
    Timeout { seconds: u64, sql: String },

    /// Target database does not exist (D005)
    #[error("[D005] Database does not exist: {0}")]
    DatabaseMissing(String),

    /// Object already exists (D006)
    #[error("[D006] Object already exists: {0}")]
    AlreadyExists(String),

    /// Foreign key target table is missing (D007)
    #[error("[D007] Referenced table does not exist: {0}")]
    MissingReference(String),

    /// Unique or primary key violation (D008)
    #[error("[D008] Duplicate key: {0}")]
    DuplicateKey(String),

    /// Mutex poisoned (D009)
    #[error("[D009] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// No database selected on the connection (D010)
    #[error("[D010] No database selected")]
    NoDatabaseSelected,
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

/// MySQL server error numbers the toolkit distinguishes
pub(crate) mod mysql_codes {
    pub const ER_BAD_DB_ERROR: u16 = 1049;
    pub const ER_TABLE_EXISTS_ERROR: u16 = 1050;
    pub const ER_DUP_FIELDNAME: u16 = 1060;
    pub const ER_DUP_KEYNAME: u16 = 1061;
    pub const ER_DUP_ENTRY: u16 = 1062;
    pub const ER_CANNOT_ADD_FOREIGN: u16 = 1215;
    pub const ER_FK_DUP_NAME: u16 = 1826;
    pub const ER_FK_CANNOT_OPEN_PARENT: u16 = 1824;
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::mysql::MySqlDatabaseError;

        match &err {
            sqlx::Error::Database(db_err) => {
                let number = db_err
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(|e| e.number());
                classify_server_error(number, db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => DbError::ConnectionError(err.to_string()),
            _ => DbError::ExecutionError(err.to_string()),
        }
    }
}

/// Map a MySQL server error number to the matching [`DbError`]
pub(crate) fn classify_server_error(number: Option<u16>, msg: String) -> DbError {
    use mysql_codes::*;

    match number {
        Some(ER_BAD_DB_ERROR) => DbError::DatabaseMissing(msg),
        Some(ER_TABLE_EXISTS_ERROR | ER_DUP_FIELDNAME | ER_DUP_KEYNAME | ER_FK_DUP_NAME) => {
            DbError::AlreadyExists(msg)
        }
        Some(ER_DUP_ENTRY) => DbError::DuplicateKey(msg),
        Some(ER_CANNOT_ADD_FOREIGN | ER_FK_CANNOT_OPEN_PARENT) => DbError::MissingReference(msg),
        _ => DbError::ExecutionError(msg),
    }
}
