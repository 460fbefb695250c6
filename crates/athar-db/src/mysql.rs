//! MySQL database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCatalog, DatabaseCore, DatabaseSchema};
use async_trait::async_trait;
use athar_core::{
    ddl, ColumnDef, ConnectionConfig, ForeignKeyDef, Ident, IndexDef, Row, SqlValue, TableDef,
};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::query::Query;
use sqlx::Row as _;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;

/// MySQL database backend.
///
/// Holds a single-connection pool. [`use_database`](DatabaseCore::use_database)
/// swaps the pool for one bound to the selected database.
pub struct MySqlBackend {
    config: ConnectionConfig,
    pool: RwLock<MySqlPool>,
    database: RwLock<Option<Ident>>,
}

impl MySqlBackend {
    /// Connect using `config`.
    ///
    /// With `select_database` the configured database is selected on connect
    /// and must already exist; without it the connection has no default
    /// database (used to create it).
    pub async fn connect(config: &ConnectionConfig, select_database: bool) -> DbResult<Self> {
        let database = select_database.then(|| config.database.clone());
        log::debug!(
            "Connecting to {} (select database: {})",
            config.display_target(),
            select_database
        );
        let pool = open_pool(config, database.as_ref()).await?;
        Ok(Self {
            config: config.clone(),
            pool: RwLock::new(pool),
            database: RwLock::new(database),
        })
    }

    /// Run a future under the configured per-statement timeout
    async fn timed<T, F>(&self, sql: &str, fut: F) -> DbResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        with_timeout(self.config.statement_timeout, sql, fut).await
    }

    /// Execute a DDL statement
    async fn execute_ddl(&self, sql: &str) -> DbResult<()> {
        log::debug!("Executing: {sql}");
        let pool = self.pool.read().await;
        self.timed(sql, sqlx::query(sql).execute(&*pool)).await?;
        Ok(())
    }

    /// The database catalog lookups are scoped to
    async fn active_database(&self) -> DbResult<Ident> {
        self.database
            .read()
            .await
            .clone()
            .ok_or(DbError::NoDatabaseSelected)
    }

    /// Run `SELECT COUNT(*)` against information_schema with string binds
    async fn catalog_count(&self, sql: &str, binds: &[&str]) -> DbResult<bool> {
        let pool = self.pool.read().await;
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = self
            .timed(sql, query.fetch_one(&*pool))
            .await
            .map_err(as_catalog_error)?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| DbError::CatalogError(e.to_string()))?;
        Ok(count > 0)
    }
}

/// Await `fut` for at most `limit`; running out of time is [`DbError::Timeout`]
pub(crate) async fn with_timeout<T, F>(limit: Duration, sql: &str, fut: F) -> DbResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => Err(DbError::Timeout {
            seconds: limit.as_secs(),
            sql: sql.to_string(),
        }),
    }
}

async fn open_pool(config: &ConnectionConfig, database: Option<&Ident>) -> DbResult<MySqlPool> {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .charset("utf8mb4");
    if let Some(db) = database {
        options = options.database(db.as_str());
    }

    MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.statement_timeout)
        .connect_with(options)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::DatabaseMissing(msg) => DbError::DatabaseMissing(msg),
            other => DbError::ConnectionError(other.to_string()),
        })
}

fn as_catalog_error(err: DbError) -> DbError {
    match err {
        DbError::ExecutionError(msg) => DbError::CatalogError(msg),
        other => other,
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::Text(s) => query.bind(s.as_str()),
    }
}

#[async_trait]
impl DatabaseCore for MySqlBackend {
    fn db_type(&self) -> &'static str {
        "mysql"
    }

    async fn create_database_if_not_exists(&self, name: &Ident) -> DbResult<()> {
        self.execute_ddl(&ddl::create_database(name)).await
    }

    async fn use_database(&self, name: &Ident) -> DbResult<()> {
        let new_pool = open_pool(&self.config, Some(name)).await?;
        let old_pool = std::mem::replace(&mut *self.pool.write().await, new_pool);
        old_pool.close().await;
        *self.database.write().await = Some(name.clone());
        log::debug!("Using database {name}");
        Ok(())
    }

    async fn count_rows(&self, table: &Ident, filter: &[(Ident, SqlValue)]) -> DbResult<u64> {
        let columns: Vec<Ident> = filter.iter().map(|(c, _)| c.clone()).collect();
        let sql = ddl::count(table, &columns);
        let pool = self.pool.read().await;
        let mut query = sqlx::query(&sql);
        for (_, value) in filter {
            query = bind_value(query, value);
        }
        let row = self.timed(&sql, query.fetch_one(&*pool)).await?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn insert_row(&self, table: &Ident, row: &Row) -> DbResult<u64> {
        let sql = ddl::insert(table, row);
        log::debug!("Executing: {sql}");
        let pool = self.pool.read().await;
        let mut query = sqlx::query(&sql);
        for value in row.values() {
            query = bind_value(query, value);
        }
        let result = self.timed(&sql, query.execute(&*pool)).await?;
        match row.get("id").and_then(SqlValue::as_i64) {
            Some(id) => Ok(u64::try_from(id).unwrap_or(0)),
            None => Ok(result.last_insert_id()),
        }
    }

    async fn close(&self) -> DbResult<()> {
        self.pool.read().await.close().await;
        Ok(())
    }
}

#[async_trait]
impl DatabaseCatalog for MySqlBackend {
    async fn database_exists(&self, name: &Ident) -> DbResult<bool> {
        self.catalog_count(
            "SELECT COUNT(*) FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?",
            &[name.as_str()],
        )
        .await
    }

    async fn table_exists(&self, table: &Ident) -> DbResult<bool> {
        let db = self.active_database().await?;
        self.catalog_count(
            "SELECT COUNT(*) FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?",
            &[db.as_str(), table.as_str()],
        )
        .await
    }

    async fn column_exists(&self, table: &Ident, column: &Ident) -> DbResult<bool> {
        let db = self.active_database().await?;
        self.catalog_count(
            "SELECT COUNT(*) FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND COLUMN_NAME = ?",
            &[db.as_str(), table.as_str(), column.as_str()],
        )
        .await
    }

    async fn index_exists(&self, table: &Ident, index: &Ident) -> DbResult<bool> {
        let db = self.active_database().await?;
        self.catalog_count(
            "SELECT COUNT(*) FROM information_schema.STATISTICS \
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND INDEX_NAME = ?",
            &[db.as_str(), table.as_str(), index.as_str()],
        )
        .await
    }

    async fn foreign_key_exists(
        &self,
        table: &Ident,
        column: &Ident,
        references: &Ident,
    ) -> DbResult<bool> {
        let db = self.active_database().await?;
        self.catalog_count(
            "SELECT COUNT(*) FROM information_schema.KEY_COLUMN_USAGE \
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND COLUMN_NAME = ? \
             AND REFERENCED_TABLE_NAME = ?",
            &[db.as_str(), table.as_str(), column.as_str(), references.as_str()],
        )
        .await
    }

    async fn column_names(&self, table: &Ident) -> DbResult<Vec<String>> {
        let db = self.active_database().await?;
        // CAST keeps MySQL 8 from reporting the name as a binary type.
        let sql = "SELECT CAST(COLUMN_NAME AS CHAR) AS column_name \
                   FROM information_schema.COLUMNS \
                   WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
                   ORDER BY ORDINAL_POSITION";
        let pool = self.pool.read().await;
        let rows = self
            .timed(
                sql,
                sqlx::query(sql)
                    .bind(db.as_str())
                    .bind(table.as_str())
                    .fetch_all(&*pool),
            )
            .await
            .map_err(as_catalog_error)?;
        rows.iter()
            .map(|r| {
                r.try_get::<String, _>("column_name")
                    .map_err(|e| DbError::CatalogError(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl DatabaseSchema for MySqlBackend {
    async fn create_table(&self, def: &TableDef) -> DbResult<()> {
        self.execute_ddl(&ddl::create_table(def)).await
    }

    async fn add_column(&self, table: &Ident, column: &ColumnDef) -> DbResult<()> {
        self.execute_ddl(&ddl::add_column(table, column)).await
    }

    async fn add_index(&self, table: &Ident, index: &IndexDef) -> DbResult<()> {
        self.execute_ddl(&ddl::add_index(table, index)).await
    }

    async fn add_foreign_key(&self, table: &Ident, fk: &ForeignKeyDef) -> DbResult<()> {
        self.execute_ddl(&ddl::add_foreign_key(table, fk)).await
    }

    async fn change_column(&self, table: &Ident, from: &Ident, column: &ColumnDef) -> DbResult<()> {
        self.execute_ddl(&ddl::change_column(table, from, column)).await
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
