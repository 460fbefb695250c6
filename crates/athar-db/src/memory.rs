//! In-memory catalog backend for tests.
//!
//! Emulates the parts of MySQL the toolkit relies on: databases, tables,
//! columns, named indexes, foreign keys, auto-increment ids, unique keys,
//! referential checks on insert, and the errors MySQL raises when DDL would
//! duplicate an element. Every mutating statement is rendered with
//! [`athar_core::ddl`] and recorded so tests can inspect what was sent.

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCatalog, DatabaseCore, DatabaseSchema};
use async_trait::async_trait;
use athar_core::{
    ddl, ColumnDef, ForeignKeyDef, Ident, IndexDef, IndexKind, Row, SqlValue, TableDef,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct MemTable {
    columns: Vec<ColumnDef>,
    indexes: Vec<IndexDef>,
    foreign_keys: Vec<(Ident, ForeignKeyDef)>,
    rows: Vec<Row>,
    next_id: u64,
}

impl MemTable {
    fn column_pos(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn has_index(&self, name: &str) -> bool {
        self.indexes.iter().any(|i| i.name == name)
    }

    /// Unique keys as column lists: primary key, inline UNIQUE, unique indexes
    fn unique_keys(&self) -> Vec<Vec<Ident>> {
        let mut keys: Vec<Vec<Ident>> = self
            .columns
            .iter()
            .filter(|c| c.primary_key || c.unique)
            .map(|c| vec![c.name.clone()])
            .collect();
        keys.extend(
            self.indexes
                .iter()
                .filter(|i| i.kind == IndexKind::Unique)
                .map(|i| i.columns.clone()),
        );
        keys
    }
}

fn value_of(row: &Row, column: &str) -> SqlValue {
    row.get(column).cloned().unwrap_or(SqlValue::Null)
}

/// How an injected failure surfaces
#[derive(Debug, Clone, Copy)]
enum Injected {
    Error,
    Timeout,
}

#[derive(Debug, Default)]
struct MemoryState {
    databases: HashMap<Ident, HashMap<Ident, MemTable>>,
    current: Option<Ident>,
    statements: Vec<String>,
    failures: Vec<(String, Injected)>,
    closed: bool,
    close_calls: usize,
}

impl MemoryState {
    fn ensure_open(&self) -> DbResult<()> {
        if self.closed {
            return Err(DbError::ConnectionError("connection is closed".to_string()));
        }
        Ok(())
    }

    /// Record a mutating statement, honouring injected failures
    fn record(&mut self, sql: String) -> DbResult<()> {
        self.ensure_open()?;
        let injected = self
            .failures
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()));
        match injected {
            Some((pattern, Injected::Error)) => {
                return Err(DbError::ExecutionError(format!(
                    "injected failure on '{pattern}': {sql}"
                )));
            }
            Some((_, Injected::Timeout)) => {
                return Err(DbError::Timeout { seconds: 30, sql });
            }
            None => {}
        }
        self.statements.push(sql);
        Ok(())
    }

    fn tables(&self) -> DbResult<&HashMap<Ident, MemTable>> {
        self.ensure_open()?;
        let db = self.current.as_ref().ok_or(DbError::NoDatabaseSelected)?;
        self.databases
            .get(db)
            .ok_or_else(|| DbError::DatabaseMissing(db.to_string()))
    }

    fn tables_mut(&mut self) -> DbResult<&mut HashMap<Ident, MemTable>> {
        self.ensure_open()?;
        let db = self.current.as_ref().ok_or(DbError::NoDatabaseSelected)?;
        self.databases
            .get_mut(db)
            .ok_or_else(|| DbError::DatabaseMissing(db.to_string()))
    }

    fn table(&self, name: &str) -> DbResult<&MemTable> {
        self.tables()?
            .get(name)
            .ok_or_else(|| DbError::ExecutionError(format!("Table '{name}' doesn't exist")))
    }

    fn table_mut(&mut self, name: &str) -> DbResult<&mut MemTable> {
        self.tables_mut()?
            .get_mut(name)
            .ok_or_else(|| DbError::ExecutionError(format!("Table '{name}' doesn't exist")))
    }
}

/// In-memory database backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// A server with no databases
    pub fn new() -> Self {
        Self::default()
    }

    /// A server with `name` already created and selected
    pub fn with_database(name: &str) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.lock().unwrap_or_else(|p| p.into_inner());
            let ident = Ident::new(name);
            state.databases.insert(ident.clone(), HashMap::new());
            state.current = Some(ident);
        }
        backend
    }

    fn state(&self) -> DbResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Fail every following statement whose SQL contains `pattern`
    pub fn fail_on(&self, pattern: &str) -> DbResult<()> {
        self.state()?.failures.push((pattern.to_string(), Injected::Error));
        Ok(())
    }

    /// Time out every following statement whose SQL contains `pattern`
    pub fn timeout_on(&self, pattern: &str) -> DbResult<()> {
        self.state()?.failures.push((pattern.to_string(), Injected::Timeout));
        Ok(())
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) -> DbResult<()> {
        self.state()?.failures.clear();
        Ok(())
    }

    /// Mutating statements executed so far, in order
    pub fn statements(&self) -> DbResult<Vec<String>> {
        Ok(self.state()?.statements.clone())
    }

    /// Forget the statement log
    pub fn clear_statements(&self) -> DbResult<()> {
        self.state()?.statements.clear();
        Ok(())
    }

    /// Whether `close` has been called since the last reopen
    pub fn is_closed(&self) -> bool {
        self.state().map(|s| s.closed).unwrap_or(false)
    }

    /// How many times `close` was called
    pub fn close_calls(&self) -> usize {
        self.state().map(|s| s.close_calls).unwrap_or(0)
    }

    /// Accept statements again after `close`, as a fresh connection would
    pub fn reopen(&self) -> DbResult<()> {
        self.state()?.closed = false;
        Ok(())
    }

    /// Whether a database exists on the server
    pub fn has_database(&self, name: &str) -> bool {
        self.state()
            .map(|s| s.databases.contains_key(name))
            .unwrap_or(false)
    }

    /// Snapshot of a table's rows in the current database
    pub fn rows(&self, table: &str) -> DbResult<Vec<Row>> {
        Ok(self.state()?.table(table)?.rows.clone())
    }

    /// Names of tables in the current database, sorted
    pub fn table_names(&self) -> DbResult<Vec<String>> {
        let state = self.state()?;
        let mut names: Vec<String> = state.tables()?.keys().map(|k| k.to_string()).collect();
        names.sort();
        Ok(names)
    }

    /// Definition of a live column
    pub fn column(&self, table: &str, column: &str) -> DbResult<Option<ColumnDef>> {
        let state = self.state()?;
        let t = state.table(table)?;
        Ok(t.column_pos(column).map(|p| t.columns[p].clone()))
    }
}

fn check_insert(tables: &HashMap<Ident, MemTable>, table: &Ident, row: &Row) -> DbResult<()> {
    let t = tables
        .get(table)
        .ok_or_else(|| DbError::ExecutionError(format!("Table '{table}' doesn't exist")))?;

    for (column, _) in row.iter() {
        if t.column_pos(column).is_none() {
            return Err(DbError::ExecutionError(format!(
                "Unknown column '{column}' in '{table}'"
            )));
        }
    }

    for col in &t.columns {
        let required = !col.is_nullable() && col.default.is_none() && !col.auto_increment;
        if required && row.get(&col.name).map_or(true, SqlValue::is_null) {
            return Err(DbError::ExecutionError(format!(
                "Field '{}' doesn't have a default value",
                col.name
            )));
        }
    }

    for key in t.unique_keys() {
        let candidate: Vec<SqlValue> = key.iter().map(|c| value_of(row, c)).collect();
        if candidate.iter().any(SqlValue::is_null) {
            continue;
        }
        let clash = t.rows.iter().any(|existing| {
            key.iter()
                .map(|c| value_of(existing, c))
                .eq(candidate.iter().cloned())
        });
        if clash {
            let shown: Vec<String> = candidate.iter().map(ToString::to_string).collect();
            return Err(DbError::DuplicateKey(format!(
                "Duplicate entry '{}' for key '{}.{}'",
                shown.join("-"),
                table,
                key.iter().map(Ident::as_str).collect::<Vec<_>>().join("_")
            )));
        }
    }

    for (_, fk) in &t.foreign_keys {
        let Some(value) = row.get(&fk.column).and_then(SqlValue::as_i64) else {
            continue;
        };
        let parent_has = if fk.references_table == *table {
            t.rows.iter().any(|r| r.get("id").and_then(SqlValue::as_i64) == Some(value))
        } else {
            tables.get(&fk.references_table).is_some_and(|p| {
                p.rows
                    .iter()
                    .any(|r| r.get("id").and_then(SqlValue::as_i64) == Some(value))
            })
        };
        if !parent_has {
            return Err(DbError::ExecutionError(format!(
                "Cannot add or update a child row: a foreign key constraint fails ({}.{} -> {}.id = {})",
                table, fk.column, fk.references_table, value
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl DatabaseCore for MemoryBackend {
    fn db_type(&self) -> &'static str {
        "memory"
    }

    async fn create_database_if_not_exists(&self, name: &Ident) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::create_database(name))?;
        state.databases.entry(name.clone()).or_default();
        Ok(())
    }

    async fn use_database(&self, name: &Ident) -> DbResult<()> {
        let mut state = self.state()?;
        state.ensure_open()?;
        if !state.databases.contains_key(name) {
            return Err(DbError::DatabaseMissing(format!("Unknown database '{name}'")));
        }
        state.current = Some(name.clone());
        Ok(())
    }

    async fn count_rows(&self, table: &Ident, filter: &[(Ident, SqlValue)]) -> DbResult<u64> {
        let state = self.state()?;
        let t = state.table(table)?;
        for (column, _) in filter {
            if t.column_pos(column).is_none() {
                return Err(DbError::ExecutionError(format!(
                    "Unknown column '{column}' in 'where clause'"
                )));
            }
        }
        let count = t
            .rows
            .iter()
            .filter(|row| filter.iter().all(|(c, v)| value_of(row, c) == *v))
            .count();
        Ok(count as u64)
    }

    async fn insert_row(&self, table: &Ident, row: &Row) -> DbResult<u64> {
        let mut state = self.state()?;
        state.record(ddl::insert(table, row))?;
        check_insert(state.tables()?, table, row)?;

        let t = state.table_mut(table)?;
        let explicit = row.get("id").and_then(SqlValue::as_i64);
        let id = match explicit {
            Some(id) => u64::try_from(id).unwrap_or(0),
            None => t.next_id.max(1),
        };
        t.next_id = t.next_id.max(id + 1);

        let mut stored = row.clone();
        if explicit.is_none() && t.column_pos("id").is_some() {
            stored.set(Ident::new("id"), SqlValue::from(id));
        }
        t.rows.push(stored);
        Ok(id)
    }

    async fn close(&self) -> DbResult<()> {
        let mut state = self.state()?;
        state.closed = true;
        state.close_calls += 1;
        Ok(())
    }
}

#[async_trait]
impl DatabaseCatalog for MemoryBackend {
    async fn database_exists(&self, name: &Ident) -> DbResult<bool> {
        let state = self.state()?;
        state.ensure_open()?;
        Ok(state.databases.contains_key(name))
    }

    async fn table_exists(&self, table: &Ident) -> DbResult<bool> {
        Ok(self.state()?.tables()?.contains_key(table))
    }

    async fn column_exists(&self, table: &Ident, column: &Ident) -> DbResult<bool> {
        let state = self.state()?;
        Ok(state
            .tables()?
            .get(table)
            .is_some_and(|t| t.column_pos(column).is_some()))
    }

    async fn index_exists(&self, table: &Ident, index: &Ident) -> DbResult<bool> {
        let state = self.state()?;
        Ok(state.tables()?.get(table).is_some_and(|t| t.has_index(index)))
    }

    async fn foreign_key_exists(
        &self,
        table: &Ident,
        column: &Ident,
        references: &Ident,
    ) -> DbResult<bool> {
        let state = self.state()?;
        Ok(state.tables()?.get(table).is_some_and(|t| {
            t.foreign_keys
                .iter()
                .any(|(_, fk)| fk.column == *column && fk.references_table == *references)
        }))
    }

    async fn column_names(&self, table: &Ident) -> DbResult<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .tables()?
            .get(table)
            .map(|t| t.columns.iter().map(|c| c.name.to_string()).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl DatabaseSchema for MemoryBackend {
    async fn create_table(&self, def: &TableDef) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::create_table(def))?;
        let tables = state.tables_mut()?;
        if tables.contains_key(&def.name) {
            // IF NOT EXISTS
            return Ok(());
        }
        for referenced in def.referenced_tables() {
            if !tables.contains_key(referenced) {
                return Err(DbError::MissingReference(format!(
                    "{} references {}",
                    def.name, referenced
                )));
            }
        }

        let mut indexes = def.indexes.clone();
        // MySQL names the implicit index of an inline UNIQUE after its column.
        for col in def.columns.iter().filter(|c| c.unique) {
            if !indexes.iter().any(|i| i.name == col.name) {
                indexes.push(IndexDef::unique(&col.name, &[col.name.as_str()]));
            }
        }

        let table = MemTable {
            columns: def.columns.iter().cloned().map(|c| ColumnDef { after: None, ..c }).collect(),
            indexes,
            foreign_keys: def
                .foreign_keys
                .iter()
                .map(|fk| (fk.constraint_name(&def.name), fk.clone()))
                .collect(),
            rows: Vec::new(),
            next_id: 1,
        };
        tables.insert(def.name.clone(), table);
        Ok(())
    }

    async fn add_column(&self, table: &Ident, column: &ColumnDef) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::add_column(table, column))?;
        let t = state.table_mut(table)?;
        if t.column_pos(&column.name).is_some() {
            return Err(DbError::AlreadyExists(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }
        let pos = match &column.after {
            Some(after) => {
                t.column_pos(after).ok_or_else(|| {
                    DbError::ExecutionError(format!("Unknown column '{after}' in '{table}'"))
                })? + 1
            }
            None => t.columns.len(),
        };
        t.columns.insert(pos, ColumnDef { after: None, ..column.clone() });
        Ok(())
    }

    async fn add_index(&self, table: &Ident, index: &IndexDef) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::add_index(table, index))?;
        let t = state.table_mut(table)?;
        if t.has_index(&index.name) {
            return Err(DbError::AlreadyExists(format!(
                "Duplicate key name '{}'",
                index.name
            )));
        }
        if let Some(missing) = index.columns.iter().find(|c| t.column_pos(c).is_none()) {
            return Err(DbError::ExecutionError(format!(
                "Key column '{missing}' doesn't exist in table"
            )));
        }
        t.indexes.push(index.clone());
        Ok(())
    }

    async fn add_foreign_key(&self, table: &Ident, fk: &ForeignKeyDef) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::add_foreign_key(table, fk))?;
        if fk.references_table != *table && !state.tables()?.contains_key(&fk.references_table) {
            return Err(DbError::MissingReference(format!(
                "{} references {}",
                table, fk.references_table
            )));
        }
        let name = fk.constraint_name(table);
        let t = state.table_mut(table)?;
        if t.foreign_keys.iter().any(|(n, _)| *n == name) {
            return Err(DbError::AlreadyExists(format!(
                "Duplicate foreign key constraint name '{name}'"
            )));
        }
        if t.column_pos(&fk.column).is_none() {
            return Err(DbError::ExecutionError(format!(
                "Key column '{}' doesn't exist in table",
                fk.column
            )));
        }
        // MySQL adds a supporting index when none covers the column.
        if !t.indexes.iter().any(|i| i.columns.first() == Some(&fk.column)) {
            t.indexes.push(IndexDef::plain(&name, &[fk.column.as_str()]));
        }
        t.foreign_keys.push((name, fk.clone()));
        Ok(())
    }

    async fn change_column(&self, table: &Ident, from: &Ident, column: &ColumnDef) -> DbResult<()> {
        let mut state = self.state()?;
        state.record(ddl::change_column(table, from, column))?;
        let t = state.table_mut(table)?;
        let pos = t.column_pos(from).ok_or_else(|| {
            DbError::ExecutionError(format!("Unknown column '{from}' in '{table}'"))
        })?;
        if column.name != *from && t.column_pos(&column.name).is_some() {
            return Err(DbError::AlreadyExists(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }

        t.columns[pos] = ColumnDef { after: None, ..column.clone() };
        for index in &mut t.indexes {
            for c in &mut index.columns {
                if *c == *from {
                    *c = column.name.clone();
                }
            }
        }
        for (_, fk) in &mut t.foreign_keys {
            if fk.column == *from {
                fk.column = column.name.clone();
            }
        }
        for row in &mut t.rows {
            if let Some(value) = row.get(from).cloned() {
                let mut renamed = Row::new();
                for (c, v) in row.iter() {
                    if c == from {
                        renamed.set(column.name.clone(), value.clone());
                    } else {
                        renamed.set(c.clone(), v.clone());
                    }
                }
                *row = renamed;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
