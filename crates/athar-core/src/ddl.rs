//! MySQL statement rendering.
//!
//! Every statement produced here is additive: `CREATE ... IF NOT EXISTS`,
//! `ALTER TABLE ... ADD`, or a column rename via `CHANGE`. Identifiers are
//! validated [`Ident`]s and quoted; values are always left as `?` placeholders.

use crate::ident::{quoted_list, Ident};
use crate::schema::{ColumnDef, ForeignKeyDef, IndexDef, IndexKind, Nullability, TableDef};
use crate::value::Row;

/// `CREATE DATABASE IF NOT EXISTS`
pub fn create_database(name: &Ident) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
        name.quoted()
    )
}

/// Render a column definition clause (without any `AFTER` hint)
pub fn column_clause(col: &ColumnDef) -> String {
    let mut sql = format!("{} {}", col.name.quoted(), col.sql_type);
    match col.nullability {
        Nullability::NotNull => sql.push_str(" NOT NULL"),
        Nullability::Null => sql.push_str(" NULL"),
        Nullability::Unspecified => {}
    }
    if let Some(default) = &col.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }
    if let Some(on_update) = &col.on_update {
        sql.push_str(" ON UPDATE ");
        sql.push_str(on_update);
    }
    if col.auto_increment {
        sql.push_str(" AUTO_INCREMENT");
    }
    if col.unique {
        sql.push_str(" UNIQUE");
    }
    if col.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    sql
}

fn index_clause(index: &IndexDef) -> String {
    let keyword = match index.kind {
        IndexKind::Plain => "INDEX",
        IndexKind::Unique => "UNIQUE KEY",
        IndexKind::FullText => "FULLTEXT INDEX",
    };
    format!(
        "{} {} ({})",
        keyword,
        index.name.quoted(),
        quoted_list(&index.columns)
    )
}

fn foreign_key_clause(table: &Ident, fk: &ForeignKeyDef) -> String {
    format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
        fk.constraint_name(table).quoted(),
        fk.column.quoted(),
        fk.references_table.quoted(),
        fk.references_column.quoted(),
        fk.on_delete
    )
}

/// `CREATE TABLE IF NOT EXISTS` with all columns, keys and indexes inline
pub fn create_table(def: &TableDef) -> String {
    let mut parts: Vec<String> = def.columns.iter().map(column_clause).collect();
    parts.extend(
        def.foreign_keys
            .iter()
            .map(|fk| foreign_key_clause(&def.name, fk)),
    );
    parts.extend(def.indexes.iter().map(index_clause));

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n) ENGINE={} DEFAULT CHARSET={} COLLATE={}",
        def.name.quoted(),
        parts.join(",\n  "),
        def.engine,
        def.charset,
        def.collation
    )
}

/// `ALTER TABLE ... ADD COLUMN`
pub fn add_column(table: &Ident, col: &ColumnDef) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {}",
        table.quoted(),
        column_clause(col)
    );
    if let Some(after) = &col.after {
        sql.push_str(" AFTER ");
        sql.push_str(&after.quoted());
    }
    sql
}

/// `ALTER TABLE ... ADD INDEX`
pub fn add_index(table: &Ident, index: &IndexDef) -> String {
    let keyword = match index.kind {
        IndexKind::Plain => "INDEX",
        IndexKind::Unique => "UNIQUE INDEX",
        IndexKind::FullText => "FULLTEXT INDEX",
    };
    format!(
        "ALTER TABLE {} ADD {} {} ({})",
        table.quoted(),
        keyword,
        index.name.quoted(),
        quoted_list(&index.columns)
    )
}

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`
pub fn add_foreign_key(table: &Ident, fk: &ForeignKeyDef) -> String {
    format!(
        "ALTER TABLE {} ADD {}",
        table.quoted(),
        foreign_key_clause(table, fk)
    )
}

/// `ALTER TABLE ... CHANGE <old> <new definition>`
///
/// Used only to rename a legacy column in place; data is preserved.
pub fn change_column(table: &Ident, from: &Ident, col: &ColumnDef) -> String {
    let mut sql = format!(
        "ALTER TABLE {} CHANGE {} {}",
        table.quoted(),
        from.quoted(),
        column_clause(col)
    );
    if let Some(after) = &col.after {
        sql.push_str(" AFTER ");
        sql.push_str(&after.quoted());
    }
    sql
}

/// Parameterized `INSERT` for one row
pub fn insert(table: &Ident, row: &Row) -> String {
    let placeholders = vec!["?"; row.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.quoted(),
        quoted_list(row.columns()),
        placeholders
    )
}

/// Parameterized `SELECT COUNT(*)` with equality filters joined by `AND`
pub fn count(table: &Ident, filter: &[Ident]) -> String {
    let mut sql = format!("SELECT COUNT(*) FROM {}", table.quoted());
    if !filter.is_empty() {
        let conditions: Vec<String> = filter
            .iter()
            .map(|c| format!("{} <=> ?", c.quoted()))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
