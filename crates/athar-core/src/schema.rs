//! Table, column, index and foreign-key definitions.
//!
//! These are the structural targets the schema mutator converges a live
//! database towards. They describe MySQL tables; [`crate::ddl`] renders them
//! to additive DDL.

use crate::ident::Ident;
use serde::Serialize;
use std::fmt;

/// Column nullability as written in the DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    /// No nullability clause (MySQL default: nullable)
    #[default]
    Unspecified,
    /// Explicit `NULL`
    Null,
    /// `NOT NULL`
    NotNull,
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    /// Column name
    pub name: Ident,

    /// SQL type fragment, e.g. `VARCHAR(20)` or `ENUM('user', 'admin')`
    pub sql_type: String,

    /// Nullability clause
    pub nullability: Nullability,

    /// Default expression fragment, e.g. `FALSE` or `CURRENT_TIMESTAMP`
    pub default: Option<String>,

    /// `ON UPDATE` expression fragment
    pub on_update: Option<String>,

    /// `AUTO_INCREMENT`
    pub auto_increment: bool,

    /// Inline `PRIMARY KEY`
    pub primary_key: bool,

    /// Inline `UNIQUE`
    pub unique: bool,

    /// Position hint used by `ADD COLUMN ... AFTER <col>`
    pub after: Option<Ident>,
}

impl ColumnDef {
    /// Create a nullable column with no default
    pub fn new(name: &str, sql_type: &str) -> Self {
        Self {
            name: Ident::new(name),
            sql_type: sql_type.to_string(),
            nullability: Nullability::Unspecified,
            default: None,
            on_update: None,
            auto_increment: false,
            primary_key: false,
            unique: false,
            after: None,
        }
    }

    /// `INT PRIMARY KEY AUTO_INCREMENT` surrogate key
    pub fn id() -> Self {
        let mut col = Self::new("id", "INT");
        col.primary_key = true;
        col.auto_increment = true;
        col
    }

    pub fn not_null(mut self) -> Self {
        self.nullability = Nullability::NotNull;
        self
    }

    pub fn null(mut self) -> Self {
        self.nullability = Nullability::Null;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, expr: &str) -> Self {
        self.default = Some(expr.to_string());
        self
    }

    pub fn on_update(mut self, expr: &str) -> Self {
        self.on_update = Some(expr.to_string());
        self
    }

    pub fn after(mut self, column: &str) -> Self {
        self.after = Some(Ident::new(column));
        self
    }

    /// Whether inserts may leave this column out
    pub fn is_nullable(&self) -> bool {
        self.nullability != Nullability::NotNull
    }
}

/// Index flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Plain,
    Unique,
    FullText,
}

/// A named secondary index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDef {
    /// Index name; the catalog rejects duplicates within a table
    pub name: Ident,

    /// Indexed columns in order
    pub columns: Vec<Ident>,

    /// Plain, unique or full-text
    pub kind: IndexKind,
}

impl IndexDef {
    fn with_kind(name: &str, columns: &[&str], kind: IndexKind) -> Self {
        Self {
            name: Ident::new(name),
            columns: columns.iter().map(|c| Ident::new(*c)).collect(),
            kind,
        }
    }

    pub fn plain(name: &str, columns: &[&str]) -> Self {
        Self::with_kind(name, columns, IndexKind::Plain)
    }

    pub fn unique(name: &str, columns: &[&str]) -> Self {
        Self::with_kind(name, columns, IndexKind::Unique)
    }

    pub fn fulltext(name: &str, columns: &[&str]) -> Self {
        Self::with_kind(name, columns, IndexKind::FullText)
    }
}

/// `ON DELETE` policy of a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OnDelete {
    /// Ownership relation: dependent rows go with their owner
    Cascade,
    /// Soft relation: the reference is cleared
    SetNull,
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnDelete::Cascade => f.write_str("CASCADE"),
            OnDelete::SetNull => f.write_str("SET NULL"),
        }
    }
}

/// A single-column foreign key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyDef {
    /// Referencing column
    pub column: Ident,

    /// Referenced table
    pub references_table: Ident,

    /// Referenced column
    pub references_column: Ident,

    /// Delete policy
    pub on_delete: OnDelete,
}

impl ForeignKeyDef {
    /// Reference `<table>(id)`
    pub fn new(column: &str, references_table: &str, on_delete: OnDelete) -> Self {
        Self {
            column: Ident::new(column),
            references_table: Ident::new(references_table),
            references_column: Ident::new("id"),
            on_delete,
        }
    }

    /// Constraint name used when the key is created by this toolkit
    pub fn constraint_name(&self, table: &Ident) -> Ident {
        Ident::new(format!("fk_{}_{}", table, self.column))
    }
}

/// Full definition of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDef {
    /// Table name
    pub name: Ident,

    /// Columns in ordinal order
    pub columns: Vec<ColumnDef>,

    /// Secondary indexes
    pub indexes: Vec<IndexDef>,

    /// Foreign keys
    pub foreign_keys: Vec<ForeignKeyDef>,

    /// Storage engine
    pub engine: String,

    /// Default character set
    pub charset: String,

    /// Default collation
    pub collation: String,
}

impl TableDef {
    /// Start an InnoDB / utf8mb4 table definition
    pub fn new(name: &str) -> Self {
        Self {
            name: Ident::new(name),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            engine: "InnoDB".to_string(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_unicode_ci".to_string(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKeyDef) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Look up a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up an index by name
    pub fn get_index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Tables this one must be created after. Self references are excluded.
    pub fn referenced_tables(&self) -> Vec<&Ident> {
        let mut out: Vec<&Ident> = Vec::new();
        for fk in &self.foreign_keys {
            if fk.references_table != self.name && !out.contains(&&fk.references_table) {
                out.push(&fk.references_table);
            }
        }
        out
    }
}
