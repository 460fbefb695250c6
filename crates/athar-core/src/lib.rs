//! athar-core - Core library for the Athar schema toolkit
//!
//! This crate provides the pure building blocks shared by the database layer,
//! the migration procedures and the CLI: connection configuration, validated
//! SQL identifiers, table/column/index/foreign-key definitions, the Athar
//! target catalog, MySQL DDL rendering, the table dependency DAG, fixture data
//! and the run report. Nothing in here performs I/O.

pub mod catalog;
pub mod config;
pub mod dag;
pub mod ddl;
pub mod error;
pub mod fixtures;
pub mod ident;
pub mod report;
pub mod schema;
pub mod value;

pub use config::{ConnectionConfig, TestUserConfig};
pub use dag::TableDag;
pub use error::{CoreError, CoreResult};
pub use ident::Ident;
pub use report::{RunReport, StepKind, StepOutcome, StepStatus};
pub use schema::{ColumnDef, ForeignKeyDef, IndexDef, IndexKind, Nullability, OnDelete, TableDef};
pub use value::{Row, SqlValue};
