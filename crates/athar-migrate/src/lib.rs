//! athar-migrate - Idempotent migrations and seeding for the Athar database
//!
//! This crate provides the schema inspector, the additive schema mutator,
//! the fixture seeder, and the named procedures built from them. Every
//! procedure runs through [`execute`], which records each step in a
//! [`athar_core::RunReport`] and always releases the connection.

pub mod error;
pub mod inspector;
pub mod mutator;
pub mod password;
pub mod procedures;
pub mod runner;
pub mod seeder;

pub use error::{MigrateError, MigrateResult};
pub use inspector::Inspector;
pub use mutator::SchemaMutator;
pub use password::{hash_password, verify_password};
pub use procedures::Procedure;
pub use runner::{execute, ProcedureContext, Run};
pub use seeder::{SeedGate, SeedOutcome, Seeder};
