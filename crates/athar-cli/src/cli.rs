//! CLI argument definitions using clap derive API

use athar_migrate::Procedure;
use clap::{Args, Parser, Subcommand};

/// Athar - idempotent schema migrations and seeding for the Athar database.
///
/// Connection settings come from the environment (DB_HOST, DB_USER,
/// DB_PASSWORD, DB_NAME, DB_PORT), optionally loaded from a `.env` file in the
/// working directory.
#[derive(Parser, Debug)]
#[command(name = "athar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Procedure to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available maintenance procedures
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Create the database and all tables, then seed boxes and categories
    Init,

    /// Ensure boxes/categories exist and hold the default rows
    AddBoxesCategories,

    /// Add users.is_banned, users.ban_reason and posts.is_featured
    AddBanFields,

    /// Add posts.is_private and its index
    AddPrivateField,

    /// Rename notifications.body to content and add the sender columns
    FixNotifications,

    /// Insert sample users, posts, likes, comments and follows
    Seed,

    /// Insert the credentialed test user
    CreateTestUser,

    /// Run init and every column migration in one go
    Migrate,

    /// Report which tables are converged (read-only)
    Status,
}

impl Commands {
    /// The procedure this subcommand runs
    pub fn procedure(self) -> Procedure {
        match self {
            Commands::Init => Procedure::Init,
            Commands::AddBoxesCategories => Procedure::AddBoxesCategories,
            Commands::AddBanFields => Procedure::AddBanFields,
            Commands::AddPrivateField => Procedure::AddPrivateField,
            Commands::FixNotifications => Procedure::FixNotifications,
            Commands::Seed => Procedure::Seed,
            Commands::CreateTestUser => Procedure::CreateTestUser,
            Commands::Migrate => Procedure::Migrate,
            Commands::Status => Procedure::Status,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
