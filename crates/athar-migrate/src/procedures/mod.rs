//! Named maintenance procedures.
//!
//! Each procedure is a fixed sequence of steps recorded through a [`Run`].
//! Steps run strictly in order and the first failure ends the procedure.

mod ban_fields;
mod boxes_categories;
mod follows;
mod init;
mod notifications;
mod private_field;
mod seed;
mod status;
mod test_user;

use crate::error::MigrateResult;
use crate::runner::Run;
use std::fmt;

pub(crate) use boxes_categories::{converge_tables, seed_reference_data};

/// A maintenance procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    /// Create the database and every table, then seed boxes and categories
    Init,
    /// Ensure boxes/categories exist and hold the default rows
    AddBoxesCategories,
    /// Add moderation columns to users and posts
    AddBanFields,
    /// Add posts.is_private and its index
    AddPrivateField,
    /// Bring notifications to content/related_id/sender_id
    FixNotifications,
    /// Insert the sample data set into an empty database
    Seed,
    /// Insert the single credentialed test user
    CreateTestUser,
    /// Init followed by every column migration, including the legacy
    /// `follows.followed_id` rename
    Migrate,
    /// Read-only convergence report
    Status,
}

impl Procedure {
    pub const ALL: [Procedure; 9] = [
        Procedure::Init,
        Procedure::AddBoxesCategories,
        Procedure::AddBanFields,
        Procedure::AddPrivateField,
        Procedure::FixNotifications,
        Procedure::Seed,
        Procedure::CreateTestUser,
        Procedure::Migrate,
        Procedure::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Procedure::Init => "init",
            Procedure::AddBoxesCategories => "add-boxes-categories",
            Procedure::AddBanFields => "add-ban-fields",
            Procedure::AddPrivateField => "add-private-field",
            Procedure::FixNotifications => "fix-notifications",
            Procedure::Seed => "seed",
            Procedure::CreateTestUser => "create-test-user",
            Procedure::Migrate => "migrate",
            Procedure::Status => "status",
        }
    }

    /// Whether the connection must select the configured database up front.
    ///
    /// Procedures that create the database, or report on whether it exists,
    /// connect without one.
    pub fn requires_database(&self) -> bool {
        !matches!(
            self,
            Procedure::Init | Procedure::Migrate | Procedure::Status
        )
    }

    /// Run every step of the procedure
    pub async fn run(&self, run: &mut Run<'_>) -> MigrateResult<()> {
        match self {
            Procedure::Init => init::run(run).await,
            Procedure::AddBoxesCategories => boxes_categories::run(run).await,
            Procedure::AddBanFields => ban_fields::run(run).await,
            Procedure::AddPrivateField => private_field::run(run).await,
            Procedure::FixNotifications => notifications::run(run).await,
            Procedure::Seed => seed::run(run).await,
            Procedure::CreateTestUser => test_user::run(run).await,
            Procedure::Migrate => {
                init::run(run).await?;
                ban_fields::run(run).await?;
                private_field::run(run).await?;
                notifications::run(run).await?;
                follows::run(run).await
            }
            Procedure::Status => status::run(run).await,
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
