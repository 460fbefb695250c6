use crate::error::MigrateResult;
use crate::password::hash_password;
use crate::runner::Run;
use crate::seeder::{SeedGate, SeedOutcome};
use athar_core::fixtures::{self, COMMENTS, FOLLOWS, LIKES, POSTS, SAMPLE_PASSWORD, USERS};
use athar_core::{Ident, Row, StepKind, StepOutcome};

const SEEDED_TABLES: [&str; 5] = ["users", "posts", "likes", "comments", "follows"];

/// Insert the sample data set, gated on `users` being empty.
///
/// Tables are filled in dependency order and each insert is wired to the ids
/// generated by the previous ones.
pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let seeder = run.seeder();
    let users = Ident::new("users");

    let existing = match seeder.row_count(&users).await {
        Ok(n) => n,
        Err(e) => return run.fail(StepKind::Seed, users.as_str(), e),
    };
    if existing > 0 {
        log::info!("Table users already contains data ({existing} rows), skipping seed");
        for table in SEEDED_TABLES {
            run.record(
                StepKind::Seed,
                table,
                Ok(StepOutcome::skipped(
                    StepKind::Seed,
                    table,
                    "users already contains data",
                )),
            )?;
        }
        return Ok(());
    }

    let hash = match hash_password(SAMPLE_PASSWORD).await {
        Ok(hash) => hash,
        Err(e) => return run.fail(StepKind::Seed, users.as_str(), e),
    };

    let user_rows: Vec<Row> = USERS.iter().map(|u| u.to_row(&hash)).collect();
    let user_ids = seed_table(run, &users, user_rows).await?;

    let posts = Ident::new("posts");
    let post_rows = POSTS
        .iter()
        .map(|p| Ok(p.to_row(user_ids.id(&users, p.author)?)))
        .collect::<MigrateResult<Vec<Row>>>();
    let post_rows = resolve(run, &posts, post_rows)?;
    let post_ids = seed_table(run, &posts, post_rows).await?;

    let likes = Ident::new("likes");
    let like_rows = LIKES
        .iter()
        .map(|l| {
            Ok(Row::new()
                .with("post_id", post_ids.id(&posts, l.post)?)
                .with("user_id", user_ids.id(&users, l.user)?))
        })
        .collect::<MigrateResult<Vec<Row>>>();
    let like_rows = resolve(run, &likes, like_rows)?;
    seed_table(run, &likes, like_rows).await?;

    let comments = Ident::new("comments");
    let comment_rows = COMMENTS
        .iter()
        .map(|c| {
            Ok(Row::new()
                .with("post_id", post_ids.id(&posts, c.post)?)
                .with("user_id", user_ids.id(&users, c.user)?)
                .with("content", c.content))
        })
        .collect::<MigrateResult<Vec<Row>>>();
    let comment_rows = resolve(run, &comments, comment_rows)?;
    seed_table(run, &comments, comment_rows).await?;

    let follows = Ident::new("follows");
    let follow_rows = FOLLOWS
        .iter()
        .map(|f| {
            Ok(Row::new()
                .with("follower_id", user_ids.id(&users, f.follower)?)
                .with("following_id", user_ids.id(&users, f.following)?))
        })
        .collect::<MigrateResult<Vec<Row>>>();
    let follow_rows = resolve(run, &follows, follow_rows)?;
    seed_table(run, &follows, follow_rows).await?;

    run.note(format!("Sample accounts share the password: {SAMPLE_PASSWORD}"));
    for account in fixtures::echoed_accounts() {
        run.note(format!(
            "  {} ({}): {}",
            account.name,
            account.role.as_str(),
            account.phone
        ));
    }
    Ok(())
}

/// Record a failed fixture resolution, otherwise pass the rows through
fn resolve(
    run: &mut Run<'_>,
    table: &Ident,
    rows: MigrateResult<Vec<Row>>,
) -> MigrateResult<Vec<Row>> {
    rows.or_else(|e| run.fail(StepKind::Seed, table.as_str(), e))
}

async fn seed_table(
    run: &mut Run<'_>,
    table: &Ident,
    rows: Vec<Row>,
) -> MigrateResult<SeedOutcome> {
    let outcome = run
        .seeder()
        .seed_if_empty(table, &rows, &SeedGate::EmptyTable)
        .await;
    match outcome {
        Ok(outcome) => {
            run.record(StepKind::Seed, table.as_str(), Ok(outcome.step(table)))?;
            Ok(outcome)
        }
        Err(e) => run.fail(StepKind::Seed, table.as_str(), e),
    }
}
