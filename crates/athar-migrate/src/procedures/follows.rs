use crate::error::MigrateResult;
use crate::runner::Run;
use athar_core::{catalog, Ident, StepKind};

/// Bring a `follows` table created with `followed_id` to `following_id`
pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let mutator = run.mutator();
    let table = Ident::new("follows");

    let result = mutator
        .ensure_renamed_column(
            &table,
            &Ident::new(catalog::FOLLOWS_LEGACY_FOLLOWED),
            &catalog::follows_following_id_renamed(),
            &catalog::follows_following_id(),
        )
        .await;
    run.record(StepKind::Column, "follows.following_id", result)?;

    let index = catalog::follows_following_id_index();
    let result = mutator.ensure_index(&table, &index).await;
    run.record(StepKind::Index, &format!("{table}.{}", index.name), result)?;

    let fk = catalog::follows_following_fk();
    let result = mutator.ensure_foreign_key(&table, &fk).await;
    run.record(
        StepKind::ForeignKey,
        &format!("{table}.{} -> {}", fk.column, fk.references_table),
        result,
    )
}
