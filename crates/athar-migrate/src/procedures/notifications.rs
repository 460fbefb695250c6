use crate::error::MigrateResult;
use crate::runner::Run;
use athar_core::{catalog, Ident, StepKind};

pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let mutator = run.mutator();
    let table = Ident::new("notifications");

    let content = catalog::notifications_content_renamed();
    let result = mutator
        .ensure_renamed_column(
            &table,
            &Ident::new(catalog::NOTIFICATIONS_LEGACY_BODY),
            &content,
            &catalog::notifications_content(),
        )
        .await;
    run.record(StepKind::Column, "notifications.content", result)?;

    for (column, index) in [
        (
            catalog::notifications_related_id(),
            catalog::notifications_related_id_index(),
        ),
        (
            catalog::notifications_sender_id(),
            catalog::notifications_sender_id_index(),
        ),
    ] {
        let result = mutator.ensure_column(&table, &column).await;
        run.record(StepKind::Column, &format!("{table}.{}", column.name), result)?;

        let result = mutator.ensure_index(&table, &index).await;
        run.record(StepKind::Index, &format!("{table}.{}", index.name), result)?;
    }

    let fk = catalog::notifications_sender_fk();
    let result = mutator.ensure_foreign_key(&table, &fk).await;
    run.record(
        StepKind::ForeignKey,
        &format!("{table}.{} -> {}", fk.column, fk.references_table),
        result,
    )
}
