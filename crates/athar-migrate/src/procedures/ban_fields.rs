use crate::error::MigrateResult;
use crate::runner::Run;
use athar_core::{catalog, Ident, StepKind};

pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let mutator = run.mutator();
    let users = Ident::new("users");
    let posts = Ident::new("posts");

    for (table, column) in [
        (&users, catalog::users_is_banned()),
        (&users, catalog::users_ban_reason()),
        (&posts, catalog::posts_is_featured()),
    ] {
        let name = format!("{table}.{}", column.name);
        let result = mutator.ensure_column(table, &column).await;
        run.record(StepKind::Column, &name, result)?;
    }
    Ok(())
}
