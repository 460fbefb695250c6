use crate::error::MigrateResult;
use crate::runner::Run;
use athar_core::{catalog, Ident, StepKind};

/// Column and index are checked independently, so an interrupted run resumes
/// with whichever is still missing.
pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let mutator = run.mutator();
    let posts = Ident::new("posts");

    let column = catalog::posts_is_private();
    let result = mutator.ensure_column(&posts, &column).await;
    run.record(StepKind::Column, &format!("posts.{}", column.name), result)?;

    let index = catalog::posts_is_private_index();
    let result = mutator.ensure_index(&posts, &index).await;
    run.record(StepKind::Index, &format!("posts.{}", index.name), result)
}
