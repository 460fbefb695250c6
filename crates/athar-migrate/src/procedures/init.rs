use super::{converge_tables, seed_reference_data};
use crate::error::MigrateResult;
use crate::runner::Run;
use athar_core::{catalog, StepKind};

pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let database = run.context().database.clone();
    let result = run.mutator().ensure_database(&database).await;
    run.record(StepKind::Database, database.as_str(), result)?;

    converge_tables(run, catalog::athar_tables()).await?;
    seed_reference_data(run).await
}
