use crate::error::{MigrateError, MigrateResult};
use crate::runner::Run;
use crate::seeder::SeedGate;
use athar_core::fixtures::{BOXES, CATEGORIES};
use athar_core::{catalog, Ident, Row, StepKind, TableDag, TableDef};

/// Ensure `tables` in dependency order
pub(crate) async fn converge_tables(run: &mut Run<'_>, tables: Vec<TableDef>) -> MigrateResult<()> {
    let dag = match TableDag::build(tables) {
        Ok(dag) => dag,
        Err(e) => return run.fail(StepKind::Table, "catalog", MigrateError::from(e)),
    };
    let order = match dag.creation_order() {
        Ok(order) => order,
        Err(e) => return run.fail(StepKind::Table, "catalog", MigrateError::from(e)),
    };

    let mutator = run.mutator();
    for def in order {
        let result = mutator.ensure_table(def).await;
        run.record(StepKind::Table, def.name.as_str(), result)?;
    }
    Ok(())
}

/// Seed the default boxes and categories, keyed by explicit id
pub(crate) async fn seed_reference_data(run: &mut Run<'_>) -> MigrateResult<()> {
    let seeder = run.seeder();
    let gate = SeedGate::natural_key(&["id"]);

    let boxes = Ident::new("boxes");
    let rows: Vec<Row> = BOXES.iter().map(|b| b.to_row()).collect();
    let result = seeder
        .seed_if_empty(&boxes, &rows, &gate)
        .await
        .map(|o| o.step(&boxes));
    run.record(StepKind::Seed, boxes.as_str(), result)?;

    let categories = Ident::new("categories");
    let rows: Vec<Row> = CATEGORIES.iter().map(|c| c.to_row()).collect();
    let result = seeder
        .seed_if_empty(&categories, &rows, &gate)
        .await
        .map(|o| o.step(&categories));
    run.record(StepKind::Seed, categories.as_str(), result)
}

pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    converge_tables(run, vec![catalog::boxes(), catalog::categories()]).await?;
    seed_reference_data(run).await
}
