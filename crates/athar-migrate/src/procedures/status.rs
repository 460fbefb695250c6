use crate::error::{MigrateError, MigrateResult};
use crate::inspector::Inspector;
use crate::runner::Run;
use athar_core::{catalog, Ident, StepKind, TableDef};

/// Missing elements of `def` on the live database; `None` when the table
/// itself is missing.
async fn missing_elements(
    inspector: Inspector<'_>,
    def: &TableDef,
) -> MigrateResult<Option<Vec<String>>> {
    if !inspector.table_exists(&def.name).await? {
        return Ok(None);
    }

    let mut missing = Vec::new();
    for column in &def.columns {
        if !inspector.column_exists(&def.name, &column.name).await? {
            missing.push(format!("column {}", column.name));
        }
    }
    for index in &def.indexes {
        if !inspector.index_exists(&def.name, &index.name).await? {
            missing.push(format!("index {}", index.name));
        }
    }
    for fk in &def.foreign_keys {
        if !inspector
            .foreign_key_exists(&def.name, &fk.column, &fk.references_table)
            .await?
        {
            missing.push(format!("foreign key {} -> {}", fk.column, fk.references_table));
        }
    }
    Ok(Some(missing))
}

/// Read-only: report each target table as converged or pending
pub(super) async fn run(run: &mut Run<'_>) -> MigrateResult<()> {
    let inspector = run.inspector();
    let database = run.context().database.clone();

    let exists = match inspector.database_exists(&database).await {
        Ok(exists) => exists,
        Err(e) => return run.fail(StepKind::Database, database.as_str(), e),
    };
    if !exists {
        run.note(format!("database {database}: pending (does not exist)"));
        return Ok(());
    }
    if let Err(source) = run.db().use_database(&database).await {
        let err = MigrateError::Inspection {
            element: format!("database {database}"),
            source,
        };
        return run.fail(StepKind::Database, database.as_str(), err);
    }

    let mut pending = 0;
    let tables = catalog::athar_tables();
    for def in &tables {
        match missing_elements(inspector, def).await {
            Ok(None) => {
                pending += 1;
                run.note(format!("{}: pending (table missing)", def.name));
            }
            Ok(Some(missing)) if missing.is_empty() => {
                run.note(format!("{}: converged", def.name));
            }
            Ok(Some(missing)) => {
                pending += 1;
                run.note(format!("{}: pending ({})", def.name, missing.join(", ")));
            }
            Err(e) => return run.fail(StepKind::Table, def.name.as_str(), e),
        }
    }

    let notifications = Ident::new("notifications");
    match inspector.column_names(&notifications).await {
        Ok(columns) if !columns.is_empty() => {
            run.note(format!("notifications columns: {}", columns.join(", ")));
        }
        Ok(_) => {}
        Err(e) => return run.fail(StepKind::Column, notifications.as_str(), e),
    }

    run.note(format!(
        "{} of {} tables converged",
        tables.len() - pending,
        tables.len()
    ));
    Ok(())
}
