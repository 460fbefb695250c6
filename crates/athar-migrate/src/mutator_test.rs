use super::*;
use athar_core::{catalog, Row, SqlValue, StepStatus};
use athar_db::{DatabaseCatalog, DatabaseCore, DatabaseSchema, MemoryBackend};

fn ident(s: &str) -> Ident {
    Ident::new(s)
}

async fn with_tables(tables: &[TableDef]) -> MemoryBackend {
    let db = MemoryBackend::with_database("athar_db");
    for def in tables {
        db.create_table(def).await.unwrap();
    }
    db.clear_statements().unwrap();
    db
}

fn legacy_notifications() -> TableDef {
    TableDef::new("notifications")
        .column(ColumnDef::id())
        .column(ColumnDef::new("user_id", "INT").not_null())
        .column(ColumnDef::new("type", "VARCHAR(20)").not_null())
        .column(ColumnDef::new("title", "VARCHAR(255)"))
        .column(ColumnDef::new("body", "TEXT"))
}

fn posts_without_private() -> TableDef {
    let mut def = catalog::posts();
    def.columns.retain(|c| c.name != "is_private");
    def.indexes.retain(|i| i.name != "idx_is_private");
    def
}

#[tokio::test]
async fn test_ensure_database_creates_then_skips() {
    let db = MemoryBackend::new();
    let mutator = SchemaMutator::new(&db);
    let name = ident("athar_db");

    let first = mutator.ensure_database(&name).await.unwrap();
    assert_eq!(first.status, StepStatus::Applied);
    assert!(db.has_database("athar_db"));

    let second = mutator.ensure_database(&name).await.unwrap();
    assert_eq!(second.status, StepStatus::Skipped("already exists".to_string()));
    assert_eq!(db.statements().unwrap().len(), 1);

    // The database is selected either way
    assert!(db.table_names().unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_table_creates_then_skips() {
    let db = with_tables(&[]).await;
    let mutator = SchemaMutator::new(&db);

    let first = mutator.ensure_table(&catalog::users()).await.unwrap();
    assert!(first.is_applied());
    assert_eq!(first.kind, StepKind::Table);
    assert_eq!(first.name, "users");

    let second = mutator.ensure_table(&catalog::users()).await.unwrap();
    assert!(second.is_skipped());

    let statements = db.statements().unwrap();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS `users`"));
}

#[tokio::test]
async fn test_ensure_table_requires_referenced_tables() {
    let db = with_tables(&[]).await;
    let mutator = SchemaMutator::new(&db);

    let err = mutator.ensure_table(&catalog::posts()).await.unwrap_err();
    match err {
        MigrateError::MissingPrerequisite { element, missing } => {
            assert_eq!(element, "posts");
            assert_eq!(missing, "table users");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(db.statements().unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_table_allows_self_reference() {
    let db = with_tables(&[catalog::users(), catalog::posts()]).await;
    let mutator = SchemaMutator::new(&db);

    let outcome = mutator.ensure_table(&catalog::comments()).await.unwrap();
    assert!(outcome.is_applied());
}

#[tokio::test]
async fn test_ensure_existing_table_keeps_its_shape() {
    let db = with_tables(&[catalog::users(), posts_without_private()]).await;
    let mutator = SchemaMutator::new(&db);

    let outcome = mutator.ensure_table(&catalog::posts()).await.unwrap();
    assert!(outcome.is_skipped());
    assert!(db.column("posts", "is_private").unwrap().is_none());
}

#[tokio::test]
async fn test_ensure_column_adds_after_position() {
    let db = with_tables(&[catalog::users(), posts_without_private()]).await;
    let mutator = SchemaMutator::new(&db);
    let posts = ident("posts");

    let first = mutator
        .ensure_column(&posts, &catalog::posts_is_private())
        .await
        .unwrap();
    assert!(first.is_applied());
    assert_eq!(first.name, "posts.is_private");

    let statements = db.statements().unwrap();
    assert_eq!(
        statements,
        vec!["ALTER TABLE `posts` ADD COLUMN `is_private` BOOLEAN DEFAULT FALSE AFTER `is_archived`"]
    );

    let names = db.column_names(&posts).await.unwrap();
    let archived = names.iter().position(|n| n == "is_archived").unwrap();
    assert_eq!(names[archived + 1], "is_private");

    let second = mutator
        .ensure_column(&posts, &catalog::posts_is_private())
        .await
        .unwrap();
    assert!(second.is_skipped());
    assert_eq!(db.statements().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ensure_column_on_missing_table() {
    let db = with_tables(&[]).await;
    let mutator = SchemaMutator::new(&db);

    let err = mutator
        .ensure_column(&ident("users"), &catalog::users_is_banned())
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::MissingPrerequisite { .. }));
}

#[tokio::test]
async fn test_ensure_index_independent_of_column() {
    let mut posts_def = catalog::posts();
    posts_def.indexes.retain(|i| i.name != "idx_is_private");
    let db = with_tables(&[catalog::users(), posts_def]).await;
    let mutator = SchemaMutator::new(&db);
    let posts = ident("posts");

    let column = mutator
        .ensure_column(&posts, &catalog::posts_is_private())
        .await
        .unwrap();
    assert!(column.is_skipped());

    let index = mutator
        .ensure_index(&posts, &catalog::posts_is_private_index())
        .await
        .unwrap();
    assert!(index.is_applied());
    assert_eq!(index.kind, StepKind::Index);
    assert_eq!(
        db.statements().unwrap(),
        vec!["ALTER TABLE `posts` ADD INDEX `idx_is_private` (`is_private`)"]
    );

    let again = mutator
        .ensure_index(&posts, &catalog::posts_is_private_index())
        .await
        .unwrap();
    assert!(again.is_skipped());
}

#[tokio::test]
async fn test_ensure_foreign_key() {
    let mut notifications = legacy_notifications();
    notifications.columns.push(ColumnDef::new("sender_id", "INT"));
    let db = with_tables(&[catalog::users(), notifications]).await;
    let mutator = SchemaMutator::new(&db);
    let table = ident("notifications");
    let fk = catalog::notifications_sender_fk();

    let first = mutator.ensure_foreign_key(&table, &fk).await.unwrap();
    assert!(first.is_applied());
    assert_eq!(first.name, "notifications.sender_id -> users");
    assert!(db
        .foreign_key_exists(&table, &ident("sender_id"), &ident("users"))
        .await
        .unwrap());

    let second = mutator.ensure_foreign_key(&table, &fk).await.unwrap();
    assert!(second.is_skipped());
    assert_eq!(db.statements().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ensure_foreign_key_requires_parent() {
    let mut notifications = legacy_notifications();
    notifications.columns.push(ColumnDef::new("sender_id", "INT"));
    let db = with_tables(&[notifications]).await;
    let mutator = SchemaMutator::new(&db);

    let err = mutator
        .ensure_foreign_key(&ident("notifications"), &catalog::notifications_sender_fk())
        .await
        .unwrap_err();
    match err {
        MigrateError::MissingPrerequisite { missing, .. } => assert_eq!(missing, "table users"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rename_legacy_column_keeps_data() {
    let db = with_tables(&[legacy_notifications()]).await;
    let table = ident("notifications");
    let row = Row::new()
        .with("user_id", 1)
        .with("type", "like")
        .with("title", "t")
        .with("body", "hello");
    db.insert_row(&table, &row).await.unwrap();
    db.clear_statements().unwrap();

    let mutator = SchemaMutator::new(&db);
    let outcome = mutator
        .ensure_renamed_column(
            &table,
            &ident(catalog::NOTIFICATIONS_LEGACY_BODY),
            &catalog::notifications_content_renamed(),
            &catalog::notifications_content(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.kind, StepKind::Rename);
    assert_eq!(outcome.name, "notifications.body -> content");
    assert_eq!(
        db.statements().unwrap(),
        vec!["ALTER TABLE `notifications` CHANGE `body` `content` TEXT NOT NULL"]
    );

    assert!(db.column("notifications", "body").unwrap().is_none());
    let content = db.column("notifications", "content").unwrap().unwrap();
    assert!(!content.is_nullable());
    let rows = db.rows("notifications").unwrap();
    assert_eq!(rows[0].get("content"), Some(&SqlValue::from("hello")));

    let again = mutator
        .ensure_renamed_column(
            &table,
            &ident(catalog::NOTIFICATIONS_LEGACY_BODY),
            &catalog::notifications_content_renamed(),
            &catalog::notifications_content(),
        )
        .await
        .unwrap();
    assert!(again.is_skipped());
    assert_eq!(db.statements().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_falls_back_to_add() {
    let mut def = legacy_notifications();
    def.columns.retain(|c| c.name != "body");
    let db = with_tables(&[def]).await;
    let mutator = SchemaMutator::new(&db);

    let outcome = mutator
        .ensure_renamed_column(
            &ident("notifications"),
            &ident(catalog::NOTIFICATIONS_LEGACY_BODY),
            &catalog::notifications_content_renamed(),
            &catalog::notifications_content(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.kind, StepKind::Column);
    assert!(outcome.is_applied());
    assert_eq!(
        db.statements().unwrap(),
        vec!["ALTER TABLE `notifications` ADD COLUMN `content` TEXT NOT NULL AFTER `title`"]
    );
}

#[tokio::test]
async fn test_failed_ddl_is_a_mutation_error() {
    let db = with_tables(&[catalog::users(), posts_without_private()]).await;
    db.fail_on("ADD COLUMN").unwrap();
    let mutator = SchemaMutator::new(&db);

    let err = mutator
        .ensure_column(&ident("posts"), &catalog::posts_is_private())
        .await
        .unwrap_err();
    match err {
        MigrateError::Mutation { element, .. } => assert_eq!(element, "posts.is_private"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_catalog_failure_is_an_inspection_error() {
    let db = with_tables(&[catalog::users()]).await;
    db.close().await.unwrap();
    let mutator = SchemaMutator::new(&db);

    let err = mutator.ensure_table(&catalog::users()).await.unwrap_err();
    assert!(matches!(err, MigrateError::Inspection { .. }));
}
