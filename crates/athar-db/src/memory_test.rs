use super::*;
use athar_core::catalog;
use athar_core::OnDelete;

fn ident(s: &str) -> Ident {
    Ident::new(s)
}

async fn with_users() -> MemoryBackend {
    let db = MemoryBackend::with_database("athar_db");
    db.create_table(&catalog::users()).await.unwrap();
    db.clear_statements().unwrap();
    db
}

#[tokio::test]
async fn test_db_type() {
    assert_eq!(MemoryBackend::new().db_type(), "memory");
}

#[tokio::test]
async fn test_use_missing_database() {
    let db = MemoryBackend::new();
    let err = db.use_database(&ident("athar_db")).await.unwrap_err();
    assert!(matches!(err, DbError::DatabaseMissing(_)));

    assert!(!db.database_exists(&ident("athar_db")).await.unwrap());
    db.create_database_if_not_exists(&ident("athar_db")).await.unwrap();
    assert!(db.database_exists(&ident("athar_db")).await.unwrap());
    db.create_database_if_not_exists(&ident("athar_db")).await.unwrap();
    db.use_database(&ident("athar_db")).await.unwrap();
    assert!(db.has_database("athar_db"));
}

#[tokio::test]
async fn test_catalog_before_use_database() {
    let db = MemoryBackend::new();
    let err = db.table_exists(&ident("users")).await.unwrap_err();
    assert!(matches!(err, DbError::NoDatabaseSelected));
}

#[tokio::test]
async fn test_create_table_and_inspect() {
    let db = with_users().await;
    let users = ident("users");
    assert!(db.table_exists(&users).await.unwrap());
    assert!(db.column_exists(&users, &ident("phone")).await.unwrap());
    assert!(!db.column_exists(&users, &ident("missing")).await.unwrap());
    assert!(db.index_exists(&users, &ident("idx_phone")).await.unwrap());
    // Implicit index of the inline UNIQUE
    assert!(db.index_exists(&users, &ident("phone")).await.unwrap());
    assert!(!db.table_exists(&ident("posts")).await.unwrap());
    assert!(!db.column_exists(&ident("posts"), &ident("id")).await.unwrap());
}

#[tokio::test]
async fn test_create_table_twice_is_if_not_exists() {
    let db = with_users().await;
    db.create_table(&catalog::users()).await.unwrap();
    assert_eq!(db.table_names().unwrap(), vec!["users".to_string()]);
}

#[tokio::test]
async fn test_create_table_missing_reference() {
    let db = MemoryBackend::with_database("athar_db");
    let err = db.create_table(&catalog::posts()).await.unwrap_err();
    assert!(matches!(err, DbError::MissingReference(_)));
    assert!(!db.table_exists(&ident("posts")).await.unwrap());
}

#[tokio::test]
async fn test_self_reference_allowed() {
    let db = with_users().await;
    db.create_table(&catalog::posts()).await.unwrap();
    db.create_table(&catalog::comments()).await.unwrap();
    assert!(db
        .foreign_key_exists(&ident("comments"), &ident("parent_id"), &ident("comments"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_add_column_positions_and_duplicates() {
    let db = MemoryBackend::with_database("athar_db");
    let def = TableDef::new("posts")
        .column(ColumnDef::id())
        .column(ColumnDef::new("is_archived", "BOOLEAN"))
        .column(ColumnDef::new("views_count", "INT"));
    db.create_table(&def).await.unwrap();

    let posts = ident("posts");
    let col = ColumnDef::new("is_private", "BOOLEAN").after("is_archived");
    db.add_column(&posts, &col).await.unwrap();
    assert_eq!(
        db.column_names(&posts).await.unwrap(),
        vec!["id", "is_archived", "is_private", "views_count"]
    );

    let err = db.add_column(&posts, &col).await.unwrap_err();
    assert!(matches!(err, DbError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_add_index_duplicate_name() {
    let db = with_users().await;
    let users = ident("users");
    let index = IndexDef::plain("idx_phone", &["phone"]);
    let err = db.add_index(&users, &index).await.unwrap_err();
    assert!(matches!(err, DbError::AlreadyExists(_)));

    let index = IndexDef::plain("idx_role", &["role"]);
    db.add_index(&users, &index).await.unwrap();
    assert!(db.index_exists(&users, &ident("idx_role")).await.unwrap());
}

#[tokio::test]
async fn test_add_foreign_key() {
    let db = with_users().await;
    let def = TableDef::new("notifications")
        .column(ColumnDef::id())
        .column(ColumnDef::new("sender_id", "INT"));
    db.create_table(&def).await.unwrap();

    let table = ident("notifications");
    let fk = ForeignKeyDef::new("sender_id", "users", OnDelete::SetNull);
    db.add_foreign_key(&table, &fk).await.unwrap();
    assert!(db
        .foreign_key_exists(&table, &ident("sender_id"), &ident("users"))
        .await
        .unwrap());

    let err = db.add_foreign_key(&table, &fk).await.unwrap_err();
    assert!(matches!(err, DbError::AlreadyExists(_)));

    let dangling = ForeignKeyDef::new("sender_id", "ghosts", OnDelete::SetNull);
    let err = db.add_foreign_key(&table, &dangling).await.unwrap_err();
    assert!(matches!(err, DbError::MissingReference(_)));
}

#[tokio::test]
async fn test_change_column_renames_data() {
    let db = with_users().await;
    let def = TableDef::new("notifications")
        .column(ColumnDef::id())
        .column(ColumnDef::new("title", "VARCHAR(255)"))
        .column(ColumnDef::new("body", "TEXT"));
    db.create_table(&def).await.unwrap();
    let table = ident("notifications");
    db.insert_row(&table, &Row::new().with("body", "hello"))
        .await
        .unwrap();

    let content = ColumnDef::new("content", "TEXT").not_null();
    db.change_column(&table, &ident("body"), &content)
        .await
        .unwrap();

    assert_eq!(db.column_names(&table).await.unwrap(), vec!["id", "title", "content"]);
    let rows = db.rows("notifications").unwrap();
    assert_eq!(rows[0].get("content"), Some(&SqlValue::from("hello")));
    assert!(rows[0].get("body").is_none());
    assert!(!db.column("notifications", "content").unwrap().unwrap().is_nullable());
}

#[tokio::test]
async fn test_insert_generates_ids() {
    let db = with_users().await;
    let users = ident("users");
    let first = Row::new()
        .with("phone", "0770")
        .with("name", "a")
        .with("password", "h");
    let second = Row::new()
        .with("phone", "0771")
        .with("name", "b")
        .with("password", "h");
    assert_eq!(db.insert_row(&users, &first).await.unwrap(), 1);
    assert_eq!(db.insert_row(&users, &second).await.unwrap(), 2);
    assert_eq!(db.count_rows(&users, &[]).await.unwrap(), 2);
    assert_eq!(
        db.count_rows(&users, &[(ident("phone"), SqlValue::from("0771"))])
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_insert_explicit_id_advances_counter() {
    let db = MemoryBackend::with_database("athar_db");
    db.create_table(&catalog::boxes()).await.unwrap();
    let boxes = ident("boxes");
    db.insert_row(&boxes, &Row::new().with("id", 5i64).with("name", "x"))
        .await
        .unwrap();
    let next = db
        .insert_row(&boxes, &Row::new().with("name", "y"))
        .await
        .unwrap();
    assert_eq!(next, 6);

    let err = db
        .insert_row(&boxes, &Row::new().with("id", 5i64).with("name", "z"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_insert_unique_violation() {
    let db = with_users().await;
    let users = ident("users");
    let row = Row::new()
        .with("phone", "0770")
        .with("name", "a")
        .with("password", "h");
    db.insert_row(&users, &row).await.unwrap();
    let err = db.insert_row(&users, &row).await.unwrap_err();
    assert!(matches!(err, DbError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_insert_checks_not_null_and_columns() {
    let db = with_users().await;
    let users = ident("users");
    let err = db
        .insert_row(&users, &Row::new().with("phone", "0770"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("doesn't have a default value"));

    let err = db
        .insert_row(&users, &Row::new().with("nope", 1i64))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown column"));
}

#[tokio::test]
async fn test_insert_checks_foreign_keys() {
    let db = with_users().await;
    db.create_table(&catalog::posts()).await.unwrap();
    let row = Row::new()
        .with("user_id", 42i64)
        .with("type", "text")
        .with("content", "c");
    let err = db.insert_row(&ident("posts"), &row).await.unwrap_err();
    assert!(err.to_string().contains("foreign key constraint fails"));
}

#[tokio::test]
async fn test_null_safe_count_filter() {
    let db = MemoryBackend::with_database("athar_db");
    db.create_table(&catalog::boxes()).await.unwrap();
    let boxes = ident("boxes");
    db.insert_row(&boxes, &Row::new().with("name", "x"))
        .await
        .unwrap();
    let count = db
        .count_rows(&boxes, &[(ident("icon"), SqlValue::Null)])
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_failure_injection() {
    let db = with_users().await;
    db.fail_on("ADD COLUMN `is_banned`").unwrap();
    let err = db
        .add_column(&ident("users"), &ColumnDef::new("is_banned", "BOOLEAN"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));

    db.clear_failures().unwrap();
    assert!(db.statements().unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_injection() {
    let db = with_users().await;
    db.timeout_on("ADD INDEX").unwrap();
    let err = db
        .add_index(&ident("users"), &IndexDef::plain("idx_display_name", &["name"]))
        .await
        .unwrap_err();
    match err {
        DbError::Timeout { sql, .. } => assert!(sql.contains("`idx_display_name`")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!db.index_exists(&ident("users"), &ident("idx_display_name")).await.unwrap());

    db.clear_failures().unwrap();
    db.add_index(&ident("users"), &IndexDef::plain("idx_display_name", &["name"]))
        .await
        .unwrap();
    assert_eq!(db.statements().unwrap().len(), 1);
}

#[tokio::test]
async fn test_close_rejects_further_work() {
    let db = with_users().await;
    db.close().await.unwrap();
    db.close().await.unwrap();
    assert!(db.is_closed());
    assert_eq!(db.close_calls(), 2);
    let err = db.table_exists(&ident("users")).await.unwrap_err();
    assert!(matches!(err, DbError::ConnectionError(_)));

    db.reopen().unwrap();
    assert!(db.table_exists(&ident("users")).await.unwrap());
}
