use super::*;
use crate::schema::{ColumnDef, ForeignKeyDef, OnDelete};

fn table(name: &str, refs: &[&str]) -> TableDef {
    let mut def = TableDef::new(name).column(ColumnDef::id());
    for (i, r) in refs.iter().enumerate() {
        let col = format!("ref{i}_id");
        def = def
            .column(ColumnDef::new(&col, "INT"))
            .foreign_key(ForeignKeyDef::new(&col, r, OnDelete::Cascade));
    }
    def
}

fn position(order: &[Ident], name: &str) -> usize {
    order.iter().position(|t| t == name).unwrap()
}

#[test]
fn test_build_dag() {
    // Declared in the "wrong" order on purpose.
    let dag = TableDag::build(vec![
        table("likes", &["posts", "users"]),
        table("posts", &["users"]),
        table("users", &[]),
    ])
    .unwrap();
    let order = dag.creation_order_names().unwrap();

    assert!(position(&order, "users") < position(&order, "posts"));
    assert!(position(&order, "posts") < position(&order, "likes"));
}

#[test]
fn test_circular_dependency() {
    let result = TableDag::build(vec![
        table("a", &["b"]),
        table("b", &["c"]),
        table("c", &["a"]),
    ]);
    match result.unwrap_err() {
        CoreError::CircularDependency { cycle } => {
            assert!(cycle.contains("a"));
            assert!(cycle.contains(" -> "));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_self_reference_is_not_a_cycle() {
    let dag = TableDag::build(vec![table("comments", &["comments"])]).unwrap();
    assert_eq!(dag.len(), 1);
    assert!(dag.dependencies("comments").is_empty());
}

#[test]
fn test_unknown_reference() {
    let err = TableDag::build(vec![table("posts", &["users"])]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownReference { .. }));
}

#[test]
fn test_duplicate_table() {
    let err = TableDag::build(vec![table("users", &[]), table("users", &[])]).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTable { .. }));
}

#[test]
fn test_dependencies_and_dependents() {
    let dag = TableDag::build(vec![
        table("users", &[]),
        table("posts", &["users"]),
        table("comments", &["posts", "users"]),
    ])
    .unwrap();

    let mut deps = dag.dependencies("comments");
    deps.sort();
    assert_eq!(deps, vec!["posts".to_string(), "users".to_string()]);

    let mut dependents = dag.dependents("users");
    dependents.sort();
    assert_eq!(dependents, vec!["comments".to_string(), "posts".to_string()]);

    assert!(dag.dependencies("missing").is_empty());
}

#[test]
fn test_repeated_reference_adds_one_edge() {
    let dag = TableDag::build(vec![
        table("users", &[]),
        table("follows", &["users", "users"]),
    ])
    .unwrap();
    assert_eq!(dag.dependents("users"), vec!["follows".to_string()]);
}

#[test]
fn test_get_and_contains() {
    let dag = TableDag::build(vec![table("users", &[])]).unwrap();
    assert!(dag.contains("users"));
    assert!(!dag.contains("posts"));
    assert_eq!(dag.get("users").unwrap().name, "users");
    assert!(!dag.is_empty());
}
