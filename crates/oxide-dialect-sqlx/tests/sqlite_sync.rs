//! End-to-end synchronization against an in-memory SQLite database.

mod common;

use common::{connect, shop};
use oxide_dialect::prelude::*;
use oxide_dialect_sqlx::SchemaSynchronizer;

#[tokio::test]
async fn sync_creates_tables_in_dependency_order() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;

    let report = SchemaSynchronizer::new(&mut metadata)
        .sync(&mut conn, &shop())
        .await
        .unwrap();
    assert_eq!(report.executed, report.plan.statements.len());
    assert!(report.plan.warnings.is_empty());
    assert!(report.plan.statements[0].starts_with("CREATE TABLE users"));
    assert!(report.plan.statements[1].starts_with("CREATE TABLE orders"));

    let mut tables = metadata.all_tables_names(&mut conn).await.unwrap();
    tables.sort();
    assert_eq!(tables, vec!["orders", "users"]);
}

#[tokio::test]
async fn second_plan_after_sync_is_empty() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    let schema = shop();

    SchemaSynchronizer::new(&mut metadata)
        .sync(&mut conn, &schema)
        .await
        .unwrap();
    let plan = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert!(plan.is_empty(), "unexpected plan: {plan:?}");
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;

    let report = SchemaSynchronizer::new(&mut metadata)
        .dry_run(true)
        .sync(&mut conn, &shop())
        .await
        .unwrap();
    assert_eq!(report.executed, 0);
    assert_eq!(report.plan.statements.len(), 3);

    let users = TableRef::new("users");
    assert!(!metadata.table_exists(&mut conn, &users).await.unwrap());
}

#[tokio::test]
async fn drifted_table_gets_missing_column() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT NOT NULL)")
        .await
        .unwrap();

    let schema = DatabaseSchema::new().table(
        TableSchema::new("users")
            .column(
                ColumnSchema::new("id", SqlType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnSchema::new("email", SqlType::Varchar(120)).not_null())
            .column(ColumnSchema::new("nickname", SqlType::Varchar(40))),
    );

    let report = SchemaSynchronizer::new(&mut metadata)
        .sync(&mut conn, &schema)
        .await
        .unwrap();
    assert_eq!(
        report.plan.statements,
        vec!["ALTER TABLE users ADD COLUMN nickname TEXT"]
    );

    let plan = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert!(plan.is_empty(), "unexpected plan: {plan:?}");
}

#[tokio::test]
async fn nullability_drift_is_reported_not_altered() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT)")
        .await
        .unwrap();

    let schema = DatabaseSchema::new().table(
        TableSchema::new("users")
            .column(
                ColumnSchema::new("id", SqlType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnSchema::new("email", SqlType::Varchar(120)).not_null()),
    );

    let plan = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert!(plan.statements.is_empty());
    assert_eq!(
        plan.warnings,
        vec![SchemaWarning::UnsupportedColumnChange {
            table: "users".to_string(),
            column: "email".to_string(),
            detail: "nullability differs".to_string(),
        }]
    );
}

#[tokio::test]
async fn live_catalog_reads_back_created_structure() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    let schema = shop();
    SchemaSynchronizer::new(&mut metadata)
        .sync(&mut conn, &schema)
        .await
        .unwrap();

    let users = TableRef::new("users");
    let columns = metadata
        .table_columns(&mut conn, &[users.clone()])
        .await
        .unwrap()
        .remove(&users)
        .unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "active"]);
    assert!(columns[0].auto_increment);
    assert!(!columns[1].nullable);
    assert_eq!(columns[2].default_value.as_deref(), Some("1"));

    let keys = metadata
        .existing_primary_keys(&mut conn, &[users.clone()])
        .await
        .unwrap();
    let pk = keys[&users].as_ref().unwrap();
    assert_eq!(pk.column_names, vec!["id"]);

    let orders = schema.get_table("orders").unwrap();
    let users_schema = schema.get_table("users").unwrap();
    let constraints = metadata
        .column_constraints(&mut conn, &[orders, users_schema])
        .await
        .unwrap();
    let fks: Vec<_> = constraints.values().flatten().collect();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].on_delete, Some(ReferenceOption::Cascade));
    assert_eq!(fks[0].target_table, "users");

    let indices = metadata
        .existing_indices(&mut conn, &[users_schema])
        .await
        .unwrap();
    assert!(indices[&users]
        .iter()
        .any(|i| i.name == "idx_users_email" && i.unique));
}

#[tokio::test]
async fn limit_probe_on_stock_build_is_false() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    assert!(!metadata
        .supports_limit_with_update_or_delete(&mut conn)
        .await
        .unwrap());
}

#[tokio::test]
async fn server_errors_are_rejections() {
    let (mut conn, _metadata) = connect(CacheLifetime::Connection).await;
    let err = conn.query("SELECT * FROM no_such_table").await.unwrap_err();
    match err {
        MetadataError::Rejected { sql, message, .. } => {
            assert_eq!(sql, "SELECT * FROM no_such_table");
            assert!(message.contains("no such table"));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn pass_lifetime_sees_external_changes() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Pass).await;
    let schema = shop();
    let first = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert_eq!(first.statements.len(), 3);

    for sql in &first.statements {
        conn.execute(sql).await.unwrap();
    }
    let second = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert!(second.is_empty(), "unexpected plan: {second:?}");
}

#[tokio::test]
async fn differently_cased_live_table_is_read_back() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    conn.execute("CREATE TABLE Users (id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT NOT NULL)")
        .await
        .unwrap();

    let schema = DatabaseSchema::new().table(
        TableSchema::new("users")
            .column(
                ColumnSchema::new("id", SqlType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnSchema::new("email", SqlType::Varchar(120)).not_null()),
    );

    let users = TableRef::new("users");
    assert!(metadata.table_exists(&mut conn, &users).await.unwrap());
    let columns = metadata
        .table_columns(&mut conn, &[users.clone()])
        .await
        .unwrap()
        .remove(&users)
        .unwrap();
    assert_eq!(columns.len(), 2);
    let keys = metadata
        .existing_primary_keys(&mut conn, &[users.clone()])
        .await
        .unwrap();
    assert_eq!(keys[&users].as_ref().unwrap().column_names, vec!["id"]);

    let plan = SchemaSynchronizer::new(&mut metadata)
        .plan(&mut conn, &schema)
        .await
        .unwrap();
    assert!(plan.is_empty(), "unexpected plan: {plan:?}");
}

#[tokio::test]
async fn partial_index_predicate_on_its_own_line() {
    let (mut conn, mut metadata) = connect(CacheLifetime::Connection).await;
    conn.execute("CREATE TABLE people (id INTEGER PRIMARY KEY, age INTEGER)")
        .await
        .unwrap();
    conn.execute("CREATE UNIQUE INDEX idx_adult ON people (age)\nWHERE age >= 20")
        .await
        .unwrap();
    conn.execute("CREATE INDEX idx_teen ON people (age)\n\tWHERE\tage < 20")
        .await
        .unwrap();

    let people = TableSchema::new("people")
        .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
        .column(ColumnSchema::new("age", SqlType::Integer));
    let indices = metadata
        .existing_indices(&mut conn, &[&people])
        .await
        .unwrap()
        .remove(&TableRef::new("people"))
        .unwrap();

    let adult = indices.iter().find(|i| i.name == "idx_adult").unwrap();
    assert!(adult.unique);
    assert_eq!(adult.filter_condition.as_deref(), Some("age >= 20"));
    let teen = indices.iter().find(|i| i.name == "idx_teen").unwrap();
    assert_eq!(teen.filter_condition.as_deref(), Some("age < 20"));
}

#[tokio::test]
async fn execute_reports_affected_rows() {
    let (mut conn, _metadata) = connect(CacheLifetime::Connection).await;
    conn.execute("CREATE TABLE tags (name TEXT NOT NULL)")
        .await
        .unwrap();
    let inserted = conn
        .execute("INSERT INTO tags (name) VALUES ('a'), ('b'), ('c')")
        .await
        .unwrap();
    assert_eq!(inserted, 3);
    let deleted = conn
        .execute("DELETE FROM tags WHERE name <> 'a'")
        .await
        .unwrap();
    assert_eq!(deleted, 2);
}
