//! Integration tests for schema reconciliation.
//!
//! These tests plan a declared schema against scripted catalogs:
//! - an empty database gets every table, foreign key and index created
//! - a catalog that already matches the declaration yields an empty plan
//! - drifted columns, rules and indices yield targeted statements
//! - vendors that cannot alter tables report warnings instead

mod common;

use common::*;
use oxide_dialect::prelude::*;

const CURRENT: &str = "AS CURRENT_NAME";
const TABLES: &str = "FROM INFORMATION_SCHEMA.TABLES";
const COLUMNS: &str = "FROM INFORMATION_SCHEMA.COLUMNS";
const PRIMARY_KEYS: &str = "CONSTRAINT_TYPE = 'PRIMARY KEY'";
const INDICES: &str = "FROM INFORMATION_SCHEMA.INDEXES";
const IMPORTED_KEYS: &str = "REFERENTIAL_CONSTRAINTS";

fn shop() -> DatabaseSchema {
    DatabaseSchema::new()
        .table(
            TableSchema::new("orders")
                .column(
                    ColumnSchema::new("id", SqlType::BigInt)
                        .primary_key()
                        .auto_increment(),
                )
                .column(ColumnSchema::new("user_id", SqlType::Integer).not_null())
                .foreign_key(
                    ForeignKeySchema::new(
                        "fk_orders_user",
                        vec!["user_id".into()],
                        "users",
                        vec!["id".into()],
                    )
                    .on_delete(ReferenceOption::Cascade),
                ),
        )
        .table(
            TableSchema::new("users")
                .column(
                    ColumnSchema::new("id", SqlType::Integer)
                        .primary_key()
                        .auto_increment(),
                )
                .column(ColumnSchema::new("email", SqlType::Varchar(120)).not_null())
                .column(
                    ColumnSchema::new("active", SqlType::Boolean)
                        .not_null()
                        .default(DefaultValue::Bool(true)),
                )
                .index(IndexSchema::new("idx_users_email", vec!["email".into()]).unique()),
        )
}

fn empty_h2() -> MockConnection {
    let mut conn = MockConnection::new(DialectName::H2(H2Mode::Regular));
    conn.respond(CURRENT, names("CURRENT_NAME", &["PUBLIC"]));
    conn
}

/// Scripts the catalog as it looks after `shop()` was created on H2.
fn live_shop(conn: &mut MockConnection) {
    conn.respond(TABLES, names("TABLE_NAME", &["ORDERS", "USERS"]))
        .respond(
            COLUMNS,
            vec![
                column_row("ORDERS", "ID", -5, "BIGINT", false, None, true, Some(64), 1),
                column_row("ORDERS", "USER_ID", 4, "INTEGER", false, None, false, Some(32), 2),
                column_row("USERS", "ID", 4, "INTEGER", false, None, true, Some(32), 1),
                column_row("USERS", "EMAIL", 12, "CHARACTER VARYING", false, None, false, Some(120), 2),
                column_row("USERS", "ACTIVE", 16, "BOOLEAN", false, Some("TRUE"), false, None, 3),
            ],
        )
        .respond(
            PRIMARY_KEYS,
            vec![
                primary_key_row("ORDERS", "ID", 1, "PK_ORDERS"),
                primary_key_row("USERS", "ID", 1, "PK_USERS"),
            ],
        )
        .respond(
            INDICES,
            vec![
                index_row("USERS", "PK_USERS", "ID", true, None, true, 1),
                index_row("USERS", "IDX_USERS_EMAIL", "EMAIL", true, None, false, 1),
                index_row("ORDERS", "PK_ORDERS", "ID", true, None, true, 1),
            ],
        )
        .respond(
            IMPORTED_KEYS,
            vec![foreign_key_row("ORDERS", "USER_ID", "USERS", "ID", "FK_ORDERS_USER", 1, 3, 0)],
        );
}

async fn plan(conn: &mut MockConnection, schema: &DatabaseSchema) -> ReconciliationPlan {
    let mut metadata = DatabaseDialectMetadata::connect(conn, CacheLifetime::Pass)
        .await
        .expect("connect");
    SchemaReconciler::new(&mut metadata)
        .plan(conn, schema)
        .await
        .expect("plan")
}

// =============================================================================
// Creating from scratch
// =============================================================================

#[tokio::test]
async fn empty_database_gets_everything_in_dependency_order() {
    let mut conn = empty_h2();
    let plan = plan(&mut conn, &shop()).await;

    assert!(plan.warnings.is_empty(), "{:?}", plan.warnings);
    assert_eq!(
        plan.statements,
        vec![
            "CREATE TABLE USERS (ID INTEGER GENERATED BY DEFAULT AS IDENTITY NOT NULL, \
             EMAIL VARCHAR(120) NOT NULL, ACTIVE BOOLEAN DEFAULT TRUE NOT NULL, \
             CONSTRAINT PK_USERS PRIMARY KEY (ID))",
            "CREATE TABLE ORDERS (ID BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL, \
             USER_ID INTEGER NOT NULL, CONSTRAINT PK_ORDERS PRIMARY KEY (ID), \
             CONSTRAINT FK_ORDERS_USER FOREIGN KEY (USER_ID) REFERENCES USERS(ID) \
             ON DELETE CASCADE)",
            "CREATE UNIQUE INDEX IDX_USERS_EMAIL ON USERS (EMAIL)",
        ]
    );
    assert!(conn.executed.is_empty(), "planning never executes");
}

#[tokio::test]
async fn matching_catalog_yields_empty_plan() {
    let mut conn = empty_h2();
    live_shop(&mut conn);
    let plan = plan(&mut conn, &shop()).await;

    assert!(plan.is_empty(), "{:?}", plan);
}

#[tokio::test]
async fn cyclic_foreign_keys_are_deferred() {
    let schema = DatabaseSchema::new()
        .table(
            TableSchema::new("authors")
                .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
                .column(ColumnSchema::new("featured_book_id", SqlType::Integer))
                .foreign_key(ForeignKeySchema::new(
                    "fk_author_book",
                    vec!["featured_book_id".into()],
                    "books",
                    vec!["id".into()],
                )),
        )
        .table(
            TableSchema::new("books")
                .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
                .column(ColumnSchema::new("author_id", SqlType::Integer).not_null())
                .foreign_key(ForeignKeySchema::new(
                    "fk_book_author",
                    vec!["author_id".into()],
                    "authors",
                    vec!["id".into()],
                )),
        );

    let mut conn = empty_h2();
    let plan = plan(&mut conn, &schema).await;

    assert_eq!(
        plan.warnings,
        vec![SchemaWarning::ForeignKeyCycle {
            tables: vec!["authors".into(), "books".into()],
        }]
    );
    assert_eq!(plan.statements.len(), 3);
    assert!(plan.statements[0].starts_with("CREATE TABLE BOOKS"));
    assert!(!plan.statements[0].contains("FOREIGN KEY"));
    assert!(plan.statements[1].starts_with("CREATE TABLE AUTHORS"));
    assert!(plan.statements[1].contains("CONSTRAINT FK_AUTHOR_BOOK FOREIGN KEY"));
    assert_eq!(
        plan.statements[2],
        "ALTER TABLE BOOKS ADD CONSTRAINT FK_BOOK_AUTHOR FOREIGN KEY (AUTHOR_ID) \
         REFERENCES AUTHORS(ID)"
    );
}

// =============================================================================
// Drift on existing tables
// =============================================================================

#[tokio::test]
async fn drifted_columns_are_added_and_altered() {
    let schema = {
        let mut schema = shop();
        let users = schema.tables.iter_mut().find(|t| t.name == "users").unwrap();
        users.columns.push(ColumnSchema::new("nickname", SqlType::Varchar(40)));
        users.columns[1].sql_type = SqlType::Varchar(200);
        schema
    };

    let mut conn = empty_h2();
    live_shop(&mut conn);
    let plan = plan(&mut conn, &schema).await;

    assert!(plan.warnings.is_empty(), "{:?}", plan.warnings);
    assert_eq!(
        plan.statements,
        vec![
            "ALTER TABLE USERS ADD COLUMN NICKNAME VARCHAR(40)",
            "ALTER TABLE USERS ALTER COLUMN EMAIL SET DATA TYPE VARCHAR(200)",
        ]
    );
}

#[tokio::test]
async fn changed_rules_replace_the_foreign_key() {
    let mut conn = empty_h2();
    live_shop(&mut conn);
    conn.respond(
        IMPORTED_KEYS,
        vec![foreign_key_row("ORDERS", "USER_ID", "USERS", "ID", "FK_ORDERS_USER", 1, 3, 3)],
    );
    let plan = plan(&mut conn, &shop()).await;

    assert_eq!(
        plan.statements,
        vec![
            "ALTER TABLE ORDERS DROP CONSTRAINT FK_ORDERS_USER",
            "ALTER TABLE ORDERS ADD CONSTRAINT FK_ORDERS_USER FOREIGN KEY (USER_ID) \
             REFERENCES USERS(ID) ON DELETE CASCADE",
        ]
    );
}

#[tokio::test]
async fn redundant_indices_are_reported() {
    let mut conn = empty_h2();
    live_shop(&mut conn);
    conn.respond(
        INDICES,
        vec![
            index_row("USERS", "IDX_USERS_EMAIL", "EMAIL", true, None, false, 1),
            index_row("USERS", "UQ_EMAIL_COPY", "EMAIL", true, None, false, 1),
        ],
    );
    let plan = plan(&mut conn, &shop()).await;

    assert!(plan.statements.is_empty(), "{:?}", plan.statements);
    assert_eq!(
        plan.warnings,
        vec![SchemaWarning::ExcessiveIndices {
            table: "users".into(),
            indices: vec!["IDX_USERS_EMAIL".into(), "UQ_EMAIL_COPY".into()],
        }]
    );
}

#[tokio::test]
async fn missing_index_is_created() {
    let mut conn = empty_h2();
    live_shop(&mut conn);
    conn.respond(INDICES, Vec::new());
    let plan = plan(&mut conn, &shop()).await;

    assert_eq!(
        plan.statements,
        vec!["CREATE UNIQUE INDEX IDX_USERS_EMAIL ON USERS (EMAIL)"]
    );
}

#[tokio::test]
async fn pass_lifetime_refetches_on_every_plan() {
    let mut conn = empty_h2();
    live_shop(&mut conn);
    let mut metadata = DatabaseDialectMetadata::connect(&mut conn, CacheLifetime::Pass)
        .await
        .unwrap();
    let schema = shop();

    for _ in 0..2 {
        let plan = SchemaReconciler::new(&mut metadata)
            .plan(&mut conn, &schema)
            .await
            .unwrap();
        assert!(plan.is_empty());
    }
    assert_eq!(conn.count(COLUMNS), 2);
    assert_eq!(conn.count(TABLES), 2);
}

#[tokio::test]
async fn partial_index_with_another_predicate_is_created() {
    let schema = {
        let mut schema = shop();
        let users = schema.tables.iter_mut().find(|t| t.name == "users").unwrap();
        users.indexes.push(
            IndexSchema::new("idx_active_users", vec!["email".into()]).condition("active = TRUE"),
        );
        schema
    };

    let mut conn = empty_h2();
    live_shop(&mut conn);
    conn.respond(
        INDICES,
        vec![
            index_row("USERS", "IDX_USERS_EMAIL", "EMAIL", true, None, false, 1),
            index_row("USERS", "IDX_INACTIVE_USERS", "EMAIL", false, Some("ACTIVE = FALSE"), false, 1),
        ],
    );
    let plan = plan(&mut conn, &schema).await;

    assert!(plan.warnings.is_empty(), "{:?}", plan.warnings);
    assert_eq!(plan.statements.len(), 1, "{:?}", plan.statements);
    assert!(plan.statements[0].starts_with("CREATE INDEX IDX_ACTIVE_USERS ON USERS (EMAIL) WHERE"));
}

#[tokio::test]
async fn renamed_partial_index_with_same_predicate_is_kept() {
    let schema = {
        let mut schema = shop();
        let users = schema.tables.iter_mut().find(|t| t.name == "users").unwrap();
        users.indexes.push(
            IndexSchema::new("idx_active_users", vec!["email".into()]).condition("active = TRUE"),
        );
        schema
    };

    let mut conn = empty_h2();
    live_shop(&mut conn);
    conn.respond(
        INDICES,
        vec![
            index_row("USERS", "IDX_USERS_EMAIL", "EMAIL", true, None, false, 1),
            index_row("USERS", "IDX_LEGACY_ACTIVE", "EMAIL", false, Some("(ACTIVE  = TRUE)"), false, 1),
        ],
    );
    let plan = plan(&mut conn, &schema).await;

    assert!(plan.is_empty(), "{:?}", plan);
}

#[tokio::test]
async fn foreign_key_on_other_columns_is_not_added_twice() {
    let schema = DatabaseSchema::new()
        .table(
            TableSchema::new("regions")
                .column(ColumnSchema::new("id", SqlType::Integer).not_null())
                .column(ColumnSchema::new("code", SqlType::Integer).not_null())
                .primary_key(vec!["id".into(), "code".into()]),
        )
        .table(
            TableSchema::new("lines")
                .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
                .column(ColumnSchema::new("region_id", SqlType::Integer).not_null())
                .column(ColumnSchema::new("region_code", SqlType::Integer).not_null())
                .foreign_key(ForeignKeySchema::new(
                    "fk_line_region",
                    vec!["region_id".into(), "region_code".into()],
                    "regions",
                    vec!["id".into(), "code".into()],
                )),
        );

    let mut conn = empty_h2();
    conn.respond(TABLES, names("TABLE_NAME", &["LINES", "REGIONS"]))
        .respond(
            COLUMNS,
            vec![
                column_row("REGIONS", "ID", 4, "INTEGER", false, None, false, Some(32), 1),
                column_row("REGIONS", "CODE", 4, "INTEGER", false, None, false, Some(32), 2),
                column_row("LINES", "ID", 4, "INTEGER", false, None, false, Some(32), 1),
                column_row("LINES", "REGION_ID", 4, "INTEGER", false, None, false, Some(32), 2),
                column_row("LINES", "REGION_CODE", 4, "INTEGER", false, None, false, Some(32), 3),
                column_row("LINES", "LEGACY_CODE", 4, "INTEGER", true, None, false, Some(32), 4),
            ],
        )
        .respond(
            PRIMARY_KEYS,
            vec![
                primary_key_row("REGIONS", "ID", 1, "PK_REGIONS"),
                primary_key_row("REGIONS", "CODE", 2, "PK_REGIONS"),
                primary_key_row("LINES", "ID", 1, "PK_LINES"),
            ],
        )
        .respond(
            IMPORTED_KEYS,
            vec![
                foreign_key_row("LINES", "REGION_ID", "REGIONS", "ID", "FK_LINE_REGION", 1, 3, 3),
                foreign_key_row("LINES", "LEGACY_CODE", "REGIONS", "CODE", "FK_LINE_REGION", 2, 3, 3),
            ],
        );
    let plan = plan(&mut conn, &schema).await;

    assert!(plan.statements.is_empty(), "{:?}", plan.statements);
    assert_eq!(
        plan.warnings,
        vec![SchemaWarning::UnsupportedConstraintChange {
            table: "lines".into(),
            constraint: "FK_LINE_REGION".into(),
            detail: "foreign key columns differ".into(),
        }]
    );
}

// =============================================================================
// Vendors without ALTER support
// =============================================================================

#[tokio::test]
async fn sqlite_reports_changes_it_cannot_make() {
    let schema = DatabaseSchema::new()
        .table(
            TableSchema::new("users")
                .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
                .column(ColumnSchema::new("team_id", SqlType::Integer))
                .column(ColumnSchema::new("email", SqlType::Text).not_null())
                .foreign_key(ForeignKeySchema::new(
                    "fk_users_team",
                    vec!["team_id".into()],
                    "teams",
                    vec!["id".into()],
                )),
        )
        .table(TableSchema::new("teams").column(ColumnSchema::new("id", SqlType::Integer).primary_key()));

    let mut conn = MockConnection::new(DialectName::Sqlite);
    conn.respond("SELECT 'main' AS CURRENT_NAME", names("CURRENT_NAME", &["main"]))
        .respond("name AS TABLE_NAME FROM", names("TABLE_NAME", &["teams", "users"]))
        .respond(
            "AS COLUMN_DEF",
            vec![
                column_row("teams", "id", 4, "INTEGER", false, None, false, None, 1),
                column_row("users", "id", 4, "INTEGER", false, None, false, None, 1),
                column_row("users", "team_id", 4, "INTEGER", true, None, false, None, 2),
                column_row("users", "email", 12, "TEXT", true, None, false, None, 3),
            ],
        );
    let plan = plan(&mut conn, &schema).await;

    assert!(plan.statements.is_empty(), "{:?}", plan.statements);
    assert_eq!(
        plan.warnings,
        vec![
            SchemaWarning::UnsupportedColumnChange {
                table: "users".into(),
                column: "email".into(),
                detail: "nullability differs".into(),
            },
            SchemaWarning::UnsupportedConstraintChange {
                table: "users".into(),
                constraint: "fk_users_team".into(),
                detail: "foreign key is missing".into(),
            },
        ]
    );
}

#[tokio::test]
async fn sqlite_creates_tables_with_inline_keys() {
    let schema = DatabaseSchema::new().table(
        TableSchema::new("tickets")
            .column(
                ColumnSchema::new("id", SqlType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnSchema::new("title", SqlType::Text).not_null()),
    );

    let mut conn = MockConnection::new(DialectName::Sqlite);
    let plan = plan(&mut conn, &schema).await;
    assert_eq!(
        plan.statements,
        vec!["CREATE TABLE tickets (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL)"]
    );
}
