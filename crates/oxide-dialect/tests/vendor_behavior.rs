//! Integration tests for vendor-specific metadata behavior.
//!
//! Each test scripts the catalog answers of one vendor and checks how the
//! orchestrator adapts: H2 mode detection, capability probes, catalogs,
//! session settings and partial indices.

mod common;

use common::*;
use oxide_dialect::model::{CacheLifetime, IsolationLevel, SessionSettings, TableRef};
use oxide_dialect::schema::{ColumnSchema, IndexSchema, SqlType, TableSchema};
use oxide_dialect::types::ReferenceOption;
use oxide_dialect::{DatabaseDialectMetadata, DialectName, H2Mode, MetadataError};

const H2_MODE: &str = "INFORMATION_SCHEMA.SETTINGS";
const SQLITE_LIMIT_PROBE: &str = "sqlite_compileoption_used";

async fn connect(conn: &mut MockConnection) -> DatabaseDialectMetadata {
    DatabaseDialectMetadata::connect(conn, CacheLifetime::Connection)
        .await
        .expect("connect")
}

// =============================================================================
// H2 compatibility modes
// =============================================================================

#[tokio::test]
async fn h2_mode_is_detected_on_connect() {
    let mut conn = MockConnection::new(DialectName::H2(H2Mode::Regular));
    conn.respond(H2_MODE, names("SETTING_VALUE", &["Oracle"]));
    let metadata = connect(&mut conn).await;

    assert_eq!(metadata.dialect(), DialectName::H2(H2Mode::Oracle));
    assert!(!metadata.vendor().types.supports_restrict);
    assert_eq!(
        metadata.vendor().types.effective_reference_option(Some(ReferenceOption::Restrict)),
        ReferenceOption::NoAction
    );
    assert_eq!(conn.count(H2_MODE), 1);
}

#[tokio::test]
async fn h2_mode_probe_rejection_means_regular() {
    let mut conn = MockConnection::new(DialectName::H2(H2Mode::Regular));
    conn.reject(H2_MODE);
    let metadata = connect(&mut conn).await;
    assert_eq!(metadata.dialect(), DialectName::H2(H2Mode::Regular));
}

#[tokio::test]
async fn h2_mysql_mode_folds_to_lower_case() {
    let mut conn = MockConnection::new(DialectName::H2(H2Mode::Regular));
    conn.respond(H2_MODE, names("SETTING_VALUE", &["MySQL"]));
    let metadata = connect(&mut conn).await;

    assert_eq!(metadata.dialect(), DialectName::H2(H2Mode::MySql));
    assert_eq!(metadata.identifiers().stored_name("Users"), "users");
    assert_eq!(
        metadata.vendor().types.default_reference_option,
        ReferenceOption::Restrict
    );
}

#[tokio::test]
async fn non_h2_vendors_skip_the_mode_probe() {
    let mut conn = MockConnection::new(DialectName::PostgreSql);
    let metadata = connect(&mut conn).await;
    assert_eq!(metadata.dialect(), DialectName::PostgreSql);
    assert!(conn.queries.is_empty());
}

// =============================================================================
// Capability probes
// =============================================================================

#[tokio::test]
async fn sqlite_limit_probe_rejection_answers_false_once() {
    let mut conn = MockConnection::new(DialectName::Sqlite);
    conn.reject(SQLITE_LIMIT_PROBE);
    let mut metadata = connect(&mut conn).await;

    assert!(!metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());
    assert!(!metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());
    assert_eq!(conn.count(SQLITE_LIMIT_PROBE), 1);

    // The probe outcome is a property of the build, not of the schema.
    metadata.reset_schema_caches();
    assert!(!metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());
    assert_eq!(conn.count(SQLITE_LIMIT_PROBE), 1);
}

#[tokio::test]
async fn sqlite_limit_probe_reads_compile_option() {
    let mut conn = MockConnection::new(DialectName::Sqlite);
    conn.respond(SQLITE_LIMIT_PROBE, vec![row(&[("LIMIT_ENABLED", int(1))])]);
    let mut metadata = connect(&mut conn).await;
    assert!(metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());
}

#[tokio::test]
async fn sqlite_limit_probe_keeps_connection_errors() {
    let mut conn = MockConnection::new(DialectName::Sqlite);
    conn.fail(SQLITE_LIMIT_PROBE);
    let mut metadata = connect(&mut conn).await;

    let err = metadata
        .supports_limit_with_update_or_delete(&mut conn)
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::Connection(_)));
}

#[tokio::test]
async fn fixed_capabilities_need_no_query() {
    let mut conn = MockConnection::new(DialectName::MySql);
    let mut metadata = connect(&mut conn).await;
    assert!(metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());

    let mut conn = MockConnection::new(DialectName::PostgreSql);
    let mut metadata = connect(&mut conn).await;
    assert!(!metadata.supports_limit_with_update_or_delete(&mut conn).await.unwrap());
    assert!(conn.queries.is_empty());
}

// =============================================================================
// Catalogs and schemas
// =============================================================================

#[tokio::test]
async fn oracle_has_no_catalogs() {
    let mut conn = MockConnection::new(DialectName::Oracle);
    let metadata = connect(&mut conn).await;

    assert!(metadata.catalogs(&mut conn).await.unwrap().is_empty());
    assert!(conn.queries.is_empty());
}

#[tokio::test]
async fn mysql_catalog_change_keeps_qualified_lookups() {
    let mut conn = MockConnection::new(DialectName::MySql);
    conn.respond("SELECT DATABASE() AS CURRENT_NAME", names("CURRENT_NAME", &["shop"]))
        .respond("TABLE_SCHEMA = 'inventory'", names("TABLE_NAME", &["items"]))
        .respond("TABLE_SCHEMA = 'shop'", names("TABLE_NAME", &["orders"]));
    let mut metadata = connect(&mut conn).await;

    let items = TableRef::qualified("inventory", "items");
    assert!(metadata.table_exists(&mut conn, &items).await.unwrap());
    assert!(metadata.table_exists(&mut conn, &TableRef::new("orders")).await.unwrap());

    let settings = SessionSettings {
        catalog: Some("warehouse".to_string()),
        ..SessionSettings::default()
    };
    metadata.apply_session_settings(&mut conn, &settings).await.unwrap();
    assert!(conn.executed.iter().any(|sql| sql == "USE warehouse"));

    conn.respond("SELECT DATABASE() AS CURRENT_NAME", names("CURRENT_NAME", &["warehouse"]));
    assert!(metadata.table_exists(&mut conn, &items).await.unwrap());
    assert_eq!(conn.count("TABLE_SCHEMA = 'inventory'"), 1);

    // Unqualified names now resolve against the new catalog.
    assert!(!metadata.table_exists(&mut conn, &TableRef::new("orders")).await.unwrap());
    assert_eq!(conn.count("SELECT DATABASE() AS CURRENT_NAME"), 2);
}

#[tokio::test]
async fn session_settings_render_per_vendor() {
    let mut conn = MockConnection::new(DialectName::PostgreSql);
    let mut metadata = connect(&mut conn).await;

    let settings = SessionSettings {
        schema: Some("reporting".to_string()),
        isolation: Some(IsolationLevel::Serializable),
        read_only: true,
        ..SessionSettings::default()
    };
    metadata.apply_session_settings(&mut conn, &settings).await.unwrap();
    assert_eq!(conn.executed.len(), 3);
    assert!(conn.executed[0].contains("reporting"));
    assert!(conn.executed[1].contains("SERIALIZABLE"));
}

#[tokio::test]
async fn sqlite_rejects_schema_switch() {
    let mut conn = MockConnection::new(DialectName::Sqlite);
    let mut metadata = connect(&mut conn).await;

    let settings = SessionSettings {
        schema: Some("archive".to_string()),
        ..SessionSettings::default()
    };
    let err = metadata
        .apply_session_settings(&mut conn, &settings)
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::UnsupportedFeature { .. }));
    assert!(err.is_unsupported_feature());
    assert!(conn.executed.is_empty());
}

// =============================================================================
// Indices and sequences
// =============================================================================

fn accounts() -> TableSchema {
    TableSchema::new("accounts")
        .column(ColumnSchema::new("id", SqlType::BigInt).primary_key())
        .column(ColumnSchema::new("email", SqlType::Varchar(255)).not_null())
        .column(ColumnSchema::new("deleted_at", SqlType::Timestamp))
        .index(
            IndexSchema::new("ux_accounts_email_live", vec!["email".into()])
                .unique()
                .condition("deleted_at IS NULL"),
        )
}

#[tokio::test]
async fn postgres_partial_unique_index() {
    let mut conn = MockConnection::new(DialectName::PostgreSql);
    conn.respond("current_schema()", names("CURRENT_NAME", &["public"]))
        .respond(
            "AS PK_NAME",
            vec![primary_key_row("accounts", "id", 1, "accounts_pkey")],
        )
        .respond(
            "AS INDEX_NAME",
            vec![
                index_row("accounts", "accounts_pkey", "id", true, None, true, 1),
                index_row(
                    "accounts",
                    "ux_accounts_email_live",
                    "email",
                    true,
                    Some("(deleted_at IS NULL)"),
                    false,
                    1,
                ),
            ],
        );
    let mut metadata = connect(&mut conn).await;

    let accounts = accounts();
    let indices = metadata.existing_indices(&mut conn, &[&accounts]).await.unwrap();
    let found = &indices[&TableRef::new("accounts")];
    assert_eq!(found.len(), 1);
    let index = &found[0];
    assert_eq!(index.name, "ux_accounts_email_live");
    assert!(index.unique);
    assert!(index.is_partial());
    assert_eq!(index.filter_condition.as_deref(), Some("(deleted_at IS NULL)"));
    assert_eq!(index.columns, vec!["email"]);

    metadata.existing_indices(&mut conn, &[&accounts]).await.unwrap();
    assert_eq!(conn.count("AS INDEX_NAME"), 1);
    assert_eq!(conn.count("AS PK_NAME"), 1);
}

#[tokio::test]
async fn sequences_are_never_cached() {
    let mut conn = MockConnection::new(DialectName::H2(H2Mode::Regular));
    conn.respond("AS CURRENT_NAME", names("CURRENT_NAME", &["PUBLIC"]))
        .respond(
            "FROM INFORMATION_SCHEMA.SEQUENCES",
            vec![row(&[
                ("SEQUENCE_NAME", text("TICKET_SEQ")),
                ("START_VALUE", int(1)),
                ("INCREMENT", int(5)),
                ("CYCLE", int(0)),
            ])],
        );
    let mut metadata = connect(&mut conn).await;

    assert!(metadata.sequence_exists(&mut conn, "ticket_seq").await.unwrap());
    let details = metadata.sequence_details(&mut conn).await.unwrap();
    assert_eq!(details[0].increment_by, Some(5));
    assert_eq!(details[0].cycle, Some(false));
    assert_eq!(conn.count("FROM INFORMATION_SCHEMA.SEQUENCES"), 2);
}

#[tokio::test]
async fn vendors_without_sequences_report_none() {
    let mut conn = MockConnection::new(DialectName::MySql);
    conn.respond("SELECT DATABASE() AS CURRENT_NAME", names("CURRENT_NAME", &["shop"]));
    let mut metadata = connect(&mut conn).await;
    assert!(metadata.sequences(&mut conn).await.unwrap().is_empty());
    assert_eq!(conn.queries.len(), 1);
}
