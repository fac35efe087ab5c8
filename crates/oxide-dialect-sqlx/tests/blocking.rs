//! The blocking facade, driven from plain (non-async) tests.

mod common;

use common::{shop, MEMORY_URL};
use oxide_dialect::prelude::*;
use oxide_dialect_sqlx::BlockingMetadata;

#[test]
fn blocking_sync_round_trip() {
    let mut db = BlockingMetadata::connect(MEMORY_URL, CacheLifetime::Connection).unwrap();
    assert_eq!(db.dialect(), DialectName::Sqlite);
    assert_eq!(db.current_schema().unwrap(), "main");

    let schema = shop();
    let report = db.sync(&schema).unwrap();
    assert_eq!(report.executed, 3);
    assert!(db.plan(&schema).unwrap().is_empty());
    assert!(db.table_exists(&TableRef::new("orders")).unwrap());
}

#[test]
fn execute_invalidates_cached_tables() {
    let mut db = BlockingMetadata::connect(MEMORY_URL, CacheLifetime::Connection).unwrap();
    let audit = TableRef::new("audit");
    assert!(!db.table_exists(&audit).unwrap());

    db.execute("CREATE TABLE audit (id INTEGER PRIMARY KEY, entry TEXT)")
        .unwrap();
    assert!(db.table_exists(&audit).unwrap());

    let columns = db.table_columns(&[audit.clone()]).unwrap();
    assert_eq!(columns[&audit].len(), 2);
    assert!(db.sequences().unwrap().is_empty());
}

#[test]
fn schema_switch_is_unsupported_on_sqlite() {
    let mut db = BlockingMetadata::connect(MEMORY_URL, CacheLifetime::Connection).unwrap();
    let settings = SessionSettings {
        schema: Some("archive".to_string()),
        ..SessionSettings::default()
    };
    let err = db.apply_session_settings(&settings).unwrap_err();
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn catalog_reads_through_the_facade() {
    let mut db = BlockingMetadata::connect(MEMORY_URL, CacheLifetime::Connection).unwrap();
    assert_eq!(db.all_schema_names().unwrap(), vec!["main"]);
    assert!(db.all_tables_names().unwrap().is_empty());
    assert!(!db.supports_limit_with_update_or_delete().unwrap());

    db.sync(&shop()).unwrap();
    db.reset_caches();
    let mut tables = db.all_tables_names().unwrap();
    tables.sort();
    assert_eq!(tables, vec!["orders", "users"]);
}
