//! Schema documents.
//!
//! A schema document is the JSON form of [`DatabaseSchema`]:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "users",
//!       "columns": [
//!         { "name": "id", "sql_type": "BigInt", "primary_key": true, "nullable": false },
//!         { "name": "email", "sql_type": { "Varchar": 255 }, "nullable": false }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use oxide_dialect::schema::{DatabaseSchema, TableSchema};
use tracing::debug;

use crate::error::{Result, SyncError};

/// Reads and validates the schema document at `path`.
pub fn load_schema(path: &Path) -> Result<DatabaseSchema> {
    let text = std::fs::read_to_string(path)?;
    let schema = parse(path, &text)?;
    debug!(path = %path.display(), tables = schema.tables.len(), "Loaded schema document");
    Ok(schema)
}

/// Parses and validates a schema document held in memory.
pub fn parse_schema(text: &str) -> Result<DatabaseSchema> {
    parse(Path::new("<memory>"), text)
}

fn parse(path: &Path, text: &str) -> Result<DatabaseSchema> {
    let schema: DatabaseSchema = serde_json::from_str(text)?;
    validate(&schema).map_err(|message| SyncError::InvalidSchemaDocument {
        path: PathBuf::from(path),
        message,
    })?;
    Ok(schema)
}

fn validate(schema: &DatabaseSchema) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    for table in &schema.tables {
        let key = (
            table.schema.as_deref().map(str::to_lowercase),
            table.name.to_lowercase(),
        );
        if !seen.insert(key) {
            return Err(format!("table '{}' is declared twice", table.name));
        }
        validate_table(table)?;
    }
    Ok(())
}

fn validate_table(table: &TableSchema) -> std::result::Result<(), String> {
    let name = &table.name;
    if table.columns.is_empty() {
        return Err(format!("table '{name}' has no columns"));
    }

    let mut columns = HashSet::new();
    for column in &table.columns {
        if !columns.insert(column.name.to_lowercase()) {
            return Err(format!("table '{name}' declares column '{}' twice", column.name));
        }
    }
    let unknown = |column: &String| !columns.contains(&column.to_lowercase());

    if let Some(column) = table.primary_key.iter().find(|c| unknown(c)) {
        return Err(format!("primary key of '{name}' names unknown column '{column}'"));
    }
    for fk in &table.foreign_keys {
        if fk.columns.is_empty() || fk.columns.len() != fk.references_columns.len() {
            return Err(format!(
                "foreign key '{}' on '{name}' maps {} column(s) onto {}",
                fk.name,
                fk.columns.len(),
                fk.references_columns.len()
            ));
        }
        if let Some(column) = fk.columns.iter().find(|c| unknown(c)) {
            return Err(format!(
                "foreign key '{}' on '{name}' names unknown column '{column}'",
                fk.name
            ));
        }
    }
    for index in &table.indexes {
        if index.columns.is_empty() && index.functions.is_empty() {
            return Err(format!("index '{}' on '{name}' has no keys", index.name));
        }
        if let Some(column) = index.columns.iter().find(|c| unknown(c)) {
            return Err(format!(
                "index '{}' on '{name}' names unknown column '{column}'",
                index.name
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let schema = parse_schema(
            r#"{"tables":[{"name":"users","columns":[{"name":"id","sql_type":"BigInt","primary_key":true}]}]}"#,
        )
        .unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert!(schema.tables[0].columns[0].primary_key);
    }

    #[test]
    fn rejects_duplicate_tables() {
        let err = parse_schema(
            r#"{"tables":[
                {"name":"users","columns":[{"name":"id","sql_type":"Integer"}]},
                {"name":"USERS","columns":[{"name":"id","sql_type":"Integer"}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn rejects_unknown_primary_key_column() {
        let err = parse_schema(
            r#"{"tables":[{"name":"users","columns":[{"name":"id","sql_type":"Integer"}],"primary_key":["uid"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::InvalidSchemaDocument { .. }));
    }
}
