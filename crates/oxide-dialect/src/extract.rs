//! Row mappers: untyped metadata rows to typed records.
//!
//! Extraction happens in two steps. The `*_from_rows` functions turn query
//! output into raw records keyed by the table name as the catalog stores
//! it; those are what the orchestrator caches. [`resolve_foreign_keys`] and
//! [`resolve_indices`] then match raw records against the declared tables,
//! dropping whatever the declared model cannot account for.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::connection::MetadataRow;
use crate::error::Result;
use crate::identifier::IdentifierManager;
use crate::model::{
    ColumnMetadata, ColumnReference, ForeignKeyConstraint, Index, PrimaryKeyMetadata, Sequence,
};
use crate::provider::SqlTypeProvider;
use crate::schema::{ColumnSchema, TableSchema};
use crate::types::code;

/// Reads one text column from every row, skipping NULLs.
#[must_use]
pub fn names_from_rows(rows: &[MetadataRow], column: &str) -> Vec<String> {
    rows.iter().filter_map(|row| row.string(column)).collect()
}

/// Groups column rows by table, in ordinal order.
pub fn columns_from_rows(rows: &[MetadataRow]) -> Result<HashMap<String, Vec<ColumnMetadata>>> {
    let mut by_table: HashMap<String, Vec<(i64, ColumnMetadata)>> = HashMap::new();
    for row in rows {
        let table = row.require_string("columns", "TABLE_NAME")?;
        let column = ColumnMetadata {
            name: row.require_string("columns", "COLUMN_NAME")?,
            sql_type: row
                .int("DATA_TYPE")
                .and_then(|c| i32::try_from(c).ok())
                .unwrap_or(code::OTHER),
            type_name: row.string("TYPE_NAME").unwrap_or_default(),
            nullable: row.bool("NULLABLE").unwrap_or(true),
            default_value: row.string("COLUMN_DEF"),
            auto_increment: row.bool("IS_AUTOINCREMENT").unwrap_or(false),
            size: row.int("COLUMN_SIZE"),
            scale: row.int("DECIMAL_DIGITS"),
        };
        let position = row.int("ORDINAL_POSITION").unwrap_or(i64::MAX);
        by_table.entry(table).or_default().push((position, column));
    }
    Ok(by_table
        .into_iter()
        .map(|(table, mut columns)| {
            columns.sort_by_key(|(position, _)| *position);
            (table, columns.into_iter().map(|(_, c)| c).collect())
        })
        .collect())
}

/// Groups primary-key rows by table, columns in key order.
pub fn primary_keys_from_rows(
    rows: &[MetadataRow],
) -> Result<HashMap<String, PrimaryKeyMetadata>> {
    let mut by_table: HashMap<String, (String, Vec<(i64, String)>)> = HashMap::new();
    for row in rows {
        let table = row.require_string("primary keys", "TABLE_NAME")?;
        let column = row.require_string("primary keys", "COLUMN_NAME")?;
        let entry = by_table
            .entry(table)
            .or_insert_with(|| (row.string("PK_NAME").unwrap_or_default(), Vec::new()));
        let position = row.int("KEY_SEQ").unwrap_or(entry.1.len() as i64 + 1);
        entry.1.push((position, column));
    }
    Ok(by_table
        .into_iter()
        .map(|(table, (name, mut columns))| {
            columns.sort();
            let column_names = columns.into_iter().map(|(_, c)| c).collect();
            (table, PrimaryKeyMetadata { name, column_names })
        })
        .collect())
}

/// Merges imported-key rows into one constraint per name, grouped by the
/// referencing table. Rule codes are decoded with `types`.
pub fn foreign_keys_from_rows(
    rows: &[MetadataRow],
    types: &SqlTypeProvider,
) -> Result<HashMap<String, Vec<ForeignKeyConstraint>>> {
    let mut by_table: HashMap<String, Vec<ForeignKeyConstraint>> = HashMap::new();
    for row in rows {
        let from_table = row.require_string("imported keys", "FKTABLE_NAME")?;
        let from_column = row.require_string("imported keys", "FKCOLUMN_NAME")?;
        let target_table = row.require_string("imported keys", "PKTABLE_NAME")?;
        let Some(target_column) = row.string("PKCOLUMN_NAME") else {
            warn!(table = %from_table, column = %from_column, "Foreign key row without referenced column, skipping");
            continue;
        };
        let name = row
            .string("FK_NAME")
            .unwrap_or_else(|| format!("fk_{from_table}_{target_table}"));

        let constraints = by_table.entry(from_table.clone()).or_default();
        let position = row.int("KEY_SEQ").unwrap_or_else(|| {
            constraints
                .iter()
                .find(|c| c.name == name)
                .map_or(1, |c| c.references.len() as i64 + 1)
        });
        let constraint = ForeignKeyConstraint {
            name,
            from_table,
            target_table,
            references: vec![ColumnReference {
                position,
                from: from_column,
                target: target_column,
            }],
            on_update: Some(types.resolve_reference_option(row.int("UPDATE_RULE"))),
            on_delete: Some(types.resolve_reference_option(row.int("DELETE_RULE"))),
        };

        match constraints.iter().position(|c| c.name == constraint.name) {
            Some(i) => {
                let merged = constraints.remove(i).combine(constraint);
                constraints.insert(i, merged);
            }
            None => constraints.push(constraint),
        }
    }
    Ok(by_table)
}

#[derive(Debug)]
struct IndexParts {
    unique: bool,
    index_type: Option<String>,
    filter_condition: Option<String>,
    primary_key: bool,
    parts: Vec<(i64, IndexPart)>,
}

#[derive(Debug)]
enum IndexPart {
    Column(String),
    Function(String),
}

/// Groups index rows by table and index name.
///
/// The primary key's backing index is left out, recognized either by its
/// name appearing in `pk_names` or by the row's `PRIMARY_KEY` flag. A key
/// part with no column name, or with an expression, is a function part;
/// the empty-string expression some vendors report stays as is.
pub fn indices_from_rows(
    rows: &[MetadataRow],
    pk_names: &HashSet<String>,
) -> Result<HashMap<String, Vec<Index>>> {
    let mut grouped: Vec<((String, String), IndexParts)> = Vec::new();
    for row in rows {
        let table = row.require_string("index info", "TABLE_NAME")?;
        let Some(index_name) = row.string("INDEX_NAME") else {
            continue;
        };
        let part = match (row.string("COLUMN_NAME"), row.string("FUNCTION_EXPR")) {
            (_, Some(expr)) => IndexPart::Function(expr),
            (Some(column), None) => IndexPart::Column(column),
            (None, None) => IndexPart::Function(String::new()),
        };

        let key = (table, index_name);
        let slot = match grouped.iter().position(|(k, _)| *k == key) {
            Some(i) => i,
            None => {
                grouped.push((
                    key,
                    IndexParts {
                        unique: !row.bool("NON_UNIQUE").unwrap_or(true),
                        index_type: row.string("INDEX_TYPE"),
                        filter_condition: row
                            .string("FILTER_CONDITION")
                            .filter(|f| !f.trim().is_empty()),
                        primary_key: false,
                        parts: Vec::new(),
                    },
                ));
                grouped.len() - 1
            }
        };
        let entry = &mut grouped[slot].1;
        entry.primary_key |= row.bool("PRIMARY_KEY").unwrap_or(false);
        let position = row.int("ORDINAL_POSITION").unwrap_or(entry.parts.len() as i64 + 1);
        entry.parts.push((position, part));
    }

    let mut by_table: HashMap<String, Vec<Index>> = HashMap::new();
    for ((table, name), mut index) in grouped {
        if index.primary_key || pk_names.contains(&name) {
            continue;
        }
        index.parts.sort_by_key(|(position, _)| *position);
        let mut columns = Vec::new();
        let mut function_expressions = Vec::new();
        for (_, part) in index.parts {
            match part {
                IndexPart::Column(column) => columns.push(column),
                IndexPart::Function(expr) => function_expressions.push(expr),
            }
        }
        by_table.entry(table.clone()).or_default().push(Index {
            name,
            table,
            columns,
            unique: index.unique,
            index_type: index.index_type,
            filter_condition: index.filter_condition,
            function_expressions,
        });
    }
    Ok(by_table)
}

fn sequence_from_row(row: &MetadataRow, query: &'static str) -> Result<Sequence> {
    Ok(Sequence {
        name: row.require_string(query, "SEQUENCE_NAME")?,
        start_with: row.int("START_VALUE"),
        increment_by: row.int("INCREMENT"),
        min_value: row.int("MIN_VALUE"),
        max_value: row.int("MAX_VALUE"),
        cycle: row.bool("CYCLE"),
        cache: row.int("CACHE_SIZE"),
    })
}

/// Maps sequence rows.
pub fn sequences_from_rows(rows: &[MetadataRow]) -> Result<Vec<Sequence>> {
    rows.iter().map(|row| sequence_from_row(row, "sequences")).collect()
}

/// Maps table-sequence rows, grouped by the owning table.
pub fn table_sequences_from_rows(rows: &[MetadataRow]) -> Result<HashMap<String, Vec<Sequence>>> {
    let mut by_table: HashMap<String, Vec<Sequence>> = HashMap::new();
    for row in rows {
        let table = row.require_string("table sequences", "TABLE_NAME")?;
        by_table
            .entry(table)
            .or_default()
            .push(sequence_from_row(row, "table sequences")?);
    }
    Ok(by_table)
}

fn find_table<'a>(
    tables: &[&'a TableSchema],
    stored: &str,
    ids: &IdentifierManager,
) -> Option<&'a TableSchema> {
    tables
        .iter()
        .copied()
        .find(|t| ids.matches_stored(&t.name, stored))
}

fn find_column<'a>(
    table: &'a TableSchema,
    stored: &str,
    ids: &IdentifierManager,
) -> Option<&'a ColumnSchema> {
    table
        .columns
        .iter()
        .find(|c| ids.matches_stored(&c.name, stored))
}

/// Maps raw constraints of `from` onto declared names.
///
/// A column pair whose referencing or referenced column is not declared is
/// dropped; a constraint with no pairs left, or whose target table is not
/// among `known`, is dropped entirely.
#[must_use]
pub fn resolve_foreign_keys(
    raw: &[ForeignKeyConstraint],
    from: &TableSchema,
    known: &[&TableSchema],
    ids: &IdentifierManager,
) -> Vec<ForeignKeyConstraint> {
    let mut resolved = Vec::new();
    for fk in raw {
        let Some(target) = find_table(known, &fk.target_table, ids) else {
            warn!(
                constraint = %fk.name,
                table = %from.name,
                target = %fk.target_table,
                "Foreign key references an undeclared table, skipping"
            );
            continue;
        };
        let mut references = Vec::with_capacity(fk.references.len());
        for reference in &fk.references {
            match (
                find_column(from, &reference.from, ids),
                find_column(target, &reference.target, ids),
            ) {
                (Some(from_column), Some(target_column)) => references.push(ColumnReference {
                    position: reference.position,
                    from: from_column.name.clone(),
                    target: target_column.name.clone(),
                }),
                _ => warn!(
                    constraint = %fk.name,
                    from = %reference.from,
                    target = %reference.target,
                    "Foreign key column is not declared, dropping it"
                ),
            }
        }
        if references.is_empty() {
            continue;
        }
        resolved.push(ForeignKeyConstraint {
            name: fk.name.clone(),
            from_table: from.name.clone(),
            target_table: target.name.clone(),
            references,
            on_update: fk.on_update,
            on_delete: fk.on_delete,
        });
    }
    resolved
}

/// Maps raw indices of `table` onto declared column names.
///
/// A column part that matches no declared column is treated as an
/// expression. The index is kept only if its distinct resolved columns plus
/// expressions account for every key part.
#[must_use]
pub fn resolve_indices(raw: &[Index], table: &TableSchema, ids: &IdentifierManager) -> Vec<Index> {
    let mut resolved = Vec::new();
    for index in raw {
        let total = index.columns.len() + index.function_expressions.len();
        let mut columns: Vec<String> = Vec::new();
        let mut functions = index.function_expressions.clone();
        for column in &index.columns {
            match find_column(table, column, ids) {
                Some(declared) => {
                    if !columns.contains(&declared.name) {
                        columns.push(declared.name.clone());
                    }
                }
                None => functions.push(column.clone()),
            }
        }
        if columns.len() + functions.len() != total {
            warn!(
                index = %index.name,
                table = %table.name,
                "Index key parts do not match the declared columns, skipping"
            );
            continue;
        }
        resolved.push(Index {
            name: index.name.clone(),
            table: table.name.clone(),
            columns,
            unique: index.unique,
            index_type: index.index_type.clone(),
            filter_condition: index.filter_condition.clone(),
            function_expressions: functions,
        });
    }
    resolved
}
