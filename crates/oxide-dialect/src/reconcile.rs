//! Schema reconciliation.
//!
//! [`SchemaReconciler`] compares a declared [`DatabaseSchema`] with the live
//! database and produces the DDL that brings the database in line, in
//! dependency order:
//!
//! 1. missing schemas
//! 2. missing sequences
//! 3. missing tables, sorted so referenced tables come first
//! 4. missing columns
//! 5. column alterations
//! 6. foreign keys (deferred cyclic ones, missing ones, and mismatched ones
//!    dropped and re-added)
//! 7. missing indices
//!
//! Nothing is ever dropped except a foreign key being replaced. Changes
//! the vendor cannot express are reported as [`SchemaWarning`]s instead.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::connection::MetadataConnection;
use crate::ddl::{ColumnChange, DdlGenerator};
use crate::dialect::{DialectName, H2Mode};
use crate::error::Result;
use crate::metadata::DatabaseDialectMetadata;
use crate::model::{ColumnMetadata, ConstraintKey, ForeignKeyConstraint, Index, TableRef};
use crate::schema::{ColumnSchema, DatabaseSchema, ForeignKeySchema, IndexSchema, TableSchema};
use crate::types::{code, ReferenceOption};

/// A difference the reconciler found but will not, or cannot, fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// An existing column differs and the vendor cannot alter it.
    UnsupportedColumnChange {
        table: String,
        column: String,
        detail: String,
    },
    /// A constraint is missing or differs and the vendor cannot change
    /// constraints on existing tables.
    UnsupportedConstraintChange {
        table: String,
        constraint: String,
        detail: String,
    },
    /// Several live indices cover the same key.
    ExcessiveIndices { table: String, indices: Vec<String> },
    /// Several live foreign keys share the same referencing columns.
    ExcessiveForeignKeys {
        table: String,
        columns: Vec<String>,
        constraints: Vec<String>,
    },
    /// Declared foreign keys form a cycle between these tables.
    ForeignKeyCycle { tables: Vec<String> },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedColumnChange {
                table,
                column,
                detail,
            } => write!(f, "cannot alter column {table}.{column}: {detail}"),
            Self::UnsupportedConstraintChange {
                table,
                constraint,
                detail,
            } => write!(f, "cannot change constraint {constraint} on {table}: {detail}"),
            Self::ExcessiveIndices { table, indices } => {
                write!(f, "table {table} has redundant indices: {}", indices.join(", "))
            }
            Self::ExcessiveForeignKeys {
                table,
                columns,
                constraints,
            } => write!(
                f,
                "table {table} has several foreign keys on ({}): {}",
                columns.join(", "),
                constraints.join(", ")
            ),
            Self::ForeignKeyCycle { tables } => {
                write!(f, "foreign keys form a cycle: {}", tables.join(" -> "))
            }
        }
    }
}

/// The outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// DDL to execute, in order.
    pub statements: Vec<String>,
    /// Differences left as they are.
    pub warnings: Vec<SchemaWarning>,
}

impl ReconciliationPlan {
    /// Returns `true` if the database already matches the declaration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.warnings.is_empty()
    }

    fn warn(&mut self, warning: SchemaWarning) {
        warn!(warning = %warning, "Schema difference left unresolved");
        self.warnings.push(warning);
    }
}

/// Plans the DDL that brings a database in line with a declared schema.
#[derive(Debug)]
pub struct SchemaReconciler<'m> {
    metadata: &'m mut DatabaseDialectMetadata,
    ddl: DdlGenerator,
}

impl<'m> SchemaReconciler<'m> {
    /// Creates a reconciler reading through `metadata`.
    #[must_use]
    pub fn new(metadata: &'m mut DatabaseDialectMetadata) -> Self {
        let ddl = metadata.ddl();
        Self { metadata, ddl }
    }

    /// The DDL generator in use.
    #[must_use]
    pub fn ddl(&self) -> &DdlGenerator {
        &self.ddl
    }

    /// Computes the statements needed to bring the database in line with
    /// `schema`. Nothing is executed.
    ///
    /// The metadata pass ends when planning finishes, successfully or not.
    pub async fn plan(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
    ) -> Result<ReconciliationPlan> {
        let result = self.build_plan(conn, schema).await;
        self.metadata.end_pass();
        if let Ok(plan) = &result {
            info!(
                dialect = %self.metadata.dialect(),
                statements = plan.statements.len(),
                warnings = plan.warnings.len(),
                "Reconciliation planned"
            );
        }
        result
    }

    async fn build_plan(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
    ) -> Result<ReconciliationPlan> {
        let mut plan = ReconciliationPlan::default();

        self.plan_schemas(conn, schema, &mut plan).await?;
        self.plan_sequences(conn, schema, &mut plan).await?;

        let (ordered, cycles) = sort_by_references(&schema.tables);
        for tables in cycles {
            plan.warn(SchemaWarning::ForeignKeyCycle { tables });
        }

        let mut existing = Vec::new();
        let mut missing = Vec::new();
        for table in ordered {
            if self.metadata.table_exists(conn, &table.table_ref()).await? {
                existing.push(table);
            } else {
                missing.push(table);
            }
        }

        let deferred = self.plan_new_tables(&missing, &mut plan);
        self.plan_columns(conn, &existing, &mut plan).await?;

        for (table, fk) in deferred {
            plan.statements.push(self.ddl.add_foreign_key(table, fk));
        }
        self.plan_foreign_keys(conn, &existing, &mut plan).await?;

        for table in &missing {
            for index in &table.indexes {
                plan.statements.push(self.ddl.create_index(table, index));
            }
        }
        self.plan_indices(conn, &existing, &mut plan).await?;

        Ok(plan)
    }

    async fn plan_schemas(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
        plan: &mut ReconciliationPlan,
    ) -> Result<()> {
        for name in schema.schema_names() {
            if self.metadata.schema_exists(conn, name).await? {
                continue;
            }
            match self.ddl.create_schema(name) {
                Some(sql) => plan.statements.push(sql),
                None => warn!(schema = %name, "Schemas cannot be created on this vendor"),
            }
        }
        Ok(())
    }

    async fn plan_sequences(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
        plan: &mut ReconciliationPlan,
    ) -> Result<()> {
        if schema.sequences.is_empty() {
            return Ok(());
        }
        if !self.ddl.dialect().supports_sequences() {
            warn!(
                dialect = %self.metadata.dialect(),
                count = schema.sequences.len(),
                "Sequences are not supported; skipping"
            );
            return Ok(());
        }
        let live = self.metadata.sequences(conn).await?;
        let ids = self.metadata.identifiers();
        for sequence in &schema.sequences {
            if !live.iter().any(|name| ids.matches_stored(&sequence.name, name)) {
                plan.statements.push(self.ddl.create_sequence(sequence));
            }
        }
        Ok(())
    }

    /// Emits `CREATE TABLE` for each missing table in dependency order and
    /// returns the foreign keys that must wait until every table exists.
    fn plan_new_tables<'s>(
        &self,
        missing: &[&'s TableSchema],
        plan: &mut ReconciliationPlan,
    ) -> Vec<(&'s TableSchema, &'s ForeignKeySchema)> {
        let can_defer = self.ddl.dialect().supports_add_constraint();
        let mut deferred = Vec::new();
        for (position, &table) in missing.iter().enumerate() {
            let mut inline = Vec::new();
            for fk in &table.foreign_keys {
                let target = fk.target();
                let pending = missing[position + 1..]
                    .iter()
                    .any(|later| same_table(&later.table_ref(), &target));
                if pending && can_defer {
                    debug!(table = %table.name, constraint = %fk.name, "Deferring foreign key");
                    deferred.push((table, fk));
                } else {
                    inline.push(fk);
                }
            }
            plan.statements.push(self.ddl.create_table(table, &inline));
        }
        deferred
    }

    async fn plan_columns(
        &mut self,
        conn: &mut dyn MetadataConnection,
        existing: &[&TableSchema],
        plan: &mut ReconciliationPlan,
    ) -> Result<()> {
        if existing.is_empty() {
            return Ok(());
        }
        let refs: Vec<TableRef> = existing.iter().map(|t| t.table_ref()).collect();
        let live_columns = self.metadata.table_columns(conn, &refs).await?;

        let mut additions = Vec::new();
        let mut alterations = Vec::new();
        for table in existing {
            let live = live_columns
                .get(&table.table_ref())
                .map(Vec::as_slice)
                .unwrap_or_default();
            for column in &table.columns {
                let found = live
                    .iter()
                    .find(|c| self.metadata.identifiers().matches_stored(&column.name, &c.name));
                match found {
                    None => additions.push(self.ddl.add_column(table, column)),
                    Some(current) => {
                        let change = self.column_change(table, column, current);
                        if change.any() {
                            alterations.extend(self.alter_column(table, column, change, plan));
                        }
                    }
                }
            }
        }
        plan.statements.extend(additions);
        plan.statements.extend(alterations);
        Ok(())
    }

    fn column_change(
        &self,
        table: &TableSchema,
        column: &ColumnSchema,
        live: &ColumnMetadata,
    ) -> ColumnChange {
        let types = &self.metadata.vendor().types;
        let rendered = self.ddl.type_name(&column.sql_type);
        let expected = types.type_code(base_type_name(&rendered));
        let size_differs = has_length(expected)
            && matches!((column.sql_type.size(), live.size), (Some(a), Some(b)) if a != b);
        let type_changed =
            !codes_equivalent(self.metadata.dialect(), expected, live.sql_type) || size_differs;

        let in_primary_key = table
            .primary_key_columns()
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&column.name));
        let nullability_changed = (column.nullable && !in_primary_key) != live.nullable;

        let default_changed = !column.auto_increment
            && !defaults_equal(
                self.ddl.default_sql(&column.default).as_deref(),
                live.default_value.as_deref(),
            );

        if type_changed {
            debug!(
                table = %table.name,
                column = %column.name,
                expected = %rendered,
                live = %live.type_name,
                "Column type differs"
            );
        }
        ColumnChange {
            type_changed,
            nullability_changed,
            default_changed,
        }
    }

    fn alter_column(
        &self,
        table: &TableSchema,
        column: &ColumnSchema,
        mut change: ColumnChange,
        plan: &mut ReconciliationPlan,
    ) -> Vec<String> {
        let dialect = self.ddl.dialect();
        if !dialect.supports_alter_column() {
            plan.warn(SchemaWarning::UnsupportedColumnChange {
                table: table.name.clone(),
                column: column.name.clone(),
                detail: describe_change(change),
            });
            return Vec::new();
        }
        if change.default_changed && !dialect.supports_default_change() {
            plan.warn(SchemaWarning::UnsupportedColumnChange {
                table: table.name.clone(),
                column: column.name.clone(),
                detail: "default differs".to_string(),
            });
            change.default_changed = false;
        }
        self.ddl.modify_column(table, column, change)
    }

    async fn plan_foreign_keys(
        &mut self,
        conn: &mut dyn MetadataConnection,
        existing: &[&TableSchema],
        plan: &mut ReconciliationPlan,
    ) -> Result<()> {
        if existing.is_empty() {
            return Ok(());
        }
        let live = self.metadata.column_constraints(conn, existing).await?;
        let can_alter = self.ddl.dialect().supports_add_constraint();

        for table in existing {
            let table_ref = table.table_ref();

            let mut keys: Vec<&ConstraintKey> =
                live.keys().filter(|k| k.table == table_ref).collect();
            keys.sort();
            for key in keys {
                let constraints = &live[key];
                if constraints.len() > 1 {
                    plan.warn(SchemaWarning::ExcessiveForeignKeys {
                        table: table.name.clone(),
                        columns: key.columns.clone(),
                        constraints: constraints.iter().map(|c| c.name.clone()).collect(),
                    });
                }
            }

            for fk in &table.foreign_keys {
                let key = ConstraintKey {
                    table: table_ref.clone(),
                    columns: fk
                        .columns
                        .iter()
                        .map(|c| table.get_column(c).map_or_else(|| c.clone(), |d| d.name.clone()))
                        .collect(),
                };
                let target = fk.target();
                let current = live.get(&key).and_then(|list| {
                    list.iter()
                        .find(|c| c.target_table.eq_ignore_ascii_case(&target.name))
                });
                if current.is_none() {
                    // Same name on other columns: adding it again would collide.
                    let ids = self.metadata.identifiers();
                    let declared_name = ids.cut_if_necessary(&fk.name);
                    let renamed = live
                        .iter()
                        .filter(|(k, _)| k.table == table_ref)
                        .flat_map(|(_, list)| list)
                        .find(|c| ids.matches_stored(&declared_name, &c.name));
                    if let Some(existing) = renamed {
                        plan.warn(SchemaWarning::UnsupportedConstraintChange {
                            table: table.name.clone(),
                            constraint: existing.name.clone(),
                            detail: "foreign key columns differ".to_string(),
                        });
                        continue;
                    }
                }
                match current {
                    None if can_alter => plan.statements.push(self.ddl.add_foreign_key(table, fk)),
                    None => plan.warn(SchemaWarning::UnsupportedConstraintChange {
                        table: table.name.clone(),
                        constraint: fk.name.clone(),
                        detail: "foreign key is missing".to_string(),
                    }),
                    Some(current) if self.rules_match(fk, current) => {}
                    Some(current) if can_alter => {
                        info!(
                            table = %table.name,
                            constraint = %current.name,
                            "Foreign key rules differ; replacing"
                        );
                        plan.statements
                            .push(self.ddl.drop_foreign_key(table, &current.name));
                        plan.statements.push(self.ddl.add_foreign_key(table, fk));
                    }
                    Some(current) => plan.warn(SchemaWarning::UnsupportedConstraintChange {
                        table: table.name.clone(),
                        constraint: current.name.clone(),
                        detail: "referential actions differ".to_string(),
                    }),
                }
            }
        }
        Ok(())
    }

    fn rules_match(&self, declared: &ForeignKeySchema, live: &ForeignKeyConstraint) -> bool {
        let types = &self.metadata.vendor().types;
        self.rule_matches(declared.on_delete, live.on_delete)
            && (!types.supports_on_update || self.rule_matches(declared.on_update, live.on_update))
    }

    fn rule_matches(&self, declared: Option<ReferenceOption>, live: Option<ReferenceOption>) -> bool {
        let default = self.metadata.vendor().types.default_reference_option;
        let live = live.unwrap_or(default);
        match declared {
            // An undeclared rule is whatever the vendor picked for "no action".
            None => matches!(live, ReferenceOption::NoAction | ReferenceOption::Restrict) || live == default,
            Some(_) => self.ddl.read_back_option(declared) == live,
        }
    }

    async fn plan_indices(
        &mut self,
        conn: &mut dyn MetadataConnection,
        existing: &[&TableSchema],
        plan: &mut ReconciliationPlan,
    ) -> Result<()> {
        if existing.is_empty() {
            return Ok(());
        }
        let live = self.metadata.existing_indices(conn, existing).await?;
        let partial = self.ddl.dialect().supports_partial_indexes();

        for table in existing {
            let indices = live
                .get(&table.table_ref())
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut by_shape: HashMap<String, Vec<String>> = HashMap::new();
            for index in indices {
                by_shape
                    .entry(index_shape(index))
                    .or_default()
                    .push(index.name.clone());
            }
            let mut redundant: Vec<Vec<String>> =
                by_shape.into_values().filter(|names| names.len() > 1).collect();
            redundant.sort();
            for names in redundant {
                plan.warn(SchemaWarning::ExcessiveIndices {
                    table: table.name.clone(),
                    indices: names,
                });
            }

            for index in &table.indexes {
                let present = indices
                    .iter()
                    .any(|live| self.index_matches(index, live, partial));
                if !present {
                    plan.statements.push(self.ddl.create_index(table, index));
                }
            }
        }
        Ok(())
    }

    fn index_matches(&self, declared: &IndexSchema, live: &Index, partial: bool) -> bool {
        let ids = self.metadata.identifiers();
        if ids.matches_stored(&ids.cut_if_necessary(&declared.name), &live.name) {
            return true;
        }
        declared.unique == live.unique
            && declared.columns.len() == live.columns.len()
            && declared
                .columns
                .iter()
                .zip(&live.columns)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
            && declared.functions.len() == live.function_expressions.len()
            && declared
                .functions
                .iter()
                .zip(&live.function_expressions)
                .all(|(a, b)| same_expression(a, b))
            && match (&declared.condition, &live.filter_condition) {
                (Some(wanted), Some(found)) => partial && same_expression(wanted, found),
                (Some(_), None) => !partial,
                (None, found) => found.is_none(),
            }
    }
}

/// Orders tables so that referenced tables precede their referrers,
/// keeping declaration order otherwise. Cycles are reported as the tables
/// along each cycle.
fn sort_by_references(tables: &[TableSchema]) -> (Vec<&TableSchema>, Vec<Vec<String>>) {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        Visiting,
        Done,
    }

    fn visit<'t>(
        index: usize,
        tables: &'t [TableSchema],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        ordered: &mut Vec<&'t TableSchema>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        marks[index] = Mark::Visiting;
        path.push(index);
        for fk in &tables[index].foreign_keys {
            let target = fk.target();
            let Some(next) = tables.iter().position(|t| same_table(&t.table_ref(), &target)) else {
                continue;
            };
            match marks[next] {
                Mark::New => visit(next, tables, marks, path, ordered, cycles),
                Mark::Visiting if next != index => {
                    let start = path.iter().position(|&p| p == next).unwrap_or(0);
                    cycles.push(path[start..].iter().map(|&p| tables[p].name.clone()).collect());
                }
                _ => {}
            }
        }
        path.pop();
        marks[index] = Mark::Done;
        ordered.push(&tables[index]);
    }

    let mut marks = vec![Mark::New; tables.len()];
    let mut ordered = Vec::with_capacity(tables.len());
    let mut cycles = Vec::new();
    let mut path = Vec::new();
    for index in 0..tables.len() {
        if marks[index] == Mark::New {
            visit(index, tables, &mut marks, &mut path, &mut ordered, &mut cycles);
        }
    }
    (ordered, cycles)
}

fn same_table(a: &TableRef, b: &TableRef) -> bool {
    let schema_matches = match (&a.schema, &b.schema) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        (None, None) => true,
        _ => false,
    };
    schema_matches && a.name.eq_ignore_ascii_case(&b.name)
}

/// Type name without length, precision or qualifiers in parentheses.
fn base_type_name(rendered: &str) -> &str {
    rendered.split('(').next().unwrap_or(rendered).trim()
}

fn has_length(type_code: i32) -> bool {
    matches!(
        type_code,
        code::CHAR
            | code::VARCHAR
            | code::NCHAR
            | code::NVARCHAR
            | code::BINARY
            | code::VARBINARY
            | code::DECIMAL
            | code::NUMERIC
    )
}

/// Type codes the vendors report interchangeably.
const EQUIVALENT_CODES: &[&[i32]] = &[
    &[code::BIT, code::BOOLEAN],
    &[code::DECIMAL, code::NUMERIC],
    &[code::FLOAT, code::DOUBLE],
    &[code::CHAR, code::NCHAR],
    &[code::VARCHAR, code::NVARCHAR],
    &[code::LONGVARCHAR, code::LONGNVARCHAR, code::CLOB, code::NCLOB],
    &[code::LONGVARBINARY, code::BLOB],
];

/// MySQL stores booleans as `TINYINT(1)`.
const MYSQL_EQUIVALENT_CODES: &[&[i32]] = &[&[code::BIT, code::BOOLEAN, code::TINYINT]];

fn codes_equivalent(dialect: DialectName, expected: i32, live: i32) -> bool {
    if expected == live || expected == code::OTHER || live == code::OTHER {
        return true;
    }
    let mysql_like = dialect.is_mysql_family()
        || matches!(dialect, DialectName::H2(H2Mode::MySql | H2Mode::MariaDb));
    let vendor: &[&[i32]] = if mysql_like { MYSQL_EQUIVALENT_CODES } else { &[] };
    EQUIVALENT_CODES
        .iter()
        .chain(vendor)
        .any(|group| group.contains(&expected) && group.contains(&live))
}

static TRAILING_CAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"::[A-Za-z_][A-Za-z_ ]*(\(\d+\))?(\[\])?$").expect("valid regex"));

/// A default value reduced to a comparable form.
#[derive(Debug, PartialEq, Eq)]
enum NormalizedDefault {
    Literal(String),
    Expression(String),
}

fn normalize_default(value: &str) -> Option<NormalizedDefault> {
    let mut value = value.trim();
    loop {
        let stripped = value
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .filter(|inner| balanced(inner));
        match stripped {
            Some(inner) => value = inner.trim(),
            None => break,
        }
    }
    let mut value = value.to_string();
    while let Some(found) = TRAILING_CAST.find(&value) {
        value.truncate(found.start());
    }
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("NULL") {
        return None;
    }
    if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        return Some(NormalizedDefault::Literal(inner.replace("''", "'")));
    }
    let value = if value.eq_ignore_ascii_case("true") {
        "1"
    } else if value.eq_ignore_ascii_case("false") {
        "0"
    } else {
        value.strip_suffix("()").unwrap_or(value)
    };
    Some(NormalizedDefault::Expression(value.to_ascii_uppercase()))
}

fn balanced(value: &str) -> bool {
    let mut depth = 0i32;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn defaults_equal(declared: Option<&str>, live: Option<&str>) -> bool {
    let declared = declared.and_then(normalize_default);
    let live = live.and_then(normalize_default);
    match (declared, live) {
        (None, None) => true,
        (Some(a), Some(b)) if a == b => true,
        // Some vendors report string defaults without quotes.
        (Some(NormalizedDefault::Literal(a)), Some(NormalizedDefault::Expression(b)))
        | (Some(NormalizedDefault::Expression(b)), Some(NormalizedDefault::Literal(a))) => {
            a.eq_ignore_ascii_case(&b)
        }
        _ => false,
    }
}

fn describe_change(change: ColumnChange) -> String {
    let mut parts = Vec::new();
    if change.type_changed {
        parts.push("type");
    }
    if change.nullability_changed {
        parts.push("nullability");
    }
    if change.default_changed {
        parts.push("default");
    }
    let verb = if parts.len() > 1 { "differ" } else { "differs" };
    format!("{} {verb}", parts.join(" and "))
}

fn index_shape(index: &Index) -> String {
    format!(
        "{}|{}|{}|{}",
        index.unique,
        index.columns.join(",").to_lowercase(),
        index.function_expressions.join(",").to_lowercase(),
        index
            .filter_condition
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    )
}

/// Compares index expressions or predicates ignoring case, runs of
/// whitespace and redundant outer parentheses.
fn same_expression(a: &str, b: &str) -> bool {
    normalized_expression(a) == normalized_expression(b)
}

fn normalized_expression(expression: &str) -> String {
    let mut text = expression.trim();
    while text.starts_with('(') && text.ends_with(')') && closes_at_end(text) {
        text = text[1..text.len() - 1].trim();
    }
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether the opening parenthesis of `text` is matched by its last char.
fn closes_at_end(text: &str) -> bool {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == text.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}
