//! DDL generation.
//!
//! A [`DdlDialect`] knows the vendor grammar for the statements the
//! reconciler emits; [`DdlGenerator`] pairs it with the identifier rules
//! and reference-option capabilities of a connection and renders declared
//! schema objects into SQL text.

mod h2;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::sync::Arc;

pub use h2::H2Ddl;
pub use mysql::MySqlDdl;
pub use oracle::OracleDdl;
pub use postgres::PostgresDdl;
pub use sqlite::SqliteDdl;
pub use sqlserver::SqlServerDdl;

use crate::dialect::DialectName;
use crate::identifier::IdentifierManager;
use crate::model::TableRef;
use crate::provider::SqlTypeProvider;
use crate::schema::{
    ColumnSchema, DefaultValue, ForeignKeySchema, IndexSchema, SequenceSchema, SqlType,
    TableSchema,
};
use crate::types::ReferenceOption;

/// Which aspects of an existing column differ from the declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnChange {
    pub type_changed: bool,
    pub nullability_changed: bool,
    pub default_changed: bool,
}

impl ColumnChange {
    /// Returns `true` if anything changed.
    #[must_use]
    pub fn any(self) -> bool {
        self.type_changed || self.nullability_changed || self.default_changed
    }
}

/// A column alteration with every identifier already quoted.
#[derive(Debug, Clone)]
pub struct ColumnModification<'a> {
    pub table: &'a str,
    pub column: &'a str,
    pub type_sql: &'a str,
    pub nullable: bool,
    pub default: Option<&'a str>,
    pub change: ColumnChange,
}

/// An index with every identifier already quoted.
#[derive(Debug, Clone)]
pub struct IndexDefinition<'a> {
    pub name: &'a str,
    pub table: &'a str,
    /// Quoted columns followed by expressions, in key order.
    pub keys: Vec<String>,
    pub unique: bool,
    pub condition: Option<&'a str>,
    pub index_type: Option<&'a str>,
}

/// Vendor grammar for schema changes.
pub trait DdlDialect: Send + Sync + fmt::Debug {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the SQL type name for the given type.
    fn type_name(&self, sql_type: &SqlType) -> String;

    /// Type clause of an auto-increment column.
    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        format!("{} GENERATED BY DEFAULT AS IDENTITY", self.type_name(sql_type))
    }

    /// An auto-increment key must be declared inline as
    /// `PRIMARY KEY <keyword>`.
    fn inline_auto_increment_key(&self) -> Option<&'static str> {
        None
    }

    /// Whether existing columns can be altered.
    fn supports_alter_column(&self) -> bool {
        true
    }

    /// Whether a column default can be changed in place.
    fn supports_default_change(&self) -> bool {
        true
    }

    /// Whether constraints can be added to or dropped from existing tables.
    fn supports_add_constraint(&self) -> bool {
        true
    }

    /// Whether index predicates (`WHERE`) are accepted.
    fn supports_partial_indexes(&self) -> bool {
        true
    }

    /// Whether native sequences exist.
    fn supports_sequences(&self) -> bool {
        true
    }

    /// Keyword(s) between `ALTER TABLE t` and a column definition.
    fn add_column_keyword(&self) -> &'static str {
        "ADD COLUMN"
    }

    /// Statements altering one column.
    fn modify_column_sql(&self, m: &ColumnModification<'_>) -> Vec<String> {
        let prefix = format!("ALTER TABLE {} ALTER COLUMN {}", m.table, m.column);
        let mut statements = Vec::new();
        if m.change.type_changed {
            statements.push(format!("{prefix} SET DATA TYPE {}", m.type_sql));
        }
        if m.change.nullability_changed {
            let action = if m.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
            statements.push(format!("{prefix} {action}"));
        }
        if m.change.default_changed {
            statements.push(match m.default {
                Some(default) => format!("{prefix} SET DEFAULT {default}"),
                None => format!("{prefix} DROP DEFAULT"),
            });
        }
        statements
    }

    /// `CREATE INDEX` statement.
    fn create_index_sql(&self, index: &IndexDefinition<'_>) -> String {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        if let Some(index_type) = index.index_type {
            sql.push_str(index_type);
            sql.push(' ');
        }
        sql.push_str("INDEX ");
        sql.push_str(index.name);
        sql.push_str(" ON ");
        sql.push_str(index.table);
        sql.push_str(" (");
        sql.push_str(&index.keys.join(", "));
        sql.push(')');
        if let Some(condition) = index.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        sql
    }

    /// `DROP INDEX` statement.
    fn drop_index_sql(&self, _table: &str, index: &str) -> String {
        format!("DROP INDEX {index}")
    }

    /// Statement dropping a foreign key.
    fn drop_foreign_key_sql(&self, table: &str, name: &str) -> String {
        format!("ALTER TABLE {table} DROP CONSTRAINT {name}")
    }

    /// Spelling of a referential action; `None` omits the clause.
    fn reference_option_sql(&self, option: ReferenceOption) -> Option<&'static str> {
        Some(option.as_sql())
    }

    /// `CREATE SCHEMA` statement, or `None` when schemas cannot be
    /// created through DDL.
    fn create_schema_sql(&self, schema: &str) -> Option<String> {
        Some(format!("CREATE SCHEMA {schema}"))
    }

    /// Boolean literal usable as a column default.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Keyword disabling sequence wrap-around.
    fn no_cycle_keyword(&self) -> &'static str {
        "NO CYCLE"
    }
}

/// The DDL grammar for `dialect`.
#[must_use]
pub fn ddl_dialect(dialect: DialectName) -> Box<dyn DdlDialect> {
    match dialect {
        DialectName::H2(_) => Box::new(H2Ddl),
        DialectName::MySql | DialectName::MariaDb => Box::new(MySqlDdl),
        DialectName::Oracle => Box::new(OracleDdl),
        DialectName::PostgreSql => Box::new(PostgresDdl),
        DialectName::SqlServer => Box::new(SqlServerDdl),
        DialectName::Sqlite => Box::new(SqliteDdl),
    }
}

/// Renders declared schema objects into vendor DDL.
#[derive(Debug)]
pub struct DdlGenerator {
    dialect: Box<dyn DdlDialect>,
    identifiers: Arc<IdentifierManager>,
    types: SqlTypeProvider,
}

impl DdlGenerator {
    /// Creates a generator for `dialect`.
    #[must_use]
    pub fn new(
        dialect: DialectName,
        identifiers: Arc<IdentifierManager>,
        types: SqlTypeProvider,
    ) -> Self {
        Self {
            dialect: ddl_dialect(dialect),
            identifiers,
            types,
        }
    }

    /// The vendor grammar.
    #[must_use]
    pub fn dialect(&self) -> &dyn DdlDialect {
        self.dialect.as_ref()
    }

    /// Renders a declared identifier.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        self.identifiers
            .quote_identifier_when_wrong_case_or_necessary(name)
    }

    fn table_ref_name(&self, table: &TableRef) -> String {
        match &table.schema {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(&table.name)),
            None => self.quote(&table.name),
        }
    }

    /// Renders a table name, schema-qualified when declared so.
    #[must_use]
    pub fn table_name(&self, table: &TableSchema) -> String {
        self.table_ref_name(&table.table_ref())
    }

    fn constraint_name(&self, name: &str) -> String {
        self.quote(&self.identifiers.cut_if_necessary(name))
    }

    /// Column type as this vendor renders it.
    #[must_use]
    pub fn type_name(&self, sql_type: &SqlType) -> String {
        self.dialect.type_name(sql_type)
    }

    /// Default clause value as this vendor spells it.
    #[must_use]
    pub fn default_sql(&self, default: &DefaultValue) -> Option<String> {
        match default {
            DefaultValue::Bool(value) => Some(self.dialect.boolean_literal(*value).to_string()),
            other => other.to_sql(),
        }
    }

    /// The referential action a declared rule reads back as once created.
    #[must_use]
    pub fn read_back_option(&self, declared: Option<ReferenceOption>) -> ReferenceOption {
        match declared.map(|o| self.expressible(o)) {
            Some(option) if self.dialect.reference_option_sql(option).is_some() => {
                self.types.effective_reference_option(Some(option))
            }
            _ => self.types.default_reference_option,
        }
    }

    fn expressible(&self, option: ReferenceOption) -> ReferenceOption {
        if option == ReferenceOption::Restrict && !self.types.supports_restrict {
            ReferenceOption::NoAction
        } else {
            option
        }
    }

    fn column_definition(&self, column: &ColumnSchema, inline_key: Option<&str>) -> String {
        let mut parts = vec![self.quote(&column.name)];
        match inline_key {
            Some(keyword) => {
                parts.push(self.dialect.type_name(&column.sql_type));
                parts.push(format!("PRIMARY KEY {keyword}"));
            }
            None if column.auto_increment => {
                parts.push(self.dialect.auto_increment_type(&column.sql_type));
            }
            None => parts.push(self.dialect.type_name(&column.sql_type)),
        }
        if let Some(default_sql) = self.default_sql(&column.default) {
            parts.push(format!("DEFAULT {default_sql}"));
        }
        if !column.nullable && inline_key.is_none() {
            parts.push("NOT NULL".to_string());
        }
        if column.unique && !column.primary_key {
            parts.push("UNIQUE".to_string());
        }
        if let Some(check) = &column.check {
            parts.push(format!("CHECK ({check})"));
        }
        parts.join(" ")
    }

    fn foreign_key_clause(&self, fk: &ForeignKeySchema) -> String {
        let columns: Vec<String> = fk.columns.iter().map(|c| self.quote(c)).collect();
        let targets: Vec<String> = fk.references_columns.iter().map(|c| self.quote(c)).collect();
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            self.constraint_name(&fk.name),
            columns.join(", "),
            self.table_ref_name(&fk.target()),
            targets.join(", ")
        );
        if let Some(keyword) = fk
            .on_delete
            .and_then(|o| self.dialect.reference_option_sql(self.expressible(o)))
        {
            sql.push_str(" ON DELETE ");
            sql.push_str(keyword);
        }
        if self.types.supports_on_update {
            if let Some(keyword) = fk
                .on_update
                .and_then(|o| self.dialect.reference_option_sql(self.expressible(o)))
            {
                sql.push_str(" ON UPDATE ");
                sql.push_str(keyword);
            }
        }
        sql
    }

    /// `CREATE TABLE` with columns, primary key and the given inline
    /// foreign keys.
    #[must_use]
    pub fn create_table(&self, table: &TableSchema, inline_fks: &[&ForeignKeySchema]) -> String {
        let pk = table.primary_key_columns();
        let inline_key = self.dialect.inline_auto_increment_key().filter(|_| {
            pk.len() == 1
                && table
                    .get_column(pk[0])
                    .is_some_and(|c| c.auto_increment)
        });

        let mut elements: Vec<String> = table
            .columns
            .iter()
            .map(|c| {
                let inline = inline_key.filter(|_| c.name.eq_ignore_ascii_case(pk[0]));
                self.column_definition(c, inline)
            })
            .collect();
        if inline_key.is_none() && !pk.is_empty() {
            let quoted: Vec<String> = pk.iter().map(|c| self.quote(c)).collect();
            elements.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                self.constraint_name(&format!("pk_{}", table.name)),
                quoted.join(", ")
            ));
        }
        elements.extend(inline_fks.iter().map(|fk| self.foreign_key_clause(fk)));

        format!("CREATE TABLE {} ({})", self.table_name(table), elements.join(", "))
    }

    /// `ALTER TABLE ... ADD COLUMN`.
    #[must_use]
    pub fn add_column(&self, table: &TableSchema, column: &ColumnSchema) -> String {
        format!(
            "ALTER TABLE {} {} {}",
            self.table_name(table),
            self.dialect.add_column_keyword(),
            self.column_definition(column, None)
        )
    }

    /// Statements bringing an existing column in line with `column`.
    #[must_use]
    pub fn modify_column(
        &self,
        table: &TableSchema,
        column: &ColumnSchema,
        change: ColumnChange,
    ) -> Vec<String> {
        let table_name = self.table_name(table);
        let column_name = self.quote(&column.name);
        let type_sql = self.dialect.type_name(&column.sql_type);
        let default = self.default_sql(&column.default);
        self.dialect.modify_column_sql(&ColumnModification {
            table: &table_name,
            column: &column_name,
            type_sql: &type_sql,
            nullable: column.nullable && !column.primary_key,
            default: default.as_deref(),
            change,
        })
    }

    /// `CREATE INDEX`. A predicate the vendor cannot express is left out.
    #[must_use]
    pub fn create_index(&self, table: &TableSchema, index: &IndexSchema) -> String {
        let name = self.constraint_name(&index.name);
        let table_name = self.table_name(table);
        let keys = index
            .columns
            .iter()
            .map(|c| self.quote(c))
            .chain(index.functions.iter().cloned())
            .collect();
        self.dialect.create_index_sql(&IndexDefinition {
            name: &name,
            table: &table_name,
            keys,
            unique: index.unique,
            condition: index
                .condition
                .as_deref()
                .filter(|_| self.dialect.supports_partial_indexes()),
            index_type: index.index_type.as_deref(),
        })
    }

    /// `DROP INDEX`.
    #[must_use]
    pub fn drop_index(&self, table: &TableSchema, name: &str) -> String {
        self.dialect
            .drop_index_sql(&self.table_name(table), &self.quote(name))
    }

    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`.
    #[must_use]
    pub fn add_foreign_key(&self, table: &TableSchema, fk: &ForeignKeySchema) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.table_name(table),
            self.foreign_key_clause(fk)
        )
    }

    /// Statement dropping the foreign key `name`.
    #[must_use]
    pub fn drop_foreign_key(&self, table: &TableSchema, name: &str) -> String {
        self.dialect
            .drop_foreign_key_sql(&self.table_name(table), &self.quote(name))
    }

    /// `CREATE SEQUENCE`.
    #[must_use]
    pub fn create_sequence(&self, sequence: &SequenceSchema) -> String {
        let mut sql = format!("CREATE SEQUENCE {}", self.quote(&sequence.name));
        let options = [
            ("START WITH", sequence.start_with),
            ("INCREMENT BY", sequence.increment_by),
            ("MINVALUE", sequence.min_value),
            ("MAXVALUE", sequence.max_value),
        ];
        for (keyword, value) in options {
            if let Some(value) = value {
                sql.push_str(&format!(" {keyword} {value}"));
            }
        }
        sql.push(' ');
        sql.push_str(if sequence.cycle {
            "CYCLE"
        } else {
            self.dialect.no_cycle_keyword()
        });
        if let Some(cache) = sequence.cache {
            sql.push_str(&format!(" CACHE {cache}"));
        }
        sql
    }

    /// `CREATE SCHEMA`, or `None` when the vendor cannot create schemas.
    #[must_use]
    pub fn create_schema(&self, schema: &str) -> Option<String> {
        self.dialect.create_schema_sql(&self.quote(schema))
    }
}
