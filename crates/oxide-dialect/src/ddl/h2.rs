//! H2 DDL. The trait defaults follow H2's ANSI grammar, so only types and
//! a few spellings are overridden here.

use crate::schema::SqlType;

use super::DdlDialect;

/// H2 grammar, shared by every compatibility mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Ddl;

impl DdlDialect for H2Ddl {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::TinyInt => "TINYINT".to_string(),
            SqlType::Text => "CLOB".to_string(),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::DateTime | SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "DOUBLE PRECISION".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            SqlType::Numeric(p, s) => format!("NUMERIC({p}, {s})"),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Binary(n) => format!("BINARY({n})"),
            SqlType::VarBinary(n) => format!("VARBINARY({n})"),
            SqlType::Json => "JSON".to_string(),
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::{DialectName, H2Mode};
    use crate::schema::{ForeignKeySchema, SequenceSchema, SqlType, TableSchema, ColumnSchema};
    use crate::types::ReferenceOption;

    use super::super::tests::generator;

    #[test]
    fn sequence_with_every_option() {
        let ddl = generator(DialectName::H2(H2Mode::Regular));
        let mut seq = SequenceSchema::new("ticket_seq").start_with(1).increment_by(1);
        seq.min_value = Some(1);
        seq.max_value = Some(1000);
        seq.cycle = true;
        seq.cache = Some(20);
        assert_eq!(
            ddl.create_sequence(&seq),
            "CREATE SEQUENCE TICKET_SEQ START WITH 1 INCREMENT BY 1 MINVALUE 1 MAXVALUE 1000 CYCLE CACHE 20"
        );
    }

    #[test]
    fn foreign_key_added_later() {
        let ddl = generator(DialectName::H2(H2Mode::Regular));
        let table = TableSchema::new("orders")
            .column(ColumnSchema::new("user_id", SqlType::Integer));
        let fk = ForeignKeySchema::new("fk_orders_user", vec!["user_id".into()], "users", vec!["id".into()])
            .on_delete(ReferenceOption::SetNull);
        assert_eq!(
            ddl.add_foreign_key(&table, &fk),
            "ALTER TABLE ORDERS ADD CONSTRAINT FK_ORDERS_USER FOREIGN KEY (USER_ID) \
             REFERENCES USERS(ID) ON DELETE SET NULL"
        );
        assert_eq!(
            ddl.drop_foreign_key(&table, "FK_ORDERS_USER"),
            "ALTER TABLE ORDERS DROP CONSTRAINT FK_ORDERS_USER"
        );
    }
}
