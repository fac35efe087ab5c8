#![allow(dead_code)]

use oxide_dialect::prelude::*;
use oxide_dialect_sqlx::SqlxConnection;

pub const MEMORY_URL: &str = "sqlite::memory:";

/// A fresh in-memory database and its metadata engine.
pub async fn connect(lifetime: CacheLifetime) -> (SqlxConnection, DatabaseDialectMetadata) {
    let mut conn = SqlxConnection::connect(MEMORY_URL)
        .await
        .expect("open in-memory database");
    let metadata = DatabaseDialectMetadata::connect(&mut conn, lifetime)
        .await
        .expect("resolve metadata");
    (conn, metadata)
}

/// Users and their orders; orders are declared first so creation order has
/// to follow the foreign key.
pub fn shop() -> DatabaseSchema {
    DatabaseSchema::new()
        .table(
            TableSchema::new("orders")
                .column(
                    ColumnSchema::new("id", SqlType::Integer)
                        .primary_key()
                        .auto_increment(),
                )
                .column(ColumnSchema::new("user_id", SqlType::BigInt).not_null())
                .column(ColumnSchema::new("note", SqlType::Text))
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
                    ColumnSchema::new("id", SqlType::BigInt)
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
