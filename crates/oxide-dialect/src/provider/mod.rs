//! Per-vendor constant tables: identifier properties, reserved words and
//! type registries.

pub mod keywords;
mod property;
mod sql_types;

pub use property::PropertyProvider;
pub use sql_types::{canonical_types, SqlTypeProvider};
