//! Schemagen Core
//!
//! Value types shared by the extractor and the DDL writer, plus the
//! table configuration that drives a generation run.

pub mod schema;
pub mod config;

pub use schema::{Column, Index, Table, SchemaError};
pub use config::{Config, ConfigError, TableConfig, TableSource, ColumnConfig, IndexConfig};
