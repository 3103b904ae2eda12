//! Builds the schema of one configured table
//!
//! Database-backed tables are introspected through a [`CatalogAdapter`];
//! virtual tables are taken from configuration verbatim. Both go through
//! the same column and datatype mapping, and both get their indexes from
//! configuration.

use schemagen_catalog::CatalogAdapter;
use schemagen_core::{Column, ColumnConfig, Index, IndexConfig, Table, TableConfig, TableSource};

use crate::error::GenerateError;

/// Map a source type name to its canonical output datatype
///
/// `string` and `inet` become `TEXT`; everything else is upper-cased.
/// Matching is exact, so `String` is just upper-cased to `STRING`.
pub fn map_datatype(source_type: &str) -> String {
    match source_type {
        "string" | "inet" => "TEXT".to_string(),
        other => other.to_uppercase(),
    }
}

/// Produces [`Table`] values from configuration and introspection
pub struct Extractor<'a> {
    catalog: &'a dyn CatalogAdapter,
}

impl<'a> Extractor<'a> {
    pub fn new(catalog: &'a dyn CatalogAdapter) -> Self {
        Self { catalog }
    }

    /// Build the schema for `table_name`
    ///
    /// Fails with `FetchError::TableNotFound` when a database-backed table
    /// does not exist.
    pub async fn generate_table(
        &self,
        table_name: &str,
        config: &TableConfig,
    ) -> Result<Table, GenerateError> {
        match &config.source {
            TableSource::Database => self.from_database(table_name, config).await,
            TableSource::Virtual { primary_key, columns } => {
                virtual_table(table_name, primary_key, columns, &config.indexes)
            }
        }
    }

    async fn from_database(
        &self,
        table_name: &str,
        config: &TableConfig,
    ) -> Result<Table, GenerateError> {
        tracing::debug!(table = table_name, adapter = self.catalog.name(), "Introspecting table");

        let primary_key = self.catalog.list_primary_key_columns(table_name).await?;
        let columns = self
            .catalog
            .list_columns(table_name)
            .await?
            .into_iter()
            .map(|c| build_column(c.name, &c.source_type, c.nullable, &primary_key))
            .collect();

        Ok(Table::new(table_name, columns, indexes(&config.indexes), primary_key)?)
    }
}

fn virtual_table(
    table_name: &str,
    primary_key: &[String],
    columns: &[ColumnConfig],
    index_configs: &[IndexConfig],
) -> Result<Table, GenerateError> {
    tracing::debug!(table = table_name, "Building virtual table");

    let columns = columns
        .iter()
        .map(|c| build_column(c.name.clone(), &c.column_type, c.is_null, primary_key))
        .collect();

    Ok(Table::new(table_name, columns, indexes(index_configs), primary_key.to_vec())?)
}

fn build_column(name: String, source_type: &str, nullable: bool, primary_key: &[String]) -> Column {
    let is_primary_key = primary_key.contains(&name);
    Column::new(name, map_datatype(source_type), nullable, is_primary_key)
}

fn indexes(configs: &[IndexConfig]) -> Vec<Index> {
    configs
        .iter()
        .map(|index| {
            Index::new(
                index.name.clone(),
                index.columns.clone(),
                index.unique,
                index.condition.clone(),
            )
        })
        .collect()
}
