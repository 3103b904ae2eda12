//! Drives a full generation run
//!
//! Writes a fixed header followed by every configured table in name
//! order. Identical configuration and database state always produce
//! identical output.

use schemagen_catalog::CatalogAdapter;
use schemagen_core::Config;
use std::collections::HashSet;
use std::io::Write;

use crate::error::GenerateError;
use crate::extractor::Extractor;
use crate::writer::TableWriter;

/// Comment written once at the top of non-empty output
pub const HEADER: &str = "\
/*
    This file is auto-generated from the database schema.

    Instead of editing it directly, please update the intermediate schema configuration file
    and re-run `schemagen generate` to update it.
 */
";

/// Counts from a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationSummary {
    /// Tables written
    pub tables: usize,

    /// Indexes written across all tables
    pub indexes: usize,
}

/// Generates DDL for every table in a [`Config`]
pub struct Generator<'a> {
    config: Config,
    catalog: &'a dyn CatalogAdapter,
}

impl<'a> Generator<'a> {
    pub fn new(config: Config, catalog: &'a dyn CatalogAdapter) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write the header and all tables to `output`
    ///
    /// Nothing is written when no tables are configured. The first failure
    /// aborts the run; tables already written stay in `output`.
    pub async fn run<W: Write>(&self, output: &mut W) -> Result<GenerationSummary, GenerateError> {
        let mut summary = GenerationSummary::default();

        if self.config.tables.is_empty() {
            tracing::info!("No tables configured, nothing to generate");
            return Ok(summary);
        }

        output.write_all(HEADER.as_bytes())?;

        tracing::info!(tables = self.config.tables.len(), "Generating tables...");

        let extractor = Extractor::new(self.catalog);
        let mut writer = TableWriter::new(&mut *output);

        for (table_name, table_config) in &self.config.tables {
            let table = extractor.generate_table(table_name, table_config).await?;
            writer.output_table(&table)?;

            tracing::debug!(
                table = %table_name,
                columns = table.columns().len(),
                indexes = table.indexes().len(),
                "Wrote table"
            );

            summary.tables += 1;
            summary.indexes += table.indexes().len();
        }

        output.flush()?;

        tracing::info!(tables = summary.tables, indexes = summary.indexes, "Generation complete");
        Ok(summary)
    }

    /// Check that every database-backed table exists before generating
    ///
    /// Reports all missing tables at once, sorted by name.
    pub async fn validate_table_names(&self) -> Result<(), GenerateError> {
        let required = self.config.database_table_names();
        if required.is_empty() {
            return Ok(());
        }

        let existing: HashSet<String> = self.catalog.list_tables().await?.into_iter().collect();

        let missing: Vec<String> = required
            .into_iter()
            .filter(|name| !existing.contains(*name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            tracing::warn!(missing = ?missing, "Configured tables not found in database");
            Err(GenerateError::MissingTables(missing))
        }
    }
}
