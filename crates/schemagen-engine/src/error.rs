//! Errors raised while generating a schema

use schemagen_catalog::FetchError;
use schemagen_core::SchemaError;

/// Anything that aborts a generation run
///
/// Output already written to the sink is not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Introspection failed, including `FetchError::TableNotFound`
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tables not found in database: {}", .0.join(", "))]
    MissingTables(Vec<String>),
}

impl GenerateError {
    /// True when a configured table is absent from the database
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::TableNotFound(_)) | Self::MissingTables(_))
    }
}
