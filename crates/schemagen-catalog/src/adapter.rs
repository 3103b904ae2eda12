//! Catalog adapter trait for introspecting live tables

use std::fmt;

/// A column as reported by the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectedColumn {
    /// Column name
    pub name: String,

    /// Abstract source type name (e.g. `integer`, `string`, `datetime`)
    pub source_type: String,

    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl IntrospectedColumn {
    /// Create a NOT NULL column
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            nullable: false,
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl fmt::Display for IntrospectedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.source_type)?;
        if !self.nullable {
            write!(f, " not null")?;
        }
        Ok(())
    }
}

/// Errors that can occur when introspecting the database
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No database connection configured; cannot introspect table '{0}'")]
    NotConnected(String),
}

/// Trait for adapters that can describe live tables
///
/// Both listing operations fail with [`FetchError::TableNotFound`] when the
/// table does not exist.
#[async_trait::async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Get the adapter name (e.g., "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Names of all tables visible to the adapter
    async fn list_tables(&self) -> Result<Vec<String>, FetchError>;

    /// Primary-key column names of a table, in key order
    async fn list_primary_key_columns(&self, table: &str) -> Result<Vec<String>, FetchError>;

    /// Columns of a table, in ordinal order
    async fn list_columns(&self, table: &str) -> Result<Vec<IntrospectedColumn>, FetchError>;

    /// Test the connection to the database
    async fn test_connection(&self) -> Result<(), FetchError>;
}
