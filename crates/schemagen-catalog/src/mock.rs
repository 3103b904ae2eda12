//! In-memory catalog adapter for testing
//!
//! This adapter answers introspection calls from predefined tables without
//! connecting to any database. It's useful for:
//! - Unit testing the extractor and generator
//! - Simulating missing tables and query failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemagen_catalog::{MockCatalog, MockTable, IntrospectedColumn, CatalogAdapter};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_table("users", MockTable::new(vec![
//!     IntrospectedColumn::new("id", "integer"),
//!     IntrospectedColumn::new("username", "string"),
//! ]).with_primary_key(["id"])).await;
//!
//! let pk = catalog.list_primary_key_columns("users").await?;
//! ```

use crate::adapter::{CatalogAdapter, FetchError, IntrospectedColumn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A table known to the mock catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MockTable {
    /// Columns in ordinal order
    pub columns: Vec<IntrospectedColumn>,

    /// Primary-key columns in key order
    pub primary_key: Vec<String>,
}

impl MockTable {
    /// Create a table without a primary key
    pub fn new(columns: Vec<IntrospectedColumn>) -> Self {
        Self {
            columns,
            primary_key: Vec::new(),
        }
    }

    /// Set the primary key
    pub fn with_primary_key<I, S>(mut self, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = primary_key.into_iter().map(Into::into).collect();
        self
    }
}

/// Mock catalog adapter for testing
///
/// Tables are shared between clones, so a test can keep a handle and add
/// tables after handing the adapter to a generator.
pub struct MockCatalog {
    /// Predefined tables by name
    tables: Arc<RwLock<HashMap<String, MockTable>>>,

    /// Errors to return for specific tables
    errors: Arc<RwLock<HashMap<String, FetchError>>>,

    /// Simulate connection failure
    fail_connection: bool,
}

impl MockCatalog {
    /// Create a new mock catalog with no tables
    pub fn new() -> Self {
        Self::from_tables(HashMap::new())
    }

    /// Create a mock catalog from a pre-built map of tables
    pub fn from_tables(tables: HashMap<String, MockTable>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            errors: Arc::new(RwLock::new(HashMap::new())),
            fail_connection: false,
        }
    }

    /// Add or replace a table
    pub async fn add_table(&self, name: impl Into<String>, table: MockTable) {
        self.tables.write().await.insert(name.into(), table);
    }

    /// Configure an error to be returned for every lookup of a table
    pub async fn add_error_for_table(&self, name: impl Into<String>, error: FetchError) {
        self.errors.write().await.insert(name.into(), error);
    }

    /// Configure to fail all connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Get the number of tables stored in the catalog
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }

    async fn lookup(&self, name: &str) -> Result<MockTable, FetchError> {
        tracing::debug!(table = name, "Mock lookup");

        if let Some(error) = self.errors.read().await.get(name) {
            tracing::debug!(table = name, error = %error, "Returning configured error");
            return Err(error.clone());
        }

        self.tables
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::TableNotFound(name.to_string()))
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockCatalog {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            errors: Arc::clone(&self.errors),
            fail_connection: self.fail_connection,
        }
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for MockCatalog {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        let mut names: Vec<String> = self.tables.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn list_primary_key_columns(&self, table: &str) -> Result<Vec<String>, FetchError> {
        self.lookup(table).await.map(|t| t.primary_key)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<IntrospectedColumn>, FetchError> {
        self.lookup(table).await.map(|t| t.columns)
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            Err(FetchError::ConnectionError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Builder for creating a MockCatalog with multiple tables
///
/// # Example
///
/// ```rust,ignore
/// let catalog = MockCatalogBuilder::new()
///     .with_table("users", MockTable::new(vec![IntrospectedColumn::new("id", "integer")]))
///     .with_error("locked", FetchError::QueryError("permission denied".into()))
///     .build();
/// ```
pub struct MockCatalogBuilder {
    tables: HashMap<String, MockTable>,
    errors: HashMap<String, FetchError>,
    fail_connection: bool,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            errors: HashMap::new(),
            fail_connection: false,
        }
    }

    /// Add a table
    pub fn with_table(mut self, name: impl Into<String>, table: MockTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Add an error for a table
    pub fn with_error(mut self, name: impl Into<String>, error: FetchError) -> Self {
        self.errors.insert(name.into(), error);
        self
    }

    /// Fail connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        MockCatalog {
            tables: Arc::new(RwLock::new(self.tables)),
            errors: Arc::new(RwLock::new(self.errors)),
            fail_connection: self.fail_connection,
        }
    }
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let catalog = MockCatalog::new();

        let columns = catalog.list_columns("missing").await;
        assert_eq!(columns, Err(FetchError::TableNotFound("missing".to_string())));

        let pk = catalog.list_primary_key_columns("missing").await;
        assert!(matches!(pk, Err(FetchError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn test_clone_shares_tables() {
        let catalog = MockCatalog::new();
        let handle = catalog.clone();

        handle
            .add_table("users", MockTable::new(vec![IntrospectedColumn::new("id", "integer")]))
            .await;

        assert_eq!(catalog.table_count().await, 1);
        assert_eq!(catalog.list_tables().await.unwrap(), vec!["users".to_string()]);
    }
}
