//! Catalog used when no database connection is configured
//!
//! Every lookup fails with [`FetchError::NotConnected`], so a configuration
//! made only of virtual tables still generates, while a database-backed
//! table reports clearly why it could not be introspected.

use crate::adapter::{CatalogAdapter, FetchError, IntrospectedColumn};

/// Catalog adapter without a database behind it
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCatalog;

impl OfflineCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for OfflineCatalog {
    fn name(&self) -> &'static str {
        "Offline"
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        Err(FetchError::NotConnected("*".to_string()))
    }

    async fn list_primary_key_columns(&self, table: &str) -> Result<Vec<String>, FetchError> {
        tracing::debug!(table, "No database connection; cannot introspect");
        Err(FetchError::NotConnected(table.to_string()))
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<IntrospectedColumn>, FetchError> {
        Err(FetchError::NotConnected(table.to_string()))
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        Err(FetchError::NotConnected("*".to_string()))
    }
}
