//! Integration tests for catalog adapters
//!
//! Tests requiring a live PostgreSQL server are marked with `#[ignore]` and
//! can be run with `cargo test -- --ignored`.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all non-ignored tests (no database required)
//! cargo test -p schemagen-catalog --test integration_tests
//!
//! # Run PostgreSQL integration tests
//! PGHOST=localhost \
//! PGPORT=5432 \
//! PGDATABASE=mydb \
//! PGUSER=user \
//! PGPASSWORD=pass \
//! cargo test -p schemagen-catalog --features postgres --test integration_tests -- --ignored
//! ```

use schemagen_catalog::{
    CatalogAdapter, FetchError, IntrospectedColumn, MockCatalog, MockCatalogBuilder, MockTable,
};

fn users_table() -> MockTable {
    MockTable::new(vec![
        IntrospectedColumn::new("id", "integer"),
        IntrospectedColumn::new("username", "string"),
        IntrospectedColumn::new("ip_address", "inet").with_nullable(true),
    ])
    .with_primary_key(["id"])
}

// =============================================================================
// Mock Catalog Tests (No database required)
// =============================================================================

#[tokio::test]
async fn test_mock_catalog_basic_workflow() {
    let catalog = MockCatalog::new();
    catalog.add_table("users", users_table()).await;

    let columns = catalog.list_columns("users").await.unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[2].source_type, "inet");
    assert!(columns[2].nullable);

    let pk = catalog.list_primary_key_columns("users").await.unwrap();
    assert_eq!(pk, vec!["id".to_string()]);
}

#[tokio::test]
async fn test_mock_catalog_table_not_found_error() {
    let catalog = MockCatalog::new();

    let result = catalog.list_columns("nonexistent").await;
    assert!(matches!(result, Err(FetchError::TableNotFound(_))));

    if let Err(FetchError::TableNotFound(msg)) = result {
        assert!(msg.contains("nonexistent"));
    }
}

#[tokio::test]
async fn test_mock_catalog_custom_error() {
    let catalog = MockCatalog::new();
    catalog.add_table("locked", users_table()).await;
    catalog
        .add_error_for_table("locked", FetchError::QueryError("permission denied".to_string()))
        .await;

    let result = catalog.list_columns("locked").await;
    assert!(matches!(result, Err(FetchError::QueryError(_))));
}

#[tokio::test]
async fn test_mock_catalog_connection() {
    assert!(MockCatalog::new().test_connection().await.is_ok());

    let failing = MockCatalog::new().with_connection_failure();
    assert!(matches!(
        failing.test_connection().await,
        Err(FetchError::ConnectionError(_))
    ));
}

#[tokio::test]
async fn test_mock_catalog_builder() {
    let catalog = MockCatalogBuilder::new()
        .with_table("users", users_table())
        .with_table(
            "topic_users",
            MockTable::new(vec![
                IntrospectedColumn::new("user_id", "integer"),
                IntrospectedColumn::new("topic_id", "integer"),
            ])
            .with_primary_key(["user_id", "topic_id"]),
        )
        .with_error("broken", FetchError::QueryError("boom".to_string()))
        .build();

    assert_eq!(catalog.table_count().await, 2);
    assert_eq!(
        catalog.list_tables().await.unwrap(),
        vec!["topic_users".to_string(), "users".to_string()]
    );
    assert_eq!(
        catalog.list_primary_key_columns("topic_users").await.unwrap(),
        vec!["user_id".to_string(), "topic_id".to_string()]
    );
    assert!(catalog.list_columns("broken").await.is_err());
}

#[tokio::test]
async fn test_catalog_as_trait_object() {
    let catalog: Box<dyn CatalogAdapter> = Box::new(MockCatalogBuilder::new()
        .with_table("users", users_table())
        .build());

    assert_eq!(catalog.name(), "Mock");
    assert_eq!(catalog.list_columns("users").await.unwrap().len(), 3);
}

// =============================================================================
// PostgreSQL Tests (require a live server)
// =============================================================================

#[cfg(feature = "postgres")]
mod postgres {
    use schemagen_catalog::{CatalogAdapter, FetchError, PostgresCatalog};

    fn connection_string() -> Option<String> {
        let host = std::env::var("PGHOST").ok()?;
        let port = std::env::var("PGPORT").unwrap_or_else(|_| "5432".to_string());
        let database = std::env::var("PGDATABASE").unwrap_or_else(|_| "postgres".to_string());
        let user = std::env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string());
        let password = std::env::var("PGPASSWORD").unwrap_or_default();

        Some(format!(
            "host={} port={} dbname={} user={} password={}",
            host, port, database, user, password
        ))
    }

    #[tokio::test]
    #[ignore]
    async fn test_postgres_missing_table() {
        let Some(conn_str) = connection_string() else {
            eprintln!("Skipping: PGHOST not set");
            return;
        };

        let catalog = PostgresCatalog::connect(&conn_str).await.unwrap();
        catalog.test_connection().await.unwrap();

        let result = catalog.list_columns("schemagen_table_that_does_not_exist").await;
        assert!(matches!(result, Err(FetchError::TableNotFound(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn test_postgres_introspects_table() {
        let Some(conn_str) = connection_string() else {
            eprintln!("Skipping: PGHOST not set");
            return;
        };

        let catalog = PostgresCatalog::connect(&conn_str).await.unwrap();
        for table in catalog.list_tables().await.unwrap().iter().take(5) {
            let columns = catalog.list_columns(table).await.unwrap();
            let pk = catalog.list_primary_key_columns(table).await.unwrap();

            assert!(!columns.is_empty());
            assert!(pk.iter().all(|name| columns.iter().any(|c| &c.name == name)));
        }
    }
}
