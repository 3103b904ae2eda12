//! Database introspection for schema generation
//!
//! The generator only needs three questions answered about the live
//! database: which tables exist, which columns make up a table's primary
//! key, and what columns a table has. [`CatalogAdapter`] is that seam.
//!
//! ## Features
//!
//! - `postgres` - PostgreSQL support via `tokio-postgres`
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemagen_catalog::{CatalogAdapter, PostgresCatalog};
//!
//! let catalog = PostgresCatalog::connect("host=localhost dbname=app user=app").await?;
//! let columns = catalog.list_columns("users").await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod offline;
pub mod postgres;

pub use adapter::{CatalogAdapter, IntrospectedColumn, FetchError};
pub use mock::{MockCatalog, MockCatalogBuilder, MockTable};
pub use offline::OfflineCatalog;
pub use postgres::map_postgres_type;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;
