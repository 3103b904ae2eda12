//! Schemagen engine - DDL generation pipeline
//!
//! This crate turns table configuration plus live database introspection
//! into `CREATE TABLE` / `CREATE INDEX` text:
//! - Extractor: one normalized [`Table`](schemagen_core::Table) per configured table
//! - Writer: aligned, deterministic DDL for one table
//! - Generator: header plus every configured table, in name order

pub mod error;
pub mod extractor;
pub mod writer;
pub mod generator;

pub use error::GenerateError;
pub use extractor::{map_datatype, Extractor};
pub use writer::TableWriter;
pub use generator::{GenerationSummary, Generator, HEADER};
