//! Intermediate schema model
//!
//! Plain immutable values passed from the extractor to the DDL writer.
//! Index columns and primary-key columns refer to columns by name.

use std::collections::HashSet;

/// A column of an exported table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    name: String,
    datatype: String,
    nullable: bool,
    is_primary_key: bool,
}

impl Column {
    /// Create a column. `datatype` is stored upper-cased.
    pub fn new(
        name: impl Into<String>,
        datatype: impl Into<String>,
        nullable: bool,
        is_primary_key: bool,
    ) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into().to_uppercase(),
            nullable,
            is_primary_key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical output type, always upper-case (e.g. `TEXT`, `INTEGER`)
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }
}

/// A secondary index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Index {
    name: String,
    column_names: Vec<String>,
    unique: bool,
    condition: Option<String>,
}

impl Index {
    /// Create an index over `column_names`, kept in the given order
    pub fn new(
        name: impl Into<String>,
        column_names: Vec<String>,
        unique: bool,
        condition: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column_names,
            unique,
            condition: condition.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Raw partial-index predicate, e.g. `WHERE deleted_at IS NULL`
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

/// One exported table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    primary_key_column_names: Vec<String>,
}

impl Table {
    /// Create a table, checking that column names are unique, that no key or
    /// index names a column twice, and that the primary key agrees with the
    /// columns' `is_primary_key` flags.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        indexes: Vec<Index>,
        primary_key_column_names: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();

        if columns.is_empty() {
            return Err(SchemaError::NoColumns(name));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(SchemaError::DuplicateColumn {
                    table: name,
                    column: column.name().to_string(),
                });
            }
        }

        let mut keyed = HashSet::new();
        for pk in &primary_key_column_names {
            if !seen.contains(pk.as_str()) {
                return Err(SchemaError::UnknownPrimaryKeyColumn {
                    table: name,
                    column: pk.clone(),
                });
            }
            if !keyed.insert(pk.as_str()) {
                return Err(SchemaError::DuplicatePrimaryKeyColumn {
                    table: name,
                    column: pk.clone(),
                });
            }
        }

        for index in &indexes {
            let mut indexed = HashSet::new();
            if let Some(column) = index.column_names().iter().find(|c| !indexed.insert(c.as_str())) {
                return Err(SchemaError::DuplicateIndexColumn {
                    table: name,
                    index: index.name().to_string(),
                    column: column.clone(),
                });
            }
        }

        if let Some(column) = columns
            .iter()
            .find(|c| c.is_primary_key() != primary_key_column_names.iter().any(|pk| pk == c.name()))
        {
            return Err(SchemaError::PrimaryKeyMismatch {
                table: name,
                column: column.name().to_string(),
            });
        }

        Ok(Self {
            name,
            columns,
            indexes,
            primary_key_column_names,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Primary-key column names in key order (empty when the table has none)
    pub fn primary_key_column_names(&self) -> &[String] {
        &self.primary_key_column_names
    }

    /// True when the primary key spans more than one column
    pub fn has_composite_primary_key(&self) -> bool {
        self.primary_key_column_names.len() > 1
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in input order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Violations of the table invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Table '{0}' has no columns")]
    NoColumns(String),

    #[error("Table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("Table '{table}' has primary key column '{column}' which is not a column of the table")]
    UnknownPrimaryKeyColumn { table: String, column: String },

    #[error("Table '{table}' lists primary key column '{column}' more than once")]
    DuplicatePrimaryKeyColumn { table: String, column: String },

    #[error("Index '{index}' on table '{table}' lists column '{column}' more than once")]
    DuplicateIndexColumn { table: String, index: String, column: String },

    #[error("Column '{column}' of table '{table}' disagrees with the table's primary key")]
    PrimaryKeyMismatch { table: String, column: String },
}
