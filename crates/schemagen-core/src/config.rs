//! Table configuration (intermediate_db.toml)
//!
//! Maps each exported table name to how its schema is obtained: either by
//! introspecting the live database, or from columns declared right here
//! (a "virtual" table). Both kinds carry their secondary indexes.
//!
//! ```toml
//! [tables.users]
//! indexes = [{ name = "users_email_idx", columns = "email", unique = true }]
//!
//! [tables.widgets]
//! virtual = true
//! primary_key = "id"
//! extend = [
//!     { name = "id", type = "integer" },
//!     { name = "label", type = "string", is_null = true },
//! ]
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// A column declared by a virtual table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnConfig {
    /// Column name
    pub name: String,

    /// Source type name (e.g. `integer`, `string`, `datetime`)
    #[serde(rename = "type")]
    pub column_type: String,

    /// Whether NULL is allowed
    #[serde(default)]
    pub is_null: bool,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            is_null: false,
        }
    }

    /// Allow NULL values
    pub fn nullable(mut self) -> Self {
        self.is_null = true;
        self
    }
}

/// A secondary index declared for a table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexConfig {
    /// Index name
    pub name: String,

    /// Indexed columns in index order; a bare string is a single column
    #[serde(deserialize_with = "one_or_many")]
    pub columns: Vec<String>,

    #[serde(default)]
    pub unique: bool,

    /// Partial-index predicate, emitted verbatim (e.g. `WHERE deleted_at IS NULL`)
    #[serde(default)]
    pub condition: Option<String>,
}

impl IndexConfig {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            condition: None,
        }
    }

    /// Mark the index unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Make the index partial
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Where a table's columns come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Introspect the live database
    Database,

    /// Use the declared columns and primary key verbatim
    Virtual {
        primary_key: Vec<String>,
        columns: Vec<ColumnConfig>,
    },
}

/// Extraction settings for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub source: TableSource,
    pub indexes: Vec<IndexConfig>,
}

impl TableConfig {
    /// A table introspected from the database
    pub fn database() -> Self {
        Self {
            source: TableSource::Database,
            indexes: Vec::new(),
        }
    }

    /// A table synthesized from configuration
    pub fn virtual_table<I, S>(primary_key: I, columns: Vec<ColumnConfig>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: TableSource::Virtual {
                primary_key: primary_key.into_iter().map(Into::into).collect(),
                columns,
            },
            indexes: Vec::new(),
        }
    }

    /// Attach an index
    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.source, TableSource::Virtual { .. })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Exported tables, iterated in name order
    pub tables: BTreeMap<String, TableConfig>,
}

impl Config {
    /// Load config from a file; `.json` files are read as JSON, anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_toml(&contents)
        }
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load config from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Add or replace a table
    pub fn with_table(mut self, name: impl Into<String>, table: TableConfig) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Names of tables that must exist in the database
    pub fn database_table_names(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|(_, table)| !table.is_virtual())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Check identifiers and the shape of virtual tables and indexes
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, table) in &self.tables {
            check_identifier(name, "table", name)?;

            if let TableSource::Virtual { primary_key, columns } = &table.source {
                if columns.is_empty() {
                    return Err(invalid(name, "virtual table declares no columns"));
                }

                let mut seen = HashSet::new();
                for column in columns {
                    check_identifier(name, "column", &column.name)?;
                    if !seen.insert(column.name.as_str()) {
                        return Err(invalid(name, format!("column '{}' is declared twice", column.name)));
                    }
                }

                let mut keyed = HashSet::new();
                for pk in primary_key {
                    if !seen.contains(pk.as_str()) {
                        return Err(invalid(name, format!("primary key column '{}' is not declared", pk)));
                    }
                    if !keyed.insert(pk.as_str()) {
                        return Err(invalid(name, format!("primary key column '{}' is listed twice", pk)));
                    }
                }
            }

            for index in &table.indexes {
                check_identifier(name, "index", &index.name)?;
                if index.columns.is_empty() {
                    return Err(invalid(name, format!("index '{}' has no columns", index.name)));
                }

                let mut indexed = HashSet::new();
                for column in &index.columns {
                    check_identifier(name, "column", column)?;
                    if !indexed.insert(column.as_str()) {
                        return Err(invalid(
                            name,
                            format!("index '{}' lists column '{}' twice", index.name, column),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let tables = raw
            .tables
            .into_iter()
            .map(|(name, table)| table.into_config(&name).map(|config| (name, config)))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

        let config = Self { tables };
        config.validate()?;
        Ok(config)
    }
}

/// On-disk shape of the config file
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    tables: BTreeMap<String, RawTableConfig>,
}

#[derive(Debug, Deserialize)]
struct RawTableConfig {
    #[serde(default, rename = "virtual")]
    is_virtual: bool,

    #[serde(default)]
    extend: Option<Vec<ColumnConfig>>,

    #[serde(default, deserialize_with = "optional_one_or_many")]
    primary_key: Option<Vec<String>>,

    #[serde(default)]
    indexes: Vec<IndexConfig>,
}

impl RawTableConfig {
    fn into_config(self, table: &str) -> Result<TableConfig, ConfigError> {
        let source = if self.is_virtual {
            let primary_key = self.primary_key.ok_or_else(|| ConfigError::Malformed {
                table: table.to_string(),
                field: "primary_key",
            })?;
            let columns = self.extend.ok_or_else(|| ConfigError::Malformed {
                table: table.to_string(),
                field: "extend",
            })?;
            TableSource::Virtual { primary_key, columns }
        } else {
            TableSource::Database
        };

        Ok(TableConfig {
            source,
            indexes: self.indexes,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    OneOrMany::deserialize(deserializer).map(Into::into)
}

fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OneOrMany>::deserialize(deserializer).map(|value| value.map(Into::into))
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("valid identifier regex"))
}

fn check_identifier(table: &str, kind: &str, value: &str) -> Result<(), ConfigError> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(invalid(table, format!("invalid {} name '{}'", kind, value)))
    }
}

fn invalid(table: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        table: table.to_string(),
        reason: reason.into(),
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Table '{table}' is virtual but has no '{field}'")]
    Malformed { table: String, field: &'static str },

    #[error("Invalid configuration for table '{table}': {reason}")]
    Invalid { table: String, reason: String },
}
