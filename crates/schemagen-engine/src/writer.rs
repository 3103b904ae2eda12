//! DDL rendering for one table
//!
//! Output is byte-stable for a given [`Table`]: columns are sorted
//! primary-key first and then by name, and names and datatypes are padded
//! so that the constraint suffixes line up.
//!
//! ```text
//! CREATE TABLE widgets
//! (
//!     id   INTEGER NOT NULL PRIMARY KEY,
//!     name TEXT    NOT NULL
//! );
//!
//! CREATE UNIQUE INDEX widgets_name_idx ON widgets (name);
//!
//! ```

use schemagen_core::{Column, Table};
use std::io::{self, Write};

const INDENT: &str = "    ";

/// Writes `CREATE TABLE` / `CREATE INDEX` statements to a sink
pub struct TableWriter<W: Write> {
    output: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    /// Write the table block, its indexes, and a trailing blank line
    pub fn output_table(&mut self, table: &Table) -> io::Result<()> {
        writeln!(self.output, "CREATE TABLE {}", table.name())?;
        writeln!(self.output, "(")?;
        writeln!(self.output, "{}", format_columns(table))?;
        writeln!(self.output, ");")?;
        self.output_indexes(table)?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Give back the underlying sink
    pub fn into_inner(self) -> W {
        self.output
    }

    fn output_indexes(&mut self, table: &Table) -> io::Result<()> {
        for index in table.indexes() {
            writeln!(self.output)?;
            write!(self.output, "CREATE ")?;
            if index.unique() {
                write!(self.output, "UNIQUE ")?;
            }
            write!(
                self.output,
                "INDEX {} ON {} ({})",
                index.name(),
                table.name(),
                index.column_names().join(", ")
            )?;
            if let Some(condition) = index.condition() {
                write!(self.output, " {}", condition)?;
            }
            writeln!(self.output, ";")?;
        }
        Ok(())
    }
}

/// Column definitions joined with `,\n`, plus the composite key line if any
fn format_columns(table: &Table) -> String {
    let has_composite_primary_key = table.has_composite_primary_key();
    let mut definitions = column_definitions(table.columns(), has_composite_primary_key);

    if has_composite_primary_key {
        definitions.push(format!(
            "{}PRIMARY KEY ({})",
            INDENT,
            table.primary_key_column_names().join(", ")
        ));
    }

    definitions.join(",\n")
}

fn column_definitions(columns: &[Column], has_composite_primary_key: bool) -> Vec<String> {
    let name_width = columns.iter().map(|c| c.name().chars().count()).max().unwrap_or(0);
    let datatype_width = columns.iter().map(|c| c.datatype().chars().count()).max().unwrap_or(0);

    let mut sorted: Vec<&Column> = columns.iter().collect();
    sorted.sort_by_key(|c| (!c.is_primary_key(), c.name()));

    sorted
        .into_iter()
        .map(|c| {
            let mut definition = format!(
                "{:<name_width$} {:<datatype_width$}",
                c.name(),
                c.datatype(),
            );

            if !c.nullable() {
                definition.push_str(" NOT NULL");
            }
            if c.is_primary_key() && !has_composite_primary_key {
                definition.push_str(" PRIMARY KEY");
            }

            format!("{}{}", INDENT, definition.trim_end())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemagen_core::Index;

    fn render(table: &Table) -> String {
        let mut writer = TableWriter::new(Vec::new());
        writer.output_table(table).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn widgets(indexes: Vec<Index>) -> Table {
        Table::new(
            "widgets",
            vec![
                Column::new("name", "TEXT", false, false),
                Column::new("id", "INTEGER", false, true),
            ],
            indexes,
            vec!["id".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn renders_simple_table() {
        assert_eq!(
            render(&widgets(vec![])),
            "CREATE TABLE widgets\n\
             (\n\
             \x20   id   INTEGER NOT NULL PRIMARY KEY,\n\
             \x20   name TEXT    NOT NULL\n\
             );\n\
             \n"
        );
    }

    #[test]
    fn renders_indexes_in_configured_column_order() {
        let table = widgets(vec![
            Index::new("widgets_name_idx", vec!["name".to_string()], true, None),
            Index::new(
                "widgets_name_id_idx",
                vec!["name".to_string(), "id".to_string()],
                false,
                Some("WHERE name <> ''".to_string()),
            ),
        ]);

        let expected = "\
CREATE TABLE widgets
(
    id   INTEGER NOT NULL PRIMARY KEY,
    name TEXT    NOT NULL
);

CREATE UNIQUE INDEX widgets_name_idx ON widgets (name);

CREATE INDEX widgets_name_id_idx ON widgets (name, id) WHERE name <> '';

";
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn composite_primary_key_is_a_trailing_definition() {
        let table = Table::new(
            "topic_users",
            vec![
                Column::new("notes", "TEXT", true, false),
                Column::new("user_id", "INTEGER", false, true),
                Column::new("topic_id", "INTEGER", false, true),
                Column::new("last_read_at", "DATETIME", true, false),
            ],
            vec![],
            vec!["user_id".to_string(), "topic_id".to_string()],
        )
        .unwrap();

        let expected = "\
CREATE TABLE topic_users
(
    topic_id     INTEGER  NOT NULL,
    user_id      INTEGER  NOT NULL,
    last_read_at DATETIME,
    notes        TEXT,
    PRIMARY KEY (user_id, topic_id)
);

";
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn table_without_primary_key() {
        let table = Table::new(
            "events",
            vec![
                Column::new("payload", "JSONB", true, false),
                Column::new("created_at", "DATETIME", false, false),
            ],
            vec![],
            vec![],
        )
        .unwrap();

        let expected = "\
CREATE TABLE events
(
    created_at DATETIME NOT NULL,
    payload    JSONB
);

";
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn suffixes_start_at_the_same_offset() {
        let table = Table::new(
            "users",
            vec![
                Column::new("id", "INTEGER", false, true),
                Column::new("username", "TEXT", false, false),
                Column::new("admin", "BOOLEAN", false, false),
                Column::new("created_at", "DATETIME", false, false),
            ],
            vec![],
            vec!["id".to_string()],
        )
        .unwrap();

        let output = render(&table);
        let offsets: Vec<usize> = output
            .lines()
            .filter_map(|line| line.find("NOT NULL"))
            .collect();

        assert_eq!(offsets.len(), 4);
        assert!(offsets.iter().all(|&o| o == offsets[0]));
    }
}
