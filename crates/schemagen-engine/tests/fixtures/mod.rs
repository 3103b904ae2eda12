//! Test fixtures for generator integration tests
//!
//! A small forum-like database (users, posts, topic_users) plus a
//! configuration that mixes database-backed and virtual tables.

#![allow(dead_code)]

use schemagen_catalog::{IntrospectedColumn, MockCatalog, MockCatalogBuilder, MockTable};
use schemagen_core::{ColumnConfig, Config, IndexConfig, TableConfig};

/// Users table with a simple primary key and an inet column
pub fn users_table() -> MockTable {
    MockTable::new(vec![
        IntrospectedColumn::new("id", "integer"),
        IntrospectedColumn::new("username", "string"),
        IntrospectedColumn::new("admin", "boolean"),
        IntrospectedColumn::new("ip_address", "inet").with_nullable(true),
        IntrospectedColumn::new("created_at", "datetime"),
    ])
    .with_primary_key(["id"])
}

/// Posts table with a soft-delete column
pub fn posts_table() -> MockTable {
    MockTable::new(vec![
        IntrospectedColumn::new("id", "integer"),
        IntrospectedColumn::new("user_id", "integer").with_nullable(true),
        IntrospectedColumn::new("raw", "text"),
        IntrospectedColumn::new("deleted_at", "datetime").with_nullable(true),
    ])
    .with_primary_key(["id"])
}

/// Join table with a composite primary key
pub fn topic_users_table() -> MockTable {
    MockTable::new(vec![
        IntrospectedColumn::new("user_id", "integer"),
        IntrospectedColumn::new("topic_id", "integer"),
        IntrospectedColumn::new("last_read_post_number", "integer").with_nullable(true),
    ])
    .with_primary_key(["user_id", "topic_id"])
}

/// Catalog holding every fixture table
pub fn forum_catalog() -> MockCatalog {
    MockCatalogBuilder::new()
        .with_table("users", users_table())
        .with_table("posts", posts_table())
        .with_table("topic_users", topic_users_table())
        .build()
}

/// Configuration exporting every fixture table plus a virtual one
pub fn forum_config() -> Config {
    Config::default()
        .with_table(
            "users",
            TableConfig::database()
                .with_index(IndexConfig::new("users_username_idx", ["username"]).unique()),
        )
        .with_table(
            "posts",
            TableConfig::database().with_index(
                IndexConfig::new("posts_user_id_idx", ["user_id", "id"])
                    .with_condition("WHERE deleted_at IS NULL"),
            ),
        )
        .with_table("topic_users", TableConfig::database())
        .with_table(
            "log_entries",
            TableConfig::virtual_table(
                ["created_at", "type"],
                vec![
                    ColumnConfig::new("created_at", "datetime"),
                    ColumnConfig::new("type", "string"),
                    ColumnConfig::new("message", "text"),
                    ColumnConfig::new("context", "json").nullable(),
                ],
            ),
        )
}
