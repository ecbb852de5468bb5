//! Shared schema fixtures for integration tests.

#![allow(dead_code)]

use graft_sql_core::schema::{integer, text, Table};

/// `users(id PK, name, email UNIQUE)`
pub fn users() -> Table {
    Table::builder("users")
        .column(integer("id").primary_key())
        .column(text("name").not_null())
        .column(text("email").unique())
        .build()
}

/// `inventory(warehouse_id, product_id, quantity)` with a composite primary
/// key over `(warehouse_id, product_id)`.
pub fn inventory() -> Table {
    Table::builder("inventory")
        .column(integer("warehouse_id"))
        .column(integer("product_id"))
        .column(integer("quantity").not_null())
        .primary_key(["warehouse_id", "product_id"])
        .build()
}
