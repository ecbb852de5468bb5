//! # graft-sql-core
//!
//! An insert/upsert statement builder with dialect-aware conflict resolution.
//!
//! This crate provides:
//! - An immutable table/column schema model with primary-key and unique
//!   constraints
//! - A typestate INSERT builder with `on conflict` / `on duplicate key`
//!   clauses, validated against the schema before any SQL exists
//! - Dialect renderers for PostgreSQL, SQLite, and MySQL, covering both
//!   explicit conflict targets (`excluded.<col>`) and implicit unique-index
//!   resolution (`values(<col>)`)
//!
//! ## Building an upsert
//!
//! ```rust
//! use graft_sql_core::dialect::{Dialect, Mysql, Postgres};
//! use graft_sql_core::expr::{col, excluded};
//! use graft_sql_core::insert::Insert;
//! use graft_sql_core::schema::{integer, Table};
//!
//! let inventory = Table::builder("inventory")
//!     .column(integer("warehouse_id"))
//!     .column(integer("product_id"))
//!     .column(integer("quantity").not_null())
//!     .primary_key(["warehouse_id", "product_id"])
//!     .build();
//!
//! let statement = Insert::into_table(&inventory)
//!     .values([1.into(), 7.into(), 20.into()])
//!     .on_conflict_do_update(["warehouse_id", "product_id"], |u| {
//!         u.set("quantity", col("quantity").add(excluded("quantity")))
//!     })
//!     .build()?;
//!
//! assert_eq!(
//!     Postgres.render_inline(&statement)?,
//!     "insert into inventory (\"warehouse_id\",\"product_id\",\"quantity\") \
//!      values (1,7,20) on conflict (\"warehouse_id\",\"product_id\") \
//!      do update set quantity = quantity + excluded.quantity",
//! );
//! # Ok::<(), graft_sql_core::error::Error>(())
//! ```
//!
//! The same statement renders for MySQL through
//! [`Insert::on_duplicate_key_update`], where the engine resolves the
//! conflicting unique index itself and the rejected row is reachable as
//! `values(<col>)`.
//!
//! ## Validation before rendering
//!
//! A conflict target must be backed by a declared primary-key or unique
//! constraint, and assignments may only name real columns; violations fail at
//! [`Insert::build`] with [`error::Error::Validation`]. Asking a dialect for
//! something it cannot express, such as a filter predicate on MySQL, fails at
//! render time with [`error::Error::UnsupportedFeature`] rather than being
//! silently dropped.

pub mod conflict;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod insert;
pub mod schema;
pub mod value;

pub use conflict::{ConflictAction, ConflictClause, ConflictTarget, DoUpdate};
pub use dialect::{Dialect, Mysql, Postgres, Query, Sqlite};
pub use error::{Error, Result};
pub use expr::{col, excluded, lit, Expr};
pub use insert::{Insert, InsertStatement};
pub use schema::{Column, Schema, SqlType, Table};
pub use value::{IntoValue, Value};
