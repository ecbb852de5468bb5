//! INSERT statement builder using the typestate pattern.
//!
//! The builder borrows an immutable [`Table`] schema and defers all
//! validation to [`Insert::build`], which either yields a fully validated
//! [`InsertStatement`] or fails before any SQL text exists.

use std::marker::PhantomData;

use crate::conflict::{ConflictAction, ConflictClause, ConflictTarget, DoUpdate};
use crate::error::{Error, Result};
use crate::schema::Table;
use crate::value::{IntoValue, Value};

// Typestate markers

/// Marker: no row values yet.
pub struct NoValues;
/// Marker: at least one row of values.
pub struct HasValues;

/// An INSERT statement builder bound to a table schema.
///
/// # Example
///
/// ```rust
/// use graft_sql_core::dialect::{Dialect, Postgres};
/// use graft_sql_core::expr::lit;
/// use graft_sql_core::insert::Insert;
/// use graft_sql_core::schema::{integer, text, Table};
///
/// let users = Table::builder("users")
///     .column(integer("id").primary_key())
///     .column(text("name").not_null())
///     .build();
///
/// let statement = Insert::into_table(&users)
///     .columns(["id", "name"])
///     .values([1.into(), "John".into()])
///     .on_conflict_do_update(["id"], |u| u.set("name", lit("Super John")))
///     .build()?;
///
/// assert_eq!(
///     Postgres.render_inline(&statement)?,
///     "insert into users (\"id\",\"name\") values (1,'John') \
///      on conflict (\"id\") do update set name = 'Super John'",
/// );
/// # Ok::<(), graft_sql_core::error::Error>(())
/// ```
pub struct Insert<'t, Vals> {
    table: &'t Table,
    columns: Option<Vec<String>>,
    rows: Vec<Vec<Value>>,
    target: ConflictTarget,
    action: Option<ConflictAction>,
    _state: PhantomData<Vals>,
}

impl<'t> Insert<'t, NoValues> {
    /// Starts building an insert into `table`.
    ///
    /// Without an explicit column list, all table columns are used in
    /// declaration order.
    #[must_use]
    pub fn into_table(table: &'t Table) -> Self {
        Self {
            table,
            columns: None,
            rows: Vec::new(),
            target: ConflictTarget::Implicit,
            action: None,
            _state: PhantomData,
        }
    }

    /// Restricts the insert to the given columns, in the given order.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one row of values.
    #[must_use]
    pub fn values<I>(self, row: I) -> Insert<'t, HasValues>
    where
        I: IntoIterator<Item = Value>,
    {
        self.values_many([row])
    }

    /// Adds several rows of values, preserving order.
    #[must_use]
    pub fn values_many<R, I>(self, rows: R) -> Insert<'t, HasValues>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = Value>,
    {
        Insert {
            table: self.table,
            columns: self.columns,
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().collect())
                .collect(),
            target: self.target,
            action: self.action,
            _state: PhantomData,
        }
    }
}

impl<'t> Insert<'t, HasValues> {
    /// Adds another row of values.
    #[must_use]
    pub fn and_values<I>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.rows.push(row.into_iter().collect());
        self
    }

    /// On any conflict, skips the conflicting row.
    ///
    /// Renders `on conflict do nothing` on explicit-target dialects and the
    /// engine's skip idiom on MySQL.
    #[must_use]
    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.target = ConflictTarget::Implicit;
        self.action = Some(ConflictAction::DoNothing);
        self
    }

    /// On a conflict over `target` columns, skips the conflicting row.
    #[must_use]
    pub fn on_conflict_do_nothing_on<I, S>(mut self, target: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target = ConflictTarget::columns(target);
        self.action = Some(ConflictAction::DoNothing);
        self
    }

    /// On a conflict over `target` columns, updates the conflicting row.
    ///
    /// `update` receives an empty [`DoUpdate`] and declares the assignments
    /// and optional filter. Explicit-target dialects only.
    #[must_use]
    pub fn on_conflict_do_update<I, S, F>(mut self, target: I, update: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(DoUpdate) -> DoUpdate,
    {
        self.target = ConflictTarget::columns(target);
        self.action = Some(ConflictAction::DoUpdate(update(DoUpdate::new())));
        self
    }

    /// On a duplicate key, updates the conflicting row; the engine resolves
    /// which constraint conflicted. Implicit-target dialect (MySQL).
    #[must_use]
    pub fn on_duplicate_key_update<F>(mut self, update: F) -> Self
    where
        F: FnOnce(DoUpdate) -> DoUpdate,
    {
        self.target = ConflictTarget::Implicit;
        self.action = Some(ConflictAction::DoUpdate(update(DoUpdate::new())));
        self
    }

    /// Validates the statement against the table schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when an insert column is unknown, a row's
    /// arity differs from the column list, no rows were supplied, the conflict
    /// target is not constraint-backed, or a conflict assignment is invalid.
    pub fn build(self) -> Result<InsertStatement> {
        let columns = match self.columns {
            Some(columns) => {
                for column in &columns {
                    if !self.table.has_column(column) {
                        return Err(Error::unknown_column(self.table.name(), column));
                    }
                }
                columns
            }
            None => self.table.column_names(),
        };
        if columns.is_empty() {
            return Err(Error::validation("insert requires at least one column"));
        }
        if self.rows.is_empty() {
            return Err(Error::validation("insert requires at least one row"));
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::validation(format!(
                    "row {index} has {} values but {} columns were named",
                    row.len(),
                    columns.len(),
                )));
            }
        }

        let conflict = self
            .action
            .map(|action| ConflictClause::validated(self.table, self.target, action))
            .transpose()?;

        Ok(InsertStatement {
            table_name: String::from(self.table.name()),
            primary_key: self.table.primary_key().map(<[String]>::to_vec),
            columns,
            rows: self.rows,
            conflict,
        })
    }
}

/// A validated, immutable insert statement ready for rendering.
///
/// Holds its own copies of the schema details it needs, so it outlives the
/// builder and can be rendered for several dialects.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    table_name: String,
    primary_key: Option<Vec<String>>,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    conflict: Option<ConflictClause>,
}

impl InsertStatement {
    /// Returns the target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the table's primary key columns, if one was declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    /// Returns the insert columns in rendering order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows in rendering order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the conflict clause, if any.
    #[must_use]
    pub fn conflict(&self) -> Option<&ConflictClause> {
        self.conflict.as_ref()
    }
}
