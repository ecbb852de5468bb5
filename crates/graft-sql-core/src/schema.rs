//! Table and column schema definitions.
//!
//! Schemas are declared once, up front, and stay immutable afterwards. The
//! insert builder borrows a [`Table`] to validate column names and conflict
//! targets before any SQL is rendered.

use std::marker::PhantomData;

use crate::value::Value;

/// The SQL type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Integer column.
    Integer,
    /// Floating-point column.
    Real,
    /// Text column.
    Text,
    /// Boolean column.
    Boolean,
    /// Binary column.
    Blob,
}

/// A column definition.
///
/// Built fluently, e.g. `integer("id").primary_key()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    sql_type: SqlType,
    nullable: bool,
    default: Option<Value>,
    primary_key: bool,
    unique: bool,
}

impl Column {
    /// Creates a column with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
        }
    }

    /// Marks the column as part of the primary key.
    ///
    /// Primary key columns are implicitly NOT NULL. Flagging several columns
    /// forms a composite key in declaration order.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Declares a single-column unique constraint on this column.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets a default literal for the column.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the SQL type.
    #[must_use]
    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Returns whether the column is nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the default literal, if any.
    #[must_use]
    pub fn default_literal(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Creates an integer column.
#[must_use]
pub fn integer(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Integer)
}

/// Creates a floating-point column.
#[must_use]
pub fn real(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Real)
}

/// Creates a text column.
#[must_use]
pub fn text(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Text)
}

/// Creates a boolean column.
#[must_use]
pub fn boolean(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Boolean)
}

/// Creates a binary column.
#[must_use]
pub fn blob(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Blob)
}

// Typestate markers

/// Marker: the builder has no columns yet.
#[derive(Debug, Clone, Copy)]
pub struct NoColumns;

/// Marker: the builder has at least one column.
#[derive(Debug, Clone, Copy)]
pub struct HasColumns;

/// Fluent builder for [`Table`].
///
/// `build()` is only available once at least one column has been added.
#[derive(Debug, Clone)]
pub struct TableBuilder<Cols> {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<Vec<String>>,
    unique: Vec<Vec<String>>,
    _state: PhantomData<Cols>,
}

impl TableBuilder<NoColumns> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            unique: Vec::new(),
            _state: PhantomData,
        }
    }
}

impl<Cols> TableBuilder<Cols> {
    /// Adds a column.
    ///
    /// A column flagged `primary_key` joins the table's primary key; one
    /// flagged `unique` declares a single-column unique constraint.
    #[must_use]
    pub fn column(self, column: Column) -> TableBuilder<HasColumns> {
        let mut columns = self.columns;
        let mut primary_key = self.primary_key;
        let mut unique = self.unique;
        if column.primary_key {
            primary_key
                .get_or_insert_with(Vec::new)
                .push(column.name.clone());
        }
        if column.unique {
            unique.push(vec![column.name.clone()]);
        }
        columns.push(column);
        TableBuilder {
            name: self.name,
            columns,
            primary_key,
            unique,
            _state: PhantomData,
        }
    }

    /// Declares the table's primary key over the given columns.
    ///
    /// Replaces any key accumulated from column flags; the given order is the
    /// declaration order used when rendering conflict targets.
    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Declares a unique constraint over the given columns.
    #[must_use]
    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique
            .push(columns.into_iter().map(Into::into).collect());
        self
    }
}

impl TableBuilder<HasColumns> {
    /// Finalizes the table definition.
    #[must_use]
    pub fn build(self) -> Table {
        Table {
            name: self.name,
            columns: self.columns,
            primary_key: self.primary_key,
            unique: self.unique,
        }
    }
}

/// An immutable table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<Vec<String>>,
    unique: Vec<Vec<String>>,
}

impl Table {
    /// Starts building a table with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableBuilder<NoColumns> {
        TableBuilder::new(name)
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns whether a column with the given name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns the primary key columns in declaration order, if a key exists.
    #[must_use]
    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    /// Returns the declared unique constraints.
    #[must_use]
    pub fn unique_constraints(&self) -> &[Vec<String>] {
        &self.unique
    }

    /// Finds the primary-key or unique constraint whose column set equals
    /// `columns`, ignoring order.
    ///
    /// The returned slice is in constraint declaration order, which is the
    /// order conflict targets render in.
    #[must_use]
    pub fn constraint_covering(&self, columns: &[String]) -> Option<&[String]> {
        let same_set = |declared: &[String]| {
            declared.len() == columns.len()
                && declared.iter().all(|c| columns.contains(c))
                && columns.iter().all(|c| declared.contains(c))
        };
        if let Some(pk) = self.primary_key.as_deref() {
            if same_set(pk) {
                return Some(pk);
            }
        }
        self.unique
            .iter()
            .find(|declared| same_set(declared.as_slice()))
            .map(Vec::as_slice)
    }
}

/// Trait implemented by `#[derive(Table)]` structs to expose their schema.
pub trait Schema {
    /// The SQL table name.
    const NAME: &'static str;

    /// Returns the table definition for this type.
    fn table() -> Table;
}
