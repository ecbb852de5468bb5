//! SQLite dialect.

use super::Dialect;

/// The SQLite dialect: explicit conflict targets like PostgreSQL, `?`
/// placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Sqlite {
    /// Creates the SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
