//! MySQL dialect.

use super::Dialect;

/// The MySQL dialect: conflict detection is implicit in the table's unique
/// indexes, rejected-row references render as `values(<col>)`, identifiers
/// quote with backticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mysql;

impl Mysql {
    /// Creates the MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for Mysql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn supports_conflict_target(&self) -> bool {
        false
    }

    fn rejected_row_reference(&self, column: &str) -> String {
        format!("values({column})")
    }
}
