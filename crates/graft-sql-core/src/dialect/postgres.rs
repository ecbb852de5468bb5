//! PostgreSQL dialect.

use super::Dialect;

/// The PostgreSQL dialect: explicit conflict targets, `excluded.<col>`
/// rejected-row references, `$n` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct Postgres;

impl Postgres {
    /// Creates the PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata() {
        let dialect = Postgres::new();
        assert_eq!(dialect.name(), "postgres");
        assert_eq!(dialect.identifier_quote(), '"');
        assert_eq!(dialect.placeholder(3), "$3");
        assert!(dialect.supports_conflict_target());
        assert_eq!(dialect.rejected_row_reference("qty"), "excluded.qty");
        assert_eq!(dialect.quote_identifier("id"), "\"id\"");
    }
}
