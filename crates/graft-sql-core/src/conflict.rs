//! Conflict-resolution clauses: targets, actions, and their validation.

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::schema::Table;

/// The column set whose uniqueness violation triggers the conflict path.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    /// The engine resolves the conflicting constraint from declared unique
    /// indexes (MySQL), or the clause applies to any conflict (`do nothing`
    /// without a target).
    Implicit,
    /// An explicit ordered set of columns (PostgreSQL, SQLite).
    Columns(Vec<String>),
}

impl ConflictTarget {
    /// Creates an explicit target over the given columns.
    #[must_use]
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Columns(columns.into_iter().map(Into::into).collect())
    }
}

/// The update half of an upsert: assignments plus an optional row filter.
///
/// Assignments keep insertion order when rendered. The filter restricts which
/// conflicting rows are updated and evaluates against the stored row's
/// pre-assignment values; rejected-row references inside it see the proposed
/// row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoUpdate {
    assignments: Vec<(String, Expr)>,
    filter: Option<Expr>,
}

impl DoUpdate {
    /// Creates an empty update action.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `column` on the conflict path.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    /// Restricts the update to conflicting rows matching `predicate`.
    #[must_use]
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Returns the assignments in insertion order.
    #[must_use]
    pub fn assignments(&self) -> &[(String, Expr)] {
        &self.assignments
    }

    /// Returns the row filter, if any.
    #[must_use]
    pub fn row_filter(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }
}

/// What to do when the insert conflicts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    /// Skip the conflicting row.
    DoNothing,
    /// Update the conflicting row instead.
    DoUpdate(DoUpdate),
}

/// A validated conflict clause attached to an insert statement.
///
/// Only [`ConflictClause::validated`] constructs one, so holding a clause
/// means its target is constraint-backed and its assignments name real
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictClause {
    target: ConflictTarget,
    action: ConflictAction,
}

impl ConflictClause {
    /// Validates `target` and `action` against `table` and builds the clause.
    ///
    /// An explicit target must be covered, as an exact column set, by the
    /// table's primary key or one of its unique constraints; it is then
    /// normalized to that constraint's declaration order. Update assignments
    /// must be non-empty and may only name columns of the table, as may any
    /// column or rejected-row reference inside assignment values and the
    /// filter.
    pub fn validated(table: &Table, target: ConflictTarget, action: ConflictAction) -> Result<Self> {
        let target = match target {
            ConflictTarget::Implicit => ConflictTarget::Implicit,
            ConflictTarget::Columns(columns) => {
                if columns.is_empty() {
                    return Err(Error::validation(
                        "explicit conflict target must name at least one column",
                    ));
                }
                for column in &columns {
                    if !table.has_column(column) {
                        return Err(Error::unknown_column(table.name(), column));
                    }
                }
                let Some(declared) = table.constraint_covering(&columns) else {
                    return Err(Error::validation(format!(
                        "conflict target ({}) is not backed by a primary key or unique \
                         constraint on table {}",
                        columns.join(", "),
                        table.name(),
                    )));
                };
                ConflictTarget::Columns(declared.to_vec())
            }
        };

        if let ConflictAction::DoUpdate(update) = &action {
            if update.assignments.is_empty() {
                return Err(Error::validation(
                    "do update requires at least one assignment",
                ));
            }
            for (column, value) in &update.assignments {
                if !table.has_column(column) {
                    return Err(Error::unknown_column(table.name(), column));
                }
                check_expr_columns(table, value)?;
            }
            if let Some(filter) = &update.filter {
                check_expr_columns(table, filter)?;
            }
        }

        Ok(Self { target, action })
    }

    /// Returns the normalized target.
    #[must_use]
    pub fn target(&self) -> &ConflictTarget {
        &self.target
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &ConflictAction {
        &self.action
    }
}

fn check_expr_columns(table: &Table, expr: &Expr) -> Result<()> {
    let mut unknown = None;
    expr.visit_columns(&mut |name| {
        if unknown.is_none() && !table.has_column(name) {
            unknown = Some(String::from(name));
        }
    });
    match unknown {
        Some(name) => Err(Error::unknown_column(table.name(), &name)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{col, excluded, lit};
    use crate::schema::{integer, text, Table};

    fn users() -> Table {
        Table::builder("users")
            .column(integer("id").primary_key())
            .column(text("name").not_null())
            .column(text("email").unique())
            .build()
    }

    #[test]
    fn pk_target_validates() {
        let clause = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["id"]),
            ConflictAction::DoUpdate(DoUpdate::new().set("name", lit("x"))),
        )
        .expect("primary key target");
        assert_eq!(
            clause.target(),
            &ConflictTarget::Columns(vec![String::from("id")])
        );
    }

    #[test]
    fn unbacked_target_is_rejected() {
        let err = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["name"]),
            ConflictAction::DoNothing,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_target_column_is_rejected() {
        let err = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["uuid"]),
            ConflictAction::DoNothing,
        )
        .unwrap_err();
        assert_eq!(err, Error::unknown_column("users", "uuid"));
    }

    #[test]
    fn composite_target_normalizes_to_declaration_order() {
        let inventory = Table::builder("inventory")
            .column(integer("warehouse_id"))
            .column(integer("product_id"))
            .column(integer("quantity").not_null())
            .primary_key(["warehouse_id", "product_id"])
            .build();
        let clause = ConflictClause::validated(
            &inventory,
            ConflictTarget::columns(["product_id", "warehouse_id"]),
            ConflictAction::DoUpdate(DoUpdate::new().set("quantity", excluded("quantity"))),
        )
        .expect("composite key target");
        assert_eq!(
            clause.target(),
            &ConflictTarget::Columns(vec![
                String::from("warehouse_id"),
                String::from("product_id")
            ])
        );
    }

    #[test]
    fn assignment_to_unknown_column_is_rejected() {
        let err = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["id"]),
            ConflictAction::DoUpdate(DoUpdate::new().set("nickname", lit("x"))),
        )
        .unwrap_err();
        assert_eq!(err, Error::unknown_column("users", "nickname"));
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["id"]),
            ConflictAction::DoUpdate(DoUpdate::new()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn filter_columns_are_checked() {
        let err = ConflictClause::validated(
            &users(),
            ConflictTarget::columns(["id"]),
            ConflictAction::DoUpdate(
                DoUpdate::new()
                    .set("name", lit("x"))
                    .filter(col("missing").eq(lit(1))),
            ),
        )
        .unwrap_err();
        assert_eq!(err, Error::unknown_column("users", "missing"));
    }
}
