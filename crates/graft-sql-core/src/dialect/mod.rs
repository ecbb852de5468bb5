//! SQL dialect support and statement rendering.
//!
//! Rendering is a pure transform from a validated [`InsertStatement`] to SQL
//! text. The [`Dialect`] trait carries the per-database knobs (identifier
//! quoting, placeholder style, conflict-clause shape, rejected-row reference
//! syntax) and default methods do the dialect-independent assembly, in the
//! same spirit as a migration dialect generating DDL from shared defaults.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::Mysql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use crate::conflict::{ConflictAction, ConflictClause, ConflictTarget};
use crate::error::{Error, Result};
use crate::expr::{Expr, UnaryOp};
use crate::insert::InsertStatement;
use crate::value::Value;

/// A rendered statement: SQL text plus its ordered bound parameters.
///
/// Execution against a live connection is the caller's concern; this crate
/// stops at text generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The SQL text, with dialect-style placeholders.
    pub sql: String,
    /// Bound parameters in placeholder order.
    pub params: Vec<Value>,
}

enum Params {
    Inline,
    Bound(Vec<Value>),
}

/// Accumulates SQL text and bound parameters during rendering.
pub struct SqlWriter {
    sql: String,
    params: Params,
}

impl SqlWriter {
    fn inline() -> Self {
        Self {
            sql: String::new(),
            params: Params::Inline,
        }
    }

    fn bound() -> Self {
        Self {
            sql: String::new(),
            params: Params::Bound(Vec::new()),
        }
    }

    /// Appends raw SQL text.
    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a value, either as an inline literal or as the dialect's next
    /// positional placeholder.
    pub fn push_value<D: Dialect + ?Sized>(&mut self, dialect: &D, value: &Value) {
        if let Params::Bound(params) = &mut self.params {
            params.push(value.clone());
            let placeholder = dialect.placeholder(params.len());
            self.sql.push_str(&placeholder);
        } else {
            self.sql.push_str(&value.to_inline_sql());
        }
    }

    fn into_query(self) -> Query {
        let params = match self.params {
            Params::Inline => Vec::new(),
            Params::Bound(params) => params,
        };
        Query {
            sql: self.sql,
            params,
        }
    }
}

/// Dialect-specific behavior for insert/upsert rendering.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (`"` for standard SQL,
    /// `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        String::from("?")
    }

    /// Whether the dialect takes an explicit conflict target
    /// (`on conflict (...)`) rather than resolving it from unique indexes.
    fn supports_conflict_target(&self) -> bool {
        true
    }

    /// Renders a reference to the rejected row's value for `column`.
    fn rejected_row_reference(&self, column: &str) -> String {
        format!("excluded.{column}")
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{name}{quote}")
    }

    /// Renders the statement with positional placeholders and returns the SQL
    /// together with its ordered bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeature`] when the statement asks for
    /// something this dialect cannot express. No SQL is returned on error.
    fn render(&self, statement: &InsertStatement) -> Result<Query> {
        let mut writer = SqlWriter::bound();
        render_statement(self, statement, &mut writer)?;
        let query = writer.into_query();
        tracing::debug!(dialect = self.name(), sql = %query.sql, "rendered insert statement");
        Ok(query)
    }

    /// Renders the statement with literals inlined.
    ///
    /// Useful for logs and assertions; drivers should prefer [`render`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`render`].
    ///
    /// [`render`]: Dialect::render
    fn render_inline(&self, statement: &InsertStatement) -> Result<String> {
        let mut writer = SqlWriter::inline();
        render_statement(self, statement, &mut writer)?;
        let query = writer.into_query();
        tracing::debug!(dialect = self.name(), sql = %query.sql, "rendered insert statement");
        Ok(query.sql)
    }

    /// Renders the conflict clause.
    ///
    /// The default keys off [`supports_conflict_target`]: explicit-target
    /// dialects get `on conflict ... do ...`, implicit ones get
    /// `on duplicate key update ...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeature`] for constructs the dialect
    /// cannot express.
    ///
    /// [`supports_conflict_target`]: Dialect::supports_conflict_target
    fn conflict_clause(
        &self,
        statement: &InsertStatement,
        clause: &ConflictClause,
        writer: &mut SqlWriter,
    ) -> Result<()> {
        if self.supports_conflict_target() {
            explicit_conflict_clause(self, clause, writer)
        } else {
            implicit_conflict_clause(self, statement, clause, writer)
        }
    }
}

fn render_statement<D: Dialect + ?Sized>(
    dialect: &D,
    statement: &InsertStatement,
    writer: &mut SqlWriter,
) -> Result<()> {
    writer.push("insert into ");
    writer.push(statement.table_name());
    writer.push(" (");
    for (i, column) in statement.columns().iter().enumerate() {
        if i > 0 {
            writer.push(",");
        }
        writer.push(&dialect.quote_identifier(column));
    }
    writer.push(") values ");
    for (i, row) in statement.rows().iter().enumerate() {
        if i > 0 {
            writer.push(", ");
        }
        writer.push("(");
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                writer.push(",");
            }
            writer.push_value(dialect, value);
        }
        writer.push(")");
    }
    if let Some(clause) = statement.conflict() {
        writer.push(" ");
        dialect.conflict_clause(statement, clause, writer)?;
    }
    Ok(())
}

/// `on conflict [(target)] do nothing | do update set ... [where ...]`
fn explicit_conflict_clause<D: Dialect + ?Sized>(
    dialect: &D,
    clause: &ConflictClause,
    writer: &mut SqlWriter,
) -> Result<()> {
    writer.push("on conflict");
    match clause.target() {
        ConflictTarget::Columns(columns) => {
            writer.push(" (");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    writer.push(",");
                }
                writer.push(&dialect.quote_identifier(column));
            }
            writer.push(")");
        }
        ConflictTarget::Implicit => {
            // DO UPDATE requires a target on these dialects; a bare
            // `on conflict do nothing` is fine.
            if matches!(clause.action(), ConflictAction::DoUpdate(_)) {
                return Err(Error::UnsupportedFeature {
                    dialect: dialect.name(),
                    feature: "do update without an explicit conflict target",
                });
            }
        }
    }
    match clause.action() {
        ConflictAction::DoNothing => writer.push(" do nothing"),
        ConflictAction::DoUpdate(update) => {
            writer.push(" do update set ");
            for (i, (column, value)) in update.assignments().iter().enumerate() {
                if i > 0 {
                    writer.push(", ");
                }
                writer.push(column);
                writer.push(" = ");
                render_expr(dialect, value, writer);
            }
            if let Some(filter) = update.row_filter() {
                writer.push(" where ");
                render_expr(dialect, filter, writer);
            }
        }
    }
    Ok(())
}

/// `on duplicate key update ...`, with the engine picking the conflicting
/// unique index. `do nothing` becomes the self-assignment idiom.
fn implicit_conflict_clause<D: Dialect + ?Sized>(
    dialect: &D,
    statement: &InsertStatement,
    clause: &ConflictClause,
    writer: &mut SqlWriter,
) -> Result<()> {
    if matches!(clause.target(), ConflictTarget::Columns(_)) {
        return Err(Error::UnsupportedFeature {
            dialect: dialect.name(),
            feature: "explicit conflict target",
        });
    }
    match clause.action() {
        ConflictAction::DoNothing => {
            // Self-assign a key column so the conflicting row is left as is.
            let column = statement
                .primary_key()
                .and_then(|pk| pk.first())
                .or_else(|| statement.columns().first())
                .map(String::as_str)
                .unwrap_or_default();
            writer.push("on duplicate key update ");
            writer.push(column);
            writer.push(" = ");
            writer.push(column);
        }
        ConflictAction::DoUpdate(update) => {
            if update.row_filter().is_some() {
                return Err(Error::UnsupportedFeature {
                    dialect: dialect.name(),
                    feature: "filter predicate on the conflict update",
                });
            }
            writer.push("on duplicate key update ");
            for (i, (column, value)) in update.assignments().iter().enumerate() {
                if i > 0 {
                    writer.push(", ");
                }
                writer.push(column);
                writer.push(" = ");
                render_expr(dialect, value, writer);
            }
        }
    }
    Ok(())
}

fn render_expr<D: Dialect + ?Sized>(dialect: &D, expr: &Expr, writer: &mut SqlWriter) {
    match expr {
        Expr::Value(value) => writer.push_value(dialect, value),
        Expr::Column(name) => writer.push(name),
        Expr::Excluded(name) => writer.push(&dialect.rejected_row_reference(name)),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => {
            writer.push("not ");
            render_operand(dialect, operand, writer, expr.precedence(), false);
        }
        Expr::Binary { left, op, right } => {
            render_operand(dialect, left, writer, op.precedence(), false);
            writer.push(" ");
            writer.push(op.as_sql());
            writer.push(" ");
            render_operand(
                dialect,
                right,
                writer,
                op.precedence(),
                op.right_associative_sensitive(),
            );
        }
    }
}

fn render_operand<D: Dialect + ?Sized>(
    dialect: &D,
    operand: &Expr,
    writer: &mut SqlWriter,
    parent_precedence: u8,
    parenthesize_at_equal: bool,
) {
    let precedence = operand.precedence();
    let needs_parens =
        precedence < parent_precedence || (parenthesize_at_equal && precedence == parent_precedence);
    if needs_parens {
        writer.push("(");
        render_expr(dialect, operand, writer);
        writer.push(")");
    } else {
        render_expr(dialect, operand, writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{col, excluded, lit};
    use crate::insert::Insert;
    use crate::schema::{integer, text, Table};

    fn users() -> Table {
        Table::builder("users")
            .column(integer("id").primary_key())
            .column(text("name").not_null())
            .build()
    }

    fn expr_sql<D: Dialect>(dialect: &D, expr: &Expr) -> String {
        let mut writer = SqlWriter::inline();
        render_expr(dialect, expr, &mut writer);
        writer.into_query().sql
    }

    #[test]
    fn expr_precedence_parenthesizes_lower_levels() {
        let e = col("a").add(col("b")).mul(col("c"));
        assert_eq!(expr_sql(&Postgres, &e), "(a + b) * c");

        let e = col("a").mul(col("b")).add(col("c"));
        assert_eq!(expr_sql(&Postgres, &e), "a * b + c");
    }

    #[test]
    fn expr_non_commutative_right_operand() {
        let e = col("a").sub(col("b").sub(col("c")));
        assert_eq!(expr_sql(&Postgres, &e), "a - (b - c)");

        let e = col("a").sub(col("b")).sub(col("c"));
        assert_eq!(expr_sql(&Postgres, &e), "a - b - c");
    }

    #[test]
    fn expr_logic_and_comparisons() {
        let e = col("a").eq(lit(1)).and(col("b").gt(lit(2)).or(col("c").lt(lit(3))));
        assert_eq!(expr_sql(&Postgres, &e), "a = 1 and (b > 2 or c < 3)");

        // `not` binds looser than comparison, so no parentheses are needed.
        let e = col("a").eq(lit(1)).not();
        assert_eq!(expr_sql(&Postgres, &e), "not a = 1");

        // ...but an `and` under `not` keeps them.
        let e = col("a").eq(lit(1)).and(col("b").eq(lit(2))).not();
        assert_eq!(expr_sql(&Postgres, &e), "not (a = 1 and b = 2)");
    }

    #[test]
    fn rejected_row_reference_is_dialect_specific() {
        let e = excluded("quantity");
        assert_eq!(expr_sql(&Postgres, &e), "excluded.quantity");
        assert_eq!(expr_sql(&Sqlite, &e), "excluded.quantity");
        assert_eq!(expr_sql(&Mysql, &e), "values(quantity)");
    }

    #[test]
    fn bound_rendering_collects_params_in_text_order() {
        let table = users();
        let statement = Insert::into_table(&table)
            .values([Value::Int(1), Value::Text(String::from("John"))])
            .on_conflict_do_update(["id"], |u| {
                u.set("name", lit("Super John"))
                    .filter(col("name").not_eq(lit("locked")))
            })
            .build()
            .expect("valid upsert");
        let query = Postgres.render(&statement).expect("renderable");
        assert_eq!(
            query.sql,
            "insert into users (\"id\",\"name\") values ($1,$2) \
             on conflict (\"id\") do update set name = $3 where name <> $4"
        );
        assert_eq!(
            query.params,
            vec![
                Value::Int(1),
                Value::Text(String::from("John")),
                Value::Text(String::from("Super John")),
                Value::Text(String::from("locked")),
            ]
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = users();
        let statement = Insert::into_table(&table)
            .values([Value::Int(1), Value::Text(String::from("John"))])
            .on_conflict_do_update(["id"], |u| u.set("name", excluded("name")))
            .build()
            .expect("valid upsert");
        let first = Sqlite.render_inline(&statement).expect("renderable");
        let second = Sqlite.render_inline(&statement).expect("renderable");
        assert_eq!(first, second);
    }
}
