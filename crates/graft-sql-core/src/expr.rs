//! Expression model for conflict actions.
//!
//! Unlike a plain string builder, expressions stay as a small AST until render
//! time: a rejected-row reference has no single SQL spelling (`excluded.qty`
//! on PostgreSQL and SQLite, `values(qty)` on MySQL), so the dialect must be
//! known before any text exists.

use crate::value::{IntoValue, Value};

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Logical OR.
    Or,
    /// Logical AND.
    And,
    /// Equality.
    Eq,
    /// Inequality.
    NotEq,
    /// Less than.
    Lt,
    /// Less than or equal.
    LtEq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    GtEq,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

impl BinaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Binding strength, higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div => 6,
        }
    }

    /// Whether the right operand must be parenthesized at equal precedence.
    #[must_use]
    pub fn right_associative_sensitive(self) -> bool {
        matches!(self, Self::Sub | Self::Div)
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT.
    Not,
}

/// An expression usable in conflict-action assignments and filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Value(Value),
    /// A reference to a column of the target table (the stored row).
    Column(String),
    /// A reference to the rejected row's value for a column: what would have
    /// been inserted had no conflict occurred.
    Excluded(String),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
}

/// Creates a column reference.
#[must_use]
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Creates a rejected-row column reference.
#[must_use]
pub fn excluded(name: impl Into<String>) -> Expr {
    Expr::Excluded(name.into())
}

/// Creates a literal expression.
#[must_use]
pub fn lit(value: impl IntoValue) -> Expr {
    Expr::Value(value.into_value())
}

impl Expr {
    fn binary(self, op: BinaryOp, right: impl Into<Self>) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    /// `self = other`
    #[must_use]
    pub fn eq(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Eq, other)
    }

    /// `self <> other`
    #[must_use]
    pub fn not_eq(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::NotEq, other)
    }

    /// `self < other`
    #[must_use]
    pub fn lt(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Lt, other)
    }

    /// `self <= other`
    #[must_use]
    pub fn lt_eq(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::LtEq, other)
    }

    /// `self > other`
    #[must_use]
    pub fn gt(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Gt, other)
    }

    /// `self >= other`
    #[must_use]
    pub fn gt_eq(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::GtEq, other)
    }

    /// `self and other`
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::And, other)
    }

    /// `self or other`
    #[must_use]
    pub fn or(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Or, other)
    }

    /// `self + other`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Add, other)
    }

    /// `self - other`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Sub, other)
    }

    /// `self * other`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Mul, other)
    }

    /// `self / other`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Div, other)
    }

    /// `not self`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    /// Binding strength of this node, higher binds tighter.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Value(_) | Self::Column(_) | Self::Excluded(_) => u8::MAX,
            Self::Unary { .. } => 3,
            Self::Binary { op, .. } => op.precedence(),
        }
    }

    /// Visits every column name the expression references, including
    /// rejected-row references.
    pub fn visit_columns<F: FnMut(&str)>(&self, visit: &mut F) {
        match self {
            Self::Value(_) => {}
            Self::Column(name) | Self::Excluded(name) => visit(name),
            Self::Unary { operand, .. } => operand.visit_columns(visit),
            Self::Binary { left, right, .. } => {
                left.visit_columns(visit);
                right.visit_columns(visit);
            }
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into_value())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into_value())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into_value())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Value(value.into_value())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into_value())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into_value())
    }
}
