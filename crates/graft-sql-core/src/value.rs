//! Literal SQL values and safe literal rendering.
//!
//! Row values are plain literals by design: a rejected-row reference can only
//! appear inside a conflict action, and that restriction falls out of the
//! types rather than a runtime check.

/// A literal value bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// 64-bit signed integer literal.
    Int(i64),
    /// Double-precision float literal.
    Float(f64),
    /// Text literal.
    Text(String),
    /// Binary literal.
    Bytes(Vec<u8>),
}

impl Value {
    /// Renders the value as an inline SQL literal.
    ///
    /// Text has embedded single quotes doubled, so inline output is safe to
    /// log or replay. Parameterized rendering should still be preferred when
    /// handing statements to a driver.
    #[must_use]
    pub fn to_inline_sql(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => String::from(if *b { "true" } else { "false" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("x'{hex}'")
            }
        }
    }
}

/// Conversion into a [`Value`].
///
/// Implemented for the scalar types a row literal can carry; `Option` maps
/// `None` onto NULL.
pub trait IntoValue {
    /// Converts `self` into a [`Value`].
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! impl_into_value_int {
    ($($ty:ty),+) => {
        $(impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        })+
    };
}

impl_into_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        value.into_value()
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        value.into_value()
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        value.into_value()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        value.into_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        value.into_value()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        value.into_value()
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        value.into_value()
    }
}
