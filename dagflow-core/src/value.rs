//! Dynamic Values
//!
//! [`Value`] is a closed set of payloads for graphs whose nodes hold
//! different kinds of data, including functions.
//!
//! # Sharing
//!
//! Text, lists and functions live behind `Arc`. Cloning a value (which is
//! what happens when a recompute function receives its inputs) shares the
//! payload instead of copying it. Nothing here has interior mutability, so
//! a recompute function can never change a value another node holds.

use std::fmt;
use std::sync::Arc;

/// A function stored as a node value.
pub type Callable = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A dynamically typed node value.
#[derive(Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,

    /// A boolean.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A floating point number.
    Float(f64),

    /// An immutable string.
    Text(Arc<str>),

    /// An immutable list.
    List(Arc<[Value]>),

    /// A function that can be called with arguments.
    Func(Callable),
}

impl Value {
    /// Wrap a closure as a callable value.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Call a function value. Returns `None` if the value is not callable.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        match self {
            Self::Func(f) => Some(f(args)),
            _ => None,
        }
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Func(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric reading of the value, as typed into a form field.
    ///
    /// Text is parsed after trimming, and blank text reads as 0; booleans
    /// count as 0 or 1. Null, lists and functions have no numeric reading.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) if s.trim().is_empty() => Some(0.0),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null | Self::List(_) | Self::Func(_) => None,
        }
    }

    /// Add up a set of values.
    ///
    /// All integers stay an integer (falling back to a float on overflow).
    /// Anything else numeric sums as a float. If any value has no numeric
    /// reading the result is `Null`.
    pub fn sum<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
        let mut int_total: Option<i64> = Some(0);
        let mut float_total = 0.0;

        for value in values {
            let Some(number) = value.to_number() else {
                return Value::Null;
            };
            float_total += number;
            int_total = match (int_total, value) {
                (Some(total), Value::Int(i)) => total.checked_add(*i),
                _ => None,
            };
        }

        match int_total {
            Some(total) => Value::Int(total),
            None => Value::Float(float_total),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Func(_) => f.write_str("<fn>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items.into())
    }
}
