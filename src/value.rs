//! Typed values produced by type transforms.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::identity::Principal;

/// The result of transforming argument text.
///
/// Multi-valued types (e.g., "all players") produce a [`Value::List`].
#[derive(Clone)]
pub enum Value {
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Principal(Principal),
    List(Vec<Value>),
    /// User-defined payload; compare by identity.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_principal(&self) -> Option<&Principal> {
        match self {
            Value::Principal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Every principal in this value, flattening lists.
    ///
    /// Lets handlers accept single and multi-valued principal types alike.
    pub fn principals(&self) -> Vec<&Principal> {
        match self {
            Value::Principal(p) => vec![p],
            Value::List(items) => items.iter().flat_map(Value::principals).collect(),
            _ => Vec::new(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Principal(p) => f.debug_tuple("Principal").field(p).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Principal(p) => write!(f, "{}", p),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            Value::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Principal(a), Value::Principal(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Principal> for Value {
    fn from(p: Principal) -> Self {
        Value::Principal(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principals_flattens_nested_lists() {
        let a = Principal::new(1, "A");
        let b = Principal::new(2, "B");
        let value = Value::List(vec![Value::from(a.clone()), Value::List(vec![Value::from(b.clone())])]);
        assert_eq!(value.principals(), vec![&a, &b]);
        assert!(Value::from("x").principals().is_empty());
    }

    #[test]
    fn scalar_accessors_match_their_variant() {
        assert_eq!(Value::Integer(4).as_integer(), Some(4));
        assert_eq!(Value::Integer(4).as_number(), Some(4.0));
        assert_eq!(Value::Number(0.5).as_number(), Some(0.5));
        assert_eq!(Value::Number(0.5).as_integer(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::from("true").as_bool(), None);
    }

    #[test]
    fn custom_values_downcast() {
        let value = Value::custom(42u8);
        assert_eq!(value.downcast_ref::<u8>(), Some(&42));
        assert!(value.downcast_ref::<String>().is_none());
        assert_eq!(value, value.clone());
        assert_ne!(value, Value::custom(42u8));
    }
}
