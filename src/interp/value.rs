//! Runtime values for the interpreter
//!
//! A value has two textual forms. `Display` is what `print` writes for each
//! argument: strings appear raw. `Debug` is used for everything nested inside
//! a list or object: strings appear in double quotes. Containers always render
//! their contents in the `Debug` form, whichever form they are rendered in.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::stack::ensure_sufficient_stack;

/// Runtime value
#[derive(Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Number(i64),
    /// String
    String(String),
    Bool(bool),
    /// List, immutable once built
    List(Rc<Vec<Value>>),
    /// Named fields in the order they were written
    Object(Rc<IndexMap<String, Value>>),
    /// No value, e.g. a block without a trailing expression
    Unit,
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn object(fields: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(fields))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Unit => "unit",
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    ensure_sufficient_stack(|| {
        write!(f, "[")?;
        for (i, v) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", v)?;
        }
        write!(f, "]")
    })
}

fn write_object(f: &mut fmt::Formatter<'_>, fields: &IndexMap<String, Value>) -> fmt::Result {
    ensure_sufficient_stack(|| {
        write!(f, "{{")?;
        for (i, (name, v)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, v)?;
        }
        write!(f, "}}")
    })
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => write_list(f, items),
            Value::Object(fields) => write_object(f, fields),
            Value::Unit => write!(f, "()"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => write_list(f, items),
            Value::Object(fields) => write_object(f, fields),
            Value::Unit => write!(f, "()"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}
