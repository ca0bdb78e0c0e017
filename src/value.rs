//! Values, field keys and records.
//!
//! Group-by and spread values end up as keys in the fact tree's child maps,
//! so `Value` must be hashable. Floats are wrapped in `OrderedFloat` to get
//! Eq/Hash with a single NaN class, the same normalization the tree needs to
//! never split one group across two buckets.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// Wrapper around f64 that implements Eq and Hash for use as map keys.
/// All NaN values compare equal and hash identically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for OrderedFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A single field value extracted from a record.
///
/// Doubles as a group key: distinct values open distinct branches in the
/// fact tree, so the type is fully hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Numeric view of this value. Only numbers qualify; aggregate selectors
    /// use this to reject non-numeric contributions.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.0),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => write!(f, "(empty)"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(OrderedFloat(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(OrderedFloat(n as f64))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(OrderedFloat(n as f64))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(OrderedFloat(n as f64))
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

// ============================================================================
// FIELD KEY
// ============================================================================

/// Identifies a field within a record, by name or by zero-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "'{}'", name),
            Key::Index(index) => write!(f, "#{}", index),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One row of input: an ordered list of named field values.
///
/// Field order is meaningful (positional `Key::Index` lookups address it),
/// names are expected unique within a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Looks up a field by name or position.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match key {
            Key::Name(name) => self
                .fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            Key::Index(index) => self.fields.get(*index).map(|(_, v)| v),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the fields in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}
