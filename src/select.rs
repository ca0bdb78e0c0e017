//! Selector resolution.
//!
//! A key specifier (a field name, a positional index, or an arbitrary
//! closure) is resolved exactly once, at configuration time, into a uniform
//! record-to-value extraction function. The pivot core only ever sees the
//! resolved function, never the raw specifier. Closure selectors are checked
//! for shape by the compiler (`Fn(&Record) -> Value`), so no runtime check
//! for incompatible callables exists.

use std::fmt;
use std::sync::Arc;

use crate::error::PivotError;
use crate::value::{Key, Record, Value};

type SelectFn = dyn Fn(&Record) -> Result<Value, PivotError> + Send + Sync;

/// A resolved, pure extraction function from a record to a value.
///
/// Cloning is cheap (Arc-backed), which lets one configuration supply any
/// number of fresh pivot instances.
#[derive(Clone)]
pub struct Selector {
    /// Label of the originating field key, used to derive aggregate names.
    /// Closure selectors carry none.
    label: Option<String>,
    select: Arc<SelectFn>,
}

impl Selector {
    /// Resolves a field key into a selector that indexes the record.
    /// A record lacking the field fails the lookup with `NoSuchField`.
    pub fn field(key: impl Into<Key>) -> Self {
        let key = key.into();
        let label = match &key {
            Key::Name(name) => name.clone(),
            Key::Index(index) => index.to_string(),
        };
        Selector {
            label: Some(label),
            select: Arc::new(move |record| {
                record
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| PivotError::NoSuchField(key.clone()))
            }),
        }
    }

    /// Wraps an arbitrary extraction closure.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Selector {
            label: None,
            select: Arc::new(move |record| Ok(f(record))),
        }
    }

    /// Applies the selector to a record.
    pub fn select(&self, record: &Record) -> Result<Value, PivotError> {
        (self.select)(record)
    }

    pub(crate) fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Selector(field {})", label),
            None => write!(f, "Selector(fn)"),
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::field(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::field(name)
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::field(index)
    }
}
