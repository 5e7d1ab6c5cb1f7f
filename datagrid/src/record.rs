//! Row records and row identity.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Field name used for row keys when none is configured.
pub const DEFAULT_ROW_KEY_FIELD: &str = "id";

/// A record the grid can display.
///
/// The grid treats records as opaque. It only needs named field lookups to
/// derive row keys and default cell text.
///
/// # Example
///
/// ```
/// use datagrid::GridRecord;
///
/// #[derive(Clone)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl GridRecord for User {
///     fn field(&self, name: &str) -> Option<String> {
///         match name {
///             "id" => Some(self.id.to_string()),
///             "name" => Some(self.name.clone()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait GridRecord: Clone + Send + Sync + 'static {
    /// Display value of the field called `name`, if the record has one.
    fn field(&self, name: &str) -> Option<String>;
}

impl GridRecord for Value {
    fn field(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl GridRecord for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl GridRecord for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Key used for a row whose record has no usable key.
pub fn positional_key(index: usize) -> String {
    format!("row-{}", index)
}

/// How the grid derives a row's identity from its record.
pub enum RowKey<T> {
    /// Read the key from a named field.
    Field(String),
    /// Compute the key with a closure.
    Accessor(Arc<dyn Fn(&T) -> Option<String> + Send + Sync>),
}

impl<T> RowKey<T> {
    /// Key rows by a named field.
    pub fn field(name: impl Into<String>) -> Self {
        RowKey::Field(name.into())
    }

    /// Key rows with a closure.
    pub fn accessor(f: impl Fn(&T) -> Option<String> + Send + Sync + 'static) -> Self {
        RowKey::Accessor(Arc::new(f))
    }
}

impl<T: GridRecord> RowKey<T> {
    /// The record's own key, if it has one.
    pub fn key_of(&self, record: &T) -> Option<String> {
        let key = match self {
            RowKey::Field(name) => record.field(name),
            RowKey::Accessor(f) => f(record),
        };
        key.filter(|key| !key.is_empty())
    }

    /// The record's key, falling back to a positional key for `index`.
    pub fn resolve(&self, record: &T, index: usize) -> String {
        self.key_of(record)
            .unwrap_or_else(|| positional_key(index))
    }
}

impl<T> Default for RowKey<T> {
    fn default() -> Self {
        RowKey::Field(DEFAULT_ROW_KEY_FIELD.to_string())
    }
}

impl<T> Clone for RowKey<T> {
    fn clone(&self) -> Self {
        match self {
            RowKey::Field(name) => RowKey::Field(name.clone()),
            RowKey::Accessor(f) => RowKey::Accessor(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(name) => f.debug_tuple("Field").field(name).finish(),
            RowKey::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}
