//! Entity store
//!
//! Agencies, blogs, and posts live in an external tabular store. Records
//! are opaque field maps keyed by a store-assigned id; nothing here models
//! the tables beyond their column names.
//!
//! - [`AirtableStore`] talks to the Airtable REST API
//! - [`MemoryStore`] keeps tables in process (tests, dry runs)

mod airtable;
mod memory;

pub use airtable::AirtableStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Column name to value
pub type Fields = Map<String, Value>;

/// Opaque record identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// String column, or ""
    pub fn text(&self, field: &str) -> &str {
        self.fields.get(field).and_then(Value::as_str).unwrap_or("")
    }

    /// String column with a fallback for missing or empty values
    pub fn text_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        match self.text(field) {
            "" => default,
            s => s,
        }
    }

    /// List-of-strings column (linked record ids, tags)
    pub fn strings(&self, field: &str) -> Vec<String> {
        self.fields
            .get(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Row selection for [`EntityStore::list`]
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    FieldEquals { field: String, value: String },
}

impl Filter {
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Airtable formula, e.g. `{Status}='Published'`
    pub fn to_formula(&self) -> Option<String> {
        match self {
            Filter::All => None,
            Filter::FieldEquals { field, value } => Some(format!(
                "{{{}}}='{}'",
                field,
                value.replace('\\', "\\\\").replace('\'', "\\'")
            )),
        }
    }

    /// Evaluate against a field map the way the remote formula would
    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEquals { field, value } => match fields.get(field) {
                Some(Value::String(s)) => s == value,
                Some(Value::Number(n)) => n.to_string() == *value,
                Some(Value::Bool(b)) => b.to_string() == *value,
                None | Some(Value::Null) => value.is_empty(),
                _ => false,
            },
        }
    }
}

/// Errors from store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing store credentials: {0} not set")]
    MissingCredentials(String),

    #[error("Record {id} not found in {table}")]
    NotFound { table: String, id: String },

    #[error("Store API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Store request failed: {0}")]
    Transport(String),

    #[error("Failed to parse store response: {0}")]
    Parse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed-record CRUD against a tabular store
pub trait EntityStore: Send + Sync {
    fn get(&self, table: &str, id: &RecordId) -> StoreResult<Record>;

    fn list(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Record>>;

    fn create(&self, table: &str, fields: Fields) -> StoreResult<RecordId>;

    /// Merge `fields` into an existing record
    fn update(&self, table: &str, id: &RecordId, fields: Fields) -> StoreResult<()>;

    fn delete(&self, table: &str, id: &RecordId) -> StoreResult<()>;
}
