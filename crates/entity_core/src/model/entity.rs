//! Keyed entity contract.
//!
//! # Invariants
//! - `Entity::id` is the only identity; two rows never share a key.
//! - The zero key (`Default`) is reserved for entities not yet persisted.
//! - `to_values` yields exactly one value per entry of `COLUMNS`, in order.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// Primary key contract for persisted entities.
pub trait EntityKey:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + Display
    + Default
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Converts the key into a bindable SQL value.
    fn to_sql_value(&self) -> Value;

    /// Reads the key back from a SQL column.
    fn from_sql_value(value: ValueRef<'_>) -> FromSqlResult<Self>;

    /// Client-side key generated when a new entity is added.
    ///
    /// `None` means the store assigns the key on insert.
    fn generate() -> Option<Self> {
        None
    }

    /// Maps the SQLite row id of a fresh insert onto the key type.
    fn from_row_id(_row_id: i64) -> Option<Self> {
        None
    }

    /// Returns whether this key is the zero value of its type.
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl EntityKey for i64 {
    fn to_sql_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_sql_value(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value)
    }

    fn from_row_id(row_id: i64) -> Option<Self> {
        Some(row_id)
    }
}

impl EntityKey for i32 {
    fn to_sql_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_sql_value(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i32::column_result(value)
    }

    fn from_row_id(row_id: i64) -> Option<Self> {
        i32::try_from(row_id).ok()
    }
}

/// UUID keys are stored as hyphenated text and generated on add.
impl EntityKey for Uuid {
    fn to_sql_value(&self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_sql_value(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Uuid::parse_str(text).map_err(|err| FromSqlError::Other(Box::new(err)))
    }

    fn generate() -> Option<Self> {
        Some(Uuid::new_v4())
    }
}

/// A keyed record mapped onto one SQL table.
pub trait Entity: Clone + Debug + 'static {
    type Key: EntityKey;

    /// Backing table name.
    const TABLE: &'static str;
    /// Primary key column.
    const KEY_COLUMN: &'static str = "id";
    /// Non-key columns written on insert/update, in `to_values` order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Self::Key;

    fn set_id(&mut self, id: Self::Key);

    /// Values for `COLUMNS`, in the same order.
    fn to_values(&self) -> Vec<Value>;

    /// Builds an entity from a row selected as `KEY_COLUMN, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// New entities carry the zero key.
    fn is_new(&self) -> bool {
        self.id().is_zero()
    }

    /// Overwrites every value from `source` while keeping this entity's key.
    ///
    /// Used by modify to update a freshly loaded original in place.
    fn copy_values_from(&mut self, source: &Self) {
        let id = self.id();
        self.clone_from(source);
        self.set_id(id);
    }
}

/// Reads a key column from a row, mapping conversion errors onto rusqlite's.
pub fn key_from_row<K: EntityKey>(row: &Row<'_>, column: &str) -> rusqlite::Result<K> {
    let index = row.as_ref().column_index(column)?;
    let value = row.get_ref(index)?;
    K::from_sql_value(value).map_err(|err| match err {
        FromSqlError::Other(source) => {
            rusqlite::Error::FromSqlConversionFailure(index, value.data_type(), source)
        }
        other => {
            rusqlite::Error::FromSqlConversionFailure(index, value.data_type(), Box::new(other))
        }
    })
}
