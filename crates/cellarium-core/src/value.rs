//! Wrapped values returned by the metadata query service.
//!
//! Every projected column arrives wrapped; the typed accessors perform the
//! single unwrap step and surface [`Error::Decode`] on shape mismatches.
//! Optional columns unwrap to `None` through the `as_opt_*` accessors.
//! Structured projections arrive as one [`Value::Map`] element per row;
//! [`map_columns`] restores the positional shape shared with tuple
//! projections so both feed the same decoders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::perms::Permissions;

/// A single wrapped value in a projection row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent/null column value.
    Null,
    /// 64-bit integer (ids, counts, sizes).
    Long(i64),
    /// Text column.
    Text(String),
    /// Boolean column.
    Bool(bool),
    /// Timestamp in epoch milliseconds.
    Time(i64),
    /// Permission descriptor attached to an item.
    Perms(Permissions),
    /// Structured projection keyed by projection alias.
    Map(BTreeMap<String, Value>),
}

/// One projection row.
pub type Row = Vec<Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_long(&self) -> Result<i64> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(Error::Decode(format!("expected long, got {other:?}"))),
        }
    }

    pub fn as_opt_long(&self) -> Result<Option<i64>> {
        match self {
            Value::Null => Ok(None),
            Value::Long(v) => Ok(Some(*v)),
            other => Err(Error::Decode(format!("expected long or null, got {other:?}"))),
        }
    }

    pub fn as_text(&self) -> Result<String> {
        match self {
            Value::Text(v) => Ok(v.clone()),
            other => Err(Error::Decode(format!("expected text, got {other:?}"))),
        }
    }

    pub fn as_opt_text(&self) -> Result<Option<String>> {
        match self {
            Value::Null => Ok(None),
            Value::Text(v) => Ok(Some(v.clone())),
            other => Err(Error::Decode(format!("expected text or null, got {other:?}"))),
        }
    }

    /// Timestamp column in epoch milliseconds; `Null` decodes to `None`.
    pub fn as_opt_time(&self) -> Result<Option<i64>> {
        match self {
            Value::Null => Ok(None),
            Value::Time(v) => Ok(Some(*v)),
            other => Err(Error::Decode(format!("expected time or null, got {other:?}"))),
        }
    }

    pub fn as_perms(&self) -> Result<&Permissions> {
        match self {
            Value::Perms(p) => Ok(p),
            other => Err(Error::Decode(format!(
                "expected permission descriptor, got {other:?}"
            ))),
        }
    }

    pub fn as_map(&self) -> Result<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Ok(m),
            other => Err(Error::Decode(format!("expected map, got {other:?}"))),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        match v {
            Some(v) => Value::Long(v),
            None => Value::Null,
        }
    }
}

impl From<Permissions> for Value {
    fn from(v: Permissions) -> Self {
        Value::Perms(v)
    }
}

/// Column at `idx`, or a decode error naming the missing position.
pub fn col(row: &[Value], idx: usize) -> Result<&Value> {
    row.get(idx)
        .ok_or_else(|| Error::Decode(format!("row too short, missing column {idx}")))
}

/// Pull `keys` out of a single-element structured row, restoring the
/// positional column order shared with tuple projections.
pub fn map_columns(row: &[Value], keys: &[&str]) -> Result<Vec<Value>> {
    let map = col(row, 0)?.as_map()?;
    keys.iter()
        .map(|key| {
            map.get(*key)
                .cloned()
                .ok_or_else(|| Error::Decode(format!("missing column {key}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_round_trip() {
        assert_eq!(Value::Long(7).as_long().unwrap(), 7);
        assert_eq!(Value::from(7i64), Value::Long(7));
    }

    #[test]
    fn long_mismatch_is_decode_error() {
        let err = Value::Text("x".into()).as_long().unwrap_err();
        assert!(err.to_string().contains("expected long"));
    }

    #[test]
    fn opt_long_null_is_none() {
        assert_eq!(Value::Null.as_opt_long().unwrap(), None);
        assert_eq!(Value::Long(3).as_opt_long().unwrap(), Some(3));
    }

    #[test]
    fn opt_text_null_is_none() {
        assert_eq!(Value::Null.as_opt_text().unwrap(), None);
        assert_eq!(
            Value::Text("hi".into()).as_opt_text().unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn opt_time_null_is_none() {
        assert_eq!(Value::Null.as_opt_time().unwrap(), None);
        assert_eq!(Value::Time(1000).as_opt_time().unwrap(), Some(1000));
    }

    #[test]
    fn perms_accessor() {
        let v = Value::Perms(Permissions::full());
        assert!(v.as_perms().unwrap().can_edit);
        assert!(Value::Null.as_perms().is_err());
    }

    #[test]
    fn col_out_of_range() {
        let row: Row = vec![Value::Long(1)];
        assert_eq!(col(&row, 0).unwrap().as_long().unwrap(), 1);
        let err = col(&row, 4).unwrap_err();
        assert!(err.to_string().contains("missing column 4"));
    }

    #[test]
    fn map_columns_restores_positional_order() {
        let mut map = BTreeMap::new();
        map.insert("id".to_string(), Value::Long(9));
        map.insert("name".to_string(), Value::Text("alpha".into()));
        let row: Row = vec![Value::Map(map)];

        let cols = map_columns(&row, &["id", "name"]).unwrap();
        assert_eq!(cols[0], Value::Long(9));
        assert_eq!(cols[1], Value::Text("alpha".into()));
    }

    #[test]
    fn map_columns_missing_key_is_decode_error() {
        let row: Row = vec![Value::Map(BTreeMap::new())];
        let err = map_columns(&row, &["ownerId"]).unwrap_err();
        assert!(err.to_string().contains("missing column ownerId"));
    }

    #[test]
    fn map_columns_on_tuple_row_is_decode_error() {
        let row: Row = vec![Value::Long(1)];
        assert!(map_columns(&row, &["id"]).is_err());
    }
}
