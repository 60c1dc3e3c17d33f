//! Primary key values used for lookups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a single row
///
/// # Examples
///
/// ```
/// use polymap_fetch::PrimaryKey;
///
/// let key = PrimaryKey::from(1);
/// assert_eq!(key.to_json(), serde_json::json!(1));
/// assert_eq!(PrimaryKey::from_json(&serde_json::json!("a-7")), Some(PrimaryKey::from("a-7")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
	Integer(i64),
	Text(String),
}

impl PrimaryKey {
	/// Extract a key from a row value; `None` for null, floats and composite values
	pub fn from_json(value: &serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::Number(n) => n.as_i64().map(PrimaryKey::Integer),
			serde_json::Value::String(s) => Some(PrimaryKey::Text(s.clone())),
			_ => None,
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			PrimaryKey::Integer(i) => serde_json::Value::from(*i),
			PrimaryKey::Text(s) => serde_json::Value::from(s.as_str()),
		}
	}

	/// Check whether a row value holds this key
	pub fn matches(&self, value: &serde_json::Value) -> bool {
		Self::from_json(value).as_ref() == Some(self)
	}
}

impl fmt::Display for PrimaryKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PrimaryKey::Integer(i) => write!(f, "{}", i),
			PrimaryKey::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for PrimaryKey {
	fn from(value: i64) -> Self {
		PrimaryKey::Integer(value)
	}
}

impl From<i32> for PrimaryKey {
	fn from(value: i32) -> Self {
		PrimaryKey::Integer(i64::from(value))
	}
}

impl From<&str> for PrimaryKey {
	fn from(value: &str) -> Self {
		PrimaryKey::Text(value.to_string())
	}
}

impl From<String> for PrimaryKey {
	fn from(value: String) -> Self {
		PrimaryKey::Text(value)
	}
}
