//! Raw discriminator values as stored in the database column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw, non-null value of a discriminator column
///
/// Null is never represented here: absence is modelled with `Option` by every
/// operation that can see a null column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscriminatorValue {
	/// Integral discriminator (SMALLINT, INTEGER, BIGINT columns)
	Integer(i64),
	/// Boolean discriminator
	Boolean(bool),
	/// Textual discriminator (CHAR, VARCHAR columns)
	Text(String),
}

impl DiscriminatorValue {
	/// Short name of the value kind, used in diagnostics
	pub fn kind(&self) -> &'static str {
		match self {
			DiscriminatorValue::Integer(_) => "integer",
			DiscriminatorValue::Boolean(_) => "boolean",
			DiscriminatorValue::Text(_) => "text",
		}
	}

	/// Get the integral value, if this is an integer
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			DiscriminatorValue::Integer(v) => Some(*v),
			_ => None,
		}
	}

	/// Get the text value, if this is text
	pub fn as_text(&self) -> Option<&str> {
		match self {
			DiscriminatorValue::Text(v) => Some(v),
			_ => None,
		}
	}

	/// Get the boolean value, if this is a boolean
	pub fn as_boolean(&self) -> Option<bool> {
		match self {
			DiscriminatorValue::Boolean(v) => Some(*v),
			_ => None,
		}
	}
}

impl fmt::Display for DiscriminatorValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DiscriminatorValue::Integer(v) => write!(f, "{}", v),
			DiscriminatorValue::Boolean(v) => write!(f, "{}", v),
			DiscriminatorValue::Text(v) => write!(f, "'{}'", v),
		}
	}
}

impl From<i64> for DiscriminatorValue {
	fn from(value: i64) -> Self {
		DiscriminatorValue::Integer(value)
	}
}

impl From<i32> for DiscriminatorValue {
	fn from(value: i32) -> Self {
		DiscriminatorValue::Integer(i64::from(value))
	}
}

impl From<bool> for DiscriminatorValue {
	fn from(value: bool) -> Self {
		DiscriminatorValue::Boolean(value)
	}
}

impl From<char> for DiscriminatorValue {
	fn from(value: char) -> Self {
		DiscriminatorValue::Text(value.to_string())
	}
}

impl From<&str> for DiscriminatorValue {
	fn from(value: &str) -> Self {
		DiscriminatorValue::Text(value.to_string())
	}
}

impl From<String> for DiscriminatorValue {
	fn from(value: String) -> Self {
		DiscriminatorValue::Text(value)
	}
}

impl From<DiscriminatorValue> for serde_json::Value {
	fn from(value: DiscriminatorValue) -> Self {
		match value {
			DiscriminatorValue::Integer(v) => serde_json::Value::from(v),
			DiscriminatorValue::Boolean(v) => serde_json::Value::Bool(v),
			DiscriminatorValue::Text(v) => serde_json::Value::String(v),
		}
	}
}
