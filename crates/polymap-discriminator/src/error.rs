//! Error types for discriminator mapping.

use crate::tag::TypeTag;
use crate::value::DiscriminatorValue;
use thiserror::Error;

/// Errors raised by the underlying column codecs during raw I/O
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColumnError {
	/// Result row does not contain the requested column
	#[error("Column not found in result row: {0}")]
	MissingColumn(String),

	/// Column holds a value of the wrong type
	#[error("Column '{column}' expected {expected}, found {found}")]
	TypeMismatch {
		column: String,
		expected: &'static str,
		found: String,
	},

	/// Wrong number of column names supplied for the codec
	#[error("Expected {expected} column name(s), got {actual}")]
	ColumnCountMismatch { expected: usize, actual: usize },

	/// Value does not fit the column
	#[error("Value {value} does not fit column type {column_type}")]
	OutOfRange {
		value: DiscriminatorValue,
		column_type: String,
	},
}

/// Errors raised while building or using a discriminator codec
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscriminatorError {
	/// Two types were registered under the same raw value
	#[error("Ambiguous discriminator mapping: value {value} maps to both '{first}' and '{second}'")]
	DuplicateValue {
		value: DiscriminatorValue,
		first: TypeTag,
		second: TypeTag,
	},

	/// One type was registered under two raw values
	#[error("Ambiguous discriminator mapping: type '{tag}' is mapped from both {first} and {second}")]
	DuplicateTag {
		tag: TypeTag,
		first: DiscriminatorValue,
		second: DiscriminatorValue,
	},

	/// A mapped value cannot be stored by the underlying column codec
	#[error("Discriminator value {value} is not valid for column type {column_type}: {reason}")]
	IncompatibleValue {
		value: DiscriminatorValue,
		column_type: String,
		reason: String,
	},

	/// A value read from the database has no registered type
	#[error("Unknown discriminator value {0} encountered at read time")]
	UnknownValue(DiscriminatorValue),

	/// A type being written has no registered value
	#[error("Type '{0}' is not registered under this discriminator")]
	UnknownTag(TypeTag),

	/// Raw column I/O failed
	#[error("Column error: {0}")]
	Column(#[from] ColumnError),
}

impl DiscriminatorError {
	/// Returns true for errors that can only arise while building the mapping
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			DiscriminatorError::DuplicateValue { .. }
				| DiscriminatorError::DuplicateTag { .. }
				| DiscriminatorError::IncompatibleValue { .. }
		)
	}

	/// Returns true when a value or tag outside the registered mapping was seen
	pub fn is_mapping_inconsistency(&self) -> bool {
		matches!(
			self,
			DiscriminatorError::UnknownValue(_) | DiscriminatorError::UnknownTag(_)
		)
	}
}

/// Result type for discriminator operations
pub type DiscriminatorResult<T> = Result<T, DiscriminatorError>;
