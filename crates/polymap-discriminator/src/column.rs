//! Underlying column codecs
//!
//! A [`ColumnCodec`] reads and writes the raw discriminator value domain. The
//! discriminator codec never touches rows or statements directly; it always
//! delegates raw I/O and column shape to one of these.

pub mod types;

use crate::error::ColumnError;
use crate::value::DiscriminatorValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub use types::{BooleanColumn, CharColumn, IntegerColumn, IntegerWidth, TextColumn};

/// Default length for string columns without a declared length
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Schema-level settings consulted by shape queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaContext {
	default_string_length: u32,
}

impl SchemaContext {
	/// Create a context with an explicit default string length
	pub fn new(default_string_length: u32) -> Self {
		Self {
			default_string_length,
		}
	}

	/// Length used for string columns that declare none
	pub fn default_string_length(&self) -> u32 {
		self.default_string_length
	}
}

impl Default for SchemaContext {
	fn default() -> Self {
		Self::new(DEFAULT_STRING_LENGTH)
	}
}

/// Size of a single column (length for strings, precision/scale for numbers)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSize {
	pub length: Option<u32>,
	pub precision: Option<u32>,
	pub scale: Option<u32>,
}

impl ColumnSize {
	/// Size with only a length
	pub fn length(length: u32) -> Self {
		Self {
			length: Some(length),
			..Self::default()
		}
	}

	/// Size with precision and scale
	pub fn precision(precision: u32, scale: u32) -> Self {
		Self {
			precision: Some(precision),
			scale: Some(scale),
			..Self::default()
		}
	}
}

/// Read access to one row of a result set
pub trait ResultRow {
	/// Get the value of a column; `None` means the column is absent from the row
	fn column(&self, name: &str) -> Option<&serde_json::Value>;
}

impl ResultRow for serde_json::Map<String, serde_json::Value> {
	fn column(&self, name: &str) -> Option<&serde_json::Value> {
		self.get(name)
	}
}

impl ResultRow for HashMap<String, serde_json::Value> {
	fn column(&self, name: &str) -> Option<&serde_json::Value> {
		self.get(name)
	}
}

impl ResultRow for IndexMap<String, serde_json::Value> {
	fn column(&self, name: &str) -> Option<&serde_json::Value> {
		self.get(name)
	}
}

/// Positional parameter target of a prepared statement
pub trait ParameterSink {
	/// Bind `value` at the zero-based parameter `index`
	fn bind(&mut self, index: usize, value: sea_query::Value);
}

/// Collected positional parameters
///
/// # Examples
///
/// ```
/// use polymap_discriminator::column::{BoundParameters, ParameterSink};
///
/// let mut params = BoundParameters::new();
/// params.bind(0, sea_query::Value::from(7_i64));
/// assert_eq!(params.len(), 1);
/// assert!(params.get(1).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
	values: BTreeMap<usize, sea_query::Value>,
}

impl BoundParameters {
	/// Create an empty parameter set
	pub fn new() -> Self {
		Self::default()
	}

	/// Get the value bound at `index`
	pub fn get(&self, index: usize) -> Option<&sea_query::Value> {
		self.values.get(&index)
	}

	/// Number of bound parameters
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if nothing is bound
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Consume into values ordered by index
	pub fn into_values(self) -> Vec<sea_query::Value> {
		self.values.into_values().collect()
	}
}

impl ParameterSink for BoundParameters {
	fn bind(&mut self, index: usize, value: sea_query::Value) {
		self.values.insert(index, value);
	}
}

/// Raw column codec for a discriminator value domain
pub trait ColumnCodec: Send + Sync + fmt::Debug {
	/// Type name, e.g. `"integer"`
	fn name(&self) -> &str;

	/// SQL column types, one per column
	fn sql_types(&self, ctx: &SchemaContext) -> Vec<sea_query::ColumnType>;

	/// Number of columns the codec spans
	fn column_span(&self, ctx: &SchemaContext) -> usize {
		self.sql_types(ctx).len()
	}

	/// Sizes the codec requires regardless of user mapping
	fn dictated_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize>;

	/// Sizes used when the mapping declares none
	fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize>;

	/// Check that a value belongs to this codec's domain
	///
	/// Returns a human readable reason on rejection.
	fn validate(&self, value: &DiscriminatorValue) -> Result<(), String>;

	/// Read the raw value from `row`; SQL NULL yields `None`
	fn read_raw(
		&self,
		row: &dyn ResultRow,
		columns: &[&str],
	) -> Result<Option<DiscriminatorValue>, ColumnError>;

	/// Bind the raw value (or a typed NULL) at `index`
	fn write_raw(
		&self,
		sink: &mut dyn ParameterSink,
		value: Option<&DiscriminatorValue>,
		index: usize,
	) -> Result<(), ColumnError>;
}

/// Fetch the single column a one-column codec reads
pub(crate) fn single_column<'r>(
	row: &'r dyn ResultRow,
	columns: &[&str],
) -> Result<(&'r serde_json::Value, String), ColumnError> {
	let [name] = columns else {
		return Err(ColumnError::ColumnCountMismatch {
			expected: 1,
			actual: columns.len(),
		});
	};
	let value = row
		.column(name)
		.ok_or_else(|| ColumnError::MissingColumn(name.to_string()))?;
	Ok((value, name.to_string()))
}

/// Short description of a JSON value for diagnostics
pub(crate) fn describe_json(value: &serde_json::Value) -> String {
	match value {
		serde_json::Value::Null => "null".to_string(),
		serde_json::Value::Bool(b) => format!("boolean {}", b),
		serde_json::Value::Number(n) => format!("number {}", n),
		serde_json::Value::String(s) => format!("string {:?}", s),
		serde_json::Value::Array(_) => "array".to_string(),
		serde_json::Value::Object(_) => "object".to_string(),
	}
}
