//! Built-in column codecs for the usual discriminator column types.

use super::{
	ColumnCodec, ColumnSize, ParameterSink, ResultRow, SchemaContext, describe_json,
	single_column,
};
use crate::error::ColumnError;
use crate::value::DiscriminatorValue;
use sea_query::{ColumnType, StringLen};

/// Storage width of an integral discriminator column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerWidth {
	/// SMALLINT
	Small,
	/// INTEGER
	Regular,
	/// BIGINT
	Big,
}

impl IntegerWidth {
	fn bounds(self) -> (i64, i64) {
		match self {
			IntegerWidth::Small => (i64::from(i16::MIN), i64::from(i16::MAX)),
			IntegerWidth::Regular => (i64::from(i32::MIN), i64::from(i32::MAX)),
			IntegerWidth::Big => (i64::MIN, i64::MAX),
		}
	}

	fn precision(self) -> u32 {
		match self {
			IntegerWidth::Small => 5,
			IntegerWidth::Regular => 10,
			IntegerWidth::Big => 19,
		}
	}
}

/// Integral discriminator column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerColumn {
	width: IntegerWidth,
}

impl IntegerColumn {
	/// Column of the given width
	pub fn new(width: IntegerWidth) -> Self {
		Self { width }
	}

	/// SMALLINT column
	pub fn small() -> Self {
		Self::new(IntegerWidth::Small)
	}

	/// INTEGER column
	pub fn regular() -> Self {
		Self::new(IntegerWidth::Regular)
	}

	/// BIGINT column
	pub fn big() -> Self {
		Self::new(IntegerWidth::Big)
	}

	/// Column width
	pub fn width(&self) -> IntegerWidth {
		self.width
	}

	fn in_range(&self, value: i64) -> bool {
		let (min, max) = self.width.bounds();
		(min..=max).contains(&value)
	}
}

impl Default for IntegerColumn {
	fn default() -> Self {
		Self::regular()
	}
}

impl ColumnCodec for IntegerColumn {
	fn name(&self) -> &str {
		match self.width {
			IntegerWidth::Small => "small_integer",
			IntegerWidth::Regular => "integer",
			IntegerWidth::Big => "big_integer",
		}
	}

	fn sql_types(&self, _ctx: &SchemaContext) -> Vec<ColumnType> {
		let column_type = match self.width {
			IntegerWidth::Small => ColumnType::SmallInteger,
			IntegerWidth::Regular => ColumnType::Integer,
			IntegerWidth::Big => ColumnType::BigInteger,
		};
		vec![column_type]
	}

	fn dictated_sizes(&self, _ctx: &SchemaContext) -> Vec<ColumnSize> {
		vec![ColumnSize::precision(self.width.precision(), 0)]
	}

	fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		self.dictated_sizes(ctx)
	}

	fn validate(&self, value: &DiscriminatorValue) -> Result<(), String> {
		match value.as_integer() {
			Some(v) if self.in_range(v) => Ok(()),
			Some(v) => Err(format!("{} is out of range for {}", v, self.name())),
			None => Err(format!("expected an integer, got {}", value.kind())),
		}
	}

	fn read_raw(
		&self,
		row: &dyn ResultRow,
		columns: &[&str],
	) -> Result<Option<DiscriminatorValue>, ColumnError> {
		let (value, column) = single_column(row, columns)?;
		match value {
			serde_json::Value::Null => Ok(None),
			serde_json::Value::Number(n) => n
				.as_i64()
				.map(|v| Some(DiscriminatorValue::Integer(v)))
				.ok_or_else(|| ColumnError::TypeMismatch {
					column,
					expected: "integer",
					found: describe_json(value),
				}),
			other => Err(ColumnError::TypeMismatch {
				column,
				expected: "integer",
				found: describe_json(other),
			}),
		}
	}

	fn write_raw(
		&self,
		sink: &mut dyn ParameterSink,
		value: Option<&DiscriminatorValue>,
		index: usize,
	) -> Result<(), ColumnError> {
		let Some(value) = value else {
			let null = match self.width {
				IntegerWidth::Small => sea_query::Value::SmallInt(None),
				IntegerWidth::Regular => sea_query::Value::Int(None),
				IntegerWidth::Big => sea_query::Value::BigInt(None),
			};
			sink.bind(index, null);
			return Ok(());
		};

		let raw = value.as_integer().ok_or_else(|| ColumnError::TypeMismatch {
			column: format!("parameter {}", index),
			expected: "integer",
			found: value.kind().to_string(),
		})?;
		let out_of_range = || ColumnError::OutOfRange {
			value: value.clone(),
			column_type: self.name().to_string(),
		};

		let bound = match self.width {
			IntegerWidth::Small => {
				sea_query::Value::from(i16::try_from(raw).map_err(|_| out_of_range())?)
			}
			IntegerWidth::Regular => {
				sea_query::Value::from(i32::try_from(raw).map_err(|_| out_of_range())?)
			}
			IntegerWidth::Big => sea_query::Value::from(raw),
		};
		sink.bind(index, bound);
		Ok(())
	}
}

/// Variable-length string discriminator column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextColumn {
	length: Option<u32>,
}

impl TextColumn {
	/// Column without a declared length
	pub fn new() -> Self {
		Self::default()
	}

	/// Column with a declared maximum length
	pub fn with_length(length: u32) -> Self {
		Self {
			length: Some(length),
		}
	}

	/// Declared maximum length
	pub fn length(&self) -> Option<u32> {
		self.length
	}
}

impl ColumnCodec for TextColumn {
	fn name(&self) -> &str {
		"text"
	}

	fn sql_types(&self, ctx: &SchemaContext) -> Vec<ColumnType> {
		let length = self.length.unwrap_or(ctx.default_string_length());
		vec![ColumnType::String(StringLen::N(length))]
	}

	fn dictated_sizes(&self, _ctx: &SchemaContext) -> Vec<ColumnSize> {
		vec![self.length.map(ColumnSize::length).unwrap_or_default()]
	}

	fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		vec![ColumnSize::length(
			self.length.unwrap_or(ctx.default_string_length()),
		)]
	}

	fn validate(&self, value: &DiscriminatorValue) -> Result<(), String> {
		let Some(text) = value.as_text() else {
			return Err(format!("expected text, got {}", value.kind()));
		};
		match self.length {
			Some(max) if text.chars().count() > max as usize => Err(format!(
				"'{}' exceeds the declared length of {}",
				text, max
			)),
			_ => Ok(()),
		}
	}

	fn read_raw(
		&self,
		row: &dyn ResultRow,
		columns: &[&str],
	) -> Result<Option<DiscriminatorValue>, ColumnError> {
		let (value, column) = single_column(row, columns)?;
		match value {
			serde_json::Value::Null => Ok(None),
			serde_json::Value::String(s) => Ok(Some(DiscriminatorValue::Text(s.clone()))),
			other => Err(ColumnError::TypeMismatch {
				column,
				expected: "text",
				found: describe_json(other),
			}),
		}
	}

	fn write_raw(
		&self,
		sink: &mut dyn ParameterSink,
		value: Option<&DiscriminatorValue>,
		index: usize,
	) -> Result<(), ColumnError> {
		let bound = match value {
			None => sea_query::Value::String(None),
			Some(DiscriminatorValue::Text(text)) => sea_query::Value::from(text.clone()),
			Some(other) => {
				return Err(ColumnError::TypeMismatch {
					column: format!("parameter {}", index),
					expected: "text",
					found: other.kind().to_string(),
				});
			}
		};
		sink.bind(index, bound);
		Ok(())
	}
}

/// Single-character discriminator column (`CHAR(1)`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharColumn;

impl CharColumn {
	fn single_char(text: &str) -> Option<char> {
		let mut chars = text.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Some(c),
			_ => None,
		}
	}
}

impl ColumnCodec for CharColumn {
	fn name(&self) -> &str {
		"char"
	}

	fn sql_types(&self, _ctx: &SchemaContext) -> Vec<ColumnType> {
		vec![ColumnType::Char(Some(1))]
	}

	fn dictated_sizes(&self, _ctx: &SchemaContext) -> Vec<ColumnSize> {
		vec![ColumnSize::length(1)]
	}

	fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		self.dictated_sizes(ctx)
	}

	fn validate(&self, value: &DiscriminatorValue) -> Result<(), String> {
		match value.as_text() {
			Some(text) if Self::single_char(text).is_some() => Ok(()),
			Some(text) => Err(format!("'{}' is not a single character", text)),
			None => Err(format!("expected a character, got {}", value.kind())),
		}
	}

	fn read_raw(
		&self,
		row: &dyn ResultRow,
		columns: &[&str],
	) -> Result<Option<DiscriminatorValue>, ColumnError> {
		let (value, column) = single_column(row, columns)?;
		match value {
			serde_json::Value::Null => Ok(None),
			serde_json::Value::String(s) if Self::single_char(s).is_some() => {
				Ok(Some(DiscriminatorValue::Text(s.clone())))
			}
			other => Err(ColumnError::TypeMismatch {
				column,
				expected: "single character",
				found: describe_json(other),
			}),
		}
	}

	fn write_raw(
		&self,
		sink: &mut dyn ParameterSink,
		value: Option<&DiscriminatorValue>,
		index: usize,
	) -> Result<(), ColumnError> {
		let bound = match value {
			None => sea_query::Value::Char(None),
			Some(v) => {
				let c = v
					.as_text()
					.and_then(Self::single_char)
					.ok_or_else(|| ColumnError::TypeMismatch {
						column: format!("parameter {}", index),
						expected: "single character",
						found: v.to_string(),
					})?;
				sea_query::Value::from(c)
			}
		};
		sink.bind(index, bound);
		Ok(())
	}
}

/// Boolean discriminator column
///
/// Reads numeric `0`/`1` as well, since some backends store booleans as
/// tiny integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanColumn;

impl ColumnCodec for BooleanColumn {
	fn name(&self) -> &str {
		"boolean"
	}

	fn sql_types(&self, _ctx: &SchemaContext) -> Vec<ColumnType> {
		vec![ColumnType::Boolean]
	}

	fn dictated_sizes(&self, _ctx: &SchemaContext) -> Vec<ColumnSize> {
		vec![ColumnSize::default()]
	}

	fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		self.dictated_sizes(ctx)
	}

	fn validate(&self, value: &DiscriminatorValue) -> Result<(), String> {
		match value {
			DiscriminatorValue::Boolean(_) => Ok(()),
			other => Err(format!("expected a boolean, got {}", other.kind())),
		}
	}

	fn read_raw(
		&self,
		row: &dyn ResultRow,
		columns: &[&str],
	) -> Result<Option<DiscriminatorValue>, ColumnError> {
		let (value, column) = single_column(row, columns)?;
		match value {
			serde_json::Value::Null => Ok(None),
			serde_json::Value::Bool(b) => Ok(Some(DiscriminatorValue::Boolean(*b))),
			serde_json::Value::Number(n) if n.as_i64() == Some(0) => {
				Ok(Some(DiscriminatorValue::Boolean(false)))
			}
			serde_json::Value::Number(n) if n.as_i64() == Some(1) => {
				Ok(Some(DiscriminatorValue::Boolean(true)))
			}
			other => Err(ColumnError::TypeMismatch {
				column,
				expected: "boolean",
				found: describe_json(other),
			}),
		}
	}

	fn write_raw(
		&self,
		sink: &mut dyn ParameterSink,
		value: Option<&DiscriminatorValue>,
		index: usize,
	) -> Result<(), ColumnError> {
		let bound = match value {
			None => sea_query::Value::Bool(None),
			Some(DiscriminatorValue::Boolean(b)) => sea_query::Value::from(*b),
			Some(other) => {
				return Err(ColumnError::TypeMismatch {
					column: format!("parameter {}", index),
					expected: "boolean",
					found: other.kind().to_string(),
				});
			}
		};
		sink.bind(index, bound);
		Ok(())
	}
}
