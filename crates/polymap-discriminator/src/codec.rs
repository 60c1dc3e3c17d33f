//! Discriminator codec
//!
//! Translates between the raw value stored in a discriminator column and the
//! logical [`TypeTag`] of the concrete type that row represents. Raw I/O and
//! column shape are delegated to the underlying [`ColumnCodec`]; this type
//! only changes the value domain on the mapping side of the round trip.

use crate::column::{ColumnCodec, ColumnSize, ParameterSink, ResultRow, SchemaContext};
use crate::error::{DiscriminatorError, DiscriminatorResult};
use crate::map::DiscriminatorMap;
use crate::tag::TypeTag;
use crate::value::DiscriminatorValue;
use std::sync::Arc;

/// Rendering of an absent tag
const NULL_DISPLAY: &str = "null";

/// Bidirectional codec between discriminator column values and type tags
///
/// Construction validates that every mapped value belongs to the column
/// codec's domain, so a misconfigured hierarchy fails at bootstrap instead of
/// at the first row. Once built, the codec is immutable and can be shared
/// freely across threads.
///
/// # Examples
///
/// ```
/// use polymap_discriminator::column::IntegerColumn;
/// use polymap_discriminator::{DiscriminatorCodec, DiscriminatorMap, DiscriminatorValue};
/// use std::sync::Arc;
///
/// let map = DiscriminatorMap::new([(1, "Employee"), (2, "Project")]).unwrap();
/// let codec = DiscriminatorCodec::new(map, Arc::new(IntegerColumn::regular())).unwrap();
///
/// let tag = codec.decode(Some(&DiscriminatorValue::Integer(1))).unwrap();
/// assert_eq!(tag.unwrap(), "Employee");
/// assert_eq!(
///     codec.encode(Some("Project")).unwrap(),
///     Some(DiscriminatorValue::Integer(2))
/// );
/// assert!(codec.decode(Some(&DiscriminatorValue::Integer(3))).is_err());
/// assert_eq!(codec.decode(None).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct DiscriminatorCodec {
	map: Arc<DiscriminatorMap>,
	column: Arc<dyn ColumnCodec>,
}

impl DiscriminatorCodec {
	/// Create a codec over a validated map and an underlying column codec
	///
	/// Fails with [`DiscriminatorError::IncompatibleValue`] if any mapped raw
	/// value cannot be stored by `column`.
	pub fn new(map: DiscriminatorMap, column: Arc<dyn ColumnCodec>) -> DiscriminatorResult<Self> {
		for value in map.values() {
			column
				.validate(value)
				.map_err(|reason| DiscriminatorError::IncompatibleValue {
					value: value.clone(),
					column_type: column.name().to_string(),
					reason,
				})?;
		}

		Ok(Self {
			map: Arc::new(map),
			column,
		})
	}

	/// Get the underlying map
	pub fn map(&self) -> &DiscriminatorMap {
		&self.map
	}

	/// Get the underlying column codec
	pub fn column(&self) -> &Arc<dyn ColumnCodec> {
		&self.column
	}

	/// Name of the underlying column type
	pub fn name(&self) -> &str {
		self.column.name()
	}

	/// Translate a raw column value into a type tag
	///
	/// A null value yields `Ok(None)`. A non-null value that is not mapped is a
	/// [`DiscriminatorError::UnknownValue`].
	pub fn decode(&self, raw: Option<&DiscriminatorValue>) -> DiscriminatorResult<Option<TypeTag>> {
		let Some(raw) = raw else {
			return Ok(None);
		};
		match self.map.tag_for(raw) {
			Some(tag) => Ok(Some(tag.clone())),
			None => {
				tracing::warn!(value = %raw, column_type = self.name(), "Unknown discriminator value");
				Err(DiscriminatorError::UnknownValue(raw.clone()))
			}
		}
	}

	/// Translate a type tag into its raw column value
	///
	/// A null tag yields `Ok(None)`. A tag that is not mapped is a
	/// [`DiscriminatorError::UnknownTag`].
	pub fn encode(&self, tag: Option<&str>) -> DiscriminatorResult<Option<DiscriminatorValue>> {
		let Some(tag) = tag else {
			return Ok(None);
		};
		match self.map.value_for(tag) {
			Some(value) => Ok(Some(value.clone())),
			None => {
				tracing::warn!(tag, column_type = self.name(), "Unregistered discriminator type");
				Err(DiscriminatorError::UnknownTag(TypeTag::new(tag)))
			}
		}
	}

	/// Read the discriminator columns of `row` and decode the type tag
	pub fn read(&self, row: &dyn ResultRow, columns: &[&str]) -> DiscriminatorResult<Option<TypeTag>> {
		let raw = self.column.read_raw(row, columns)?;
		let tag = self.decode(raw.as_ref())?;
		tracing::trace!(?columns, tag = ?tag, "Decoded discriminator");
		Ok(tag)
	}

	/// Encode `tag` and bind it at `index`
	pub fn write(
		&self,
		sink: &mut dyn ParameterSink,
		tag: Option<&str>,
		index: usize,
	) -> DiscriminatorResult<()> {
		let raw = self.encode(tag)?;
		self.column.write_raw(sink, raw.as_ref(), index)?;
		Ok(())
	}

	/// Encode and bind `tag` only when its column is settable
	///
	/// An insert-only discriminator column is passed `settable = [false]` on
	/// update, in which case nothing is bound and the tag is not even encoded.
	pub fn write_settable(
		&self,
		sink: &mut dyn ParameterSink,
		tag: Option<&str>,
		index: usize,
		settable: &[bool],
	) -> DiscriminatorResult<()> {
		if settable.first().copied().unwrap_or(false) {
			self.write(sink, tag, index)?;
		}
		Ok(())
	}

	/// Tags are immutable values
	pub fn is_mutable(&self) -> bool {
		false
	}

	/// Copy a tag for snapshotting; tags are shared, so this is the same tag
	pub fn deep_copy(&self, tag: Option<&TypeTag>) -> Option<TypeTag> {
		tag.cloned()
	}

	/// Merge `original` onto `target`; tags are shared, so `original` wins
	pub fn replace(&self, original: Option<&TypeTag>, _target: Option<&TypeTag>) -> Option<TypeTag> {
		original.cloned()
	}

	/// Dirty-check two tag states
	///
	/// Short-circuits to "unchanged" when the caller marks the column as not
	/// checkable (`checkable[0] == false`, or an empty slice).
	pub fn is_dirty(&self, old: Option<&TypeTag>, current: Option<&TypeTag>, checkable: &[bool]) -> bool {
		checkable.first().copied().unwrap_or(false) && old != current
	}

	/// Render a tag for logs; the tag name, not the raw code
	pub fn to_display_string(&self, tag: Option<&TypeTag>) -> String {
		tag.map_or_else(|| NULL_DISPLAY.to_string(), |t| t.as_str().to_string())
	}

	/// Parse the display form back into a registered tag
	pub fn from_display_string(&self, text: &str) -> DiscriminatorResult<TypeTag> {
		self.map
			.tag(text)
			.cloned()
			.ok_or_else(|| DiscriminatorError::UnknownTag(TypeTag::new(text)))
	}

	/// SQL types of the underlying column(s)
	pub fn sql_types(&self, ctx: &SchemaContext) -> Vec<sea_query::ColumnType> {
		self.column.sql_types(ctx)
	}

	/// Number of columns spanned by the underlying codec
	pub fn column_span(&self, ctx: &SchemaContext) -> usize {
		self.column.column_span(ctx)
	}

	/// Sizes dictated by the underlying codec
	pub fn dictated_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		self.column.dictated_sizes(ctx)
	}

	/// Default sizes of the underlying codec
	pub fn default_sizes(&self, ctx: &SchemaContext) -> Vec<ColumnSize> {
		self.column.default_sizes(ctx)
	}
}
