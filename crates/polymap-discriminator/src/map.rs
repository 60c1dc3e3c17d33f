//! Immutable bijection between raw discriminator values and type tags.

use crate::error::{DiscriminatorError, DiscriminatorResult};
use crate::tag::TypeTag;
use crate::value::DiscriminatorValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Bidirectional mapping between discriminator values and type tags
///
/// The map is built once by [`DiscriminatorMap::new`], which rejects any input
/// that is not a bijection, and exposes no mutators afterwards. Both
/// directions are precomputed so lookups are O(1).
///
/// # Examples
///
/// ```
/// use polymap_discriminator::{DiscriminatorMap, DiscriminatorValue};
///
/// let map = DiscriminatorMap::new([(1, "Employee"), (2, "Project")]).unwrap();
/// assert_eq!(map.tag_for(&DiscriminatorValue::Integer(1)).unwrap(), "Employee");
/// assert_eq!(map.value_for("Project"), Some(&DiscriminatorValue::Integer(2)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorMap {
	/// Raw value -> tag, in registration order
	forward: IndexMap<DiscriminatorValue, TypeTag>,
	/// Tag -> raw value
	reverse: HashMap<TypeTag, DiscriminatorValue>,
}

impl DiscriminatorMap {
	/// Build a map from `(value, tag)` pairs
	///
	/// Fails with [`DiscriminatorError::DuplicateValue`] when a raw value is
	/// listed twice and [`DiscriminatorError::DuplicateTag`] when a tag is
	/// listed twice, even if the repeated pair is identical.
	pub fn new<V, T, I>(pairs: I) -> DiscriminatorResult<Self>
	where
		V: Into<DiscriminatorValue>,
		T: Into<TypeTag>,
		I: IntoIterator<Item = (V, T)>,
	{
		let mut forward: IndexMap<DiscriminatorValue, TypeTag> = IndexMap::new();
		let mut reverse: HashMap<TypeTag, DiscriminatorValue> = HashMap::new();

		for (value, tag) in pairs {
			let value = value.into();
			let tag = tag.into();

			if let Some(first) = forward.get(&value) {
				return Err(DiscriminatorError::DuplicateValue {
					value,
					first: first.clone(),
					second: tag,
				});
			}
			if let Some(first) = reverse.get(&tag) {
				return Err(DiscriminatorError::DuplicateTag {
					tag,
					first: first.clone(),
					second: value,
				});
			}

			reverse.insert(tag.clone(), value.clone());
			forward.insert(value, tag);
		}

		if forward.is_empty() {
			tracing::warn!("Built an empty discriminator map; every non-null value will be rejected");
		}

		Ok(Self { forward, reverse })
	}

	/// Get the tag registered for a raw value
	pub fn tag_for(&self, value: &DiscriminatorValue) -> Option<&TypeTag> {
		self.forward.get(value)
	}

	/// Get the raw value registered for a tag
	pub fn value_for(&self, tag: &str) -> Option<&DiscriminatorValue> {
		self.reverse.get(tag)
	}

	/// Get the registered tag with the given name
	///
	/// The returned tag shares its storage with the one held by the map.
	pub fn tag(&self, name: &str) -> Option<&TypeTag> {
		self.reverse.get_key_value(name).map(|(tag, _)| tag)
	}

	/// Returns true if the tag is registered
	pub fn contains_tag(&self, tag: &str) -> bool {
		self.tag(tag).is_some()
	}

	/// Number of registered pairs
	pub fn len(&self) -> usize {
		self.forward.len()
	}

	/// Returns true when no pairs are registered
	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}

	/// Iterate over `(value, tag)` pairs in registration order
	pub fn iter(&self) -> impl Iterator<Item = (&DiscriminatorValue, &TypeTag)> {
		self.forward.iter()
	}

	/// Iterate over registered tags in registration order
	pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
		self.forward.values()
	}

	/// Iterate over registered raw values in registration order
	pub fn values(&self) -> impl Iterator<Item = &DiscriminatorValue> {
		self.forward.keys()
	}
}
