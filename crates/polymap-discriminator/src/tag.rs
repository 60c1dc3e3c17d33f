//! Logical type identity used throughout the mapping layer.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque name of a concrete type within a polymorphic hierarchy
///
/// A tag is not a database value. It is the logical entity name the rest of
/// the mapping layer uses to find constructors and metadata. Tags are atomic
/// and shared: cloning only bumps a reference count.
///
/// # Examples
///
/// ```
/// use polymap_discriminator::TypeTag;
///
/// let tag = TypeTag::new("Employee");
/// assert_eq!(tag.as_str(), "Employee");
/// assert_eq!(tag, "Employee");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeTag(Arc<str>);

impl TypeTag {
	/// Create a tag from an entity name
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	/// Get the entity name
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true when both tags share the same allocation
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeTag({:?})", self.as_str())
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for TypeTag {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}

impl From<&str> for TypeTag {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<TypeTag> for String {
	fn from(value: TypeTag) -> Self {
		value.as_str().to_string()
	}
}

impl AsRef<str> for TypeTag {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

impl Borrow<str> for TypeTag {
	fn borrow(&self) -> &str {
		self.as_str()
	}
}

impl PartialEq<str> for TypeTag {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl PartialEq<&str> for TypeTag {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == *other
	}
}
