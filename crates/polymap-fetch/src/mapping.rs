//! Entity mapping metadata
//!
//! Describes how an entity is stored (table, primary key column), where it
//! sits in a polymorphic hierarchy, and which relationships it declares along
//! with their static fetch type.

use polymap_discriminator::{DiscriminatorCodec, TypeTag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static loading behaviour of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchType {
	/// Populated as part of the owning load
	Eager,
	/// Left as a deferred placeholder until first access
	Lazy,
}

impl FetchType {
	pub fn is_eager(&self) -> bool {
		matches!(self, FetchType::Eager)
	}
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
	ManyToOne,
	OneToOne,
	OneToMany,
	ManyToMany,
}

impl RelationshipType {
	/// Collection-valued relationships hold zero or more related aggregates
	pub fn is_collection(&self) -> bool {
		matches!(self, RelationshipType::OneToMany | RelationshipType::ManyToMany)
	}

	/// Default fetch type when a mapping does not declare one
	///
	/// Singular relationships load eagerly, collections lazily.
	///
	/// # Examples
	///
	/// ```
	/// use polymap_fetch::{FetchType, RelationshipType};
	///
	/// assert_eq!(RelationshipType::ManyToOne.default_fetch(), FetchType::Eager);
	/// assert_eq!(RelationshipType::ManyToMany.default_fetch(), FetchType::Lazy);
	/// ```
	pub fn default_fetch(&self) -> FetchType {
		if self.is_collection() {
			FetchType::Lazy
		} else {
			FetchType::Eager
		}
	}
}

/// A relationship attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDescriptor {
	name: String,
	target: TypeTag,
	relationship_type: RelationshipType,
	fetch: FetchType,
}

impl RelationshipDescriptor {
	/// Create a relationship with the default fetch type for its cardinality
	pub fn new(
		name: impl Into<String>,
		target: impl Into<TypeTag>,
		relationship_type: RelationshipType,
	) -> Self {
		Self {
			name: name.into(),
			target: target.into(),
			relationship_type,
			fetch: relationship_type.default_fetch(),
		}
	}

	pub fn with_fetch(mut self, fetch: FetchType) -> Self {
		self.fetch = fetch;
		self
	}

	pub fn eager(self) -> Self {
		self.with_fetch(FetchType::Eager)
	}

	pub fn lazy(self) -> Self {
		self.with_fetch(FetchType::Lazy)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn target(&self) -> &TypeTag {
		&self.target
	}

	pub fn relationship_type(&self) -> RelationshipType {
		self.relationship_type
	}

	/// Statically declared fetch type
	pub fn fetch(&self) -> FetchType {
		self.fetch
	}

	pub fn is_collection(&self) -> bool {
		self.relationship_type.is_collection()
	}
}

/// Discriminator column(s) and codec of a hierarchy root
#[derive(Debug, Clone)]
pub struct DiscriminatorBinding {
	columns: Vec<String>,
	codec: Arc<DiscriminatorCodec>,
}

impl DiscriminatorBinding {
	pub fn new(columns: Vec<String>, codec: Arc<DiscriminatorCodec>) -> Self {
		Self { columns, codec }
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Column names borrowed as the column codec expects them
	pub fn column_refs(&self) -> Vec<&str> {
		self.columns.iter().map(String::as_str).collect()
	}

	pub fn codec(&self) -> &Arc<DiscriminatorCodec> {
		&self.codec
	}
}

/// Mapping metadata of one entity
///
/// # Examples
///
/// ```
/// use polymap_fetch::{EntityMapping, RelationshipDescriptor, RelationshipType};
///
/// let employee = EntityMapping::new("Employee", "employee")
///     .with_relationship(
///         RelationshipDescriptor::new("department", "Department", RelationshipType::ManyToOne).lazy(),
///     );
///
/// assert_eq!(employee.primary_key(), "id");
/// assert!(employee.relationship("department").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct EntityMapping {
	name: TypeTag,
	table: String,
	primary_key: String,
	parent: Option<TypeTag>,
	discriminator: Option<DiscriminatorBinding>,
	relationships: Vec<RelationshipDescriptor>,
}

impl EntityMapping {
	pub fn new(name: impl Into<TypeTag>, table: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			table: table.into(),
			primary_key: "id".to_string(),
			parent: None,
			discriminator: None,
			relationships: Vec::new(),
		}
	}

	pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
		self.primary_key = column.into();
		self
	}

	/// Declare the parent entity in the inheritance hierarchy
	pub fn extends(mut self, parent: impl Into<TypeTag>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	/// Attach a single-column discriminator; only valid on a hierarchy root
	pub fn with_discriminator(mut self, column: impl Into<String>, codec: DiscriminatorCodec) -> Self {
		self.discriminator = Some(DiscriminatorBinding::new(vec![column.into()], Arc::new(codec)));
		self
	}

	pub fn with_discriminator_binding(mut self, binding: DiscriminatorBinding) -> Self {
		self.discriminator = Some(binding);
		self
	}

	pub fn with_relationship(mut self, relationship: RelationshipDescriptor) -> Self {
		self.relationships.push(relationship);
		self
	}

	pub fn name(&self) -> &TypeTag {
		&self.name
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn primary_key(&self) -> &str {
		&self.primary_key
	}

	pub fn parent(&self) -> Option<&TypeTag> {
		self.parent.as_ref()
	}

	pub fn discriminator(&self) -> Option<&DiscriminatorBinding> {
		self.discriminator.as_ref()
	}

	/// Relationships declared directly on this entity, not inherited ones
	pub fn declared_relationships(&self) -> &[RelationshipDescriptor] {
		&self.relationships
	}

	/// Relationship declared directly on this entity
	pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
		self.relationships.iter().find(|r| r.name() == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RelationshipType::ManyToOne, FetchType::Eager)]
	#[case(RelationshipType::OneToOne, FetchType::Eager)]
	#[case(RelationshipType::OneToMany, FetchType::Lazy)]
	#[case(RelationshipType::ManyToMany, FetchType::Lazy)]
	fn test_default_fetch_by_cardinality(
		#[case] relationship_type: RelationshipType,
		#[case] expected: FetchType,
	) {
		let rel = RelationshipDescriptor::new("rel", "Target", relationship_type);
		assert_eq!(rel.fetch(), expected);
	}

	#[rstest]
	fn test_declared_fetch_overrides_default() {
		// Arrange
		let department =
			RelationshipDescriptor::new("department", "Department", RelationshipType::ManyToOne);

		// Act
		let lazy = department.clone().lazy();

		// Assert
		assert!(department.fetch().is_eager());
		assert!(!lazy.fetch().is_eager());
		assert!(!lazy.is_collection());
	}

	#[rstest]
	fn test_entity_builder() {
		// Arrange & Act
		let employee = EntityMapping::new("Employee", "employee")
			.with_primary_key("emp_id")
			.extends("Person")
			.with_relationship(RelationshipDescriptor::new(
				"projects",
				"Project",
				RelationshipType::ManyToMany,
			));

		// Assert
		assert_eq!(employee.name(), "Employee");
		assert_eq!(employee.table(), "employee");
		assert_eq!(employee.primary_key(), "emp_id");
		assert_eq!(employee.parent().map(TypeTag::as_str), Some("Person"));
		assert!(employee.discriminator().is_none());
		assert_eq!(employee.declared_relationships().len(), 1);
		assert!(employee.relationship("projects").is_some_and(|r| r.is_collection()));
		assert!(employee.relationship("department").is_none());
	}
}
