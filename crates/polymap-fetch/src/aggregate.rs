//! Hydrated aggregates
//!
//! An [`Aggregate`] owns its row attributes and one [`Relation`] per mapped
//! relationship. A relation is either already loaded or a
//! [`DeferredRelation`] placeholder that an external lazy-loading layer can
//! resolve on first access.

use crate::key::PrimaryKey;
use crate::session::Row;
use indexmap::IndexMap;
use polymap_discriminator::TypeTag;

/// Placeholder for a relationship that was not loaded
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredRelation {
	owner: TypeTag,
	owner_key: PrimaryKey,
	relationship: String,
	target: TypeTag,
}

impl DeferredRelation {
	pub fn new(
		owner: TypeTag,
		owner_key: PrimaryKey,
		relationship: impl Into<String>,
		target: TypeTag,
	) -> Self {
		Self {
			owner,
			owner_key,
			relationship: relationship.into(),
			target,
		}
	}

	pub fn owner(&self) -> &TypeTag {
		&self.owner
	}

	pub fn owner_key(&self) -> &PrimaryKey {
		&self.owner_key
	}

	pub fn relationship(&self) -> &str {
		&self.relationship
	}

	pub fn target(&self) -> &TypeTag {
		&self.target
	}
}

/// Loaded relationship content
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
	/// Singular relationship; `None` when no related row exists
	One(Option<Box<Aggregate>>),
	/// Collection relationship
	Many(Vec<Aggregate>),
}

/// State of one relationship of an aggregate
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
	Loaded(Related),
	Deferred(DeferredRelation),
}

impl Relation {
	pub fn is_loaded(&self) -> bool {
		matches!(self, Relation::Loaded(_))
	}

	pub fn is_deferred(&self) -> bool {
		matches!(self, Relation::Deferred(_))
	}
}

/// An entity instance produced by the selector
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
	entity: TypeTag,
	key: PrimaryKey,
	attributes: Row,
	relations: IndexMap<String, Relation>,
}

impl Aggregate {
	pub fn new(entity: TypeTag, key: PrimaryKey, attributes: Row) -> Self {
		Self {
			entity,
			key,
			attributes,
			relations: IndexMap::new(),
		}
	}

	pub(crate) fn insert_relation(&mut self, name: impl Into<String>, relation: Relation) {
		self.relations.insert(name.into(), relation);
	}

	/// Concrete entity type, after discriminator resolution
	pub fn entity(&self) -> &TypeTag {
		&self.entity
	}

	pub fn key(&self) -> &PrimaryKey {
		&self.key
	}

	pub fn attributes(&self) -> &Row {
		&self.attributes
	}

	pub fn attribute(&self, column: &str) -> Option<&serde_json::Value> {
		self.attributes.get(column)
	}

	/// Relationships in mapping order
	pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
		self.relations.iter().map(|(name, rel)| (name.as_str(), rel))
	}

	pub fn relation(&self, name: &str) -> Option<&Relation> {
		self.relations.get(name)
	}

	/// Whether the relationship is populated
	///
	/// Unknown relationship names are reported as not loaded.
	pub fn is_loaded(&self, name: &str) -> bool {
		self.relation(name).is_some_and(Relation::is_loaded)
	}

	pub fn deferred(&self, name: &str) -> Option<&DeferredRelation> {
		match self.relation(name)? {
			Relation::Deferred(deferred) => Some(deferred),
			Relation::Loaded(_) => None,
		}
	}

	/// Loaded singular relationship
	///
	/// `None` when the relationship is deferred, a collection, or empty.
	pub fn related_one(&self, name: &str) -> Option<&Aggregate> {
		match self.relation(name)? {
			Relation::Loaded(Related::One(one)) => one.as_deref(),
			_ => None,
		}
	}

	/// Loaded collection relationship
	///
	/// `None` when the relationship is deferred or singular.
	pub fn related_many(&self, name: &str) -> Option<&[Aggregate]> {
		match self.relation(name)? {
			Relation::Loaded(Related::Many(many)) => Some(many.as_slice()),
			_ => None,
		}
	}
}
