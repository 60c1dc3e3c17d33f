//! # Polymap
//!
//! Polymorphic discriminator mapping and entity-graph fetch plans for ORM
//! mapping layers.
//!
//! Polymap covers two narrow pieces of an object-relational mapping layer:
//!
//! - **Discriminator mapping**: a single column stores a terse raw code for
//!   each row of a table shared by a type hierarchy. The
//!   [`DiscriminatorCodec`] translates between that code and the logical
//!   type name, in both directions, through an immutable bijective
//!   [`DiscriminatorMap`].
//! - **Fetch plans**: a named set of relationship paths that a lookup loads
//!   eagerly on top of each relationship's static fetch type. The
//!   `FetchPlanSelector` resolves plans by name and hydrates aggregates through
//!   a caller-supplied session.
//!
//! ## Feature Flags
//!
//! - `discriminator` - Discriminator codec and column codecs (always enabled)
//! - `fetch` - Entity mappings, registry, fetch plans and the selector
//! - `conf` - TOML mapping files and registry bootstrap
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "conf")]
//! # {
//! use polymap::prelude::*;
//!
//! let registry = MappingSettings::from_toml_str(r#"
//! [[entity]]
//! name = "Employee"
//! table = "employee"
//!
//! [[entity.relationship]]
//! name = "projects"
//! target = "Project"
//! kind = "many_to_many"
//!
//! [[entity.fetch_plan]]
//! name = "employee.projects"
//! paths = ["projects"]
//!
//! [[entity]]
//! name = "Project"
//! table = "project"
//! "#)
//! .unwrap()
//! .into_registry()
//! .unwrap();
//!
//! let selector = FetchPlanSelector::new(std::sync::Arc::new(registry));
//! let plan = selector.resolve("employee.projects").unwrap();
//! assert!(plan.contains("projects"));
//! # }
//! ```

pub mod conf;
pub mod discriminator;
pub mod fetch;

// Re-export commonly used types
pub use polymap_discriminator::{
	DiscriminatorCodec, DiscriminatorError, DiscriminatorMap, DiscriminatorResult,
	DiscriminatorValue, TypeTag,
};

#[cfg(feature = "fetch")]
pub use polymap_fetch::{
	Aggregate, EntityMapping, FetchError, FetchPlan, FetchPlanSelector, FetchResult, FetchType,
	LookupRequest, MappingRegistry, PrimaryKey, RelationshipDescriptor, RelationshipType,
	Session,
};

#[cfg(feature = "conf")]
pub use polymap_conf::{ConfError, ConfResult, MappingSettings};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::discriminator::column::{
		BooleanColumn, CharColumn, ColumnCodec, IntegerColumn, ResultRow, SchemaContext,
		TextColumn,
	};
	pub use crate::{
		DiscriminatorCodec, DiscriminatorError, DiscriminatorMap, DiscriminatorValue, TypeTag,
	};

	#[cfg(feature = "fetch")]
	pub use crate::fetch::{
		Aggregate, DeferredRelation, EntityMapping, FetchError, FetchPlan, FetchPlanSelector,
		FetchType, LookupRequest, MappingRegistry, PrimaryKey, Related, Relation,
		RelationshipDescriptor, RelationshipType, Row, Session, SessionError,
	};

	#[cfg(feature = "conf")]
	pub use crate::conf::{ConfError, MappingSettings};
}
