//! # Polymap Fetch
//!
//! Entity mapping metadata, named fetch plans and the selector that loads
//! aggregates honoring them.
//!
//! ## Components
//!
//! - [`EntityMapping`] / [`RelationshipDescriptor`]: per-entity metadata with
//!   static fetch types and single-table inheritance
//! - [`MappingRegistry`]: immutable registry built once by
//!   [`MappingRegistryBuilder::build`]
//! - [`FetchPlan`]: named set of relationship paths to load eagerly
//! - [`Session`]: row access collaborator
//! - [`FetchPlanSelector`]: resolves plans and loads [`Aggregate`]s
//!
//! ## Fetch plan semantics
//!
//! A plan only adds eagerness. Relationships it names are populated in the
//! same load; all others keep the fetch type declared in their mapping, so a
//! statically eager relationship is loaded with or without a plan.
//!
//! ## Quick Start
//!
//! ```
//! use polymap_fetch::{
//!     EntityMapping, FetchPlan, FetchPlanSelector, MappingRegistry, RelationshipDescriptor,
//!     RelationshipType,
//! };
//! use std::sync::Arc;
//!
//! let registry = MappingRegistry::builder()
//!     .register_entity(
//!         EntityMapping::new("Employee", "employee").with_relationship(
//!             RelationshipDescriptor::new("projects", "Project", RelationshipType::ManyToMany),
//!         ),
//!     )
//!     .register_entity(EntityMapping::new("Project", "project"))
//!     .register_plan(FetchPlan::new("employee.projects", "Employee", ["projects"]))
//!     .build()
//!     .unwrap();
//!
//! let selector = FetchPlanSelector::new(Arc::new(registry));
//! assert!(selector.resolve("employee.projects").is_ok());
//! assert!(selector.resolve("does-not-exist").is_err());
//! ```

pub mod aggregate;
pub mod error;
pub mod key;
pub mod mapping;
pub mod plan;
pub mod registry;
pub mod selector;
pub mod session;

pub use aggregate::{Aggregate, DeferredRelation, Related, Relation};
pub use error::{FetchError, FetchResult, SessionError};
pub use key::PrimaryKey;
pub use mapping::{
	DiscriminatorBinding, EntityMapping, FetchType, RelationshipDescriptor, RelationshipType,
};
pub use plan::FetchPlan;
pub use registry::{MappingRegistry, MappingRegistryBuilder};
pub use selector::{FetchPlanSelector, LookupRequest};
pub use session::{Row, Session};
