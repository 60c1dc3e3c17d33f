//! Error types for mapping registration and aggregate loading.

use polymap_discriminator::{DiscriminatorError, TypeTag};
use thiserror::Error;

/// Errors reported by a [`Session`](crate::session::Session) implementation
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SessionError {
	/// Backend failed to execute the request
	#[error("Backend error: {0}")]
	Backend(String),

	/// The session has no storage for the entity's table
	#[error("Table not available: {0}")]
	TableNotAvailable(String),
}

/// Errors raised by the mapping registry and the fetch plan selector
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FetchError {
	/// Entity registered twice
	#[error("Entity registered more than once: {0}")]
	DuplicateEntity(TypeTag),

	/// Parent entity is not registered
	#[error("Entity '{entity}' extends unknown entity '{parent}'")]
	UnknownParent { entity: TypeTag, parent: TypeTag },

	/// Parent chain loops back on itself
	#[error("Inheritance cycle through entity '{0}'")]
	InheritanceCycle(TypeTag),

	/// Only hierarchy roots may declare a discriminator
	#[error("Entity '{0}' declares a discriminator but is not a hierarchy root")]
	DiscriminatorOnSubtype(TypeTag),

	/// Discriminator maps a value to a type outside the hierarchy
	#[error("Discriminator of '{root}' maps to '{tag}', which is not an entity of that hierarchy")]
	UnknownDiscriminatorType { root: TypeTag, tag: TypeTag },

	/// Relationship name declared twice along the inheritance chain
	#[error("Relationship '{relationship}' declared more than once for entity '{entity}'")]
	DuplicateRelationship {
		entity: TypeTag,
		relationship: String,
	},

	/// Relationship targets an unregistered entity
	#[error("Relationship '{entity}.{relationship}' targets unknown entity '{target}'")]
	UnknownRelationshipTarget {
		entity: TypeTag,
		relationship: String,
		target: TypeTag,
	},

	/// Fetch plan name registered twice
	#[error("Fetch plan registered more than once: {0}")]
	DuplicatePlan(String),

	/// Fetch plan declared for an unregistered entity
	#[error("Fetch plan '{plan}' is declared for unknown entity '{entity}'")]
	PlanForUnknownEntity { plan: String, entity: TypeTag },

	/// Fetch plan names a path the entity does not have
	#[error("Fetch plan '{plan}' names unknown relationship '{path}' of entity '{entity}'")]
	UnknownPlanPath {
		plan: String,
		entity: TypeTag,
		path: String,
	},

	/// Fetch plan names a multi-level path
	#[error("Fetch plan '{plan}' names nested path '{path}'; only single-level paths are supported")]
	NestedPlanPath { plan: String, path: String },

	/// Entity is not registered
	#[error("Unknown entity: {0}")]
	UnknownEntity(String),

	/// No fetch plan with this name
	#[error("Unknown fetch plan: {0}")]
	UnknownFetchPlan(String),

	/// Fetch plan does not apply to the requested entity
	#[error("Fetch plan '{plan}' belongs to '{plan_entity}' and cannot load '{requested}'")]
	PlanEntityMismatch {
		plan: String,
		plan_entity: TypeTag,
		requested: TypeTag,
	},

	/// Related row resolved to a type outside the relationship target
	#[error("Row of '{expected}' resolved to unrelated type '{found}'")]
	UnexpectedSubtype { expected: TypeTag, found: TypeTag },

	/// Row lacks its primary key column
	#[error("Row of '{entity}' has no primary key column '{column}'")]
	MissingPrimaryKey { entity: TypeTag, column: String },

	/// Primary key column holds an unusable value
	#[error("Row of '{entity}' has invalid primary key in column '{column}': {found}")]
	InvalidPrimaryKey {
		entity: TypeTag,
		column: String,
		found: String,
	},

	/// Singular relationship produced several rows
	#[error("Relationship '{entity}.{relationship}' is singular but returned {count} rows")]
	MultipleRowsForSingular {
		entity: TypeTag,
		relationship: String,
		count: usize,
	},

	/// Discriminator decoding failed
	#[error("Discriminator error: {0}")]
	Discriminator(#[from] DiscriminatorError),

	/// Session collaborator failed
	#[error("Session error: {0}")]
	Session(#[from] SessionError),
}

impl FetchError {
	/// Returns true for errors raised while building the mapping registry
	pub fn is_configuration_error(&self) -> bool {
		match self {
			FetchError::DuplicateEntity(_)
			| FetchError::UnknownParent { .. }
			| FetchError::InheritanceCycle(_)
			| FetchError::DiscriminatorOnSubtype(_)
			| FetchError::UnknownDiscriminatorType { .. }
			| FetchError::DuplicateRelationship { .. }
			| FetchError::UnknownRelationshipTarget { .. }
			| FetchError::DuplicatePlan(_)
			| FetchError::PlanForUnknownEntity { .. }
			| FetchError::UnknownPlanPath { .. }
			| FetchError::NestedPlanPath { .. } => true,
			FetchError::Discriminator(e) => e.is_configuration_error(),
			_ => false,
		}
	}

	/// Returns true when loaded data disagrees with the registered mapping
	pub fn is_mapping_inconsistency(&self) -> bool {
		match self {
			FetchError::UnexpectedSubtype { .. } => true,
			FetchError::Discriminator(e) => e.is_mapping_inconsistency(),
			_ => false,
		}
	}
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
