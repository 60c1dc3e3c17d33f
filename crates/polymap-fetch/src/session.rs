//! Session collaborator
//!
//! The selector never talks to storage directly. It describes what to load
//! and a [`Session`] performs the row I/O inside whatever unit of work the
//! caller has opened.

use crate::error::SessionError;
use crate::key::PrimaryKey;
use crate::mapping::{EntityMapping, RelationshipDescriptor};
use async_trait::async_trait;

/// A fetched row keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Row access primitives supplied by the surrounding unit of work
#[async_trait]
pub trait Session: Send + Sync {
	/// Fetch the row of `entity` with primary key `key`
	///
	/// Returns `Ok(None)` when no row exists.
	async fn find_row(
		&self,
		entity: &EntityMapping,
		key: &PrimaryKey,
	) -> Result<Option<Row>, SessionError>;

	/// Fetch the rows related to one owner through `relationship`
	///
	/// `target` is the mapping of the relationship's declared target entity.
	async fn fetch_related(
		&self,
		owner: &EntityMapping,
		owner_key: &PrimaryKey,
		relationship: &RelationshipDescriptor,
		target: &EntityMapping,
	) -> Result<Vec<Row>, SessionError>;
}
