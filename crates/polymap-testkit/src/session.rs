//! In-memory [`Session`] that records every call

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use polymap_fetch::{EntityMapping, PrimaryKey, RelationshipDescriptor, Row, Session, SessionError};
use std::collections::HashMap;

/// A call observed by [`MemorySession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
	FindRow {
		entity: String,
		key: PrimaryKey,
	},
	FetchRelated {
		owner: String,
		owner_key: PrimaryKey,
		relationship: String,
	},
}

type LinkKey = (String, PrimaryKey, String);

/// Rows stored per table, relationships stored as key links
///
/// Rows are matched on the primary key column of the mapping passed to each
/// call, so entities sharing a table (single-table inheritance) see the same
/// rows. A table exists once a row has been stored in it or it has been
/// declared with [`MemorySession::with_table`]; reading any other table fails
/// with [`SessionError::TableNotAvailable`].
///
/// # Examples
///
/// ```
/// use polymap_testkit::MemorySession;
/// use serde_json::json;
///
/// let session = MemorySession::new()
///     .with_row("project", json!({"id": 10, "name": "Apollo"}))
///     .with_link("employee", 1, "projects", [10]);
///
/// assert_eq!(session.row_count("project"), 1);
/// assert_eq!(session.call_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemorySession {
	tables: RwLock<HashMap<String, Vec<Row>>>,
	links: RwLock<HashMap<LinkKey, Vec<PrimaryKey>>>,
	calls: Mutex<Vec<SessionCall>>,
}

impl MemorySession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_row(self, table: &str, row: serde_json::Value) -> Self {
		self.insert_row(table, row);
		self
	}

	pub fn with_link<K, I>(self, owner_table: &str, owner_key: K, relationship: &str, targets: I) -> Self
	where
		K: Into<PrimaryKey>,
		I: IntoIterator,
		I::Item: Into<PrimaryKey>,
	{
		self.link(owner_table, owner_key, relationship, targets);
		self
	}

	/// Declare an empty table
	pub fn with_table(self, table: &str) -> Self {
		self.tables.write().entry(table.to_string()).or_default();
		self
	}

	/// Store a row; non-object values are ignored
	pub fn insert_row(&self, table: &str, row: serde_json::Value) {
		if let serde_json::Value::Object(row) = row {
			self.tables
				.write()
				.entry(table.to_string())
				.or_default()
				.push(row);
		}
	}

	/// Relate an owner row to target rows by primary key
	pub fn link<K, I>(&self, owner_table: &str, owner_key: K, relationship: &str, targets: I)
	where
		K: Into<PrimaryKey>,
		I: IntoIterator,
		I::Item: Into<PrimaryKey>,
	{
		self.links
			.write()
			.entry((owner_table.to_string(), owner_key.into(), relationship.to_string()))
			.or_default()
			.extend(targets.into_iter().map(Into::into));
	}

	pub fn row_count(&self, table: &str) -> usize {
		self.tables.read().get(table).map_or(0, Vec::len)
	}

	/// Number of session calls made so far
	pub fn call_count(&self) -> usize {
		self.calls.lock().len()
	}

	pub fn calls(&self) -> Vec<SessionCall> {
		self.calls.lock().clone()
	}

	pub fn reset_calls(&self) {
		self.calls.lock().clear();
	}

	fn find_in_table(
		&self,
		table: &str,
		pk_column: &str,
		key: &PrimaryKey,
	) -> Result<Option<Row>, SessionError> {
		let tables = self.tables.read();
		let rows = tables
			.get(table)
			.ok_or_else(|| SessionError::TableNotAvailable(table.to_string()))?;
		Ok(rows
			.iter()
			.find(|row| row.get(pk_column).is_some_and(|value| key.matches(value)))
			.cloned())
	}
}

#[async_trait]
impl Session for MemorySession {
	async fn find_row(
		&self,
		entity: &EntityMapping,
		key: &PrimaryKey,
	) -> Result<Option<Row>, SessionError> {
		self.calls.lock().push(SessionCall::FindRow {
			entity: entity.name().to_string(),
			key: key.clone(),
		});
		self.find_in_table(entity.table(), entity.primary_key(), key)
	}

	async fn fetch_related(
		&self,
		owner: &EntityMapping,
		owner_key: &PrimaryKey,
		relationship: &RelationshipDescriptor,
		target: &EntityMapping,
	) -> Result<Vec<Row>, SessionError> {
		self.calls.lock().push(SessionCall::FetchRelated {
			owner: owner.name().to_string(),
			owner_key: owner_key.clone(),
			relationship: relationship.name().to_string(),
		});

		let link = (
			owner.table().to_string(),
			owner_key.clone(),
			relationship.name().to_string(),
		);
		let targets = self.links.read().get(&link).cloned().unwrap_or_default();
		targets
			.iter()
			.map(|key| {
				self.find_in_table(target.table(), target.primary_key(), key)?
					.ok_or_else(|| {
						SessionError::Backend(format!(
							"{}.{} links to missing {} row {}",
							owner.name(),
							relationship.name(),
							target.table(),
							key
						))
					})
			})
			.collect()
	}
}
