//! Fetch plan selector
//!
//! Loads an aggregate by primary key through a [`Session`], populating every
//! relationship named by the fetch plan plus every relationship whose static
//! fetch type is eager. All other relationships are left as
//! [`DeferredRelation`] placeholders.
//!
//! Related aggregates follow their own statically eager relationships in
//! turn; plans only apply to the top-level aggregate. An aggregate reached a
//! second time within one load is kept shallow, so eager cycles end there.
//!
//! ## Polymorphic rows
//!
//! When the requested entity belongs to a hierarchy with a discriminator, the
//! concrete type of the row is decoded through the root's codec:
//!
//! - a null discriminator means the requested entity itself
//! - a type outside the requested entity's subtree means the row is not an
//!   instance of the requested entity, and the lookup yields `None`
//! - an unregistered raw value is a mapping inconsistency and fails the load

use crate::aggregate::{Aggregate, DeferredRelation, Related, Relation};
use crate::error::{FetchError, FetchResult};
use crate::key::PrimaryKey;
use crate::mapping::{EntityMapping, RelationshipDescriptor};
use crate::plan::FetchPlan;
use crate::registry::MappingRegistry;
use crate::session::{Row, Session};
use futures::future::BoxFuture;
use polymap_discriminator::TypeTag;
use std::collections::HashSet;
use std::sync::Arc;

/// Aggregates already hydrated during one load, by concrete type and key
type Visited = HashSet<(TypeTag, PrimaryKey)>;

/// Lookup at the outer API surface
///
/// # Examples
///
/// ```
/// use polymap_fetch::LookupRequest;
///
/// let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");
/// assert_eq!(request.fetch_plan(), Some("employee.projects"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
	entity: String,
	key: PrimaryKey,
	fetch_plan: Option<String>,
}

impl LookupRequest {
	/// Lookup using static fetch types only
	pub fn new(entity: impl Into<String>, key: impl Into<PrimaryKey>) -> Self {
		Self {
			entity: entity.into(),
			key: key.into(),
			fetch_plan: None,
		}
	}

	pub fn with_fetch_plan(mut self, name: impl Into<String>) -> Self {
		self.fetch_plan = Some(name.into());
		self
	}

	pub fn entity(&self) -> &str {
		&self.entity
	}

	pub fn key(&self) -> &PrimaryKey {
		&self.key
	}

	pub fn fetch_plan(&self) -> Option<&str> {
		self.fetch_plan.as_deref()
	}
}

/// Loads aggregates honoring named fetch plans
#[derive(Debug, Clone)]
pub struct FetchPlanSelector {
	registry: Arc<MappingRegistry>,
}

impl FetchPlanSelector {
	pub fn new(registry: Arc<MappingRegistry>) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &Arc<MappingRegistry> {
		&self.registry
	}

	/// Look up a fetch plan by exact name
	pub fn resolve(&self, name: &str) -> FetchResult<Arc<FetchPlan>> {
		match self.registry.plan(name) {
			Some(plan) => {
				tracing::debug!(plan = name, entity = %plan.entity(), "Resolved fetch plan");
				Ok(Arc::clone(plan))
			}
			None => Err(FetchError::UnknownFetchPlan(name.to_string())),
		}
	}

	/// Resolve the request's plan, then load
	///
	/// An unknown plan fails before the session is touched.
	pub async fn find(
		&self,
		session: &dyn Session,
		request: &LookupRequest,
	) -> FetchResult<Option<Aggregate>> {
		let plan = request
			.fetch_plan()
			.map(|name| self.resolve(name))
			.transpose()?;
		self.load(session, request.entity(), request.key(), plan.as_deref())
			.await
	}

	/// Load `entity` with primary key `key`
	///
	/// Returns `Ok(None)` when no row exists or when the row's discriminator
	/// names a type that is not `entity` or one of its subtypes.
	pub async fn load(
		&self,
		session: &dyn Session,
		entity: &str,
		key: &PrimaryKey,
		plan: Option<&FetchPlan>,
	) -> FetchResult<Option<Aggregate>> {
		let mapping = self
			.registry
			.entity(entity)
			.ok_or_else(|| FetchError::UnknownEntity(entity.to_string()))?;

		if let Some(plan) = plan
			&& !self.registry.is_same_or_subtype(entity, plan.entity().as_str())
		{
			return Err(FetchError::PlanEntityMismatch {
				plan: plan.name().to_string(),
				plan_entity: plan.entity().clone(),
				requested: mapping.name().clone(),
			});
		}

		tracing::debug!(
			entity,
			key = %key,
			plan = plan.map(FetchPlan::name),
			"Loading aggregate"
		);

		let Some(row) = session.find_row(mapping, key).await? else {
			tracing::debug!(entity, key = %key, "No row found");
			return Ok(None);
		};

		let concrete = self.concrete_type(mapping, &row)?;
		if !self.registry.is_same_or_subtype(concrete.as_str(), entity) {
			tracing::debug!(
				entity,
				key = %key,
				found = %concrete,
				"Row belongs to a type outside the requested hierarchy branch"
			);
			return Ok(None);
		}
		let concrete_mapping = self.mapping_of(&concrete)?;

		let mut visited = Visited::from([(concrete.clone(), key.clone())]);
		let mut aggregate = Aggregate::new(concrete.clone(), key.clone(), row);
		for relationship in self.registry.relationships(concrete.as_str()) {
			let planned = plan.is_some_and(|p| p.contains(relationship.name()));
			let relation = if planned || relationship.fetch().is_eager() {
				let related = self
					.load_related(session, concrete_mapping, key, relationship, &mut visited)
					.await?;
				Relation::Loaded(related)
			} else {
				Relation::Deferred(deferred(&concrete, key, relationship))
			};
			aggregate.insert_relation(relationship.name(), relation);
		}

		tracing::debug!(
			entity = %concrete,
			key = %key,
			"Aggregate loaded"
		);
		Ok(Some(aggregate))
	}

	async fn load_related(
		&self,
		session: &dyn Session,
		owner: &EntityMapping,
		owner_key: &PrimaryKey,
		relationship: &RelationshipDescriptor,
		visited: &mut Visited,
	) -> FetchResult<Related> {
		let target = self.mapping_of(relationship.target())?;
		let rows = session
			.fetch_related(owner, owner_key, relationship, target)
			.await?;

		tracing::debug!(
			owner = %owner.name(),
			relationship = relationship.name(),
			rows = rows.len(),
			"Eager sub-load"
		);

		if relationship.is_collection() {
			let mut related = Vec::with_capacity(rows.len());
			for row in rows {
				related.push(self.hydrate_related(session, target, row, visited).await?);
			}
			return Ok(Related::Many(related));
		}

		if rows.len() > 1 {
			return Err(FetchError::MultipleRowsForSingular {
				entity: owner.name().clone(),
				relationship: relationship.name().to_string(),
				count: rows.len(),
			});
		}
		let related = match rows.into_iter().next() {
			Some(row) => Some(Box::new(
				self.hydrate_related(session, target, row, visited).await?,
			)),
			None => None,
		};
		Ok(Related::One(related))
	}

	/// Build a related aggregate, following its statically eager relationships
	///
	/// A node already present in `visited` is returned shallow, with every
	/// relationship deferred, so eager cycles terminate.
	fn hydrate_related<'a>(
		&'a self,
		session: &'a dyn Session,
		target: &'a EntityMapping,
		row: Row,
		visited: &'a mut Visited,
	) -> BoxFuture<'a, FetchResult<Aggregate>> {
		Box::pin(async move {
			let concrete = self.concrete_type(target, &row)?;
			if !self
				.registry
				.is_same_or_subtype(concrete.as_str(), target.name().as_str())
			{
				tracing::warn!(
					expected = %target.name(),
					found = %concrete,
					"Related row resolved to a type outside the relationship target"
				);
				return Err(FetchError::UnexpectedSubtype {
					expected: target.name().clone(),
					found: concrete,
				});
			}
			let concrete_mapping = self.mapping_of(&concrete)?;
			let key = primary_key_of(concrete_mapping, &row)?;

			let expand = visited.insert((concrete.clone(), key.clone()));
			if !expand {
				tracing::trace!(entity = %concrete, key = %key, "Already visited, left shallow");
			}

			let mut aggregate = Aggregate::new(concrete.clone(), key.clone(), row);
			for relationship in self.registry.relationships(concrete.as_str()) {
				let relation = if expand && relationship.fetch().is_eager() {
					let related = self
						.load_related(session, concrete_mapping, &key, relationship, visited)
						.await?;
					Relation::Loaded(related)
				} else {
					Relation::Deferred(deferred(&concrete, &key, relationship))
				};
				aggregate.insert_relation(relationship.name(), relation);
			}
			Ok(aggregate)
		})
	}

	/// Concrete type of a row; the mapped entity when no discriminator applies
	fn concrete_type(&self, mapping: &EntityMapping, row: &Row) -> FetchResult<TypeTag> {
		let Some(binding) = self.registry.discriminator_for(mapping.name().as_str()) else {
			return Ok(mapping.name().clone());
		};
		let decoded = binding.codec().read(row, &binding.column_refs())?;
		tracing::trace!(
			entity = %mapping.name(),
			decoded = ?decoded,
			"Decoded discriminator"
		);
		Ok(decoded.unwrap_or_else(|| mapping.name().clone()))
	}

	fn mapping_of(&self, name: &TypeTag) -> FetchResult<&EntityMapping> {
		self.registry
			.entity(name.as_str())
			.ok_or_else(|| FetchError::UnknownEntity(name.to_string()))
	}
}

fn deferred(
	owner: &TypeTag,
	owner_key: &PrimaryKey,
	relationship: &RelationshipDescriptor,
) -> DeferredRelation {
	DeferredRelation::new(
		owner.clone(),
		owner_key.clone(),
		relationship.name(),
		relationship.target().clone(),
	)
}

fn primary_key_of(mapping: &EntityMapping, row: &Row) -> FetchResult<PrimaryKey> {
	let column = mapping.primary_key();
	let value = row.get(column).ok_or_else(|| FetchError::MissingPrimaryKey {
		entity: mapping.name().clone(),
		column: column.to_string(),
	})?;
	PrimaryKey::from_json(value).ok_or_else(|| FetchError::InvalidPrimaryKey {
		entity: mapping.name().clone(),
		column: column.to_string(),
		found: value.to_string(),
	})
}
