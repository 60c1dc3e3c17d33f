//! Mapping registry
//!
//! The registry is built once during bootstrap from entity mappings and fetch
//! plans, validated as a whole, and is immutable afterwards. It owns the
//! discriminator codec of every hierarchy root and every named fetch plan.
//!
//! ## Validation
//!
//! [`MappingRegistryBuilder::build`] rejects:
//!
//! - duplicate entity names, unknown parents and inheritance cycles
//! - discriminators declared below a hierarchy root
//! - discriminator tags that are not entities of the root's hierarchy
//! - duplicate relationship names along an inheritance chain and unknown targets
//! - duplicate plan names, plans for unknown entities, unknown or nested plan paths

use crate::error::{FetchError, FetchResult};
use crate::mapping::{DiscriminatorBinding, EntityMapping, RelationshipDescriptor};
use crate::plan::FetchPlan;
use indexmap::IndexMap;
use polymap_discriminator::{SchemaContext, TypeTag};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One-shot constructor for [`MappingRegistry`]
#[derive(Debug, Default)]
pub struct MappingRegistryBuilder {
	entities: Vec<EntityMapping>,
	plans: Vec<FetchPlan>,
	schema: SchemaContext,
}

impl MappingRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register_entity(mut self, entity: EntityMapping) -> Self {
		self.entities.push(entity);
		self
	}

	pub fn register_plan(mut self, plan: FetchPlan) -> Self {
		self.plans.push(plan);
		self
	}

	pub fn with_schema(mut self, schema: SchemaContext) -> Self {
		self.schema = schema;
		self
	}

	/// Validate every mapping and plan and freeze them into a registry
	pub fn build(self) -> FetchResult<MappingRegistry> {
		let mut entities: IndexMap<TypeTag, EntityMapping> = IndexMap::new();
		for entity in self.entities {
			if entities.contains_key(entity.name()) {
				return Err(FetchError::DuplicateEntity(entity.name().clone()));
			}
			entities.insert(entity.name().clone(), entity);
		}

		for entity in entities.values() {
			if let Some(parent) = entity.parent()
				&& !entities.contains_key(parent)
			{
				return Err(FetchError::UnknownParent {
					entity: entity.name().clone(),
					parent: parent.clone(),
				});
			}
		}

		let mut lineages: HashMap<TypeTag, Vec<TypeTag>> = HashMap::new();
		for name in entities.keys() {
			lineages.insert(name.clone(), lineage(&entities, name)?);
		}

		for entity in entities.values() {
			if entity.parent().is_some() && entity.discriminator().is_some() {
				return Err(FetchError::DiscriminatorOnSubtype(entity.name().clone()));
			}
		}

		let roots: HashMap<TypeTag, TypeTag> = lineages
			.iter()
			.filter_map(|(name, chain)| chain.first().map(|root| (name.clone(), root.clone())))
			.collect();

		for entity in entities.values() {
			let Some(binding) = entity.discriminator() else {
				continue;
			};
			for tag in binding.codec().map().tags() {
				let same_hierarchy = roots.get(tag).is_some_and(|root| root == entity.name());
				if !same_hierarchy {
					return Err(FetchError::UnknownDiscriminatorType {
						root: entity.name().clone(),
						tag: tag.clone(),
					});
				}
			}
		}

		let mut relationships: HashMap<TypeTag, Vec<RelationshipDescriptor>> = HashMap::new();
		for (name, chain) in &lineages {
			let mut effective: Vec<RelationshipDescriptor> = Vec::new();
			for ancestor in chain {
				let Some(mapping) = entities.get(ancestor) else {
					continue;
				};
				for rel in mapping.declared_relationships() {
					if effective.iter().any(|r| r.name() == rel.name()) {
						return Err(FetchError::DuplicateRelationship {
							entity: name.clone(),
							relationship: rel.name().to_string(),
						});
					}
					if !entities.contains_key(rel.target()) {
						return Err(FetchError::UnknownRelationshipTarget {
							entity: ancestor.clone(),
							relationship: rel.name().to_string(),
							target: rel.target().clone(),
						});
					}
					effective.push(rel.clone());
				}
			}
			relationships.insert(name.clone(), effective);
		}

		let mut plans: IndexMap<String, Arc<FetchPlan>> = IndexMap::new();
		for plan in self.plans {
			if plans.contains_key(plan.name()) {
				return Err(FetchError::DuplicatePlan(plan.name().to_string()));
			}
			let Some(available) = relationships.get(plan.entity()) else {
				return Err(FetchError::PlanForUnknownEntity {
					plan: plan.name().to_string(),
					entity: plan.entity().clone(),
				});
			};
			for path in plan.paths() {
				if path.contains('.') {
					return Err(FetchError::NestedPlanPath {
						plan: plan.name().to_string(),
						path: path.to_string(),
					});
				}
				if !available.iter().any(|r| r.name() == path) {
					return Err(FetchError::UnknownPlanPath {
						plan: plan.name().to_string(),
						entity: plan.entity().clone(),
						path: path.to_string(),
					});
				}
			}
			plans.insert(plan.name().to_string(), Arc::new(plan));
		}

		tracing::debug!(
			entities = entities.len(),
			plans = plans.len(),
			"Mapping registry built"
		);

		Ok(MappingRegistry {
			entities,
			lineages,
			relationships,
			plans,
			schema: self.schema,
		})
	}
}

/// Root-first ancestor chain of `name`, ending with `name` itself
fn lineage(entities: &IndexMap<TypeTag, EntityMapping>, name: &TypeTag) -> FetchResult<Vec<TypeTag>> {
	let mut chain = vec![name.clone()];
	let mut seen: HashSet<TypeTag> = HashSet::from([name.clone()]);
	let mut current = name;
	while let Some(parent) = entities.get(current).and_then(EntityMapping::parent) {
		if !seen.insert(parent.clone()) {
			return Err(FetchError::InheritanceCycle(name.clone()));
		}
		chain.push(parent.clone());
		current = parent;
	}
	chain.reverse();
	Ok(chain)
}

/// Immutable, validated mapping metadata
#[derive(Debug)]
pub struct MappingRegistry {
	entities: IndexMap<TypeTag, EntityMapping>,
	lineages: HashMap<TypeTag, Vec<TypeTag>>,
	relationships: HashMap<TypeTag, Vec<RelationshipDescriptor>>,
	plans: IndexMap<String, Arc<FetchPlan>>,
	schema: SchemaContext,
}

impl MappingRegistry {
	pub fn builder() -> MappingRegistryBuilder {
		MappingRegistryBuilder::new()
	}

	pub fn entity(&self, name: &str) -> Option<&EntityMapping> {
		self.entities.get(name)
	}

	/// Registered entity names in registration order
	pub fn entity_names(&self) -> impl Iterator<Item = &TypeTag> {
		self.entities.keys()
	}

	/// Root-first ancestor chain, ending with the entity itself
	pub fn lineage(&self, name: &str) -> Option<&[TypeTag]> {
		self.lineages.get(name).map(Vec::as_slice)
	}

	/// Root of the hierarchy `name` belongs to
	pub fn root_of(&self, name: &str) -> Option<&TypeTag> {
		self.lineages.get(name).and_then(|chain| chain.first())
	}

	/// Whether `candidate` is `ancestor` or one of its subtypes
	///
	/// # Examples
	///
	/// ```
	/// use polymap_fetch::{EntityMapping, MappingRegistry};
	///
	/// let registry = MappingRegistry::builder()
	///     .register_entity(EntityMapping::new("Person", "person"))
	///     .register_entity(EntityMapping::new("Employee", "person").extends("Person"))
	///     .build()
	///     .unwrap();
	///
	/// assert!(registry.is_same_or_subtype("Employee", "Person"));
	/// assert!(!registry.is_same_or_subtype("Person", "Employee"));
	/// ```
	pub fn is_same_or_subtype(&self, candidate: &str, ancestor: &str) -> bool {
		self.lineages
			.get(candidate)
			.is_some_and(|chain| chain.iter().any(|t| t == ancestor))
	}

	/// Effective relationships of an entity, inherited ones first
	pub fn relationships(&self, name: &str) -> &[RelationshipDescriptor] {
		self.relationships.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn relationship(&self, entity: &str, name: &str) -> Option<&RelationshipDescriptor> {
		self.relationships(entity).iter().find(|r| r.name() == name)
	}

	/// Discriminator binding of the hierarchy `name` belongs to
	pub fn discriminator_for(&self, name: &str) -> Option<&DiscriminatorBinding> {
		self.root_of(name)
			.and_then(|root| self.entities.get(root))
			.and_then(EntityMapping::discriminator)
	}

	pub fn plan(&self, name: &str) -> Option<&Arc<FetchPlan>> {
		self.plans.get(name)
	}

	/// Plans applicable to an entity: its own and those of its ancestors
	pub fn plans_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Arc<FetchPlan>> + 'a {
		self.plans
			.values()
			.filter(move |plan| self.is_same_or_subtype(entity, plan.entity().as_str()))
	}

	pub fn schema(&self) -> &SchemaContext {
		&self.schema
	}
}
