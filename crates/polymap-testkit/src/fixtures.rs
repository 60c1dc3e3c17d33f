//! Shared rstest fixtures
//!
//! Two models are provided:
//!
//! - staff: `Department` / `Employee` / `Project`, where an employee belongs
//!   to a department lazily and works on many projects, with a
//!   `"employee.projects"` fetch plan
//! - personnel: a `Person` hierarchy stored in one table with a char
//!   discriminator (`'P'`, `'E'`, `'C'`), where contractors eagerly load
//!   their agency and lazily load their engagements

use crate::session::MemorySession;
use polymap_discriminator::column::CharColumn;
use polymap_discriminator::{DiscriminatorCodec, DiscriminatorMap};
use polymap_fetch::{
	EntityMapping, FetchPlan, FetchPlanSelector, MappingRegistry, RelationshipDescriptor,
	RelationshipType,
};
use rstest::fixture;
use serde_json::json;
use std::sync::Arc;

/// Registry of the staff model
#[fixture]
pub fn staff_registry() -> Arc<MappingRegistry> {
	let registry = MappingRegistry::builder()
		.register_entity(
			EntityMapping::new("Department", "department").with_relationship(
				RelationshipDescriptor::new("employees", "Employee", RelationshipType::OneToMany),
			),
		)
		.register_entity(
			EntityMapping::new("Employee", "employee")
				.with_relationship(
					RelationshipDescriptor::new("department", "Department", RelationshipType::ManyToOne)
						.lazy(),
				)
				.with_relationship(RelationshipDescriptor::new(
					"projects",
					"Project",
					RelationshipType::ManyToMany,
				)),
		)
		.register_entity(
			EntityMapping::new("Project", "project").with_relationship(RelationshipDescriptor::new(
				"employees",
				"Employee",
				RelationshipType::ManyToMany,
			)),
		)
		.register_plan(FetchPlan::new("employee.projects", "Employee", ["projects"]))
		.register_plan(FetchPlan::new("department.employees", "Department", ["employees"]))
		.build();

	match registry {
		Ok(registry) => Arc::new(registry),
		Err(e) => panic!("staff registry is invalid: {e}"),
	}
}

/// Rows of the staff model
///
/// Employee 1 (`jdoe`) works in department 1 on projects 10 and 11.
/// Employee 2 (`asmith`) works in department 1 on no project.
#[fixture]
pub fn staff_session() -> MemorySession {
	MemorySession::new()
		.with_row("department", json!({"id": 1, "name": "Research"}))
		.with_row(
			"employee",
			json!({"id": 1, "username": "jdoe", "pswd": "secret", "access_level": 1}),
		)
		.with_row(
			"employee",
			json!({"id": 2, "username": "asmith", "pswd": "hunter2", "access_level": 2}),
		)
		.with_row("project", json!({"id": 10, "name": "Apollo"}))
		.with_row("project", json!({"id": 11, "name": "Gemini"}))
		.with_link("employee", 1, "department", [1])
		.with_link("employee", 2, "department", [1])
		.with_link("employee", 1, "projects", [10, 11])
		.with_link("department", 1, "employees", [1, 2])
		.with_link("project", 10, "employees", [1])
		.with_link("project", 11, "employees", [1])
}

#[fixture]
pub fn staff_selector(staff_registry: Arc<MappingRegistry>) -> FetchPlanSelector {
	FetchPlanSelector::new(staff_registry)
}

/// Registry of the personnel hierarchy
#[fixture]
pub fn personnel_registry() -> Arc<MappingRegistry> {
	let codec = DiscriminatorMap::new([('P', "Person"), ('E', "Employee"), ('C', "Contractor")])
		.and_then(|map| DiscriminatorCodec::new(map, Arc::new(CharColumn)));
	let codec = match codec {
		Ok(codec) => codec,
		Err(e) => panic!("personnel discriminator is invalid: {e}"),
	};

	let registry = MappingRegistry::builder()
		.register_entity(EntityMapping::new("Person", "person").with_discriminator("kind", codec))
		.register_entity(EntityMapping::new("Employee", "person").extends("Person"))
		.register_entity(
			EntityMapping::new("Contractor", "person")
				.extends("Person")
				.with_relationship(RelationshipDescriptor::new(
					"agency",
					"Agency",
					RelationshipType::ManyToOne,
				))
				.with_relationship(RelationshipDescriptor::new(
					"engagements",
					"Engagement",
					RelationshipType::OneToMany,
				)),
		)
		.register_entity(EntityMapping::new("Agency", "agency").with_relationship(
			RelationshipDescriptor::new("contractors", "Contractor", RelationshipType::OneToMany),
		))
		.register_entity(EntityMapping::new("Engagement", "engagement"))
		.register_plan(FetchPlan::new("agency.contractors", "Agency", ["contractors"]))
		.register_plan(FetchPlan::new("contractor.engagements", "Contractor", ["engagements"]))
		.build();

	match registry {
		Ok(registry) => Arc::new(registry),
		Err(e) => panic!("personnel registry is invalid: {e}"),
	}
}

/// Rows of the personnel hierarchy
///
/// Person 1 is a plain person, 2 an employee, 3 a contractor of agency 50
/// on engagements 70 and 71, and 4 carries the unmapped code `'X'`.
#[fixture]
pub fn personnel_session() -> MemorySession {
	MemorySession::new()
		.with_row("person", json!({"id": 1, "kind": "P", "name": "Pat"}))
		.with_row("person", json!({"id": 2, "kind": "E", "name": "Erin"}))
		.with_row("person", json!({"id": 3, "kind": "C", "name": "Casey"}))
		.with_row("person", json!({"id": 4, "kind": "X", "name": "Unknown"}))
		.with_row("agency", json!({"id": 50, "name": "Acme Staffing"}))
		.with_row("engagement", json!({"id": 70, "title": "Billing migration"}))
		.with_row("engagement", json!({"id": 71, "title": "Audit"}))
		.with_link("person", 3, "agency", [50])
		.with_link("person", 3, "engagements", [70, 71])
		.with_link("agency", 50, "contractors", [3])
}

#[fixture]
pub fn personnel_selector(personnel_registry: Arc<MappingRegistry>) -> FetchPlanSelector {
	FetchPlanSelector::new(personnel_registry)
}
