//! Integration test utilities for polymap
//!
//! Shared helpers used across the integration test binaries.

use polymap::fetch::{Aggregate, PrimaryKey};

/// Primary keys of a loaded collection, in load order
pub fn collection_keys(aggregate: &Aggregate, relationship: &str) -> Vec<PrimaryKey> {
	aggregate
		.related_many(relationship)
		.map(|related| related.iter().map(|a| a.key().clone()).collect())
		.unwrap_or_default()
}

/// Mapping file equivalent to the testkit staff model
pub const STAFF_MAPPINGS: &str = r#"
[[entity]]
name = "Department"
table = "department"

[[entity.relationship]]
name = "employees"
target = "Employee"
kind = "one_to_many"

[[entity]]
name = "Employee"
table = "employee"

[[entity.relationship]]
name = "department"
target = "Department"
kind = "many_to_one"
fetch = "lazy"

[[entity.relationship]]
name = "projects"
target = "Project"
kind = "many_to_many"

[[entity.fetch_plan]]
name = "employee.projects"
paths = ["projects"]

[[entity]]
name = "Project"
table = "project"

[[entity.relationship]]
name = "employees"
target = "Employee"
kind = "many_to_many"
"#;
