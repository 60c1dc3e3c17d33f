//! Bootstrapping the registry from a mapping file and loading through it

use polymap::conf::{ConfError, MappingSettings};
use polymap::fetch::{FetchPlanSelector, FetchType, LookupRequest, PrimaryKey};
use polymap_integration_tests::{STAFF_MAPPINGS, collection_keys};
use polymap_testkit::{MemorySession, staff_session};
use rstest::rstest;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[rstest]
#[tokio::test]
async fn test_registry_from_file_drives_fetch_plans(staff_session: MemorySession) {
	// Arrange
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(STAFF_MAPPINGS.as_bytes()).unwrap();
	let registry = MappingSettings::from_path(file.path())
		.unwrap()
		.into_registry()
		.unwrap();
	let selector = FetchPlanSelector::new(Arc::new(registry));
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");

	// Act
	let employee = selector.find(&staff_session, &request).await.unwrap().unwrap();

	// Assert
	assert_eq!(
		collection_keys(&employee, "projects"),
		vec![PrimaryKey::from(10), PrimaryKey::from(11)]
	);
	assert!(!employee.is_loaded("department"));
}

#[rstest]
#[tokio::test]
async fn test_omitted_fetch_follows_cardinality_default(staff_session: MemorySession) {
	// Arrange
	let mappings = STAFF_MAPPINGS.replace("fetch = \"lazy\"\n", "");
	let registry = MappingSettings::from_toml_str(&mappings)
		.unwrap()
		.into_registry()
		.unwrap();
	assert_eq!(
		registry.relationship("Employee", "department").map(|r| r.fetch()),
		Some(FetchType::Eager)
	);
	let selector = FetchPlanSelector::new(Arc::new(registry));

	// Act
	let employee = selector
		.find(&staff_session, &LookupRequest::new("Employee", 1))
		.await
		.unwrap()
		.unwrap();

	// Assert
	let department = employee.related_one("department").unwrap();
	assert_eq!(department.key(), &PrimaryKey::from(1));
	assert!(!employee.is_loaded("projects"));
}

#[rstest]
fn test_nested_plan_path_is_rejected_at_bootstrap() {
	let mappings = STAFF_MAPPINGS.replace(
		"paths = [\"projects\"]",
		"paths = [\"projects.employees\"]",
	);

	let error = MappingSettings::from_toml_str(&mappings)
		.unwrap()
		.into_registry()
		.unwrap_err();

	assert!(matches!(error, ConfError::Fetch(ref e) if e.is_configuration_error()));
}

#[rstest]
fn test_discriminator_hierarchy_from_file() {
	// Arrange
	let content = r#"
[[entity]]
name = "Person"
table = "person"

[entity.discriminator]
column = "kind"
column_type = "text"
length = 16
values = [
  { value = "person", entity = "Person" },
  { value = "employee", entity = "Employee" },
]

[[entity]]
name = "Employee"
table = "person"
extends = "Person"
"#;

	// Act
	let registry = MappingSettings::from_toml_str(content)
		.unwrap()
		.into_registry()
		.unwrap();

	// Assert
	let codec = registry.discriminator_for("Employee").unwrap().codec();
	assert_eq!(codec.name(), "text");
	assert_eq!(
		codec.from_display_string("Employee").unwrap(),
		"Employee"
	);
	assert!(codec.from_display_string("Robot").is_err());
	assert_eq!(codec.column_span(registry.schema()), 1);
}
