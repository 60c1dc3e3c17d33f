//! Loading rows of a single-table hierarchy
//!
//! The personnel hierarchy stores `Person`, `Employee` and `Contractor` in
//! one `person` table with a char discriminator column `kind`.

use polymap::discriminator::{DiscriminatorError, DiscriminatorValue};
use polymap::fetch::{FetchError, FetchPlanSelector, LookupRequest, PrimaryKey};
use polymap_integration_tests::collection_keys;
use polymap_testkit::{MemorySession, personnel_selector, personnel_session};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(1, "Person")]
#[case(2, "Employee")]
#[case(3, "Contractor")]
#[tokio::test]
async fn test_root_lookup_resolves_concrete_type(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
	#[case] key: i64,
	#[case] expected: &str,
) {
	// Act
	let person = personnel_selector
		.find(&personnel_session, &LookupRequest::new("Person", key))
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(person.entity(), expected);
}

#[rstest]
#[tokio::test]
async fn test_subtype_relationship_uses_static_eager_default(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
) {
	let contractor = personnel_selector
		.find(&personnel_session, &LookupRequest::new("Person", 3))
		.await
		.unwrap()
		.unwrap();

	let agency = contractor.related_one("agency").unwrap();
	assert_eq!(agency.attribute("name"), Some(&json!("Acme Staffing")));
	assert!(!agency.is_loaded("contractors"));
	assert!(!contractor.is_loaded("engagements"));
	assert_eq!(personnel_session.call_count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_lookup_through_wrong_subtype_is_none(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
) {
	let result = personnel_selector
		.find(&personnel_session, &LookupRequest::new("Employee", 3))
		.await
		.unwrap();

	assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn test_unmapped_code_is_mapping_inconsistency(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
) {
	// Act
	let error = personnel_selector
		.find(&personnel_session, &LookupRequest::new("Person", 4))
		.await
		.unwrap_err();

	// Assert
	assert!(error.is_mapping_inconsistency());
	assert!(matches!(
		error,
		FetchError::Discriminator(DiscriminatorError::UnknownValue(DiscriminatorValue::Text(ref code)))
			if code == "X"
	));
}

#[rstest]
#[tokio::test]
async fn test_related_rows_are_resolved_through_discriminator(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
) {
	// Arrange
	let request = LookupRequest::new("Agency", 50).with_fetch_plan("agency.contractors");

	// Act
	let agency = personnel_selector
		.find(&personnel_session, &request)
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(collection_keys(&agency, "contractors"), vec![PrimaryKey::from(3)]);
	let contractor = &agency.related_many("contractors").unwrap()[0];
	assert_eq!(contractor.entity(), "Contractor");
	assert!(contractor.is_loaded("agency"));
	assert!(contractor.deferred("engagements").is_some());
	let agency_again = contractor.related_one("agency").unwrap();
	assert_eq!(agency_again.key(), &PrimaryKey::from(50));
	assert!(agency_again.deferred("contractors").is_some());
	assert_eq!(personnel_session.call_count(), 3);
}

#[rstest]
#[tokio::test]
async fn test_plan_naming_lazy_path_keeps_eager_agency(
	personnel_selector: FetchPlanSelector,
	personnel_session: MemorySession,
) {
	// Arrange
	let request = LookupRequest::new("Contractor", 3).with_fetch_plan("contractor.engagements");

	// Act
	let contractor = personnel_selector
		.find(&personnel_session, &request)
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(
		collection_keys(&contractor, "engagements"),
		vec![PrimaryKey::from(70), PrimaryKey::from(71)]
	);
	assert!(contractor.is_loaded("agency"));
	let agency = contractor.related_one("agency").unwrap();
	assert_eq!(agency.attribute("name"), Some(&json!("Acme Staffing")));
	assert_eq!(personnel_session.call_count(), 3);
}

#[rstest]
#[tokio::test]
async fn test_related_row_of_sibling_type_is_rejected(personnel_selector: FetchPlanSelector) {
	let session = MemorySession::new()
		.with_row("agency", json!({"id": 50, "name": "Acme Staffing"}))
		.with_row("person", json!({"id": 2, "kind": "E", "name": "Erin"}))
		.with_link("agency", 50, "contractors", [2]);
	let request = LookupRequest::new("Agency", 50).with_fetch_plan("agency.contractors");

	let error = personnel_selector.find(&session, &request).await.unwrap_err();

	assert!(matches!(error, FetchError::UnexpectedSubtype { .. }));
	assert!(error.is_mapping_inconsistency());
}

#[rstest]
fn test_discriminator_codec_is_shared_by_the_hierarchy(personnel_selector: FetchPlanSelector) {
	let registry = personnel_selector.registry();

	let for_employee = registry.discriminator_for("Employee").unwrap();
	let for_contractor = registry.discriminator_for("Contractor").unwrap();

	assert!(std::sync::Arc::ptr_eq(for_employee.codec(), for_contractor.codec()));
	assert_eq!(
		for_employee.codec().encode(Some("Contractor")).unwrap(),
		Some(DiscriminatorValue::from('C'))
	);
}
