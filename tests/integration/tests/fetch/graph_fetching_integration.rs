//! Entity graph fetching through named fetch plans
//!
//! Uses the staff model: an employee belongs lazily to a department and
//! works on many projects; `"employee.projects"` names the `projects` path.

use polymap::fetch::{FetchError, FetchPlanSelector, LookupRequest, PrimaryKey, SessionError};
use polymap_integration_tests::collection_keys;
use polymap_testkit::{MemorySession, SessionCall, staff_selector, staff_session};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_fetch_plan_populates_projects_and_keeps_department_lazy(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	// Arrange
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");

	// Act
	let employee = staff_selector
		.find(&staff_session, &request)
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(employee.attribute("username"), Some(&json!("jdoe")));
	assert!(employee.is_loaded("projects"));
	assert_eq!(
		collection_keys(&employee, "projects"),
		vec![PrimaryKey::from(10), PrimaryKey::from(11)]
	);
	assert!(!employee.is_loaded("department"));
	assert_eq!(
		staff_session.calls(),
		vec![
			SessionCall::FindRow {
				entity: "Employee".to_string(),
				key: PrimaryKey::from(1),
			},
			SessionCall::FetchRelated {
				owner: "Employee".to_string(),
				owner_key: PrimaryKey::from(1),
				relationship: "projects".to_string(),
			},
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_projects_keep_lazy_relationships_deferred(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");

	let employee = staff_selector
		.find(&staff_session, &request)
		.await
		.unwrap()
		.unwrap();

	let projects = employee.related_many("projects").unwrap();
	assert_eq!(projects[0].attribute("name"), Some(&json!("Apollo")));
	assert!(projects.iter().all(|p| p.deferred("employees").is_some()));
}

#[rstest]
#[tokio::test]
async fn test_without_plan_everything_stays_deferred(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	// Act
	let employee = staff_selector
		.find(&staff_session, &LookupRequest::new("Employee", 1))
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert!(!employee.is_loaded("projects"));
	assert!(!employee.is_loaded("department"));
	assert_eq!(staff_session.call_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_plan_with_empty_collection(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	let request = LookupRequest::new("Employee", 2).with_fetch_plan("employee.projects");

	let employee = staff_selector
		.find(&staff_session, &request)
		.await
		.unwrap()
		.unwrap();

	assert!(employee.is_loaded("projects"));
	assert!(collection_keys(&employee, "projects").is_empty());
}

#[rstest]
#[tokio::test]
async fn test_unknown_plan_performs_no_io(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	// Arrange
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("does-not-exist");

	// Act
	let result = staff_selector.find(&staff_session, &request).await;

	// Assert
	assert!(matches!(result, Err(FetchError::UnknownFetchPlan(ref name)) if name == "does-not-exist"));
	assert_eq!(staff_session.call_count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_missing_employee_is_not_an_error(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	let request = LookupRequest::new("Employee", 404).with_fetch_plan("employee.projects");

	let result = staff_selector.find(&staff_session, &request).await.unwrap();

	assert!(result.is_none());
	assert_eq!(staff_session.call_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_department_plan_loads_employees(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	let request = LookupRequest::new("Department", 1).with_fetch_plan("department.employees");

	let department = staff_selector
		.find(&staff_session, &request)
		.await
		.unwrap()
		.unwrap();

	assert_eq!(
		collection_keys(&department, "employees"),
		vec![PrimaryKey::from(1), PrimaryKey::from(2)]
	);
}

#[rstest]
#[tokio::test]
async fn test_session_failure_is_propagated(staff_selector: FetchPlanSelector) {
	// Arrange
	let session = MemorySession::new()
		.with_row("employee", json!({"id": 1, "username": "jdoe"}))
		.with_table("project")
		.with_link("employee", 1, "projects", [99]);
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");

	// Act
	let result = staff_selector.find(&session, &request).await;

	// Assert
	assert!(matches!(
		result,
		Err(FetchError::Session(SessionError::Backend(_)))
	));
}

#[rstest]
#[tokio::test]
async fn test_missing_table_is_propagated(staff_selector: FetchPlanSelector) {
	let session = MemorySession::new()
		.with_row("employee", json!({"id": 1, "username": "jdoe"}))
		.with_link("employee", 1, "projects", [10]);
	let request = LookupRequest::new("Employee", 1).with_fetch_plan("employee.projects");

	let result = staff_selector.find(&session, &request).await;

	assert!(matches!(
		result,
		Err(FetchError::Session(SessionError::TableNotAvailable(ref table))) if table == "project"
	));
}

#[rstest]
#[tokio::test]
async fn test_selector_is_shared_across_tasks(
	staff_selector: FetchPlanSelector,
	staff_session: MemorySession,
) {
	// Arrange
	let session = std::sync::Arc::new(staff_session);
	let mut handles = Vec::new();
	for key in [1, 2] {
		let selector = staff_selector.clone();
		let session = std::sync::Arc::clone(&session);
		handles.push(tokio::spawn(async move {
			let request = LookupRequest::new("Employee", key).with_fetch_plan("employee.projects");
			selector
				.find(session.as_ref(), &request)
				.await
				.map(|found| found.map(|e| e.key().clone()))
		}));
	}

	// Act
	let mut keys = Vec::new();
	for handle in handles {
		keys.push(handle.await.unwrap().unwrap());
	}

	// Assert
	assert_eq!(keys, vec![Some(PrimaryKey::from(1)), Some(PrimaryKey::from(2))]);
	assert_eq!(session.call_count(), 4);
}
