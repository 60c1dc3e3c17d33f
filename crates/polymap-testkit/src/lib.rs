//! # Polymap Testkit
//!
//! Testing utilities for polymap: an in-memory [`MemorySession`] that counts
//! and records calls, and rstest fixtures for a staff model and a polymorphic
//! personnel hierarchy.

pub mod fixtures;
pub mod session;

pub use fixtures::{
	personnel_registry, personnel_selector, personnel_session, staff_registry, staff_selector,
	staff_session,
};
pub use session::{MemorySession, SessionCall};
