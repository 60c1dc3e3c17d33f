//! Named fetch plans

use polymap_discriminator::TypeTag;
use std::collections::BTreeSet;

/// Named, immutable set of relationship paths to load eagerly
///
/// A plan only ever adds eagerness: relationships it does not name keep the
/// fetch type declared in their mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
	name: String,
	entity: TypeTag,
	paths: BTreeSet<String>,
}

impl FetchPlan {
	/// # Examples
	///
	/// ```
	/// use polymap_fetch::FetchPlan;
	///
	/// let plan = FetchPlan::new("employee.projects", "Employee", ["projects"]);
	/// assert!(plan.contains("projects"));
	/// assert!(!plan.contains("department"));
	/// ```
	pub fn new<I, S>(name: impl Into<String>, entity: impl Into<TypeTag>, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			entity: entity.into(),
			paths: paths.into_iter().map(Into::into).collect(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Entity the plan was declared for
	pub fn entity(&self) -> &TypeTag {
		&self.entity
	}

	pub fn contains(&self, path: &str) -> bool {
		self.paths.contains(path)
	}

	/// Paths in lexical order
	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.paths.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}
}
