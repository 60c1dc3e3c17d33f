//! Declarative mapping metadata
//!
//! A mapping file lists entities, their optional discriminator, their
//! relationships and the fetch plans declared for them:
//!
//! ```toml
//! [[entity]]
//! name = "Employee"
//! table = "employee"
//!
//! [[entity.relationship]]
//! name = "projects"
//! target = "Project"
//! kind = "many_to_many"
//!
//! [[entity.fetch_plan]]
//! name = "employee.projects"
//! paths = ["projects"]
//!
//! [[entity]]
//! name = "Project"
//! table = "project"
//! ```

use crate::error::{ConfError, ConfResult};
use polymap_discriminator::column::{BooleanColumn, CharColumn, IntegerColumn, TextColumn};
use polymap_discriminator::{
	ColumnCodec, DiscriminatorCodec, DiscriminatorMap, DiscriminatorValue, SchemaContext,
	column::DEFAULT_STRING_LENGTH,
};
use polymap_fetch::{
	EntityMapping, FetchPlan, FetchType, MappingRegistry, RelationshipDescriptor, RelationshipType,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Environment variable naming the mapping file read by [`MappingSettings::from_env`]
pub const MAPPINGS_ENV_VAR: &str = "POLYMAP_MAPPINGS";

/// Root of a mapping file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSettings {
	#[serde(default)]
	pub schema: SchemaSettings,
	#[serde(default, rename = "entity")]
	pub entities: Vec<EntitySettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSettings {
	#[serde(default = "default_string_length")]
	pub default_string_length: u32,
}

impl Default for SchemaSettings {
	fn default() -> Self {
		Self {
			default_string_length: DEFAULT_STRING_LENGTH,
		}
	}
}

fn default_string_length() -> u32 {
	DEFAULT_STRING_LENGTH
}

fn default_primary_key() -> String {
	"id".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySettings {
	pub name: String,
	pub table: String,
	#[serde(default = "default_primary_key")]
	pub primary_key: String,
	#[serde(default)]
	pub extends: Option<String>,
	#[serde(default)]
	pub discriminator: Option<DiscriminatorSettings>,
	#[serde(default, rename = "relationship")]
	pub relationships: Vec<RelationshipSettings>,
	#[serde(default, rename = "fetch_plan")]
	pub fetch_plans: Vec<FetchPlanSettings>,
}

/// Raw column type of a discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
	Integer,
	SmallInteger,
	BigInteger,
	Text,
	Char,
	Boolean,
}

impl ColumnKind {
	/// Column codec for this kind; `length` applies to text columns only
	pub fn codec(&self, length: Option<u32>) -> ConfResult<Arc<dyn ColumnCodec>> {
		if length.is_some() && *self != ColumnKind::Text {
			return Err(ConfError::Invalid(format!(
				"length is only supported for text discriminator columns, not {:?}",
				self
			)));
		}
		let codec: Arc<dyn ColumnCodec> = match self {
			ColumnKind::Integer => Arc::new(IntegerColumn::regular()),
			ColumnKind::SmallInteger => Arc::new(IntegerColumn::small()),
			ColumnKind::BigInteger => Arc::new(IntegerColumn::big()),
			ColumnKind::Text => match length {
				Some(length) => Arc::new(TextColumn::with_length(length)),
				None => Arc::new(TextColumn::new()),
			},
			ColumnKind::Char => Arc::new(CharColumn),
			ColumnKind::Boolean => Arc::new(BooleanColumn),
		};
		Ok(codec)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscriminatorSettings {
	pub column: String,
	pub column_type: ColumnKind,
	#[serde(default)]
	pub length: Option<u32>,
	pub values: Vec<DiscriminatorEntry>,
}

impl DiscriminatorSettings {
	/// Build the codec, validating the bijection and the value domain
	pub fn build_codec(&self, entity: &str) -> ConfResult<DiscriminatorCodec> {
		let column = self.column_type.codec(self.length)?;
		let map = DiscriminatorMap::new(
			self.values
				.iter()
				.map(|entry| (entry.value.clone(), entry.entity.as_str())),
		)
		.and_then(|map| DiscriminatorCodec::new(map, column));
		map.map_err(|source| ConfError::Discriminator {
			entity: entity.to_string(),
			source,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscriminatorEntry {
	pub value: DiscriminatorValue,
	pub entity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipSettings {
	pub name: String,
	pub target: String,
	pub kind: RelationshipType,
	/// Defaults to the cardinality's fetch type when omitted
	#[serde(default)]
	pub fetch: Option<FetchType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchPlanSettings {
	pub name: String,
	pub paths: Vec<String>,
}

impl MappingSettings {
	/// Parse a mapping document
	///
	/// # Examples
	///
	/// ```
	/// use polymap_conf::MappingSettings;
	///
	/// let settings = MappingSettings::from_toml_str(r#"
	/// [[entity]]
	/// name = "Project"
	/// table = "project"
	/// "#).unwrap();
	///
	/// assert_eq!(settings.entities[0].primary_key, "id");
	/// ```
	pub fn from_toml_str(content: &str) -> ConfResult<Self> {
		Ok(toml::from_str(content)?)
	}

	pub fn from_path(path: impl AsRef<Path>) -> ConfResult<Self> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "Loading mapping file");
		let content = fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Load the file named by `POLYMAP_MAPPINGS`
	pub fn from_env() -> ConfResult<Self> {
		Self::from_env_var(MAPPINGS_ENV_VAR)
	}

	/// Load the file named by the environment variable `name`
	pub fn from_env_var(name: &str) -> ConfResult<Self> {
		let path = std::env::var_os(name)
			.ok_or_else(|| ConfError::Env(format!("{} is not set", name)))?;
		Self::from_path(path)
	}

	pub fn schema_context(&self) -> SchemaContext {
		SchemaContext::new(self.schema.default_string_length)
	}

	/// Build and validate the mapping registry
	pub fn into_registry(self) -> ConfResult<MappingRegistry> {
		let mut builder = MappingRegistry::builder().with_schema(self.schema_context());

		for entity in self.entities {
			let mut mapping = EntityMapping::new(entity.name.as_str(), entity.table)
				.with_primary_key(entity.primary_key);
			if let Some(parent) = entity.extends {
				mapping = mapping.extends(parent);
			}
			if let Some(discriminator) = &entity.discriminator {
				let codec = discriminator.build_codec(&entity.name)?;
				mapping = mapping.with_discriminator(discriminator.column.as_str(), codec);
			}
			for rel in entity.relationships {
				let mut descriptor = RelationshipDescriptor::new(rel.name, rel.target, rel.kind);
				if let Some(fetch) = rel.fetch {
					descriptor = descriptor.with_fetch(fetch);
				}
				mapping = mapping.with_relationship(descriptor);
			}
			for plan in entity.fetch_plans {
				builder = builder.register_plan(FetchPlan::new(
					plan.name,
					entity.name.as_str(),
					plan.paths,
				));
			}
			builder = builder.register_entity(mapping);
		}

		Ok(builder.build()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serial_test::serial;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[fixture]
	fn staff_toml() -> &'static str {
		r#"
[schema]
default_string_length = 100

[[entity]]
name = "Department"
table = "department"

[[entity.relationship]]
name = "employees"
target = "Employee"
kind = "one_to_many"

[[entity]]
name = "Person"
table = "person"

[entity.discriminator]
column = "kind"
column_type = "integer"
values = [
  { value = 1, entity = "Employee" },
  { value = 2, entity = "Contractor" },
]

[[entity]]
name = "Employee"
table = "person"
extends = "Person"

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
name = "Contractor"
table = "person"
extends = "Person"

[[entity]]
name = "Project"
table = "project"
primary_key = "project_id"
"#
	}

	#[rstest]
	fn test_parse_mapping_file(staff_toml: &str) {
		// Act
		let settings = MappingSettings::from_toml_str(staff_toml).unwrap();

		// Assert
		assert_eq!(settings.schema.default_string_length, 100);
		assert_eq!(settings.entities.len(), 5);
		let employee = &settings.entities[2];
		assert_eq!(employee.extends.as_deref(), Some("Person"));
		assert_eq!(employee.relationships[0].fetch, Some(FetchType::Lazy));
		assert_eq!(employee.relationships[1].fetch, None);
		assert_eq!(employee.fetch_plans[0].paths, vec!["projects".to_string()]);
		let person = settings.entities[1].discriminator.as_ref().unwrap();
		assert_eq!(person.column_type, ColumnKind::Integer);
		assert_eq!(person.values[1].value, DiscriminatorValue::Integer(2));
		assert_eq!(settings.entities[4].primary_key, "project_id");
	}

	#[rstest]
	fn test_into_registry_applies_fetch_defaults(staff_toml: &str) {
		// Arrange
		let settings = MappingSettings::from_toml_str(staff_toml).unwrap();

		// Act
		let registry = settings.into_registry().unwrap();

		// Assert
		assert_eq!(registry.schema().default_string_length(), 100);
		let department = registry.relationship("Employee", "department").unwrap();
		assert_eq!(department.fetch(), FetchType::Lazy);
		let projects = registry.relationship("Employee", "projects").unwrap();
		assert_eq!(projects.fetch(), FetchType::Lazy);
		assert!(registry.plan("employee.projects").is_some());
		let codec = registry.discriminator_for("Contractor").unwrap().codec();
		assert_eq!(
			codec.decode(Some(&DiscriminatorValue::Integer(2))).unwrap().unwrap(),
			"Contractor"
		);
	}

	#[rstest]
	fn test_empty_document_uses_defaults() {
		let settings = MappingSettings::from_toml_str("").unwrap();

		assert_eq!(settings, MappingSettings::default());
		assert_eq!(settings.schema_context(), SchemaContext::default());
	}

	#[rstest]
	fn test_duplicate_discriminator_value_is_configuration_error() {
		// Arrange
		let content = r#"
[[entity]]
name = "Person"
table = "person"

[entity.discriminator]
column = "kind"
column_type = "char"
values = [
  { value = "E", entity = "Person" },
  { value = "E", entity = "Employee" },
]

[[entity]]
name = "Employee"
table = "person"
extends = "Person"
"#;

		// Act
		let error = MappingSettings::from_toml_str(content)
			.unwrap()
			.into_registry()
			.unwrap_err();

		// Assert
		match error {
			ConfError::Discriminator { entity, source } => {
				assert_eq!(entity, "Person");
				assert!(source.is_configuration_error());
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_value_outside_column_domain_is_rejected() {
		let content = r#"
[[entity]]
name = "Person"
table = "person"

[entity.discriminator]
column = "kind"
column_type = "char"
values = [{ value = "EMP", entity = "Person" }]
"#;

		let error = MappingSettings::from_toml_str(content)
			.unwrap()
			.into_registry()
			.unwrap_err();

		assert!(matches!(error, ConfError::Discriminator { .. }));
	}

	#[rstest]
	#[case(ColumnKind::Integer, Some(10), false)]
	#[case(ColumnKind::Text, Some(10), true)]
	#[case(ColumnKind::Text, None, true)]
	#[case(ColumnKind::Boolean, None, true)]
	fn test_length_only_for_text(
		#[case] kind: ColumnKind,
		#[case] length: Option<u32>,
		#[case] accepted: bool,
	) {
		assert_eq!(kind.codec(length).is_ok(), accepted);
	}

	#[rstest]
	fn test_unknown_column_type_is_parse_error() {
		let content = r#"
[[entity]]
name = "Person"
table = "person"

[entity.discriminator]
column = "kind"
column_type = "uuid"
values = []
"#;

		let result = MappingSettings::from_toml_str(content);

		assert!(matches!(result, Err(ConfError::Toml(_))));
	}

	#[rstest]
	fn test_registry_validation_errors_surface(staff_toml: &str) {
		let content = format!(
			"{}\n[[entity]]\nname = \"Project\"\ntable = \"project_archive\"\n",
			staff_toml
		);

		let error = MappingSettings::from_toml_str(&content)
			.unwrap()
			.into_registry()
			.unwrap_err();

		assert!(matches!(error, ConfError::Fetch(ref e) if e.is_configuration_error()));
	}

	#[rstest]
	fn test_from_path(staff_toml: &str) {
		// Arrange
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "{}", staff_toml).unwrap();

		// Act
		let settings = MappingSettings::from_path(file.path()).unwrap();

		// Assert
		assert_eq!(settings.entities.len(), 5);
	}

	#[rstest]
	fn test_from_path_missing_file() {
		let dir = tempfile::tempdir().unwrap();

		let result = MappingSettings::from_path(dir.path().join("missing.toml"));

		assert!(matches!(result, Err(ConfError::Io(_))));
	}

	#[rstest]
	#[serial]
	fn test_from_env_reads_named_file(staff_toml: &str) {
		// Arrange
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "{}", staff_toml).unwrap();
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe { std::env::set_var(MAPPINGS_ENV_VAR, file.path()) };

		// Act
		let result = MappingSettings::from_env();

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe { std::env::remove_var(MAPPINGS_ENV_VAR) };

		// Assert
		let settings = result.unwrap();
		assert_eq!(settings.entities.len(), 5);
		assert!(settings.into_registry().unwrap().plan("employee.projects").is_some());
	}

	#[rstest]
	#[serial]
	fn test_from_env_var_pointing_at_missing_file() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let name = "POLYMAP_TEST_MAPPINGS_MISSING_FILE";
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe { std::env::set_var(name, dir.path().join("missing.toml")) };

		// Act
		let result = MappingSettings::from_env_var(name);

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe { std::env::remove_var(name) };

		// Assert
		assert!(matches!(result, Err(ConfError::Io(_))));
	}

	#[rstest]
	fn test_from_unset_env_var() {
		let result = MappingSettings::from_env_var("POLYMAP_TEST_MAPPINGS_NEVER_SET");

		assert!(matches!(result, Err(ConfError::Env(_))));
	}
}
