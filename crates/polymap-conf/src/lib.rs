//! # Polymap Conf
//!
//! Loads declarative mapping metadata from TOML and bootstraps a validated
//! [`MappingRegistry`](polymap_fetch::MappingRegistry) from it.
//!
//! Every configuration fault (non-bijective discriminator map, value outside
//! the column domain, dangling entity reference, bad fetch plan path) is
//! reported by [`MappingSettings::into_registry`], before any query runs.
//!
//! ## Example
//!
//! ```
//! use polymap_conf::MappingSettings;
//!
//! let registry = MappingSettings::from_toml_str(r#"
//! [[entity]]
//! name = "Person"
//! table = "person"
//!
//! [entity.discriminator]
//! column = "kind"
//! column_type = "char"
//! values = [
//!   { value = "P", entity = "Person" },
//!   { value = "E", entity = "Employee" },
//! ]
//!
//! [[entity]]
//! name = "Employee"
//! table = "person"
//! extends = "Person"
//! "#)
//! .unwrap()
//! .into_registry()
//! .unwrap();
//!
//! assert!(registry.is_same_or_subtype("Employee", "Person"));
//! ```

pub mod error;
pub mod settings;

pub use error::{ConfError, ConfResult};
pub use settings::{
	ColumnKind, DiscriminatorEntry, DiscriminatorSettings, EntitySettings, FetchPlanSettings,
	MAPPINGS_ENV_VAR, MappingSettings, RelationshipSettings, SchemaSettings,
};
