//! Mapping registry and fetch plan module.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "fetch")]
//! use polymap::fetch::{FetchPlanSelector, LookupRequest, MappingRegistry};
//! ```

#[cfg(feature = "fetch")]
pub use polymap_fetch::*;
