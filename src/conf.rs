//! Mapping file module.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "conf")]
//! use polymap::conf::MappingSettings;
//! ```

#[cfg(feature = "conf")]
pub use polymap_conf::*;
