//! # Polymap Discriminator
//!
//! Discriminator mapping for polymorphic entity hierarchies stored in a shared
//! table. A single column holds a terse raw code (`1`, `'E'`, `true`); the
//! mapping layer works with the logical type name (`"Employee"`).
//!
//! ## Components
//!
//! - [`TypeTag`]: shared, immutable logical type name
//! - [`DiscriminatorValue`]: non-null raw column value
//! - [`DiscriminatorMap`]: immutable bijection between the two, validated on construction
//! - [`column::ColumnCodec`]: raw column I/O collaborator, with built-in
//!   integer, text, char and boolean codecs
//! - [`DiscriminatorCodec`]: decode/encode, row read/write, dirty checking and
//!   display rendering on top of a map and a column codec
//!
//! ## Failure policy
//!
//! - Non-bijective maps and values outside the column domain are rejected at
//!   construction ([`DiscriminatorError::is_configuration_error`]).
//! - Unknown values on read and unknown tags on write are surfaced, never
//!   turned into a silent null ([`DiscriminatorError::is_mapping_inconsistency`]).
//! - Null always propagates as `None`.
//!
//! ## Quick Start
//!
//! ```
//! use polymap_discriminator::column::CharColumn;
//! use polymap_discriminator::{DiscriminatorCodec, DiscriminatorMap};
//! use std::sync::Arc;
//!
//! let map = DiscriminatorMap::new([('E', "Employee"), ('C', "Contractor")]).unwrap();
//! let codec = DiscriminatorCodec::new(map, Arc::new(CharColumn)).unwrap();
//!
//! let raw = codec.encode(Some("Contractor")).unwrap().unwrap();
//! assert_eq!(raw.as_text(), Some("C"));
//! ```

pub mod codec;
pub mod column;
pub mod error;
pub mod map;
pub mod tag;
pub mod value;

pub use codec::DiscriminatorCodec;
pub use column::{ColumnCodec, ColumnSize, ResultRow, SchemaContext};
pub use error::{ColumnError, DiscriminatorError, DiscriminatorResult};
pub use map::DiscriminatorMap;
pub use tag::TypeTag;
pub use value::DiscriminatorValue;
