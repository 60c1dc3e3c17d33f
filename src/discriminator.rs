//! Discriminator mapping module.
//!
//! Type tags, raw discriminator values, the bijective map between them, the
//! underlying column codecs and the discriminator codec.
//!
//! # Examples
//!
//! ```rust
//! use polymap::discriminator::column::IntegerColumn;
//! use polymap::discriminator::{DiscriminatorCodec, DiscriminatorMap, DiscriminatorValue};
//! use std::sync::Arc;
//!
//! let map = DiscriminatorMap::new([(1, "Employee"), (2, "Project")]).unwrap();
//! let codec = DiscriminatorCodec::new(map, Arc::new(IntegerColumn::regular())).unwrap();
//!
//! let tag = codec.decode(Some(&DiscriminatorValue::from(1))).unwrap();
//! assert_eq!(tag.unwrap(), "Employee");
//! ```

pub use polymap_discriminator::*;
