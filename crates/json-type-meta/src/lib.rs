//! Runtime type descriptors shared by JSON codecs.
//!
//! Codecs resolve adapters by [`TypeDescriptor`] rather than by static type,
//! which lets a factory decide at resolution time which adapter to hand out.
//! Types opt in by implementing [`Described`]; metadata that would come from
//! annotations in reflective ecosystems is attached explicitly.
//!
//! # Example
//!
//! ```
//! use json_type_meta::{Described, EnumConstant, MetadataKind, TypeDescriptor};
//!
//! #[allow(dead_code)]
//! enum Suit { Heart, Spade }
//!
//! impl Described for Suit {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::enumeration::<Suit>([
//!             EnumConstant::renamed("Heart", "H"),
//!             EnumConstant::renamed("Spade", "S"),
//!         ])
//!     }
//! }
//!
//! let ty = Suit::descriptor();
//! assert!(ty.is_bare_class());
//! assert!(ty.enum_constants().unwrap()[0].has_metadata(MetadataKind::SerializedName));
//! ```

use std::any::Any;

mod builtin;
pub use builtin::is_builtin;

mod descriptor;
pub use descriptor::{EnumConstant, Metadata, MetadataKind, TypeDescriptor, TypeShape};

/// Types that can describe themselves at runtime.
pub trait Described: Any {
    fn descriptor() -> TypeDescriptor;
}

/// Owned, type-erased value exchanged between adapters.
pub type AnyValue = Box<dyn Any + Send>;

/// Borrowed, type-erased value handed to adapters for writing.
pub type AnyRef<'a> = &'a (dyn Any + Send);
