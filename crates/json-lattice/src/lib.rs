//! json-lattice: a JSON codec with stream and document-tree entry points.
//!
//! Adapters come from an ordered chain of [`TypeAdapterFactory`]s. A factory
//! can wrap whatever the rest of the chain would have produced by asking for
//! [`Lattice::delegate_adapter`], which resumes resolution after it.
//!
//! # Example
//!
//! ```
//! use json_lattice::{JsonElement, Lattice};
//!
//! let lattice = Lattice::new();
//! let tree = lattice.parse_tree(r#"{"b": 1, "a": [true, null]}"#).unwrap();
//! assert!(matches!(tree, JsonElement::Object(_)));
//! assert_eq!(lattice.tree_to_string(&tree).unwrap(), r#"{"b":1,"a":[true,null]}"#);
//!
//! assert_eq!(lattice.to_json(&42u8).unwrap(), "42");
//! ```

mod adapter;
pub use adapter::{downcast, downcast_ref, SerdeTypeAdapter, TypeAdapter};

mod error;
pub use error::{Error, Result};

mod factory;
pub use factory::TypeAdapterFactory;

mod lattice;
pub use lattice::{Lattice, LatticeBuilder, TypedAdapter};

mod reader;
pub use reader::{JsonReader, Peek};

mod tree;
pub use tree::{JsonElement, JsonPrimitive, LazyNumber};

mod writer;
pub use writer::JsonWriter;
