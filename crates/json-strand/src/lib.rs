//! json-strand: a token-stream JSON codec built around an ordered chain of
//! adapter factories.
//!
//! Adapters are resolved per [`TypeDescriptor`] (optionally narrowed by
//! [`Qualifier`]s): each [`AdapterFactory`] in the chain either produces an
//! adapter or declines, and the first adapter produced is cached.
//!
//! # Example
//!
//! ```
//! use json_strand::Strand;
//! use json_type_meta::{Described, TypeDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Described for Point {
//!     fn descriptor() -> TypeDescriptor { TypeDescriptor::class::<Point>() }
//! }
//!
//! let strand = Strand::builder().register::<Point>().build();
//! let adapter = strand.adapter::<Point>().unwrap();
//! assert_eq!(adapter.to_json(Some(&Point { x: 1, y: 2 })).unwrap(), r#"{"x":1,"y":2}"#);
//! assert_eq!(adapter.from_json("null").unwrap(), None);
//! ```
//!
//! [`TypeDescriptor`]: json_type_meta::TypeDescriptor

mod adapter;
pub use adapter::{downcast, downcast_ref, JsonAdapter, SerdeAdapter};

mod error;
pub use error::{Error, Result};

mod factory;
pub use factory::{AdapterFactory, Qualifier};

mod reader;
pub use reader::{JsonReader, Token, ValueSource};

mod scope;

mod strand;
pub use strand::{Adapter, Strand, StrandBuilder};

mod writer;
pub use writer::{JsonWriter, ValueSink};
