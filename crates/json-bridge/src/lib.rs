//! json-bridge: lets two JSON codecs share one application.
//!
//! Every value type is owned by exactly one codec, decided by a
//! [`RoutingPolicy`]. A request for a type the asked codec does not own is
//! answered with an adapter that forwards to the owning codec:
//!
//! * the primary codec ([`json_strand`]) hands the raw bytes of each value to
//!   the secondary adapter ([`StreamBridgeAdapter`]);
//! * the secondary codec ([`json_lattice`]) writes the primary adapter's text
//!   verbatim and reads through the generic value model
//!   ([`TreeBridgeAdapter`]).
//!
//! # Example
//!
//! ```
//! use json_bridge::Bridge;
//! use json_lattice::Lattice;
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
//! // Only the secondary codec knows `Point`.
//! let pair = Bridge::new(Strand::new(), Lattice::builder().register::<Point>().build()).build();
//!
//! let json = pair.primary().to_json(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//! assert_eq!(pair.primary().from_json::<Point>(&json).unwrap(), Some(Point { x: 1, y: 2 }));
//! ```

mod bridge;
mod error;
mod generic;
mod policy;
mod primary;
mod secondary;
mod stream;
mod tree;

pub use bridge::{Bridge, CodecPair};
pub use error::BridgeError;
pub use generic::tree_to_generic;
pub use policy::{DefaultPolicy, Owner, RoutingPolicy};
pub use primary::PrimaryExtensionPoint;
pub use secondary::SecondaryExtensionPoint;
pub use stream::StreamBridgeAdapter;
pub use tree::TreeBridgeAdapter;
