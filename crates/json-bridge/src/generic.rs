//! Conversion from the secondary codec's document tree to the generic value
//! graph understood by the primary codec.

use json_lattice::{JsonElement, JsonPrimitive};
use serde_json::{Map, Value};

use crate::error::BridgeError;

/// Converts `tree` depth-first. Object members keep their order.
pub fn tree_to_generic(tree: &JsonElement) -> Result<Value, BridgeError> {
    match tree {
        JsonElement::Array(items) => items
            .iter()
            .map(tree_to_generic)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        JsonElement::Object(members) => {
            let mut map = Map::with_capacity(members.len());
            for (key, value) in members {
                map.insert(key.clone(), tree_to_generic(value)?);
            }
            Ok(Value::Object(map))
        }
        JsonElement::Primitive(primitive) => primitive_to_generic(primitive),
        JsonElement::Null => Ok(Value::Null),
    }
}

fn primitive_to_generic(primitive: &JsonPrimitive) -> Result<Value, BridgeError> {
    if let Some(b) = primitive.as_bool() {
        return Ok(Value::Bool(b));
    }
    if let Some(n) = primitive.as_number() {
        return n
            .to_json_number()
            .map(Value::Number)
            .map_err(|e| BridgeError::MalformedNode(format!("number {n}: {e}")));
    }
    if let Some(s) = primitive.as_str() {
        return Ok(Value::String(s.to_owned()));
    }
    Err(BridgeError::MalformedNode(format!("{primitive:?}")))
}
