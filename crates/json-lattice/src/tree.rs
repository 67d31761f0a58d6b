//! In-memory document tree.
//!
//! Object members keep insertion order. Numbers keep the decimal text they
//! were parsed from and are only interpreted on request.

use std::fmt;
use std::io::{self, Write};

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonElement {
    Null,
    Primitive(JsonPrimitive),
    Array(Vec<JsonElement>),
    Object(IndexMap<String, JsonElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsonPrimitive {
    Bool(bool),
    Number(LazyNumber),
    String(String),
}

/// A number held as its decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyNumber(String);

impl LazyNumber {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// Parses the text as a JSON number; fails for text that is not valid
    /// JSON (`NaN`, `Infinity`, hex, ...). The digits are kept exactly.
    pub fn to_json_number(&self) -> Result<serde_json::Number, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for LazyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl JsonPrimitive {
    pub fn is_boolean(&self) -> bool {
        matches!(self, JsonPrimitive::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonPrimitive::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonPrimitive::String(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonPrimitive::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&LazyNumber> {
        match self {
            JsonPrimitive::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonPrimitive::String(s) => Some(s),
            _ => None,
        }
    }
}

impl JsonElement {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonElement::Null)
    }

    pub fn as_primitive(&self) -> Option<&JsonPrimitive> {
        match self {
            JsonElement::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonElement]> {
        match self {
            JsonElement::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, JsonElement>> {
        match self {
            JsonElement::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Writes the tree as JSON text. With `indent`, output matches
    /// `serde_json`'s pretty printer using that indent per level.
    pub fn write_json(&self, out: &mut dyn Write, indent: Option<&str>) -> io::Result<()> {
        self.write_level(out, indent, 0)
    }

    fn write_level(&self, out: &mut dyn Write, indent: Option<&str>, depth: usize) -> io::Result<()> {
        match self {
            JsonElement::Null => out.write_all(b"null"),
            JsonElement::Primitive(JsonPrimitive::Bool(b)) => {
                out.write_all(if *b { b"true" } else { b"false" })
            }
            JsonElement::Primitive(JsonPrimitive::Number(n)) => out.write_all(n.as_str().as_bytes()),
            JsonElement::Primitive(JsonPrimitive::String(s)) => write_str(out, s),
            JsonElement::Array(items) => {
                if items.is_empty() {
                    return out.write_all(b"[]");
                }
                out.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b",")?;
                    }
                    newline(out, indent, depth + 1)?;
                    item.write_level(out, indent, depth + 1)?;
                }
                newline(out, indent, depth)?;
                out.write_all(b"]")
            }
            JsonElement::Object(members) => {
                if members.is_empty() {
                    return out.write_all(b"{}");
                }
                out.write_all(b"{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b",")?;
                    }
                    newline(out, indent, depth + 1)?;
                    write_str(out, key)?;
                    out.write_all(if indent.is_some() { b": " } else { b":" })?;
                    value.write_level(out, indent, depth + 1)?;
                }
                newline(out, indent, depth)?;
                out.write_all(b"}")
            }
        }
    }
}

fn write_str(out: &mut dyn Write, s: &str) -> io::Result<()> {
    serde_json::to_writer(out, s).map_err(io::Error::from)
}

fn newline(out: &mut dyn Write, indent: Option<&str>, depth: usize) -> io::Result<()> {
    if let Some(indent) = indent {
        out.write_all(b"\n")?;
        for _ in 0..depth {
            out.write_all(indent.as_bytes())?;
        }
    }
    Ok(())
}

impl fmt::Display for JsonElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_json(&mut buf, None).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

impl From<Value> for JsonElement {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonElement::Null,
            Value::Bool(b) => JsonElement::Primitive(JsonPrimitive::Bool(b)),
            // `Number` holds its source text verbatim (`arbitrary_precision`).
            Value::Number(n) => JsonElement::Primitive(JsonPrimitive::Number(LazyNumber(n.to_string()))),
            Value::String(s) => JsonElement::Primitive(JsonPrimitive::String(s)),
            Value::Array(items) => JsonElement::Array(items.into_iter().map(JsonElement::from).collect()),
            Value::Object(members) => JsonElement::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, JsonElement::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for JsonElement {
    fn from(b: bool) -> Self {
        JsonElement::Primitive(JsonPrimitive::Bool(b))
    }
}

impl From<&str> for JsonElement {
    fn from(s: &str) -> Self {
        JsonElement::Primitive(JsonPrimitive::String(s.to_owned()))
    }
}

impl From<LazyNumber> for JsonElement {
    fn from(n: LazyNumber) -> Self {
        JsonElement::Primitive(JsonPrimitive::Number(n))
    }
}
