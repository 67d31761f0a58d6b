//! Type adapters: the unit of conversion between JSON and Rust values.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use json_type_meta::{AnyRef, AnyValue, Described, EnumConstant};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::reader::{JsonReader, Peek};
use crate::writer::JsonWriter;

/// Converts one type to and from JSON. `None` stands for JSON `null`.
pub trait TypeAdapter: Send + Sync {
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()>;

    fn read(&self, reader: &mut JsonReader) -> Result<Option<AnyValue>>;
}

impl dyn TypeAdapter {
    /// Wraps this adapter so that JSON `null` maps to `None` in both
    /// directions without calling into it.
    pub fn null_safe(self: Arc<Self>) -> Arc<dyn TypeAdapter> {
        Arc::new(NullSafe { delegate: self })
    }
}

struct NullSafe {
    delegate: Arc<dyn TypeAdapter>,
}

impl TypeAdapter for NullSafe {
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
        match value {
            Some(value) => self.delegate.write(out, Some(value)),
            None => out.null_value(),
        }
    }

    fn read(&self, reader: &mut JsonReader) -> Result<Option<AnyValue>> {
        if reader.peek()? == Peek::Null {
            reader.next_null()?;
            return Ok(None);
        }
        self.delegate.read(reader)
    }
}

/// Maps enum constants between their declared and serialized names.
#[derive(Debug, Clone)]
struct ConstantNames {
    to_serialized: HashMap<String, String>,
    to_declared: HashMap<String, String>,
}

impl ConstantNames {
    /// `None` when no constant is renamed.
    fn from_constants(constants: &[EnumConstant]) -> Option<Self> {
        if constants.iter().all(|c| c.serialized_name() == c.name()) {
            return None;
        }
        let to_serialized = constants
            .iter()
            .map(|c| (c.name().to_owned(), c.serialized_name().to_owned()))
            .collect();
        let to_declared = constants
            .iter()
            .map(|c| (c.serialized_name().to_owned(), c.name().to_owned()))
            .collect();
        Some(Self {
            to_serialized,
            to_declared,
        })
    }
}

/// Adapter backed by the type's `serde` implementations. Enum constants
/// carrying a serialized name are written and read under that name.
pub struct SerdeTypeAdapter<T> {
    names: Option<ConstantNames>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Described> SerdeTypeAdapter<T> {
    pub fn new() -> Self {
        let names = T::descriptor()
            .enum_constants()
            .and_then(ConstantNames::from_constants);
        Self {
            names,
            _marker: PhantomData,
        }
    }
}

impl<T: Described> Default for SerdeTypeAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeAdapter for SerdeTypeAdapter<T>
where
    T: Described + Serialize + DeserializeOwned + Send,
{
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
        let Some(value) = value else {
            return out.null_value();
        };
        let value = downcast_ref::<T>(value)?;
        match &self.names {
            None => out.value(value),
            Some(names) => match serde_json::to_value(value)? {
                Value::String(declared) => {
                    let serialized = names.to_serialized.get(&declared).unwrap_or(&declared);
                    out.value(serialized)
                }
                other => out.value(&other),
            },
        }
    }

    fn read(&self, reader: &mut JsonReader) -> Result<Option<AnyValue>> {
        let value: T = match &self.names {
            None => reader.next_value()?,
            Some(names) => match reader.next_value::<Value>()? {
                Value::String(serialized) => {
                    let declared = names.to_declared.get(&serialized).ok_or_else(|| {
                        Error::UnknownConstant {
                            ty: type_name::<T>(),
                            value: serialized.clone(),
                        }
                    })?;
                    serde_json::from_value(Value::String(declared.clone()))?
                }
                other => serde_json::from_value(other)?,
            },
        };
        Ok(Some(Box::new(value)))
    }
}

pub fn downcast_ref<T: Any>(value: AnyRef<'_>) -> Result<&T> {
    value.downcast_ref::<T>().ok_or(Error::TypeMismatch {
        expected: type_name::<T>(),
    })
}

pub fn downcast<T: Any>(value: AnyValue) -> Result<T> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::TypeMismatch {
            expected: type_name::<T>(),
        })
}
