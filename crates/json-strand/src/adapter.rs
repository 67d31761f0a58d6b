//! Adapters convert between JSON and type-erased Rust values.

use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::sync::Arc;

use json_type_meta::{AnyRef, AnyValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::reader::{JsonReader, Token};
use crate::writer::JsonWriter;

/// Converts one type to and from JSON. `None` stands for JSON `null`.
pub trait JsonAdapter: Send + Sync {
    fn from_json(&self, reader: &mut JsonReader<'_>) -> Result<Option<AnyValue>>;

    fn to_json(&self, writer: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()>;

    /// Encodes `value` as JSON text.
    fn to_json_string(&self, value: Option<AnyRef<'_>>) -> Result<String> {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        self.to_json(&mut writer, value)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Encodes `value` into the generic value model.
    fn to_json_value(&self, value: Option<AnyRef<'_>>) -> Result<Value> {
        let text = self.to_json_string(value)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Decodes a value from the generic value model.
    fn from_json_value(&self, value: &Value) -> Result<Option<AnyValue>> {
        let bytes = serde_json::to_vec(value)?;
        let mut reader = JsonReader::new(&bytes);
        self.from_json(&mut reader)
    }
}

impl dyn JsonAdapter {
    /// Wraps this adapter so that JSON `null` maps to `None` in both
    /// directions without calling into it.
    pub fn null_safe(self: Arc<Self>) -> Arc<dyn JsonAdapter> {
        Arc::new(NullSafeAdapter { delegate: self })
    }
}

struct NullSafeAdapter {
    delegate: Arc<dyn JsonAdapter>,
}

impl JsonAdapter for NullSafeAdapter {
    fn from_json(&self, reader: &mut JsonReader<'_>) -> Result<Option<AnyValue>> {
        if reader.peek()? == Token::Null {
            reader.next_null()?;
            return Ok(None);
        }
        self.delegate.from_json(reader)
    }

    fn to_json(&self, writer: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
        match value {
            Some(value) => self.delegate.to_json(writer, Some(value)),
            None => {
                writer.null_value()?;
                Ok(())
            }
        }
    }
}

/// Adapter backed by the type's `serde` implementations.
pub struct SerdeAdapter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeAdapter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JsonAdapter for SerdeAdapter<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn from_json(&self, reader: &mut JsonReader<'_>) -> Result<Option<AnyValue>> {
        let value: T = reader.next_value()?;
        Ok(Some(Box::new(value)))
    }

    fn to_json(&self, writer: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
        match value {
            Some(value) => writer.value(downcast_ref::<T>(value)?)?,
            None => writer.null_value()?,
        };
        Ok(())
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
