//! The `Strand` codec instance: a factory chain plus an adapter cache.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use json_type_meta::{AnyRef, Described, TypeDescriptor};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::adapter::{downcast, JsonAdapter};
use crate::error::{Error, Result};
use crate::factory::{same_factory, AdapterFactory, Qualifier, Registry};
use crate::reader::JsonReader;
use crate::writer::JsonWriter;

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    id: TypeId,
    qualifiers: Vec<Qualifier>,
}

/// A configured codec. Immutable once built; reconfigure through
/// [`Strand::new_builder`].
pub struct Strand {
    user_factories: Vec<Arc<dyn AdapterFactory>>,
    registered: Registry,
    chain: Vec<Arc<dyn AdapterFactory>>,
    cache: RwLock<HashMap<CacheKey, Arc<dyn JsonAdapter>>>,
}

impl Default for Strand {
    fn default() -> Self {
        Self::new()
    }
}

impl Strand {
    pub fn new() -> Self {
        StrandBuilder::new().build()
    }

    pub fn builder() -> StrandBuilder {
        StrandBuilder::new()
    }

    /// A builder pre-populated with this instance's factories and
    /// registrations. The cache is not carried over.
    pub fn new_builder(&self) -> StrandBuilder {
        StrandBuilder {
            factories: self.user_factories.clone(),
            registered: self.registered.clone(),
        }
    }

    pub fn adapter_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn JsonAdapter>> {
        self.adapter_with_qualifiers(ty, &[])
    }

    /// Resolves the adapter for `ty` under `qualifiers`, consulting the
    /// factory chain in order on a cache miss.
    pub fn adapter_with_qualifiers(
        &self,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
    ) -> Result<Arc<dyn JsonAdapter>> {
        let key = CacheKey {
            id: ty.type_id(),
            qualifiers: qualifiers.to_vec(),
        };
        if let Some(adapter) = self.cache.read().get(&key) {
            trace!(ty = %ty, ?qualifiers, "adapter cache hit");
            return Ok(Arc::clone(adapter));
        }
        // Factories may re-enter the codec, so no lock is held while resolving.
        let adapter = self.resolve_from(0, ty, qualifiers)?;
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(key).or_insert(adapter)))
    }

    /// Resolves `ty` using only the factories after `skip` in the chain.
    pub fn next_adapter(
        &self,
        skip: &dyn AdapterFactory,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
    ) -> Result<Arc<dyn JsonAdapter>> {
        let position = self
            .chain
            .iter()
            .position(|f| same_factory(f.as_ref(), skip))
            .ok_or(Error::UnknownFactory)?;
        self.resolve_from(position + 1, ty, qualifiers)
    }

    pub fn adapter<T: Described + Send>(&self) -> Result<Adapter<T>> {
        Ok(Adapter::new(self.adapter_for(&T::descriptor())?))
    }

    pub fn to_json<T: Described + Send>(&self, value: &T) -> Result<String> {
        self.adapter::<T>()?.to_json(Some(value))
    }

    pub fn from_json<T: Described + Send>(&self, json: &str) -> Result<Option<T>> {
        self.adapter::<T>()?.from_json(json)
    }

    fn resolve_from(
        &self,
        start: usize,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
    ) -> Result<Arc<dyn JsonAdapter>> {
        for factory in self.chain.iter().skip(start) {
            if let Some(adapter) = factory.create(ty, qualifiers, self)? {
                return Ok(adapter);
            }
        }
        Err(Error::NoAdapter {
            ty: if qualifiers.is_empty() {
                ty.to_string()
            } else {
                format!("{ty} annotated {qualifiers:?}")
            },
        })
    }
}

/// Collects factories and registrations for a [`Strand`].
///
/// Chain order: added factories in order, then registered types, then the
/// built-in scalars.
#[derive(Default)]
pub struct StrandBuilder {
    factories: Vec<Arc<dyn AdapterFactory>>,
    registered: Registry,
}

impl StrandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, factory: impl AdapterFactory + 'static) -> Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Inserts `factory` ahead of every factory added so far.
    pub fn add_first(mut self, factory: Arc<dyn AdapterFactory>) -> Self {
        self.factories.insert(0, factory);
        self
    }

    /// Handles `T` through its `serde` implementations.
    pub fn register<T>(mut self) -> Self
    where
        T: Described + Serialize + DeserializeOwned + Send,
    {
        self.registered.insert_serde::<T>();
        self
    }

    /// Handles unqualified requests for `ty` with `adapter`.
    pub fn register_adapter(mut self, ty: &TypeDescriptor, adapter: Arc<dyn JsonAdapter>) -> Self {
        self.registered.insert(ty, adapter);
        self
    }

    pub fn build(self) -> Strand {
        let registry = Registry::with_builtins().merged_with(&self.registered);
        let mut chain = self.factories.clone();
        chain.push(Arc::new(registry));
        Strand {
            user_factories: self.factories,
            registered: self.registered,
            chain,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

/// Typed view over an erased [`JsonAdapter`].
pub struct Adapter<T> {
    inner: Arc<dyn JsonAdapter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Adapter<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.inner))
    }
}

impl<T> Adapter<T> {
    pub fn new(inner: Arc<dyn JsonAdapter>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn erased(&self) -> &Arc<dyn JsonAdapter> {
        &self.inner
    }
}

impl<T: Any + Send> Adapter<T> {
    pub fn to_json(&self, value: Option<&T>) -> Result<String> {
        self.inner.to_json_string(erase(value))
    }

    /// Decodes a complete document; trailing content is an error.
    pub fn from_json(&self, json: &str) -> Result<Option<T>> {
        let mut reader = JsonReader::new(json.as_bytes());
        let value = self.read(&mut reader)?;
        reader.expect_end()?;
        Ok(value)
    }

    pub fn read(&self, reader: &mut JsonReader<'_>) -> Result<Option<T>> {
        self.inner.from_json(reader)?.map(downcast::<T>).transpose()
    }

    pub fn write(&self, writer: &mut JsonWriter<'_>, value: Option<&T>) -> Result<()> {
        self.inner.to_json(writer, erase(value))
    }

    pub fn to_json_value(&self, value: Option<&T>) -> Result<Value> {
        self.inner.to_json_value(erase(value))
    }

    pub fn from_json_value(&self, value: &Value) -> Result<Option<T>> {
        self.inner
            .from_json_value(value)?
            .map(downcast::<T>)
            .transpose()
    }
}

fn erase<T: Any + Send>(value: Option<&T>) -> Option<AnyRef<'_>> {
    value.map(|v| v as AnyRef<'_>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_type_meta::AnyValue;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Described for Point {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::class::<Point>()
        }
    }

    const HEX: Qualifier = Qualifier::new("hex");

    struct HexAdapter;

    impl JsonAdapter for HexAdapter {
        fn from_json(&self, reader: &mut JsonReader<'_>) -> Result<Option<AnyValue>> {
            let text: String = reader.next_value()?;
            let value = i64::from_str_radix(text.trim_start_matches("0x"), 16)
                .map_err(|e| Error::Adapter(Box::new(e)))?;
            Ok(Some(Box::new(value)))
        }

        fn to_json(&self, writer: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
            let value = value.map(crate::adapter::downcast_ref::<i64>).transpose()?;
            match value {
                Some(v) => writer.value(&format!("0x{v:x}"))?,
                None => writer.null_value()?,
            };
            Ok(())
        }
    }

    fn hex_factory(
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
        _: &Strand,
    ) -> Result<Option<Arc<dyn JsonAdapter>>> {
        if ty.is::<i64>() && qualifiers == [HEX] {
            return Ok(Some(Arc::new(HexAdapter)));
        }
        Ok(None)
    }

    #[test]
    fn test_registered_type_round_trip() {
        let strand = Strand::builder().register::<Point>().build();
        let json = strand.to_json(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2}"#);
        let point = strand.from_json::<Point>(&json).unwrap();
        assert_eq!(point, Some(Point { x: 1, y: 2 }));
    }

    #[test]
    fn test_unregistered_type_has_no_adapter() {
        let strand = Strand::new();
        assert!(matches!(strand.adapter::<Point>(), Err(Error::NoAdapter { .. })));
    }

    #[test]
    fn test_builtins_are_null_safe() {
        let strand = Strand::new();
        let adapter = strand.adapter::<String>().unwrap();
        assert_eq!(adapter.to_json(None).unwrap(), "null");
        assert_eq!(adapter.from_json("null").unwrap(), None);
        assert_eq!(adapter.from_json(r#""hi""#).unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn test_qualified_request_uses_factory() {
        let strand = Strand::builder().add(hex_factory).build();
        let ty = i64::descriptor();
        let hex = strand.adapter_with_qualifiers(&ty, &[HEX]).unwrap();
        assert_eq!(hex.to_json_string(Some(&255i64)).unwrap(), r#""0xff""#);
        let plain = strand.adapter_for(&ty).unwrap();
        assert_eq!(plain.to_json_string(Some(&255i64)).unwrap(), "255");
    }

    #[test]
    fn test_adapters_are_cached() {
        let strand = Strand::builder().register::<Point>().build();
        let a = strand.adapter_for(&Point::descriptor()).unwrap();
        let b = strand.adapter_for(&Point::descriptor()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_next_adapter_skips_earlier_factories() {
        let shadow: Arc<dyn AdapterFactory> = Arc::new(
            |ty: &TypeDescriptor, _: &[Qualifier], _: &Strand| -> Result<Option<Arc<dyn JsonAdapter>>> {
                if ty.is::<i32>() {
                    return Err(Error::IllegalState("shadow factory consulted"));
                }
                Ok(None)
            },
        );
        let strand = Strand::builder().add_first(Arc::clone(&shadow)).build();
        assert!(strand.adapter::<i32>().is_err());
        let next = strand
            .next_adapter(shadow.as_ref(), &i32::descriptor(), &[])
            .unwrap();
        assert_eq!(next.to_json_string(Some(&5i32)).unwrap(), "5");
    }

    #[test]
    fn test_next_adapter_requires_known_factory() {
        let strand = Strand::new();
        let stranger = Registry::default();
        let err = strand
            .next_adapter(&stranger, &i32::descriptor(), &[])
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownFactory));
    }

    #[test]
    fn test_new_builder_keeps_configuration() {
        let strand = Strand::builder().register::<Point>().add(hex_factory).build();
        let rebuilt = strand.new_builder().build();
        assert!(rebuilt.adapter::<Point>().is_ok());
        assert!(rebuilt
            .adapter_with_qualifiers(&i64::descriptor(), &[HEX])
            .is_ok());
    }

    #[test]
    fn test_trailing_content_rejected() {
        let strand = Strand::new();
        assert!(strand.from_json::<i32>("1 2").is_err());
    }
}
