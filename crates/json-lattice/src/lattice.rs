//! The `Lattice` codec instance: factory chain, adapter cache, and the stream
//! and tree entry points.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::sync::Arc;

use json_type_meta::{AnyRef, Described, TypeDescriptor};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::adapter::{downcast, TypeAdapter};
use crate::error::{Error, Result};
use crate::factory::{same_factory, Registry, TypeAdapterFactory};
use crate::reader::JsonReader;
use crate::tree::JsonElement;
use crate::writer::JsonWriter;

pub struct Lattice {
    user_factories: Vec<Arc<dyn TypeAdapterFactory>>,
    registered: Registry,
    pretty: bool,
    chain: Vec<Arc<dyn TypeAdapterFactory>>,
    cache: RwLock<HashMap<TypeId, Arc<dyn TypeAdapter>>>,
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new()
    }
}

impl Lattice {
    pub fn new() -> Self {
        LatticeBuilder::new().build()
    }

    pub fn builder() -> LatticeBuilder {
        LatticeBuilder::new()
    }

    /// A builder carrying this instance's configuration.
    pub fn new_builder(&self) -> LatticeBuilder {
        LatticeBuilder {
            factories: self.user_factories.clone(),
            registered: self.registered.clone(),
            pretty: self.pretty,
        }
    }

    pub fn adapter_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn TypeAdapter>> {
        if let Some(adapter) = self.cache.read().get(&ty.type_id()) {
            trace!(ty = %ty, "adapter cache hit");
            return Ok(Arc::clone(adapter));
        }
        let adapter = self.resolve_from(0, ty)?;
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(ty.type_id()).or_insert(adapter)))
    }

    /// Resolves `ty` with the factories after `skip`. When `skip` is not in
    /// the chain the whole chain is consulted. The result is not cached.
    pub fn delegate_adapter(
        &self,
        skip: &dyn TypeAdapterFactory,
        ty: &TypeDescriptor,
    ) -> Result<Arc<dyn TypeAdapter>> {
        let start = self
            .chain
            .iter()
            .position(|f| same_factory(f.as_ref(), skip))
            .map_or(0, |i| i + 1);
        self.resolve_from(start, ty)
    }

    pub fn adapter<T: Described + Send>(&self) -> Result<TypedAdapter<T>> {
        Ok(TypedAdapter::new(self.adapter_for(&T::descriptor())?))
    }

    pub fn is_pretty_printing(&self) -> bool {
        self.pretty
    }

    pub fn new_json_writer<'w>(&self, out: &'w mut dyn Write) -> JsonWriter<'w> {
        JsonWriter::new(out).pretty(self.pretty)
    }

    pub fn new_json_reader(&self, input: impl Read) -> Result<JsonReader> {
        JsonReader::from_reader(input)
    }

    pub fn to_writer<T: Described + Send>(&self, value: &T, mut out: impl Write) -> Result<()> {
        let adapter = self.adapter::<T>()?;
        let mut writer = self.new_json_writer(&mut out);
        adapter.write(&mut writer, Some(value))?;
        writer.flush()
    }

    /// Decodes a complete document from `input`.
    pub fn from_reader<T: Described + Send>(&self, input: impl Read) -> Result<Option<T>> {
        let adapter = self.adapter::<T>()?;
        let mut reader = self.new_json_reader(input)?;
        let value = adapter.read(&mut reader)?;
        reader.expect_end()?;
        Ok(value)
    }

    pub fn to_json<T: Described + Send>(&self, value: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.to_writer(value, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn from_json<T: Described + Send>(&self, json: &str) -> Result<Option<T>> {
        self.from_reader(json.as_bytes())
    }

    /// Encodes `value` and parses the result into a document tree.
    pub fn to_tree<T: Described + Send>(&self, value: &T) -> Result<JsonElement> {
        self.parse_tree(&self.to_json(value)?)
    }

    pub fn parse_tree(&self, json: &str) -> Result<JsonElement> {
        let mut reader = JsonReader::from_slice(json.as_bytes());
        let tree = reader.read_tree()?;
        reader.expect_end()?;
        Ok(tree)
    }

    pub fn tree_to_string(&self, tree: &JsonElement) -> Result<String> {
        let mut buf = Vec::new();
        self.new_json_writer(&mut buf).tree(tree)?;
        Ok(String::from_utf8(buf)?)
    }

    fn resolve_from(&self, start: usize, ty: &TypeDescriptor) -> Result<Arc<dyn TypeAdapter>> {
        for factory in self.chain.iter().skip(start) {
            if let Some(adapter) = factory.create(self, ty)? {
                return Ok(adapter);
            }
        }
        Err(Error::NoAdapter { ty: ty.to_string() })
    }
}

/// Configuration for a [`Lattice`].
///
/// Chain order: registered factories in order, then registered types, then
/// the built-in scalars.
#[derive(Default)]
pub struct LatticeBuilder {
    factories: Vec<Arc<dyn TypeAdapterFactory>>,
    registered: Registry,
    pretty: bool,
}

impl LatticeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_factory(mut self, factory: impl TypeAdapterFactory + 'static) -> Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Inserts `factory` ahead of every factory registered so far.
    pub fn register_factory_first(mut self, factory: Arc<dyn TypeAdapterFactory>) -> Self {
        self.factories.insert(0, factory);
        self
    }

    pub fn register<T>(mut self) -> Self
    where
        T: Described + Serialize + DeserializeOwned + Send,
    {
        self.registered.insert_serde::<T>();
        self
    }

    pub fn register_adapter(mut self, ty: &TypeDescriptor, adapter: Arc<dyn TypeAdapter>) -> Self {
        self.registered.insert(ty, adapter);
        self
    }

    pub fn pretty_printing(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn build(self) -> Lattice {
        let mut registry = Registry::with_builtins();
        registry.extend(&self.registered);
        let mut chain = self.factories.clone();
        chain.push(Arc::new(registry));
        Lattice {
            user_factories: self.factories,
            registered: self.registered,
            pretty: self.pretty,
            chain,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

/// Typed view over an erased [`TypeAdapter`].
pub struct TypedAdapter<T> {
    inner: Arc<dyn TypeAdapter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedAdapter<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.inner))
    }
}

impl<T> TypedAdapter<T> {
    pub fn new(inner: Arc<dyn TypeAdapter>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn erased(&self) -> &Arc<dyn TypeAdapter> {
        &self.inner
    }
}

impl<T: Any + Send> TypedAdapter<T> {
    pub fn write(&self, out: &mut JsonWriter<'_>, value: Option<&T>) -> Result<()> {
        self.inner.write(out, value.map(|v| v as AnyRef<'_>))
    }

    pub fn read(&self, reader: &mut JsonReader) -> Result<Option<T>> {
        self.inner.read(reader)?.map(downcast::<T>).transpose()
    }

    pub fn to_json(&self, value: Option<&T>) -> Result<String> {
        let mut buf = Vec::new();
        self.write(&mut JsonWriter::new(&mut buf), value)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn from_json(&self, json: &str) -> Result<Option<T>> {
        let mut reader = JsonReader::from_slice(json.as_bytes());
        let value = self.read(&mut reader)?;
        reader.expect_end()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_type_meta::EnumConstant;
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

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    enum Suit {
        Heart,
        Spade,
    }

    impl Described for Suit {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::enumeration::<Suit>([
                EnumConstant::renamed("Heart", "H"),
                EnumConstant::renamed("Spade", "S"),
            ])
        }
    }

    #[test]
    fn test_stream_round_trip() {
        let lattice = Lattice::builder().register::<Point>().build();
        let mut buf = Vec::new();
        lattice.to_writer(&Point { x: 1, y: 2 }, &mut buf).unwrap();
        assert_eq!(buf, br#"{"x":1,"y":2}"#);
        let point: Option<Point> = lattice.from_reader(&buf[..]).unwrap();
        assert_eq!(point, Some(Point { x: 1, y: 2 }));
    }

    #[test]
    fn test_enum_renames_applied() {
        let lattice = Lattice::builder().register::<Suit>().build();
        assert_eq!(lattice.to_json(&Suit::Spade).unwrap(), r#""S""#);
        assert_eq!(lattice.from_json::<Suit>(r#""H""#).unwrap(), Some(Suit::Heart));
    }

    #[test]
    fn test_pretty_printing() {
        let lattice = Lattice::builder().register::<Point>().pretty_printing().build();
        assert_eq!(
            lattice.to_json(&Point { x: 1, y: 2 }).unwrap(),
            "{\n  \"x\": 1,\n  \"y\": 2\n}"
        );
        let tree = lattice.parse_tree(r#"{"x":[]}"#).unwrap();
        assert_eq!(lattice.tree_to_string(&tree).unwrap(), "{\n  \"x\": []\n}");
    }

    #[test]
    fn test_to_tree() {
        let lattice = Lattice::builder().register::<Point>().build();
        let tree = lattice.to_tree(&Point { x: 3, y: 4 }).unwrap();
        assert_eq!(tree.to_string(), r#"{"x":3,"y":4}"#);
    }

    #[test]
    fn test_delegate_adapter_skips_factory() {
        let shadow: Arc<dyn TypeAdapterFactory> = Arc::new(
            |_: &Lattice, ty: &TypeDescriptor| -> Result<Option<Arc<dyn TypeAdapter>>> {
                if ty.is::<bool>() {
                    return Err(Error::IllegalState("shadow factory consulted"));
                }
                Ok(None)
            },
        );
        let lattice = Lattice::builder()
            .register_factory_first(Arc::clone(&shadow))
            .build();
        assert!(lattice.adapter::<bool>().is_err());
        let delegate = lattice
            .delegate_adapter(shadow.as_ref(), &bool::descriptor())
            .unwrap();
        let adapter = TypedAdapter::<bool>::new(delegate);
        assert_eq!(adapter.to_json(Some(&true)).unwrap(), "true");
    }

    #[test]
    fn test_delegate_adapter_with_unknown_factory_uses_whole_chain() {
        let lattice = Lattice::new();
        let stranger = Registry::default();
        assert!(lattice.delegate_adapter(&stranger, &u8::descriptor()).is_ok());
    }

    #[test]
    fn test_trailing_content_rejected() {
        let lattice = Lattice::new();
        assert!(matches!(
            lattice.from_json::<i32>("1 2"),
            Err(Error::TrailingContent { .. })
        ));
    }
}
