//! Adapter factories and the built-in registry at the end of every chain.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use json_type_meta::TypeDescriptor;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapter::{JsonAdapter, SerdeAdapter};
use crate::error::Result;
use crate::strand::Strand;

/// Names an alternative encoding of a type, e.g. `Qualifier::new("hex")` on
/// an integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Qualifier(&'static str);

impl Qualifier {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One link of the adapter resolution chain.
///
/// Returning `Ok(None)` declines the request and resolution moves on to the
/// next factory.
pub trait AdapterFactory: Send + Sync {
    fn create(
        &self,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
        strand: &Strand,
    ) -> Result<Option<Arc<dyn JsonAdapter>>>;
}

impl<F> AdapterFactory for F
where
    F: Fn(&TypeDescriptor, &[Qualifier], &Strand) -> Result<Option<Arc<dyn JsonAdapter>>>
        + Send
        + Sync,
{
    fn create(
        &self,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
        strand: &Strand,
    ) -> Result<Option<Arc<dyn JsonAdapter>>> {
        self(ty, qualifiers, strand)
    }
}

pub(crate) fn same_factory(a: &dyn AdapterFactory, b: &dyn AdapterFactory) -> bool {
    std::ptr::addr_eq(a as *const dyn AdapterFactory, b as *const dyn AdapterFactory)
}

/// Serves unqualified requests for registered types and the built-in scalars.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    adapters: HashMap<TypeId, Arc<dyn JsonAdapter>>,
}

macro_rules! builtin_adapters {
    ($registry:expr, $($ty:ty),* $(,)?) => {
        $( $registry.insert_serde::<$ty>(); )*
    };
}

impl Registry {
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self::default();
        builtin_adapters!(
            registry,
            bool,
            char,
            i8,
            i16,
            i32,
            i64,
            i128,
            isize,
            u8,
            u16,
            u32,
            u64,
            u128,
            usize,
            f32,
            f64,
            String,
            serde_json::Value,
        );
        registry
    }

    pub(crate) fn insert_serde<T>(&mut self)
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let adapter: Arc<dyn JsonAdapter> = Arc::new(SerdeAdapter::<T>::new());
        self.adapters.insert(TypeId::of::<T>(), adapter.null_safe());
    }

    pub(crate) fn insert(&mut self, ty: &TypeDescriptor, adapter: Arc<dyn JsonAdapter>) {
        self.adapters.insert(ty.type_id(), adapter);
    }

    /// Entries of `other` win over entries of `self`.
    pub(crate) fn merged_with(mut self, other: &Registry) -> Self {
        self.adapters
            .extend(other.adapters.iter().map(|(k, v)| (*k, Arc::clone(v))));
        self
    }
}

impl AdapterFactory for Registry {
    fn create(
        &self,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
        _strand: &Strand,
    ) -> Result<Option<Arc<dyn JsonAdapter>>> {
        if !qualifiers.is_empty() {
            return Ok(None);
        }
        Ok(self.adapters.get(&ty.type_id()).cloned())
    }
}
