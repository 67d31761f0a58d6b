use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use json_type_meta::{Described, TypeDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapter::{SerdeTypeAdapter, TypeAdapter};
use crate::error::Result;
use crate::lattice::Lattice;

/// Produces adapters for the types it understands and declines the rest
/// with `Ok(None)`.
pub trait TypeAdapterFactory: Send + Sync {
    fn create(&self, lattice: &Lattice, ty: &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>>;
}

impl<F> TypeAdapterFactory for F
where
    F: Fn(&Lattice, &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>> + Send + Sync,
{
    fn create(&self, lattice: &Lattice, ty: &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>> {
        self(lattice, ty)
    }
}

pub(crate) fn same_factory(a: &dyn TypeAdapterFactory, b: &dyn TypeAdapterFactory) -> bool {
    std::ptr::addr_eq(a as *const dyn TypeAdapterFactory, b as *const dyn TypeAdapterFactory)
}

/// Exact-type lookup table; sits at the end of every chain.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    adapters: HashMap<TypeId, Arc<dyn TypeAdapter>>,
}

impl Registry {
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self::default();
        macro_rules! builtin {
            ($($ty:ty),* $(,)?) => { $( registry.insert_serde::<$ty>(); )* };
        }
        builtin!(
            bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
            String, serde_json::Value,
        );
        registry
    }

    pub(crate) fn insert_serde<T>(&mut self)
    where
        T: Described + Serialize + DeserializeOwned + Send,
    {
        let adapter: Arc<dyn TypeAdapter> = Arc::new(SerdeTypeAdapter::<T>::new());
        self.adapters.insert(TypeId::of::<T>(), adapter.null_safe());
    }

    pub(crate) fn insert(&mut self, ty: &TypeDescriptor, adapter: Arc<dyn TypeAdapter>) {
        self.adapters.insert(ty.type_id(), adapter);
    }

    pub(crate) fn extend(&mut self, other: &Registry) {
        self.adapters
            .extend(other.adapters.iter().map(|(k, v)| (*k, Arc::clone(v))));
    }
}

impl TypeAdapterFactory for Registry {
    fn create(&self, _lattice: &Lattice, ty: &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok(self.adapters.get(&ty.type_id()).cloned())
    }
}
