//! Built-in scalar types and the [`Described`] implementations that ship with
//! this crate.

use std::any::TypeId;
use std::collections::BTreeMap;

use crate::{Described, TypeDescriptor};

macro_rules! builtin_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Described for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::class::<$ty>()
                }
            }
        )*

        /// Whether `ty` is one of the fixed built-in scalar types: `bool`,
        /// `char`, the integer and float families, `String`, and
        /// `serde_json::Value` as the "any" placeholder.
        pub fn is_builtin(ty: &TypeDescriptor) -> bool {
            let id = ty.type_id();
            $(id == TypeId::of::<$ty>())||*
        }
    };
}

builtin_types!(
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

impl<T: Described> Described for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::parameterized::<Vec<T>>(vec![T::descriptor()])
    }
}

impl<T: Described> Described for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::parameterized::<Option<T>>(vec![T::descriptor()])
    }
}

impl<V: Described> Described for BTreeMap<String, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::parameterized::<BTreeMap<String, V>>(vec![
            String::descriptor(),
            V::descriptor(),
        ])
    }
}
