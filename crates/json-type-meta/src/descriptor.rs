//! Runtime type descriptors and the metadata attached to them.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single piece of codec-specific metadata attached to a type or an enum
/// constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata {
    /// The primary codec should generate an adapter for this type.
    GenerateAdapter,
    /// The secondary codec writes this enum constant under a different name.
    SerializedName(String),
    /// Free-form marker understood by neither codec.
    Other(String),
}

/// Fieldless discriminant of [`Metadata`], used by metadata queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    GenerateAdapter,
    SerializedName,
    Other,
}

impl Metadata {
    pub fn kind(&self) -> MetadataKind {
        match self {
            Metadata::GenerateAdapter => MetadataKind::GenerateAdapter,
            Metadata::SerializedName(_) => MetadataKind::SerializedName,
            Metadata::Other(_) => MetadataKind::Other,
        }
    }
}

fn contains_kind(metadata: &[Metadata], kind: MetadataKind) -> bool {
    metadata.iter().any(|m| m.kind() == kind)
}

/// One constant of an enumeration, as seen by the codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    name: String,
    metadata: Vec<Metadata>,
}

impl EnumConstant {
    /// A constant without metadata. `name` must match the serde variant name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Vec::new(),
        }
    }

    /// A constant carrying a [`Metadata::SerializedName`].
    pub fn renamed(name: impl Into<String>, serialized: impl Into<String>) -> Self {
        Self::new(name).with_metadata(Metadata::SerializedName(serialized.into()))
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn has_metadata(&self, kind: MetadataKind) -> bool {
        contains_kind(&self.metadata, kind)
    }

    /// The name the secondary codec writes for this constant.
    pub fn serialized_name(&self) -> &str {
        self.metadata
            .iter()
            .find_map(|m| match m {
                Metadata::SerializedName(s) => Some(s.as_str()),
                _ => None,
            })
            .unwrap_or(&self.name)
    }
}

/// Structural category of a described type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Any non-enum type: scalars, structs, containers.
    Class,
    /// An enumeration together with its constants in declaration order.
    Enum(Vec<EnumConstant>),
}

/// Runtime-reflectable identifier for a concrete Rust type.
///
/// Identity (equality and hashing) is the [`TypeId`] alone, so descriptors
/// can key adapter caches. A descriptor with type arguments is
/// *parameterized*; only descriptors without arguments are bare classes.
#[derive(Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    shape: TypeShape,
    metadata: Vec<Metadata>,
    args: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor of a non-enum, non-generic type.
    pub fn class<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: TypeShape::Class,
            metadata: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Descriptor of an enumeration with the given constants.
    pub fn enumeration<T: ?Sized + 'static>(
        constants: impl IntoIterator<Item = EnumConstant>,
    ) -> Self {
        Self {
            shape: TypeShape::Enum(constants.into_iter().collect()),
            ..Self::class::<T>()
        }
    }

    /// Descriptor of a generic type instantiated with `args`.
    pub fn parameterized<T: ?Sized + 'static>(args: Vec<TypeDescriptor>) -> Self {
        Self {
            args,
            ..Self::class::<T>()
        }
    }

    /// Shorthand for `T::descriptor()`.
    pub fn of<T: crate::Described>() -> Self {
        T::descriptor()
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn type_args(&self) -> &[TypeDescriptor] {
        &self.args
    }

    /// True when the descriptor names a plain type with no type arguments.
    pub fn is_bare_class(&self) -> bool {
        self.args.is_empty()
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape, TypeShape::Enum(_))
    }

    pub fn enum_constants(&self) -> Option<&[EnumConstant]> {
        match &self.shape {
            TypeShape::Enum(constants) => Some(constants),
            TypeShape::Class => None,
        }
    }

    /// Whether the type itself carries metadata of `kind`. Constants are not
    /// consulted; query them through [`TypeDescriptor::enum_constants`].
    pub fn has_metadata(&self, kind: MetadataKind) -> bool {
        contains_kind(&self.metadata, kind)
    }

    /// True when `T` is the described type.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
