#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use json_bridge::{Bridge, CodecPair};
use json_lattice::{JsonReader, JsonWriter, Lattice, SerdeTypeAdapter, TypeAdapter};
use json_strand::{JsonAdapter, SerdeAdapter, Strand};
use json_type_meta::{AnyRef, AnyValue, Described, EnumConstant, Metadata, TypeDescriptor};
use serde::{Deserialize, Serialize};

/// Plain struct: owned by the secondary codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Described for Point {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class::<Point>()
    }
}

/// Enum without renamed constants: owned by the primary codec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Described for Color {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::enumeration::<Color>([
            EnumConstant::new("Red"),
            EnumConstant::new("Green"),
            EnumConstant::new("Blue"),
        ])
    }
}

/// Enum with renamed constants: owned by the secondary codec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Suit {
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

/// Struct carrying the generate-adapter marker: owned by the primary codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub weight: f64,
    pub tags: Vec<String>,
}

impl Described for Label {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class::<Label>().with_metadata(Metadata::GenerateAdapter)
    }
}

/// Integers wider than 64 bits, owned by the primary codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wide {
    pub v: u128,
    pub w: i128,
}

impl Described for Wide {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class::<Wide>().with_metadata(Metadata::GenerateAdapter)
    }
}

/// Both codecs with each type registered on its owning side only.
pub fn pair() -> CodecPair {
    let strand = Strand::builder()
        .register::<Color>()
        .register::<Label>()
        .register::<Wide>()
        .build();
    let lattice = Lattice::builder()
        .register::<Point>()
        .register::<Suit>()
        .register::<Vec<Point>>()
        .build();
    Bridge::new(strand, lattice).build()
}

/// Lattice adapter that counts the calls reaching it.
pub struct Counting {
    inner: SerdeTypeAdapter<Point>,
    calls: AtomicUsize,
}

impl Counting {
    pub fn new() -> Self {
        Self {
            inner: SerdeTypeAdapter::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeAdapter for Counting {
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> json_lattice::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.write(out, value)
    }

    fn read(&self, reader: &mut JsonReader) -> json_lattice::Result<Option<AnyValue>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.read(reader)
    }
}

/// Strand adapter for [`Color`] that counts the calls reaching it.
pub struct CountingColor {
    inner: SerdeAdapter<Color>,
    calls: AtomicUsize,
}

impl CountingColor {
    pub fn new() -> Self {
        Self {
            inner: SerdeAdapter::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JsonAdapter for CountingColor {
    fn from_json(&self, reader: &mut json_strand::JsonReader<'_>) -> json_strand::Result<Option<AnyValue>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.from_json(reader)
    }

    fn to_json(
        &self,
        writer: &mut json_strand::JsonWriter<'_>,
        value: Option<AnyRef<'_>>,
    ) -> json_strand::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.to_json(writer, value)
    }
}
