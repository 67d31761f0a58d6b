//! Factories that decorate the adapter the rest of the chain would produce.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use json_lattice::{JsonReader, JsonWriter, Lattice, Result, TypeAdapter, TypeAdapterFactory};
use json_type_meta::{AnyRef, AnyValue, Described, TypeDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    celsius: f64,
}

impl Described for Reading {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class::<Reading>()
    }
}

/// Counts reads and writes for every type it sees, then defers.
#[derive(Default)]
struct Audit {
    seen: Arc<AtomicUsize>,
}

struct Audited {
    seen: Arc<AtomicUsize>,
    delegate: Arc<dyn TypeAdapter>,
}

impl TypeAdapter for Audited {
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> Result<()> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        self.delegate.write(out, value)
    }

    fn read(&self, reader: &mut JsonReader) -> Result<Option<AnyValue>> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        self.delegate.read(reader)
    }
}

impl TypeAdapterFactory for Audit {
    fn create(&self, lattice: &Lattice, ty: &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>> {
        let delegate = lattice.delegate_adapter(self, ty)?;
        Ok(Some(Arc::new(Audited {
            seen: Arc::clone(&self.seen),
            delegate,
        })))
    }
}

#[test]
fn decorating_factory_wraps_native_adapter() {
    let audit = Audit::default();
    let seen = Arc::clone(&audit.seen);
    let lattice = Lattice::builder()
        .register::<Reading>()
        .register_factory(audit)
        .build();

    let reading = Reading {
        sensor: "roof".to_owned(),
        celsius: 21.5,
    };
    let json = lattice.to_json(&reading).unwrap();
    assert_eq!(json, r#"{"sensor":"roof","celsius":21.5}"#);
    assert_eq!(lattice.from_json::<Reading>(&json).unwrap(), Some(reading));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn rebuilt_codec_keeps_configuration() {
    let lattice = Lattice::builder().register::<Reading>().pretty_printing().build();
    let rebuilt = lattice.new_builder().build();
    assert!(rebuilt.is_pretty_printing());
    let tree = rebuilt
        .to_tree(&Reading {
            sensor: "cellar".to_owned(),
            celsius: 9.0,
        })
        .unwrap();
    assert_eq!(
        tree.as_object().unwrap().keys().collect::<Vec<_>>(),
        ["sensor", "celsius"]
    );
}

#[test]
fn tree_survives_text_round_trip() {
    let lattice = Lattice::new();
    let text = r#"{"b":[1,2.50,{"c":null},18446744073709551616],"a":"x"}"#;
    let tree = lattice.parse_tree(text).unwrap();
    assert_eq!(lattice.tree_to_string(&tree).unwrap(), text);
}
