//! Secondary-codec adapter backed by a primary-codec adapter.

use std::sync::Arc;

use json_lattice::{JsonReader, JsonWriter, TypeAdapter};
use json_strand::JsonAdapter;
use json_type_meta::{AnyRef, AnyValue};

use crate::error::into_lattice;
use crate::generic::tree_to_generic;

/// Encodes through the primary codec's text output and decodes through its
/// generic value model.
pub struct TreeBridgeAdapter {
    delegate: Arc<dyn JsonAdapter>,
}

impl TreeBridgeAdapter {
    pub fn new(delegate: Arc<dyn JsonAdapter>) -> Self {
        Self { delegate }
    }
}

impl TypeAdapter for TreeBridgeAdapter {
    fn write(&self, out: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> json_lattice::Result<()> {
        let text = self.delegate.to_json_string(value).map_err(into_lattice)?;
        out.json_value(&text)
    }

    fn read(&self, reader: &mut JsonReader) -> json_lattice::Result<Option<AnyValue>> {
        let tree = reader.read_tree()?;
        let generic = tree_to_generic(&tree)?;
        self.delegate.from_json_value(&generic).map_err(into_lattice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_strand::Strand;
    use json_type_meta::Described;

    #[test]
    fn test_write_is_verbatim() {
        let strand = Strand::new();
        let bridge = TreeBridgeAdapter::new(strand.adapter_for(&String::descriptor()).unwrap());
        let mut buf = Vec::new();
        bridge
            .write(&mut JsonWriter::new(&mut buf), Some(&"a\"b".to_owned()))
            .unwrap();
        assert_eq!(buf, br#""a\"b""#);
    }

    #[test]
    fn test_read_goes_through_generic_value() {
        let strand = Strand::new();
        let bridge = TreeBridgeAdapter::new(strand.adapter_for(&i64::descriptor()).unwrap());
        let mut reader = JsonReader::from_slice(b"  -42 ");
        let value = bridge.read(&mut reader).unwrap().unwrap();
        assert_eq!(*value.downcast::<i64>().unwrap(), -42);
        reader.expect_end().unwrap();
    }

    #[test]
    fn test_primary_error_surfaces_unchanged() {
        let strand = Strand::new();
        let bridge = TreeBridgeAdapter::new(strand.adapter_for(&u8::descriptor()).unwrap());
        let mut reader = JsonReader::from_slice(br#""not a number""#);
        let err = bridge.read(&mut reader).err().unwrap();
        match err {
            json_lattice::Error::Adapter(inner) => {
                assert!(inner.downcast_ref::<json_strand::Error>().is_some())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
