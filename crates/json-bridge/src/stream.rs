//! Primary-codec adapter that runs a secondary-codec adapter over raw bytes.

use std::sync::Arc;

use json_lattice::TypeAdapter;
use json_strand::{JsonAdapter, JsonReader, JsonWriter};
use json_type_meta::{AnyRef, AnyValue};

use crate::error::into_strand;

/// Hands the raw bytes of each value straight to the wrapped secondary
/// adapter, and lets it write straight into the primary writer's output.
pub struct StreamBridgeAdapter {
    delegate: Arc<dyn TypeAdapter>,
    pretty: bool,
}

impl StreamBridgeAdapter {
    pub fn new(delegate: Arc<dyn TypeAdapter>) -> Self {
        Self {
            delegate,
            pretty: false,
        }
    }

    /// Matches the secondary codec's writer setting.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl JsonAdapter for StreamBridgeAdapter {
    fn from_json(&self, reader: &mut JsonReader<'_>) -> json_strand::Result<Option<AnyValue>> {
        let source = reader.next_source()?;
        let mut input = json_lattice::JsonReader::from_reader(source).map_err(into_strand)?;
        let value = self.delegate.read(&mut input).map_err(into_strand)?;
        input.expect_end().map_err(into_strand)?;
        Ok(value)
    }

    fn to_json(&self, writer: &mut JsonWriter<'_>, value: Option<AnyRef<'_>>) -> json_strand::Result<()> {
        let mut sink = writer.value_sink()?;
        {
            let mut out = json_lattice::JsonWriter::new(&mut sink).pretty(self.pretty);
            self.delegate.write(&mut out, value).map_err(into_strand)?;
        }
        sink.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_lattice::Lattice;
    use json_type_meta::Described;
    use std::io::Read;

    struct FailingRead;

    impl TypeAdapter for FailingRead {
        fn write(
            &self,
            out: &mut json_lattice::JsonWriter<'_>,
            _value: Option<AnyRef<'_>>,
        ) -> json_lattice::Result<()> {
            out.json_value(r#"{"ok":true}"#)
        }

        fn read(&self, _reader: &mut json_lattice::JsonReader) -> json_lattice::Result<Option<AnyValue>> {
            Err(json_lattice::Error::IllegalState("refused"))
        }
    }

    #[test]
    fn test_writes_inside_enclosing_array() {
        let lattice = Lattice::new();
        let delegate = lattice.adapter_for(&u32::descriptor()).unwrap();
        let bridge = StreamBridgeAdapter::new(delegate);

        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        writer.begin_array().unwrap();
        bridge.to_json(&mut writer, Some(&1u32)).unwrap();
        bridge.to_json(&mut writer, Some(&2u32)).unwrap();
        writer.end_array().unwrap();
        assert_eq!(buf, b"[1,2]");
    }

    #[test]
    fn test_reads_inside_enclosing_array() {
        let lattice = Lattice::new();
        let delegate = lattice.adapter_for(&String::descriptor()).unwrap();
        let bridge = StreamBridgeAdapter::new(delegate);

        let mut reader = JsonReader::new(br#"["a", "b"]"#);
        reader.begin_array().unwrap();
        let mut seen = Vec::new();
        while reader.has_next().unwrap() {
            let value = bridge.from_json(&mut reader).unwrap().unwrap();
            seen.push(*value.downcast::<String>().unwrap());
        }
        reader.end_array().unwrap();
        assert_eq!(seen, ["a", "b"]);
    }

    #[test]
    fn test_delegate_error_propagates_and_reader_moves_on() {
        let bridge = StreamBridgeAdapter::new(Arc::new(FailingRead));
        let mut reader = JsonReader::new(br#"[{"x": 1}, 7]"#);
        reader.begin_array().unwrap();
        match bridge.from_json(&mut reader) {
            Err(json_strand::Error::Adapter(inner)) => assert!(matches!(
                inner.downcast_ref::<json_lattice::Error>(),
                Some(json_lattice::Error::IllegalState("refused"))
            )),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert_eq!(reader.next_value::<i32>().unwrap(), 7);
    }

    #[test]
    fn test_raw_delegate_output_is_passed_through() {
        let bridge = StreamBridgeAdapter::new(Arc::new(FailingRead));
        let text = bridge.to_json_string(Some(&())).unwrap();
        assert_eq!(text, r#"{"ok":true}"#);
        let mut raw = String::new();
        JsonReader::new(text.as_bytes())
            .next_source()
            .unwrap()
            .read_to_string(&mut raw)
            .unwrap();
        assert_eq!(raw, text);
    }
}
