//! `JsonWriter`: writes a single JSON value to an `io::Write`.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};
use crate::tree::JsonElement;

const INDENT: &str = "  ";

pub struct JsonWriter<'w> {
    out: &'w mut dyn Write,
    pretty: bool,
    complete: bool,
}

impl<'w> JsonWriter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            pretty: false,
            complete: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.begin()?;
        if self.pretty {
            let formatter = PrettyFormatter::with_indent(INDENT.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut *self.out, formatter);
            value.serialize(&mut ser)?;
        } else {
            serde_json::to_writer(&mut *self.out, value)?;
        }
        Ok(())
    }

    pub fn null_value(&mut self) -> Result<()> {
        self.begin()?;
        self.out.write_all(b"null")?;
        Ok(())
    }

    /// Writes `raw` verbatim. The caller vouches that it is one complete JSON
    /// value.
    pub fn json_value(&mut self, raw: &str) -> Result<()> {
        self.begin()?;
        self.out.write_all(raw.as_bytes())?;
        Ok(())
    }

    pub fn tree(&mut self, tree: &JsonElement) -> Result<()> {
        self.begin()?;
        let indent = if self.pretty { Some(INDENT) } else { None };
        tree.write_json(&mut *self.out, indent)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        if self.complete {
            return Err(Error::IllegalState("JSON must have only one top-level value"));
        }
        self.complete = true;
        Ok(())
    }
}
