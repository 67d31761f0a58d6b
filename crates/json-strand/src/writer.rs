//! `JsonWriter`: push-style token writer.
//!
//! Output goes straight to the underlying `io::Write`; nothing is buffered
//! here, so callers wanting a `String` write into a `Vec<u8>`.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scope::Scope;

pub struct JsonWriter<'w> {
    out: &'w mut dyn Write,
    scopes: Vec<Scope>,
}

impl<'w> JsonWriter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            scopes: vec![Scope::EmptyDocument],
        }
    }

    pub fn begin_array(&mut self) -> Result<&mut Self> {
        self.open(Scope::EmptyArray, b'[')
    }

    pub fn end_array(&mut self) -> Result<&mut Self> {
        self.close(Scope::EmptyArray, Scope::NonEmptyArray, b']')
    }

    pub fn begin_object(&mut self) -> Result<&mut Self> {
        self.open(Scope::EmptyObject, b'{')
    }

    pub fn end_object(&mut self) -> Result<&mut Self> {
        self.close(Scope::EmptyObject, Scope::NonEmptyObject, b'}')
    }

    pub fn name(&mut self, name: &str) -> Result<&mut Self> {
        match self.top() {
            Scope::EmptyObject => {}
            Scope::NonEmptyObject => self.out.write_all(b",")?,
            _ => return Err(Error::IllegalState("name outside of an object")),
        }
        serde_json::to_writer(&mut *self.out, name)?;
        self.out.write_all(b":")?;
        self.set_top(Scope::DanglingName);
        Ok(self)
    }

    /// Serializes a complete value with `serde_json`.
    pub fn value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.before_value()?;
        serde_json::to_writer(&mut *self.out, value)?;
        Ok(self)
    }

    pub fn null_value(&mut self) -> Result<&mut Self> {
        self.before_value()?;
        self.out.write_all(b"null")?;
        Ok(self)
    }

    /// Opens a byte sink for exactly one pre-encoded JSON value.
    ///
    /// Bytes written to the sink go directly to the output. Call
    /// [`ValueSink::finish`] to check that a value was produced.
    pub fn value_sink(&mut self) -> Result<ValueSink<'_>> {
        self.before_value()?;
        Ok(ValueSink {
            out: &mut *self.out,
            written: 0,
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn open(&mut self, scope: Scope, bracket: u8) -> Result<&mut Self> {
        self.before_value()?;
        self.out.write_all(&[bracket])?;
        self.scopes.push(scope);
        Ok(self)
    }

    fn close(&mut self, empty: Scope, non_empty: Scope, bracket: u8) -> Result<&mut Self> {
        let top = self.top();
        if top != empty && top != non_empty {
            return Err(Error::IllegalState("nesting problem"));
        }
        self.scopes.pop();
        self.out.write_all(&[bracket])?;
        Ok(self)
    }

    fn top(&self) -> Scope {
        self.scopes.last().copied().unwrap_or(Scope::NonEmptyDocument)
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.scopes.last_mut() {
            *top = scope;
        }
    }

    fn before_value(&mut self) -> Result<()> {
        match self.top() {
            Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {
                return Err(Error::IllegalState("JSON must have only one top-level value"))
            }
            Scope::EmptyArray => self.set_top(Scope::NonEmptyArray),
            Scope::NonEmptyArray => self.out.write_all(b",")?,
            Scope::DanglingName => self.set_top(Scope::NonEmptyObject),
            Scope::EmptyObject | Scope::NonEmptyObject => {
                return Err(Error::IllegalState("value without a name"))
            }
        }
        Ok(())
    }
}

/// Write half of [`JsonWriter::value_sink`].
pub struct ValueSink<'s> {
    out: &'s mut dyn Write,
    written: usize,
}

impl ValueSink<'_> {
    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        if self.written == 0 {
            return Err(Error::EmptyValueSink);
        }
        Ok(())
    }
}

impl Write for ValueSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.out.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for ValueSink<'_> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
