//! `JsonReader`: reads whole values out of a buffered JSON stream.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tree::JsonElement;

/// Kind of the next value in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peek {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    End,
}

pub struct JsonReader {
    data: Vec<u8>,
    x: usize,
}

impl JsonReader {
    /// Drains `input` into the reader's buffer.
    pub fn from_reader(mut input: impl Read) -> Result<Self> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        Ok(Self { data, x: 0 })
    }

    pub fn from_slice(input: &[u8]) -> Self {
        Self {
            data: input.to_vec(),
            x: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.x
    }

    pub fn peek(&mut self) -> Result<Peek> {
        Ok(match self.next_non_ws() {
            None => Peek::End,
            Some(b'n') => Peek::Null,
            Some(b't' | b'f') => Peek::Bool,
            Some(b'"') => Peek::String,
            Some(b'[') => Peek::Array,
            Some(b'{') => Peek::Object,
            Some(b'-' | b'0'..=b'9') => Peek::Number,
            Some(_) => {
                return Err(Error::Syntax {
                    expected: "a value",
                    offset: self.x,
                })
            }
        })
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.next_non_ws();
        if !self.data[self.x..].starts_with(b"null") {
            return Err(Error::Syntax {
                expected: "null",
                offset: self.x,
            });
        }
        self.x += 4;
        Ok(())
    }

    /// Deserializes the next value with `serde_json`.
    pub fn next_value<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.next_non_ws();
        let mut stream = serde_json::Deserializer::from_slice(&self.data[self.x..]).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => {
                self.x += stream.byte_offset();
                Ok(value)
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(Error::Syntax {
                expected: "a value",
                offset: self.x,
            }),
        }
    }

    /// Parses the next value into a document tree.
    pub fn read_tree(&mut self) -> Result<JsonElement> {
        Ok(JsonElement::from(self.next_value::<Value>()?))
    }

    /// Fails if anything but whitespace remains.
    pub fn expect_end(&mut self) -> Result<()> {
        match self.next_non_ws() {
            None => Ok(()),
            Some(_) => Err(Error::TrailingContent { offset: self.x }),
        }
    }

    fn next_non_ws(&mut self) -> Option<u8> {
        while self.x < self.data.len() {
            match self.data[self.x] {
                b' ' | b'\t' | b'\n' | b'\r' => self.x += 1,
                ch => return Some(ch),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_from_stream() {
        let mut reader = JsonReader::from_reader(&b" [1, 2] "[..]).unwrap();
        assert_eq!(reader.peek().unwrap(), Peek::Array);
        assert_eq!(reader.next_value::<Vec<i32>>().unwrap(), vec![1, 2]);
        reader.expect_end().unwrap();
    }

    #[test]
    fn test_trailing_content() {
        let mut reader = JsonReader::from_slice(b"1 2");
        assert_eq!(reader.next_value::<i32>().unwrap(), 1);
        assert!(matches!(reader.expect_end(), Err(Error::TrailingContent { offset: 2 })));
    }

    #[test]
    fn test_next_null() {
        let mut reader = JsonReader::from_slice(b"  null");
        assert_eq!(reader.peek().unwrap(), Peek::Null);
        reader.next_null().unwrap();
        assert_eq!(reader.peek().unwrap(), Peek::End);
    }

    #[test]
    fn test_read_tree() {
        let mut reader = JsonReader::from_slice(br#"{"b":1.50,"a":"x"}"#);
        let tree = reader.read_tree().unwrap();
        let members = tree.as_object().unwrap();
        assert_eq!(members.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(members["b"].as_primitive().unwrap().as_number().unwrap().as_str(), "1.50");
    }

    #[test]
    fn test_read_tree_keeps_wide_integers() {
        let text = format!("[{}, {}, 12345678901234567890123]", u128::MAX, i128::MIN);
        let mut reader = JsonReader::from_slice(text.as_bytes());
        let tree = reader.read_tree().unwrap();
        let numbers: Vec<&str> = tree
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n.as_primitive().unwrap().as_number().unwrap().as_str())
            .collect();
        assert_eq!(
            numbers,
            [
                "340282366920938463463374607431768211455",
                "-170141183460469231731687303715884105728",
                "12345678901234567890123",
            ]
        );
        assert_eq!(tree.to_string(), text.replace(", ", ","));
    }
}
