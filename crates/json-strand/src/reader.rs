//! `JsonReader`: pull-style token reader over an in-memory JSON document.
//!
//! Structural tokens are handled here; scalar values and whole sub-documents
//! are handed to `serde_json`, which also locates the end of each value for
//! [`JsonReader::next_source`].

use std::io;

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::{Error, Result};
use crate::scope::Scope;

/// The kind of the next token in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name,
    String,
    Number,
    Boolean,
    Null,
    EndDocument,
}

impl Token {
    fn is_value(self) -> bool {
        matches!(
            self,
            Token::BeginArray
                | Token::BeginObject
                | Token::String
                | Token::Number
                | Token::Boolean
                | Token::Null
        )
    }
}

pub struct JsonReader<'a> {
    data: &'a [u8],
    x: usize,
    scopes: Vec<Scope>,
    peeked: Option<Token>,
}

impl<'a> JsonReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            scopes: vec![Scope::EmptyDocument],
            peeked: None,
        }
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.x
    }

    pub fn peek(&mut self) -> Result<Token> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }
        let token = self.do_peek()?;
        self.peeked = Some(token);
        Ok(token)
    }

    pub fn has_next(&mut self) -> Result<bool> {
        let token = self.peek()?;
        Ok(!matches!(
            token,
            Token::EndArray | Token::EndObject | Token::EndDocument
        ))
    }

    pub fn begin_array(&mut self) -> Result<()> {
        self.expect(Token::BeginArray, "BEGIN_ARRAY")?;
        self.x += 1;
        self.scopes.push(Scope::EmptyArray);
        self.peeked = None;
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.expect(Token::EndArray, "END_ARRAY")?;
        self.scopes.pop();
        self.peeked = None;
        Ok(())
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.expect(Token::BeginObject, "BEGIN_OBJECT")?;
        self.x += 1;
        self.scopes.push(Scope::EmptyObject);
        self.peeked = None;
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.expect(Token::EndObject, "END_OBJECT")?;
        self.scopes.pop();
        self.peeked = None;
        Ok(())
    }

    pub fn next_name(&mut self) -> Result<String> {
        self.expect(Token::Name, "NAME")?;
        let end = self.value_end()?;
        let name = serde_json::from_slice(&self.data[self.x..end])?;
        self.x = end;
        self.peeked = None;
        Ok(name)
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.expect(Token::Null, "NULL")?;
        if !self.data[self.x..].starts_with(b"null") {
            return Err(self.syntax("null"));
        }
        self.x += 4;
        self.peeked = None;
        Ok(())
    }

    /// Deserializes the next complete value with `serde_json`.
    pub fn next_value<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.expect_value()?;
        let end = self.value_end()?;
        let value = serde_json::from_slice(&self.data[self.x..end])?;
        self.x = end;
        self.peeked = None;
        Ok(value)
    }

    pub fn skip_value(&mut self) -> Result<()> {
        self.expect_value()?;
        self.x = self.value_end()?;
        self.peeked = None;
        Ok(())
    }

    /// Opens the raw bytes of the next value as a byte stream.
    ///
    /// The reader is not advanced until the returned source is dropped, and
    /// dropping it always moves the cursor past the whole value, however much
    /// of it was actually read.
    pub fn next_source(&mut self) -> Result<ValueSource<'_, 'a>> {
        self.expect_value()?;
        let end = self.value_end()?;
        let start = self.x;
        self.peeked = None;
        Ok(ValueSource {
            reader: self,
            pos: start,
            end,
        })
    }

    /// Fails unless the whole document has been consumed.
    pub fn expect_end(&mut self) -> Result<()> {
        self.expect(Token::EndDocument, "END_DOCUMENT")
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<()> {
        let actual = self.peek()?;
        if actual != token {
            return Err(self.unexpected(expected, actual));
        }
        Ok(())
    }

    fn expect_value(&mut self) -> Result<()> {
        let actual = self.peek()?;
        if !actual.is_value() {
            return Err(self.unexpected("a value", actual));
        }
        Ok(())
    }

    fn unexpected(&self, expected: &'static str, actual: Token) -> Error {
        Error::UnexpectedToken {
            expected,
            actual,
            offset: self.x,
        }
    }

    fn syntax(&self, expected: &'static str) -> Error {
        Error::Syntax {
            expected,
            offset: self.x,
        }
    }

    fn top(&self) -> Scope {
        self.scopes.last().copied().unwrap_or(Scope::NonEmptyDocument)
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.scopes.last_mut() {
            *top = scope;
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

    fn value_end(&self) -> Result<usize> {
        let rest = &self.data[self.x..];
        let mut stream = serde_json::Deserializer::from_slice(rest).into_iter::<IgnoredAny>();
        match stream.next() {
            Some(Ok(_)) => Ok(self.x + stream.byte_offset()),
            Some(Err(e)) => Err(e.into()),
            None => Err(self.syntax("a value")),
        }
    }

    fn do_peek(&mut self) -> Result<Token> {
        let top = self.top();
        match top {
            Scope::EmptyArray => self.set_top(Scope::NonEmptyArray),
            Scope::NonEmptyArray => match self.next_non_ws() {
                Some(b']') => {
                    self.x += 1;
                    return Ok(Token::EndArray);
                }
                Some(b',') => self.x += 1,
                _ => return Err(self.syntax("',' or ']'")),
            },
            Scope::EmptyObject | Scope::NonEmptyObject => {
                if top == Scope::NonEmptyObject {
                    match self.next_non_ws() {
                        Some(b'}') => {
                            self.x += 1;
                            return Ok(Token::EndObject);
                        }
                        Some(b',') => self.x += 1,
                        _ => return Err(self.syntax("',' or '}'")),
                    }
                }
                return match self.next_non_ws() {
                    Some(b'"') => {
                        self.set_top(Scope::DanglingName);
                        Ok(Token::Name)
                    }
                    Some(b'}') if top == Scope::EmptyObject => {
                        self.x += 1;
                        Ok(Token::EndObject)
                    }
                    _ => Err(self.syntax("a name")),
                };
            }
            Scope::DanglingName => {
                self.set_top(Scope::NonEmptyObject);
                match self.next_non_ws() {
                    Some(b':') => self.x += 1,
                    _ => return Err(self.syntax("':'")),
                }
            }
            Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {}
        }

        match self.next_non_ws() {
            None if matches!(top, Scope::EmptyDocument | Scope::NonEmptyDocument) => {
                Ok(Token::EndDocument)
            }
            None => Err(self.syntax("a value")),
            Some(b']') if top == Scope::EmptyArray => {
                self.x += 1;
                Ok(Token::EndArray)
            }
            Some(b'[') => Ok(Token::BeginArray),
            Some(b'{') => Ok(Token::BeginObject),
            Some(b'"') => Ok(Token::String),
            Some(b't' | b'f') => Ok(Token::Boolean),
            Some(b'n') => Ok(Token::Null),
            Some(b'-' | b'0'..=b'9') => Ok(Token::Number),
            Some(_) => Err(self.syntax("a value")),
        }
    }
}

/// Raw bytes of a single JSON value, borrowed from a [`JsonReader`].
pub struct ValueSource<'r, 'a> {
    reader: &'r mut JsonReader<'a>,
    pos: usize,
    end: usize,
}

impl ValueSource<'_, '_> {
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }
}

impl io::Read for ValueSource<'_, '_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = &self.reader.data[self.pos..self.end];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Drop for ValueSource<'_, '_> {
    fn drop(&mut self) {
        self.reader.x = self.end;
    }
}
