//! Reader and writer for PHP's `serialize()` format.
//!
//! Older state files were written with PHP serialization. They are decoded
//! into [`serde_json::Value`] so the rest of the toolkit only deals with one
//! value model. Lists whose keys run `0..n` in order become JSON arrays; any
//! other array becomes a JSON object with stringified keys.

use serde_json::{Map, Number, Value};

use crate::error::{Result, StoreError};

/// Deepest array or object nesting accepted by [`unserialize`].
const MAX_DEPTH: usize = 128;

/// Decodes a PHP serialized string.
///
/// Supports `N;`, `b:`, `i:`, `d:`, `s:`, `a:` and `O:` entries. Trailing
/// whitespace after the top-level value is allowed, anything else is an error.
pub fn unserialize(input: &str) -> Result<Value> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    if parser.bytes[parser.pos..]
        .iter()
        .any(|b| !b.is_ascii_whitespace())
    {
        return Err(parser.error("trailing data after value"));
    }
    Ok(value)
}

/// Encodes a value in PHP serialized form.
pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

enum Key {
    Int(i64),
    Str(String),
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &str) -> StoreError {
        StoreError::Unserialize {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    /// Reads up to (not including) `end` and consumes the terminator.
    fn until(&mut self, end: u8) -> Result<&'a str> {
        let bytes = self.bytes;
        let start = self.pos;
        let len = bytes[start..]
            .iter()
            .position(|&b| b == end)
            .ok_or_else(|| self.error(&format!("missing '{}'", end as char)))?;
        self.pos = start + len + 1;
        std::str::from_utf8(&bytes[start..start + len])
            .map_err(|_| StoreError::Unserialize {
                offset: start,
                reason: "invalid UTF-8".into(),
            })
    }

    fn length(&mut self) -> Result<usize> {
        let raw = self.until(b':')?;
        raw.parse()
            .map_err(|_| self.error(&format!("invalid length '{raw}'")))
    }

    fn string_body(&mut self) -> Result<String> {
        let len = self.length()?;
        self.expect(b'"')?;
        let end = match self.pos.checked_add(len) {
            Some(end) if end <= self.bytes.len() => end,
            _ => return Err(self.error("string runs past end of input")),
        };
        let text = String::from_utf8_lossy(&self.bytes[self.pos..end]).into_owned();
        self.pos = end;
        self.expect(b'"')?;
        Ok(text)
    }

    fn value(&mut self) -> Result<Value> {
        let tag = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;

        if tag == b'N' {
            self.expect(b';')?;
            return Ok(Value::Null);
        }
        self.expect(b':')?;

        match tag {
            b'b' => {
                let raw = self.until(b';')?;
                match raw {
                    "0" => Ok(Value::Bool(false)),
                    "1" => Ok(Value::Bool(true)),
                    _ => Err(self.error("invalid boolean")),
                }
            }
            b'i' => {
                let raw = self.until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| self.error(&format!("invalid integer '{raw}'")))
            }
            b'd' => {
                let raw = self.until(b';')?;
                let parsed: f64 = raw
                    .parse()
                    .map_err(|_| self.error(&format!("invalid float '{raw}'")))?;
                Ok(Number::from_f64(parsed).map_or(Value::Null, Value::Number))
            }
            b's' => {
                let text = self.string_body()?;
                self.expect(b';')?;
                Ok(Value::String(text))
            }
            b'a' => {
                let count = self.length()?;
                self.entries(count)
            }
            b'O' => {
                // class name is dropped, properties keep their names
                self.string_body()?;
                self.expect(b':')?;
                let count = self.length()?;
                let value = self.entries(count)?;
                Ok(match value {
                    Value::Object(map) => {
                        Value::Object(map.into_iter().map(|(k, v)| (property_name(k), v)).collect())
                    }
                    other => other,
                })
            }
            other => {
                self.pos -= 2;
                Err(self.error(&format!("unsupported type '{}'", other as char)))
            }
        }
    }

    fn key(&mut self) -> Result<Key> {
        match self.value()? {
            Value::Number(n) => n
                .as_i64()
                .map(Key::Int)
                .ok_or_else(|| self.error("array key must be an integer or string")),
            Value::String(s) => Ok(Key::Str(s)),
            _ => Err(self.error("array key must be an integer or string")),
        }
    }

    fn entries(&mut self, count: usize) -> Result<Value> {
        self.expect(b'{')?;
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;

        // the count is read from the input; cap the preallocation by what is left
        let mut entries = Vec::with_capacity(count.min(self.bytes.len() - self.pos));
        for _ in 0..count {
            let key = self.key()?;
            let value = self.value()?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        self.depth -= 1;

        let sequential = entries
            .iter()
            .enumerate()
            .all(|(idx, (key, _))| matches!(key, Key::Int(n) if *n == idx as i64));

        if sequential {
            return Ok(Value::Array(entries.into_iter().map(|(_, v)| v).collect()));
        }

        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value)| {
                let key = match key {
                    Key::Int(n) => n.to_string(),
                    Key::Str(s) => s,
                };
                (key, value)
            })
            .collect();
        Ok(Value::Object(map))
    }
}

/// Strips the `\0Class\0` and `\0*\0` prefixes PHP puts on private and
/// protected property names.
fn property_name(name: String) -> String {
    if let Some(rest) = name.strip_prefix('\0') {
        if let Some((_, prop)) = rest.split_once('\0') {
            return prop.to_string();
        }
    }
    name
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&format!("s:{}:\"{}\";", s.len(), s));
}

fn write_key(out: &mut String, key: &str) {
    match key.parse::<i64>() {
        Ok(n) if n.to_string() == key => out.push_str(&format!("i:{n};")),
        _ => write_string(out, key),
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push_str(&format!("i:{i};"));
            } else if let Some(f) = n.as_f64() {
                out.push_str(&format!("d:{f};"));
            }
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push_str(&format!("a:{}:{{", items.len()));
            for (idx, item) in items.iter().enumerate() {
                out.push_str(&format!("i:{idx};"));
                write_value(out, item);
            }
            out.push('}');
        }
        Value::Object(map) => {
            out.push_str(&format!("a:{}:{{", map.len()));
            for (key, item) in map {
                write_key(out, key);
                write_value(out, item);
            }
            out.push('}');
        }
    }
}
