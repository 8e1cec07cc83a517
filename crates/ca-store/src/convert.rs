//! Format detection and decoding of arbitrary payloads.

use std::fmt;

use serde_json::Value;

use crate::{
    error::{Result, StoreError},
    php, xml,
};

/// Encodings a payload can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Serialized,
    Xml,
    None,
}

impl Format {
    /// Detects the encoding of `content`.
    ///
    /// JSON only counts when it decodes to an object or array.
    pub fn detect(content: &str) -> Self {
        if is_json(content) {
            Format::Json
        } else if is_serialized(content) {
            Format::Serialized
        } else if is_xml(content) {
            Format::Xml
        } else {
            Format::None
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "json",
            Format::Serialized => "serialized",
            Format::Xml => "xml",
            Format::None => "none",
        };
        write!(f, "{name}")
    }
}

pub fn is_json(content: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(content.trim()),
        Ok(Value::Object(_) | Value::Array(_))
    )
}

pub fn is_serialized(content: &str) -> bool {
    php::unserialize(content.trim()).is_ok()
}

pub fn is_xml(content: &str) -> bool {
    let content = content.trim();
    content.starts_with('<') && xml::xml_to_value(content).is_ok()
}

/// The shape of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Double,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(n) if n.is_f64() => Kind::Double,
            Value::Number(_) => Kind::Integer,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// Decodes `content` in whichever format it is detected as.
///
/// XML documents decode to an object holding the root element's content.
pub fn to_value(content: &str) -> Result<Value> {
    let content = content.trim();
    match Format::detect(content) {
        Format::Json => Ok(serde_json::from_str(content)?),
        Format::Serialized => php::unserialize(content),
        Format::Xml => xml::xml_to_value(content).map(Value::Object),
        Format::None => Err(StoreError::UnknownFormat),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Format::detect("{\"a\": 1}"), Format::Json);
        assert_eq!(Format::detect(" [1, 2] "), Format::Json);
        assert_eq!(Format::detect("a:0:{}"), Format::Serialized);
        assert_eq!(Format::detect("b:0;"), Format::Serialized);
        assert_eq!(Format::detect("<Container><Name>x</Name></Container>"), Format::Xml);
        assert_eq!(Format::detect("plain text"), Format::None);
        assert_eq!(Format::detect("42"), Format::None);
    }

    #[test]
    fn test_predicates() {
        assert!(is_json("{}"));
        assert!(!is_json("\"string\""));
        assert!(!is_json("{broken"));
        assert!(is_serialized("s:3:\"abc\";"));
        assert!(!is_serialized("s:3:\"abcd\";"));
        assert!(is_xml("<a/>"));
        assert!(!is_xml("<a>"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Kind::of(&json!(null)).to_string(), "null");
        assert_eq!(Kind::of(&json!(true)), Kind::Boolean);
        assert_eq!(Kind::of(&json!(3)), Kind::Integer);
        assert_eq!(Kind::of(&json!(3.5)), Kind::Double);
        assert_eq!(Kind::of(&json!("x")), Kind::String);
        assert_eq!(Kind::of(&json!([])).to_string(), "array");
        assert_eq!(Kind::of(&json!({})), Kind::Object);
    }

    #[test]
    fn test_to_value() {
        assert_eq!(to_value("[1]").unwrap(), json!([1]));
        assert_eq!(to_value("a:1:{i:0;s:1:\"x\";}").unwrap(), json!(["x"]));
        assert_eq!(
            to_value("<Container><Name>x</Name></Container>").unwrap(),
            json!({"Name": "x"})
        );
        assert!(matches!(to_value("nope"), Err(StoreError::UnknownFormat)));
    }
}
