//! XML codec for application templates.
//!
//! A document is mapped onto a JSON object: the root element's children become
//! keys, repeated children are grouped into a list, attributes live under
//! `@attributes` and the text of an element that also carries attributes lives
//! under `value`. Text-only elements become strings and empty elements `""`.

use quick_xml::{
    escape::escape,
    events::{BytesStart, Event},
    Reader,
};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

pub const ATTRIBUTES_KEY: &str = "@attributes";
pub const VALUE_KEY: &str = "value";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

struct Frame {
    name: String,
    attributes: Map<String, Value>,
    text: String,
    children: Map<String, Value>,
}

impl Frame {
    fn open(start: &BytesStart) -> Result<Self> {
        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| StoreError::MalformedXml(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| StoreError::MalformedXml(err.to_string()))?;
            attributes.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Map::new(),
        })
    }

    fn into_value(self) -> Value {
        if !self.children.is_empty() {
            let mut map = Map::new();
            if !self.attributes.is_empty() {
                map.insert(ATTRIBUTES_KEY.into(), Value::Object(self.attributes));
            }
            map.extend(self.children);
            return Value::Object(map);
        }

        if !self.attributes.is_empty() {
            let mut map = Map::new();
            map.insert(ATTRIBUTES_KEY.into(), Value::Object(self.attributes));
            if !self.text.is_empty() {
                map.insert(VALUE_KEY.into(), Value::String(self.text));
            }
            return Value::Object(map);
        }

        Value::String(self.text)
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }
}

/// Parses an XML document into the root element's content.
///
/// Root attributes, if any, are returned under `@attributes`.
///
/// # Errors
///
/// Returns [`StoreError::MalformedXml`] for syntax errors, mismatched or
/// unclosed tags, and documents without a root element.
pub fn xml_to_value(xml: &str) -> Result<Map<String, Value>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Frame> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| StoreError::MalformedXml(err.to_string()))?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(StoreError::MalformedXml(
                        "multiple root elements".into(),
                    ));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        parent.add_child(name, frame.into_value());
                    }
                    None if root.is_none() => root = Some(frame),
                    None => {
                        return Err(StoreError::MalformedXml(
                            "multiple root elements".into(),
                        ))
                    }
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|err| StoreError::MalformedXml(err.to_string()))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(StoreError::MalformedXml("unexpected closing tag".into()));
                };
                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        parent.add_child(name, frame.into_value());
                    }
                    None => root = Some(frame),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(StoreError::MalformedXml(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    let root = root.ok_or_else(|| StoreError::MalformedXml("no root element".into()))?;
    let mut map = Map::new();
    if !root.attributes.is_empty() {
        map.insert(ATTRIBUTES_KEY.into(), Value::Object(root.attributes));
    }
    map.extend(root.children);
    Ok(map)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn attribute_list(attributes: Option<&Value>) -> String {
    let mut out = String::new();
    if let Some(Value::Object(attrs)) = attributes {
        for (key, value) in attrs {
            out.push_str(&format!(" {key}=\"{}\"", escape(text_of(value).as_str())));
        }
    }
    out
}

fn write_children(out: &mut String, map: &Map<String, Value>, depth: usize) {
    for (key, value) in map {
        if key == ATTRIBUTES_KEY || key == VALUE_KEY {
            continue;
        }
        write_element(out, key, value, depth);
    }
}

fn write_element(out: &mut String, name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item, depth);
            }
        }
        Value::Object(map) => {
            let attrs = attribute_list(map.get(ATTRIBUTES_KEY));
            let has_children = map
                .keys()
                .any(|k| k != ATTRIBUTES_KEY && k != VALUE_KEY);

            if has_children {
                out.push_str(&format!("{indent}<{name}{attrs}>\n"));
                write_children(out, map, depth + 1);
                out.push_str(&format!("{indent}</{name}>\n"));
            } else {
                let text = map.get(VALUE_KEY).map(text_of).unwrap_or_default();
                if text.is_empty() {
                    out.push_str(&format!("{indent}<{name}{attrs}/>\n"));
                } else {
                    out.push_str(&format!(
                        "{indent}<{name}{attrs}>{}</{name}>\n",
                        escape(text.as_str())
                    ));
                }
            }
        }
        scalar => {
            let text = text_of(scalar);
            if text.is_empty() {
                out.push_str(&format!("{indent}<{name}/>\n"));
            } else {
                out.push_str(&format!(
                    "{indent}<{name}>{}</{name}>\n",
                    escape(text.as_str())
                ));
            }
        }
    }
}

/// Renders `map` as an XML document whose root element is `root`.
///
/// Lists repeat the element, `@attributes` become attributes and `value`
/// becomes element text. Booleans render as `true`/`false` and null as an
/// empty element.
pub fn value_to_xml(root: &str, map: &Map<String, Value>) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push('\n');
    let attrs = attribute_list(map.get(ATTRIBUTES_KEY));
    out.push_str(&format!("<{root}{attrs}>\n"));
    write_children(&mut out, map, 1);
    out.push_str(&format!("</{root}>\n"));
    out
}
