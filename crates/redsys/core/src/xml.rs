//! Minimal XML mapping for the SOAP `trataPeticion` exchange
//!
//! Responses are turned into the same nested mapping the rest of the crate
//! consumes: elements with children become objects, text-only elements become
//! strings, empty elements become empty strings and repeated siblings become
//! arrays. The root element is dropped.

use quick_xml::{Reader, events::Event};
use serde_json::{Map, Value};
use tracing::trace;

use crate::{Result, validation::ValidationError};

#[derive(Debug)]
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> (String, Value) {
        let value = if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        };
        (self.name, value)
    }
}

fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

/// Decode an XML document into a mapping of the root element's children
pub fn to_mapping(xml: &str) -> Result<Map<String, Value>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::new(start.name().as_ref())),
            Event::Empty(empty) => {
                let (name, value) = Frame::new(empty.name().as_ref()).into_value();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, value),
                    None => root = Some(value),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(ValidationError::Message("Unbalanced XML document".into()).into());
                };
                let (name, value) = frame.into_value();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, value),
                    None => root = Some(value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ValidationError::Message("Unterminated XML document".into()).into());
    }

    match root {
        Some(Value::Object(mapping)) => {
            trace!(fields = mapping.len(), "Decoded XML response");
            Ok(mapping)
        }
        Some(Value::String(s)) if s.is_empty() => Ok(Map::new()),
        Some(_) => Err(ValidationError::Message("XML root has no child elements".into()).into()),
        None => Err(ValidationError::Message("Empty XML document".into()).into()),
    }
}

/// Render one `<NAME>value</NAME>` element with the value escaped
pub(crate) fn element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", quick_xml::escape::escape(value))
}
