// src/utils/xml.rs

//! XML to JSON-like tree conversion.
//!
//! Converts an XML document into a `serde_json::Value` tree:
//!
//! - the root element becomes a single-key object (`{"items": ...}`)
//! - text-only elements become strings, empty elements become `""`
//! - a child element name seen once stays a bare value, a repeated name
//!   becomes an array in document order
//! - attributes are collected under `"$"`, text mixed with children under `"_"`
//!
//! The one-or-many shape of repeated elements is left as-is here; callers
//! resolve it through [`crate::models::as_sequence`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Key under which element attributes are stored.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key under which text content is stored when an element also has children.
pub const TEXT_KEY: &str = "_";

/// An element being assembled while its children are read.
struct Node {
    name: String,
    attributes: Map<String, Value>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Node {
    fn open(start: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Map::new();
        for attr in start.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_default();
            attributes.insert(key, Value::String(value));
        }

        Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() && self.attributes.is_empty() {
            return Value::String(self.text);
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }

        for (name, value) in self.children {
            match map.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name, value);
                }
            }
        }

        if !self.text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }

        Value::Object(map)
    }
}

/// Parse an XML document into a JSON-like tree rooted at its document element.
pub fn parse(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Node::open(&start)),
            Event::Empty(start) => close(&mut stack, &mut root, Node::open(&start))?,
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| AppError::parse("closing tag without an open element"))?;
                close(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(node) = stack.last() {
        return Err(AppError::parse(format!("element <{}> is never closed", node.name)));
    }

    let (name, value) = root.ok_or_else(|| AppError::parse("document has no root element"))?;
    let mut map = Map::new();
    map.insert(name, value);
    Ok(Value::Object(map))
}

fn close(
    stack: &mut [Node],
    root: &mut Option<(String, Value)>,
    node: Node,
) -> Result<()> {
    let name = node.name.clone();
    let value = node.into_value();

    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(AppError::parse("document has more than one root element")),
    }
    Ok(())
}

/// Text content of a converted element, if it has any.
pub fn text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
        _ => None,
    }
}

/// Non-empty, trimmed text of a named child element.
pub fn child_text(value: &Value, name: &str) -> Option<String> {
    value
        .get(name)
        .and_then(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_child_stays_object() {
        let value = parse(
            "<collections><collection><id>7</id><name>Dept</name></collection></collections>",
        )
        .unwrap();
        let collection = &value["collections"]["collection"];
        assert!(collection.is_object());
        assert_eq!(collection["id"], "7");
        assert_eq!(collection["name"], "Dept");
    }

    #[test]
    fn test_repeated_children_become_array() {
        let value = parse(
            "<items><item><id>1</id></item><item><id>2</id></item><item><id>3</id></item></items>",
        )
        .unwrap();
        let items = value["items"]["item"].as_array().unwrap();
        let ids: Vec<_> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_element_is_empty_string() {
        let value = parse("<collections/>").unwrap();
        assert_eq!(value["collections"], "");
    }

    #[test]
    fn test_attributes_and_mixed_text() {
        let value = parse(r#"<value lang="en">Hello <b>world</b></value>"#).unwrap();
        let node = &value["value"];
        assert_eq!(node["$"]["lang"], "en");
        assert_eq!(node["b"], "world");
        assert_eq!(text(node), Some("Hello"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let value = parse("<name>Heat &amp; Mass Transfer</name>").unwrap();
        assert_eq!(value["name"], "Heat & Mass Transfer");
    }

    #[test]
    fn test_unclosed_document_is_rejected() {
        assert!(parse("<items><item>").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_child_text_skips_blank() {
        let value = parse("<item><name>  </name><type>item</type></item>").unwrap();
        let item = &value["item"];
        assert_eq!(child_text(item, "name"), None);
        assert_eq!(child_text(item, "type"), Some("item".to_string()));
        assert_eq!(child_text(item, "missing"), None);
    }
}
