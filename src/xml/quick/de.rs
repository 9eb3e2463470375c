//! Deserialization helpers for quick-xml.
//!
//! Provides:
//! - `Attrs`: attribute map with lenient, never-failing typed getters
//! - `XmlElement`: a small owned element tree built from quick-xml events
//! - `parse_document`: read a whole document into an `XmlElement` tree

use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::xml::deserialize::DeserializeError;

/// A parsed attribute map that owns decoded string values.
///
/// Absent attributes read as the empty string, so callers cannot tell an
/// absent attribute from one written as `attr=""`. Typed getters never fail
/// the caller: a malformed literal is logged and reported as `None` (or
/// `false` from the `read_*` family) so the caller keeps its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    map: HashMap<String, String>,
    /// The element name for log messages
    element_name: String,
}

impl Attrs {
    /// Create an empty Attrs (for synthesized elements or tests).
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
            element_name: String::new(),
        }
    }

    /// Parse attributes from a `BytesStart` event.
    ///
    /// This decodes and unescapes all attribute values once, storing them in a HashMap.
    pub fn from_start<R: BufRead>(
        start: &BytesStart<'_>,
        reader: &Reader<R>,
    ) -> Result<Self, DeserializeError> {
        let element_name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut map = HashMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.decode_and_unescape_value(reader)?.to_string();
            map.insert(key, value);
        }

        Ok(Self { map, element_name })
    }

    /// Get the element name this Attrs was parsed from.
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Get an attribute's text, or `""` when it is absent.
    pub fn get(&self, key: &str) -> &str {
        self.map.get(key).map(|s| s.as_str()).unwrap_or("")
    }

    /// Get an attribute's text when it is present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        Some(self.get(key)).filter(|value| !value.is_empty())
    }

    /// Get a required, non-empty attribute.
    pub fn get_req(&self, key: &str) -> Result<&str, DeserializeError> {
        self.get_non_empty(key)
            .ok_or_else(|| DeserializeError::MissingField(format!("{}@{}", self.element_name, key)))
    }

    /// Get a required, non-empty attribute as an owned String.
    pub fn get_req_string(&self, key: &str) -> Result<String, DeserializeError> {
        self.get_req(key).map(|s| s.to_string())
    }

    /// Get a non-empty attribute parsed as a type implementing FromStr.
    ///
    /// Returns `None` when the attribute is absent or empty, or when it does
    /// not parse; the latter is logged.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T>
    where
        T::Err: std::fmt::Display,
    {
        let literal = self.get_non_empty(key)?;
        match literal.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Invalid value for {}@{}: {} (got '{}'), keeping default",
                    self.element_name,
                    key,
                    e,
                    literal
                );
                None
            }
        }
    }

    /// Parse an attribute into `target`, leaving it untouched on absence or failure.
    ///
    /// Returns whether `target` was updated.
    pub fn read_into<T: FromStr>(&self, key: &str, target: &mut T) -> bool
    where
        T::Err: std::fmt::Display,
    {
        match self.get_parsed(key) {
            Some(value) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get_parsed(key)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_parsed(key)
    }

    /// Get a boolean attribute. Only the literals `true` and `false` are accepted.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get_non_empty(key)? {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                log::warn!(
                    "Invalid boolean for {}@{}: '{}' (expected true/false), keeping default",
                    self.element_name,
                    key,
                    other
                );
                None
            }
        }
    }

    /// Get a boolean attribute with a default value.
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Check if an attribute is present (regardless of value).
    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Set an attribute value. Used when synthesizing elements.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }
}

/// An element of the parsed document: name, attributes, child elements and
/// the concatenated text of its direct text nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Attrs,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut attrs = Attrs::empty();
        attrs.element_name = name.clone();
        Self {
            name,
            attrs,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn from_start<R: BufRead>(
        start: &BytesStart<'_>,
        reader: &Reader<R>,
    ) -> Result<Self, DeserializeError> {
        let attrs = Attrs::from_start(start, reader)?;
        Ok(Self {
            name: attrs.element_name().to_string(),
            attrs,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<XmlElement> {
        &mut self.children
    }

    /// Direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == tag)
    }

    /// The first direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == tag)
    }

    /// Text content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Read an entire document into an element tree and return its root.
///
/// Whitespace-only text is dropped; comments, processing instructions and the
/// XML declaration are ignored.
pub fn parse_document(xml: &str) -> Result<XmlElement, DeserializeError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(XmlElement::from_start(&e, &reader)?);
            }
            Event::Empty(e) => {
                let element = XmlElement::from_start(&e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    DeserializeError::Custom("Unbalanced end tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            // Decl, Comment, PI, DocType - nothing to keep
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DeserializeError::UnexpectedEof);
    }
    root.ok_or_else(|| DeserializeError::Custom("Document has no root element".to_string()))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DeserializeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DeserializeError::UnexpectedElement {
                expected: "end of document".to_string(),
                found: element.name,
            });
        }
    }
    Ok(())
}
