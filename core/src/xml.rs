//! Minimal XML tree and writer on top of `quick-xml`.
//!
//! # Design
//! Route 53 responses are small, so they are read into an owned `Element`
//! tree first and then walked by tag name. Tag names are stored without any
//! namespace prefix, and lookups ignore the default namespace, which makes
//! `child("HealthCheck")` behave like an XPath `{*}HealthCheck` step.
//!
//! Text is kept exactly as written. The only text dropped is the
//! whitespace-only indentation inside elements that have child elements.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::ApiError;

/// An owned XML element with its raw text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element, ApiError> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(deserialize_err)? {
                Event::Start(e) => stack.push(Element::named(&e)?),
                Event::Empty(e) => {
                    let element = Element::named(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| deserialize_msg("unbalanced end tag"))?;
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape().map_err(deserialize_err)?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        let text = std::str::from_utf8(&c).map_err(deserialize_err)?;
                        top.text.push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(deserialize_msg("unexpected end of document"));
        }
        root.ok_or_else(|| deserialize_msg("document has no root element"))
    }

    fn named(start: &BytesStart<'_>) -> Result<Element, ApiError> {
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(deserialize_err)?
            .to_string();
        Ok(Element {
            name,
            ..Element::default()
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ApiError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(deserialize_msg("multiple root elements")),
    }
    Ok(())
}

fn deserialize_err(e: impl std::fmt::Display) -> ApiError {
    ApiError::DeserializationError(e.to_string())
}

fn deserialize_msg(msg: &str) -> ApiError {
    ApiError::DeserializationError(msg.to_string())
}

fn serialize_err(e: impl std::fmt::Display) -> ApiError {
    ApiError::SerializationError(e.to_string())
}

/// Streaming writer for request documents. Starts with an XML declaration.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Result<Self, ApiError> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialize_err)?;
        Ok(Self { inner })
    }

    pub(crate) fn start(&mut self, name: &str, xmlns: Option<&str>) -> Result<(), ApiError> {
        let mut start = BytesStart::new(name);
        if let Some(ns) = xmlns {
            start.push_attribute(("xmlns", ns));
        }
        self.inner.write_event(Event::Start(start)).map_err(serialize_err)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), ApiError> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(serialize_err)
    }

    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<(), ApiError> {
        self.start(name, None)?;
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialize_err)?;
        self.end(name)
    }

    /// Write `<name>text</name>` only when a value is present.
    pub(crate) fn optional_element(&mut self, name: &str, text: Option<&str>) -> Result<(), ApiError> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(()),
        }
    }

    pub(crate) fn finish(self) -> Result<String, ApiError> {
        String::from_utf8(self.inner.into_inner()).map_err(serialize_err)
    }
}
