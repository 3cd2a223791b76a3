//! Owned, mutable XML tree for the template-merge pipeline.
//!
//! The skeleton document is parsed into an [`Element`] tree once per
//! invoice, mutated in place by the mapper/synthesizer/recalculator
//! stages, and serialized back to bytes with namespace prefixes intact.
//! Element names keep their qualified form (`cbc:ID`); lookups resolve
//! prefixes through the [`Namespaces`] registry so a path matches any
//! prefix bound to the same URI.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

use super::Namespaces;
use crate::core::EfaturaError;

/// A node in the tree: a child element or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its qualified name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Leaf element with a single text child.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut el = Self::new(name);
        el.children.push(Node::Text(text.into()));
        el
    }

    /// Parse an XML document into its root element.
    ///
    /// Whitespace-only text runs are dropped so that re-serialization with
    /// indentation stays deterministic. Comments and processing
    /// instructions are not preserved.
    pub fn parse(xml: &str) -> Result<Element, EfaturaError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(element_from(e)?),
                Ok(Event::Empty(ref e)) => {
                    let el = element_from(e)?;
                    attach(el, &mut stack, &mut root)?;
                }
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| EfaturaError::Xml("unbalanced end tag".into()))?;
                    attach(el, &mut stack, &mut root)?;
                }
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| EfaturaError::Xml(format!("text unescape error: {e}")))?;
                    if !text.trim().is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Text(text.trim().to_string()));
                        }
                    }
                }
                Ok(Event::CData(ref c)) => {
                    let bytes: &[u8] = c;
                    let text = String::from_utf8_lossy(bytes).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(EfaturaError::Xml(format!("XML parse error: {e}"))),
            }
        }

        if !stack.is_empty() {
            return Err(EfaturaError::Xml("unclosed element at end of input".into()));
        }
        root.ok_or_else(|| EfaturaError::Xml("document has no root element".into()))
    }

    /// Concatenated text content of this element's direct text children.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|n| match n {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        })
    }

    /// Replace all text children with a single text run, keeping child
    /// elements untouched.
    pub fn set_text(&mut self, text: &str) {
        self.children.retain(|n| matches!(n, Node::Element(_)));
        self.children.insert(0, Node::Text(text.to_string()));
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or overwrite an attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element matching `qname` under the registry.
    pub fn child(&self, ns: &Namespaces, qname: &str) -> Option<&Element> {
        self.elements().find(|e| ns.matches(&e.name, qname))
    }

    pub fn child_mut(&mut self, ns: &Namespaces, qname: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| ns.matches(&e.name, qname))
    }

    /// Position of the first matching child within `children`.
    pub fn position_of(&self, ns: &Namespaces, qname: &str) -> Option<usize> {
        self.children.iter().position(|n| match n {
            Node::Element(e) => ns.matches(&e.name, qname),
            Node::Text(_) => false,
        })
    }

    /// Remove every child element matching `qname`; returns how many were
    /// removed.
    pub fn remove_children(&mut self, ns: &Namespaces, qname: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|n| match n {
            Node::Element(e) => !ns.matches(&e.name, qname),
            Node::Text(_) => true,
        });
        before - self.children.len()
    }

    pub fn insert_child(&mut self, index: usize, element: Element) {
        self.children.insert(index, Node::Element(element));
    }

    pub fn push_child(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Walk a `/`-separated qualified path, e.g.
    /// `cac:AccountingSupplierParty/cac:Party/cbc:WebsiteURI`.
    pub fn find(&self, ns: &Namespaces, path: &str) -> Option<&Element> {
        let mut cur = self;
        for segment in path.split('/') {
            cur = cur.child(ns, segment)?;
        }
        Some(cur)
    }

    pub fn find_mut(&mut self, ns: &Namespaces, path: &str) -> Option<&mut Element> {
        let mut cur = self;
        for segment in path.split('/') {
            cur = Element::child_mut(cur, ns, segment)?;
        }
        Some(cur)
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, EfaturaError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| EfaturaError::Xml(format!("attribute error: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| EfaturaError::Xml(format!("attribute unescape error: {e}")))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), EfaturaError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(EfaturaError::Xml("multiple root elements".into()))
    }
}

/// Serialize the tree as UTF-8 bytes with an XML declaration.
///
/// The namespace declarations from `ns` are re-applied to the root on
/// every call, replacing whatever the tree carried, so concurrent renders
/// can never observe another document's prefix bindings.
pub fn serialize(root: &Element, ns: &Namespaces) -> Result<Vec<u8>, EfaturaError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_io)?;

    let mut rebound = root.clone();
    rebound.attributes.retain(|(k, _)| !is_xmlns(k));
    let mut declarations: Vec<(String, String)> = ns
        .declarations()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    declarations.append(&mut rebound.attributes);
    rebound.attributes = declarations;

    write_element(&mut writer, &rebound)?;

    let buf = writer.into_inner().into_inner();
    Ok(buf)
}

fn is_xmlns(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

fn xml_io(e: std::io::Error) -> EfaturaError {
    EfaturaError::Xml(format!("XML write error: {e}"))
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, el: &Element) -> Result<(), EfaturaError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_io)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_io)?;
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(xml_io)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(xml_io)?;
    Ok(())
}
