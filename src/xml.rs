//! Ordered XML element tree.
//!
//! Package parts are decoded once into an [`XmlElement`] tree that keeps
//! children in source order. Schema builders then walk the tree by local
//! name, so they never deal with reader events or namespace prefixes.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Child element
    Element(XmlElement),
    /// Character data (entities already unescaped)
    Text(String),
}

/// An XML element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `w:pPr`
    pub name: String,
    /// Attributes as (qualified name, value) pairs
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a complete XML document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        // w:t content is whitespace-significant
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::XmlParse(e.to_string()))?
            {
                Event::Start(ref e) => stack.push(Self::from_start(e)),
                Event::Empty(ref e) => {
                    let element = Self::from_start(e);
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(ref t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| Error::XmlParse(e.to_string()))?;
                        if !text.is_empty() {
                            parent.children.push(XmlNode::Text(text.into_owned()));
                        }
                    }
                }
                Event::CData(ref c) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(c).into_owned();
                        parent.children.push(XmlNode::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::XmlParse(format!(
                "unexpected end of input inside <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart) -> Self {
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();

        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Name without the namespace prefix (`w:pPr` -> `pPr`).
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Check the local name.
    pub fn is(&self, local_name: &str) -> bool {
        self.local_name() == local_name
    }

    /// Look up an attribute by local name, ignoring its prefix.
    ///
    /// WordprocessingML groups attributes under the `w:` prefix, but some
    /// producers omit it, so `w:val` and `val` are treated alike.
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local(key) == local_name)
            .map(|(_, value)| value.as_str())
    }

    /// Look up an attribute by its exact qualified name (`r:id`).
    pub fn attr_exact(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The ubiquitous `w:val` attribute.
    pub fn val(&self) -> Option<&str> {
        self.attr("val")
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.is(local_name))
    }

    /// All child elements with the given local name.
    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| e.is(local_name))
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Add an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element (builder style).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Add a text child (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn local(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}

/// Parse an OOXML on/off value. A missing `w:val` means "on" (`<w:b/>`).
pub fn on_off(element: &XmlElement) -> bool {
    match element.val() {
        None => true,
        Some(v) => !matches!(v, "0" | "false" | "off" | "none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_text() {
        let xml = r#"<?xml version="1.0"?>
<w:p xmlns:w="urn:w"><w:r><w:t xml:space="preserve"> a &amp; b </w:t></w:r><w:r><w:tab/></w:r></w:p>"#;
        let root = XmlElement::parse(xml).unwrap();

        assert_eq!(root.local_name(), "p");
        let runs: Vec<_> = root.children_named("r").collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].child("t").unwrap().text(), " a & b ");
        assert!(runs[1].child("tab").is_some());
    }

    #[test]
    fn test_attribute_lookup_ignores_prefix() {
        let root = XmlElement::parse(r#"<w:jc w:val="center"/>"#).unwrap();
        assert_eq!(root.val(), Some("center"));

        let root = XmlElement::parse(r#"<jc val="right"/>"#).unwrap();
        assert_eq!(root.val(), Some("right"));
        assert_eq!(root.attr_exact("val"), Some("right"));
        assert_eq!(root.attr_exact("w:val"), None);
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        assert!(XmlElement::parse("<w:document><w:body>").is_err());
        assert!(XmlElement::parse("").is_err());
    }

    #[test]
    fn test_on_off() {
        assert!(on_off(&XmlElement::new("w:b")));
        assert!(on_off(&XmlElement::new("w:b").with_attr("w:val", "true")));
        assert!(!on_off(&XmlElement::new("w:b").with_attr("w:val", "0")));
        assert!(!on_off(&XmlElement::new("w:b").with_attr("w:val", "false")));
    }
}
