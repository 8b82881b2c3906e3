//! Raw node tree for search engine XML responses.
//!
//! A response is read into an [`Element`] tree with `facet-xml`, without any
//! schema. The typed views on top of it ([`Kind`], [`Element::name`],
//! [`Element::select`]) are what the binding layer navigates with.

mod kind;
mod select;

use facet_xml as xml;
use std::collections::HashMap;
use std::fmt;

pub use kind::Kind;
pub use select::{Path, PathError, Segment};

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { tracing::trace!($($tt)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}
pub(crate) use trace;

/// Error when XML text cannot be read into an [`Element`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    message: String,
}

impl ReadError {
    /// The message reported by the XML reader.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed response document: {}", self.message)
    }
}

impl std::error::Error for ReadError {}

/// Read a complete response document into an [`Element`] tree.
pub fn from_str(input: &str) -> Result<Element, ReadError> {
    let root: Element = facet_xml::from_str(input).map_err(|e| ReadError {
        message: e.to_string(),
    })?;
    trace!(tag = %root.tag, children = root.children.len(), "read response tree");
    Ok(root)
}

/// A child of an [`Element`]: a nested node or a run of text.
#[derive(Debug, Clone, PartialEq, Eq, facet::Facet)]
#[repr(u8)]
pub enum Content {
    /// A run of character data.
    #[facet(xml::text)]
    Text(String),
    /// Any nested tag; the wire vocabulary is open ended.
    #[facet(xml::custom_element)]
    Element(Element),
}

impl Content {
    /// The text, if this is a text run.
    pub fn as_text(&self) -> Option<&str> {
        if let Content::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// The nested node, if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        if let Content::Element(node) = self {
            Some(node)
        } else {
            None
        }
    }
}

/// One node of a response document: tag, attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default, facet::Facet)]
pub struct Element {
    /// Wire tag, e.g. `lst`, `arr`, `str`.
    #[facet(xml::tag, default)]
    pub tag: String,

    /// Attributes by name; `name` is the one the wire relies on.
    #[facet(flatten, default)]
    pub attrs: HashMap<String, String>,

    /// Children in document order.
    #[facet(flatten, default)]
    #[facet(recursive_type)]
    pub children: Vec<Content>,
}

impl Element {
    /// An element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create an element of the given kind carrying a `name` attribute,
    /// e.g. `<lst name="facet_counts">`.
    pub fn named(kind: Kind, name: impl Into<String>) -> Self {
        Self::new(kind.tag()).with_attr("name", name)
    }

    /// Create a named leaf, e.g. `<int name="id">1</int>`.
    pub fn leaf(kind: Kind, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::named(kind, name).with_text(text)
    }

    /// Create an unnamed leaf, as found inside an `arr`.
    pub fn item(kind: Kind, text: impl Into<String>) -> Self {
        Self::new(kind.tag()).with_text(text)
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text run.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    /// Value of an attribute, if present.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `name` attribute, which identifies fields, parameters and buckets.
    pub fn name(&self) -> Option<&str> {
        self.get_attr("name")
    }

    /// The wire kind declared by this element's tag, if it is one of the
    /// known response tags.
    pub fn kind(&self) -> Option<Kind> {
        Kind::from_tag(&self.tag)
    }

    /// Whether this is an `arr` node, i.e. a multi-valued field.
    pub fn is_array(&self) -> bool {
        self.kind() == Some(Kind::Arr)
    }

    /// Nested nodes, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Content::as_element)
    }

    /// First child element with the given tag and `name` attribute.
    pub fn child_named(&self, tag: &str, name: &str) -> Option<&Element> {
        self.child_elements()
            .find(|e| e.tag == tag && e.name() == Some(name))
    }

    /// All text below this node, in document order, including whitespace
    /// between child elements.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Text(run) => out.push_str(run),
                Content::Element(node) => node.collect_text(out),
            }
        }
    }

    /// Serialize this node and its children as XML.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    /// Append this node as XML. Attributes are written sorted by name.
    pub fn write_xml(&self, out: &mut String) {
        let mut attrs: Vec<(&String, &String)> = self.attrs.iter().collect();
        attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));

        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, out);
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Content::Text(run) => escape_into(run, out),
                Content::Element(node) => node.write_xml(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_into(raw: &str, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl From<Element> for Content {
    fn from(node: Element) -> Self {
        Content::Element(node)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn builders_produce_named_leaves() {
        let elem = Element::named(Kind::Lst, "params")
            .with_child(Element::leaf(Kind::Str, "q", "*:*"));

        assert_eq!(elem.tag, "lst");
        assert_eq!(elem.name(), Some("params"));
        assert_eq!(elem.kind(), Some(Kind::Lst));
        let [Content::Element(child)] = elem.children.as_slice() else {
            panic!("expected a single child element");
        };
        assert_eq!(child.tag, "str");
        assert_eq!(child.name(), Some("q"));
        assert_eq!(child.text_content(), "*:*");
        assert_eq!(child.children[0].as_text(), Some("*:*"));
        assert_eq!(child.children[0].as_element(), None);
    }

    #[test]
    fn child_named_matches_tag_and_name() {
        let elem = Element::new("response")
            .with_child(Element::named(Kind::Lst, "responseHeader"))
            .with_child(Element::named(Kind::Lst, "highlighting"))
            .with_child(Element::named(Kind::Arr, "highlighting"));

        let found = elem.child_named("arr", "highlighting").unwrap();
        assert!(found.is_array());
        assert!(elem.child_named("lst", "facet_counts").is_none());
    }

    #[test]
    fn parse_response_with_attributes() {
        let xml = r#"<response><result name="response" numFound="3" start="0"><doc><int name="id">7</int></doc></result></response>"#;
        let elem = from_str(xml).unwrap();

        assert_eq!(elem.tag, "response");
        let result = elem.child_elements().next().unwrap();
        assert_eq!(result.get_attr("numFound"), Some("3"));
        assert_eq!(result.name(), Some("response"));

        let doc = result.child_elements().next().unwrap();
        assert_eq!(doc.kind(), Some(Kind::Doc));
        let id = doc.child_elements().next().unwrap();
        assert_eq!(id.kind(), Some(Kind::Int));
        assert_eq!(id.text_content(), "7");
    }

    #[test]
    fn parse_rejects_empty_input() {
        let err = from_str("").unwrap_err();
        assert!(!err.message().is_empty());
    }

    #[test]
    fn write_xml_escapes_text_and_attributes() {
        let elem = Element::leaf(Kind::Str, "a&b", "x < y");
        assert_eq!(elem.to_xml(), r#"<str name="a&amp;b">x &lt; y</str>"#);
    }

    #[test]
    fn written_xml_reads_back() {
        let original = Element::new("response").with_child(
            Element::new("result")
                .with_attr("numFound", "1")
                .with_child(
                    Element::new("doc")
                        .with_child(Element::leaf(Kind::Str, "title", "Rust and XML"))
                        .with_child(
                            Element::named(Kind::Arr, "tags")
                                .with_child(Element::item(Kind::Str, "a"))
                                .with_child(Element::item(Kind::Str, "b")),
                        ),
                ),
        );

        let read = from_str(&original.to_xml()).unwrap();
        assert_eq!(read, original);
    }
}
