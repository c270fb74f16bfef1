//! Owned XML element trees.
//!
//! Documents are parsed with roxmltree and copied into [`XmlElement`] values
//! that outlive the source text, so a SOAP response can be handed back to the
//! test after the HTTP body is gone. Namespaced names use Clark notation,
//! `{uri}local`, unless the document is parsed with [`NamespaceMode::Strip`].
//!
//! Elements are located with a small ElementTree-style path language, see
//! [`path`].

pub mod path;

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while parsing XML or evaluating a path.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML is not well-formed: {0}")]
    Parse(String),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl From<roxmltree::Error> for XmlError {
    fn from(err: roxmltree::Error) -> Self {
        XmlError::Parse(err.to_string())
    }
}

/// How namespaced element and attribute names are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamespaceMode {
    /// `{uri}local`.
    #[default]
    Clark,
    /// `local`; namespaces are dropped.
    Strip,
}

/// An element with its attributes, direct text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Direct text content, concatenated. Text inside children is not included.
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document and returns its root element, keeping namespaces in
    /// Clark notation.
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        Self::parse_with(text, NamespaceMode::Clark)
    }

    /// Parses a document with the given namespace handling.
    pub fn parse_with(text: &str, mode: NamespaceMode) -> Result<Self, XmlError> {
        let document = roxmltree::Document::parse(text)?;
        Ok(Self::from_node(document.root_element(), mode))
    }

    fn from_node(node: roxmltree::Node<'_, '_>, mode: NamespaceMode) -> Self {
        let tag = qualified_name(node.tag_name().namespace(), node.tag_name().name(), mode);

        let attributes = node
            .attributes()
            .map(|attr| {
                (
                    qualified_name(attr.namespace(), attr.name(), mode),
                    attr.value().to_string(),
                )
            })
            .collect();

        let mut text: Option<String> = None;
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_node(child, mode));
            } else if child.is_text() {
                if let Some(fragment) = child.text() {
                    text.get_or_insert_with(String::new).push_str(fragment);
                }
            }
        }

        Self {
            tag,
            attributes,
            text,
            children,
        }
    }

    /// Tag name without its namespace.
    pub fn local_name(&self) -> &str {
        split_clark(&self.tag).1
    }

    /// Namespace URI of the tag, if the tag is in Clark notation.
    pub fn namespace(&self) -> Option<&str> {
        split_clark(&self.tag).0
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Direct text, trimmed. Empty when the element has none.
    pub fn text_trimmed(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// All elements matching `path`, in document order.
    pub fn find_all(&self, path: &str) -> Result<Vec<&XmlElement>, XmlError> {
        let compiled = path::ElementPath::parse(path)?;
        Ok(compiled.select(self))
    }

    /// The first element matching `path`.
    pub fn find(&self, path: &str) -> Result<Option<&XmlElement>, XmlError> {
        Ok(self.find_all(path)?.into_iter().next())
    }

    /// Every element below this one, depth first, in document order.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in &element.children {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn qualified_name(namespace: Option<&str>, local: &str, mode: NamespaceMode) -> String {
    match (namespace, mode) {
        (Some(uri), NamespaceMode::Clark) if !uri.is_empty() => format!("{{{}}}{}", uri, local),
        _ => local.to_string(),
    }
}

/// Splits `{uri}local` into its parts; plain names have no namespace.
pub(crate) fn split_clark(name: &str) -> (Option<&str>, &str) {
    if let Some(rest) = name.strip_prefix('{') {
        if let Some(end) = rest.find('}') {
            return (Some(&rest[..end]), &rest[end + 1..]);
        }
    }
    (None, name)
}

/// Whether `text` parses as a well-formed XML document.
pub fn is_well_formed(text: &str) -> bool {
    roxmltree::Document::parse(text).is_ok()
}
