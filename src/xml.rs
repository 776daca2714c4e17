//! XML tree access
//!
//! A thin adapter over [`roxmltree`] exposing the navigation the binder needs:
//! element names, attributes, direct children, text content, exact source
//! markup of a subtree and root-anchored path selection.
//!
//! Only element nodes are ever handed out as [`XmlNode`]s.

use roxmltree::{Document, Node};

use crate::error::Result;

/// A parsed, read-only XML document
pub struct XmlDocument<'input> {
    document: Document<'input>,
}

impl<'input> XmlDocument<'input> {
    /// Parse XML text into a document tree
    pub fn parse(text: &'input str) -> Result<Self> {
        let document = Document::parse(text)?;
        Ok(Self { document })
    }

    /// The document's root element
    pub fn root(&self) -> XmlNode<'_, 'input> {
        XmlNode {
            node: self.document.root_element(),
        }
    }

    pub fn root_element_name(&self) -> &str {
        self.document.root_element().tag_name().name()
    }
}

/// An element within an [`XmlDocument`]
#[derive(Clone, Copy)]
pub struct XmlNode<'a, 'input: 'a> {
    node: Node<'a, 'input>,
}

impl<'a, 'input: 'a> XmlNode<'a, 'input> {
    pub fn name(&self) -> &'a str {
        self.node.tag_name().name()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// Value of the first attribute in document order
    pub fn first_attribute(&self) -> Option<&'a str> {
        self.node.attributes().next().map(|attr| attr.value())
    }

    /// First direct child element with the given name
    pub fn child_by_name(&self, name: &str) -> Option<XmlNode<'a, 'input>> {
        self.element_children().find(|child| child.name() == name)
    }

    /// All direct child elements with the given name, in document order
    pub fn children_named<'n>(
        &self,
        name: &'n str,
    ) -> impl Iterator<Item = XmlNode<'a, 'input>> + use<'a, 'input, 'n> {
        self.element_children()
            .filter(move |child| child.name() == name)
    }

    /// Direct child elements in document order
    pub fn element_children(&self) -> impl Iterator<Item = XmlNode<'a, 'input>> + use<'a, 'input> {
        self.node
            .children()
            .filter(|child| child.is_element())
            .map(|node| XmlNode { node })
    }

    /// Concatenated direct text content (text and CDATA children only)
    pub fn text(&self) -> String {
        self.node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect()
    }

    /// Exact source markup of this element, start tag through end tag
    pub fn serialize(&self) -> &'a str {
        &self.node.document().input_text()[self.node.range()]
    }

    /// Elements matching `path` evaluated from the document root
    ///
    /// Each path segment is an element name; the first segment must match the
    /// root element. Results are in document order.
    pub fn select_from_root(&self, path: &[&str]) -> Vec<XmlNode<'a, 'input>> {
        let mut current = vec![self.node.document().root()];

        for segment in path {
            current = current
                .into_iter()
                .flat_map(|node| node.children())
                .filter(|child| child.is_element() && child.tag_name().name() == *segment)
                .collect();

            if current.is_empty() {
                break;
            }
        }

        current.into_iter().map(|node| XmlNode { node }).collect()
    }
}

impl std::fmt::Debug for XmlNode<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlNode").field("name", &self.name()).finish()
    }
}
