//! # Nodes
//!
//! A [`Node`] is either a [`Text`] run or an [`Element`]. The wrapper holds
//! the cached `index` and `start_offset` of the node inside its containing
//! [`NodeList`](crate::NodeList). Those fields are written only by the list,
//! so a node never disagrees with its container about where it sits.
//!
//! Ownership flows strictly container → child. A node that is not stored in
//! a list is detached and reports `None` for both cached fields.

use crate::{Attributes, Element, Text};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an element, stable across moves within and between roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub(crate) fn next() -> Self {
        ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text(Text),
    Element(Element),
}

/// A content unit stored in a node list
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    index: Option<usize>,
    start_offset: Option<usize>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            index: None,
            start_offset: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn into_kind(self) -> NodeKind {
        self.kind
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    /// Elements always occupy one offset unit, so handing out a mutable
    /// element cannot invalidate the offsets cached by the parent list.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    /// Offset units occupied: character count for text, 1 otherwise
    pub fn offset_size(&self) -> usize {
        match &self.kind {
            NodeKind::Text(text) => text.offset_size(),
            NodeKind::Element(_) => 1,
        }
    }

    /// Index within the containing list, `None` when detached
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Offset at which this node starts in its container, `None` when detached
    pub fn start_offset(&self) -> Option<usize> {
        self.start_offset
    }

    pub fn end_offset(&self) -> Option<usize> {
        self.start_offset.map(|start| start + self.offset_size())
    }

    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    pub fn attributes(&self) -> &Attributes {
        match &self.kind {
            NodeKind::Text(text) => text.attributes(),
            NodeKind::Element(element) => element.attributes(),
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match &mut self.kind {
            NodeKind::Text(text) => text.attributes_mut(),
            NodeKind::Element(element) => element.attributes_mut(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes().has(key)
    }

    pub(crate) fn attach(&mut self, index: usize, start_offset: usize) {
        self.index = Some(index);
        self.start_offset = Some(start_offset);
    }

    pub(crate) fn detach(&mut self) {
        self.index = None;
        self.start_offset = None;
    }
}

// Structural equality: cached positions and element ids are not content.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::new(NodeKind::Text(text))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::new(NodeKind::Element(element))
    }
}

impl From<&str> for Node {
    fn from(data: &str) -> Self {
        Text::new(data).into()
    }
}

impl From<String> for Node {
    fn from(data: String) -> Self {
        Text::new(data).into()
    }
}
