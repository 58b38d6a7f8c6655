//! # Elements
//!
//! Named containers owning a [`NodeList`] of children.
//!
//! Besides plain child management, elements expose the small set of
//! normalising primitives the operation engine builds on:
//!
//! - [`Element::split_text_at`] breaks a text child in two when an offset
//!   falls strictly inside it
//! - [`Element::merge_texts_at`] joins two adjacent text children carrying
//!   equal attributes
//! - [`Element::element_at_path`] walks a path of offsets down the tree

use crate::{Attributes, ElementId, ModelError, ModelResult, Node, NodeKind, NodeList};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    name: String,
    attributes: Attributes,
    children: NodeList,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Attributes::new())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: impl Into<Attributes>) -> Self {
        Self {
            id: ElementId::next(),
            name: name.into(),
            attributes: attributes.into(),
            children: NodeList::new(),
        }
    }

    /// Build an element with attributes and initial children
    pub fn with_children<I>(name: impl Into<String>, attributes: impl Into<Attributes>, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let mut element = Self::with_attributes(name, attributes);
        element.children = NodeList::from_nodes(children);
        element
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn children(&self) -> &NodeList {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Mutable access to a child element (text children stay immutable)
    pub fn child_element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn max_offset(&self) -> usize {
        self.children.max_offset()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn offset_to_index(&self, offset: usize) -> ModelResult<usize> {
        self.children.offset_to_index(offset)
    }

    pub fn index_to_offset(&self, index: usize) -> ModelResult<usize> {
        self.children.index_to_offset(index)
    }

    pub fn insert_children<I>(&mut self, index: usize, nodes: I) -> ModelResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.insert_nodes(index, nodes)
    }

    pub fn append_children<I>(&mut self, nodes: I) -> ModelResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let end = self.children.len();
        self.children.insert_nodes(end, nodes)
    }

    pub fn remove_children(&mut self, index: usize, how_many: usize) -> ModelResult<Vec<Node>> {
        self.children.remove_nodes(index, how_many)
    }

    /// Set (`Some`) or remove (`None`) an attribute on the child at `index`.
    /// Returns the previous value.
    pub fn set_child_attribute(
        &mut self,
        index: usize,
        key: &str,
        value: Option<&Value>,
    ) -> ModelResult<Option<Value>> {
        let length = self.children.len();
        let child = self
            .children
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfBounds { index, length })?;

        Ok(child.attributes_mut().apply(key, value))
    }

    /// Same name and attributes, no children, fresh identity
    pub fn clone_shallow(&self) -> Element {
        Element::with_attributes(self.name.clone(), self.attributes.clone())
    }

    /// If `offset` falls strictly inside a text child, replace that child
    /// with two text nodes meeting at `offset`.
    pub fn split_text_at(&mut self, offset: usize) -> ModelResult<()> {
        let index = self.children.offset_to_index(offset)?;

        let halves = match self.children.get(index) {
            Some(node) => match (node.kind(), node.start_offset()) {
                (NodeKind::Text(text), Some(start)) if start < offset => text.split_at(offset - start),
                _ => return Ok(()),
            },
            None => return Ok(()),
        };

        self.children
            .replace(index, 1, vec![Node::from(halves.0), Node::from(halves.1)])
    }

    /// Merge the children at `index - 1` and `index` when both are text with
    /// equal attributes. Returns whether a merge happened.
    pub fn merge_texts_at(&mut self, index: usize) -> ModelResult<bool> {
        let Some(previous_index) = index.checked_sub(1) else {
            return Ok(false);
        };

        let merged = match (self.children.get(previous_index), self.children.get(index)) {
            (Some(previous), Some(next)) => match (previous.as_text(), next.as_text()) {
                (Some(previous), Some(next)) if previous.has_same_attributes(next) => {
                    previous.concat(next)
                }
                _ => return Ok(false),
            },
            _ => return Ok(false),
        };

        self.children
            .replace(previous_index, 2, vec![Node::from(merged)])?;
        Ok(true)
    }

    /// Walk `path` (one offset per level) and return the element it ends on.
    /// An empty path returns `self`.
    pub fn element_at_path(&self, path: &[usize]) -> ModelResult<&Element> {
        let mut current = self;

        for (depth, offset) in path.iter().enumerate() {
            let index = current
                .offset_to_index(*offset)
                .map_err(|_| ModelError::PathIncorrect {
                    path: path.to_vec(),
                })?;

            current = match current.child(index).map(Node::kind) {
                Some(NodeKind::Element(element)) => element,
                Some(NodeKind::Text(_)) => {
                    return Err(ModelError::ParentIncorrect {
                        path: path[..=depth].to_vec(),
                    })
                }
                None => {
                    return Err(ModelError::PathIncorrect {
                        path: path.to_vec(),
                    })
                }
            };
        }

        Ok(current)
    }

    pub fn element_at_path_mut(&mut self, path: &[usize]) -> ModelResult<&mut Element> {
        let mut current = self;

        for (depth, offset) in path.iter().enumerate() {
            let index = current
                .offset_to_index(*offset)
                .map_err(|_| ModelError::PathIncorrect {
                    path: path.to_vec(),
                })?;

            let is_text = current.child(index).map(Node::is_text);
            current = match is_text {
                Some(false) => current
                    .child_element_mut(index)
                    .ok_or_else(|| ModelError::PathIncorrect {
                        path: path.to_vec(),
                    })?,
                Some(true) => {
                    return Err(ModelError::ParentIncorrect {
                        path: path[..=depth].to_vec(),
                    })
                }
                None => {
                    return Err(ModelError::PathIncorrect {
                        path: path.to_vec(),
                    })
                }
            };
        }

        Ok(current)
    }

    /// Node whose start offset is the last path entry, resolved inside the
    /// element addressed by the preceding entries
    pub fn node_at_path(&self, path: &[usize]) -> ModelResult<&Node> {
        let (offset, parent_path) = path.split_last().ok_or(ModelError::EmptyPath)?;
        let parent = self.element_at_path(parent_path)?;
        let index = parent.offset_to_index(*offset)?;

        parent
            .child(index)
            .filter(|node| node.start_offset() == Some(*offset))
            .ok_or_else(|| ModelError::PathIncorrect {
                path: path.to_vec(),
            })
    }

    /// Offset path from this element down to the descendant with `id`
    pub fn path_to(&self, id: ElementId) -> Option<Vec<usize>> {
        if self.id == id {
            return Some(Vec::new());
        }

        for child in &self.children {
            if let (Some(element), Some(offset)) = (child.as_element(), child.start_offset()) {
                if let Some(mut path) = element.path_to(id) {
                    path.insert(0, offset);
                    return Some(path);
                }
            }
        }

        None
    }

    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.path_to(id)
            .and_then(|path| self.element_at_path(&path).ok())
    }

    /// Deepest element (possibly `a` or `b` themselves) containing both
    /// descendants, or `None` when either is not in this tree
    pub fn common_ancestor(&self, a: ElementId, b: ElementId) -> Option<&Element> {
        let path_a = self.path_to(a)?;
        let path_b = self.path_to(b)?;

        let shared = path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .count();

        self.element_at_path(&path_a[..shared]).ok()
    }
}

// Structural equality: identity is not content.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.children == other.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Text;

    fn paragraph(text: &str) -> Element {
        Element::with_children("paragraph", None::<Attributes>, vec![Node::from(text)])
    }

    #[test]
    fn test_max_offset_tracks_children() {
        let mut root = Element::new("$root");
        root.append_children(vec![Node::from("abc"), Node::from(paragraph("x"))])
            .unwrap();
        assert_eq!(root.max_offset(), 4);

        root.remove_children(0, 1).unwrap();
        assert_eq!(root.max_offset(), 1);
    }

    #[test]
    fn test_split_text_at() {
        let mut p = paragraph("Foobar");
        p.split_text_at(3).unwrap();

        assert_eq!(p.child_count(), 2);
        assert_eq!(p.child(0).and_then(Node::as_text).map(Text::data), Some("Foo"));
        assert_eq!(p.child(1).and_then(Node::as_text).map(Text::data), Some("bar"));
        assert_eq!(p.max_offset(), 6);

        // Boundaries are left alone
        p.split_text_at(3).unwrap();
        p.split_text_at(0).unwrap();
        p.split_text_at(6).unwrap();
        assert_eq!(p.child_count(), 2);
    }

    #[test]
    fn test_merge_texts_at() {
        let mut p = paragraph("Foobar");
        p.split_text_at(3).unwrap();

        assert!(p.merge_texts_at(1).unwrap());
        assert_eq!(p.child_count(), 1);
        assert_eq!(p, paragraph("Foobar"));
    }

    #[test]
    fn test_merge_skips_different_attributes() {
        let mut p = Element::with_children(
            "paragraph",
            None::<Attributes>,
            vec![
                Node::from(Text::new("a")),
                Node::from(Text::with_attributes("b", [("bold", true)])),
            ],
        );

        assert!(!p.merge_texts_at(1).unwrap());
        assert!(!p.merge_texts_at(0).unwrap());
        assert_eq!(p.child_count(), 2);
    }

    #[test]
    fn test_element_at_path() {
        let root = Element::with_children(
            "$root",
            None::<Attributes>,
            vec![Node::from(paragraph("abc")), Node::from(paragraph("def"))],
        );

        assert_eq!(root.element_at_path(&[1]).unwrap().max_offset(), 3);
        assert_eq!(
            root.element_at_path(&[2]).unwrap_err().code(),
            "model-position-path-incorrect"
        );
        assert_eq!(
            root.element_at_path(&[0, 1]).unwrap_err().code(),
            "model-position-parent-incorrect"
        );
    }

    #[test]
    fn test_path_to_and_common_ancestor() {
        let inner = paragraph("abc");
        let inner_id = inner.id();
        let sibling = paragraph("def");
        let sibling_id = sibling.id();
        let quote = Element::with_children("blockQuote", None::<Attributes>, vec![inner]);
        let quote_id = quote.id();
        let root = Element::with_children(
            "$root",
            None::<Attributes>,
            vec![Node::from("x"), Node::from(quote), Node::from(sibling)],
        );

        assert_eq!(root.path_to(inner_id), Some(vec![1, 0]));
        assert_eq!(root.path_to(sibling_id), Some(vec![2]));
        assert_eq!(root.find(quote_id).map(Element::name), Some("blockQuote"));

        assert_eq!(root.common_ancestor(inner_id, quote_id).map(Element::id), Some(quote_id));
        assert_eq!(root.common_ancestor(inner_id, sibling_id).map(Element::id), Some(root.id()));
        assert!(root.common_ancestor(inner_id, Element::new("p").id()).is_none());
    }

    #[test]
    fn test_clone_shallow_gets_fresh_identity() {
        let p = Element::with_children("paragraph", [("align", "left")], vec![Node::from("abc")]);
        let clone = p.clone_shallow();

        assert_ne!(clone.id(), p.id());
        assert_eq!(clone.name(), "paragraph");
        assert_eq!(clone.attribute("align"), p.attribute("align"));
        assert!(clone.is_empty());
    }
}
