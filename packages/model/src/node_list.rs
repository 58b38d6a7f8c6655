//! # Node Lists
//!
//! Ordered sibling storage with index ↔ offset conversion.
//!
//! ## Invariants
//!
//! After every mutation:
//! - `nodes[i].index() == Some(i)`
//! - `nodes[i].start_offset() == Some(Σ nodes[j].offset_size() for j < i)`
//! - `max_offset() == Σ nodes[i].offset_size()`
//!
//! Mutations relink only the nodes whose position changed (the inserted or
//! removed span and everything after it), so a single call inserting hundreds
//! of thousands of nodes stays linear.
//!
//! Out-of-range indices and offsets always raise an error; nothing is clamped.

use crate::{ModelError, ModelResult, Node};

#[derive(Debug, Clone, Default)]
pub struct NodeList {
    nodes: Vec<Node>,
    max_offset: usize,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let mut list = Self::new();
        list.push_nodes(nodes.into_iter().map(Into::into));
        list
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of the offset sizes of all nodes
    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Index of `node` if it is stored in this list
    pub fn node_index(&self, node: &Node) -> Option<usize> {
        let index = node.index()?;
        self.nodes
            .get(index)
            .filter(|candidate| std::ptr::eq(*candidate, node))
            .map(|_| index)
    }

    /// Start offset of `node` if it is stored in this list
    pub fn node_start_offset(&self, node: &Node) -> Option<usize> {
        self.node_index(node).and_then(|_| node.start_offset())
    }

    /// Offset at which the node at `index` starts. `index == len()` maps to
    /// `max_offset()`.
    pub fn index_to_offset(&self, index: usize) -> ModelResult<usize> {
        if index == self.nodes.len() {
            return Ok(self.max_offset);
        }

        self.nodes
            .get(index)
            .and_then(Node::start_offset)
            .ok_or(ModelError::IndexOutOfBounds {
                index,
                length: self.nodes.len(),
            })
    }

    /// Index of the node containing `offset`. `offset == max_offset()` maps
    /// to `len()`.
    pub fn offset_to_index(&self, offset: usize) -> ModelResult<usize> {
        if offset > self.max_offset {
            return Err(ModelError::OffsetOutOfBounds {
                offset,
                max_offset: self.max_offset,
            });
        }

        if offset == self.max_offset {
            return Ok(self.nodes.len());
        }

        // Cached start offsets are sorted, so the containing node is the
        // first one that ends past `offset`.
        Ok(self
            .nodes
            .partition_point(|node| node.end_offset().unwrap_or(0) <= offset))
    }

    /// Insert `nodes` before `index`
    pub fn insert_nodes<I>(&mut self, index: usize, nodes: I) -> ModelResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        if index > self.nodes.len() {
            return Err(ModelError::IndexOutOfBounds {
                index,
                length: self.nodes.len(),
            });
        }

        let before = self.nodes.len();
        self.nodes
            .splice(index..index, nodes.into_iter().map(Into::into));
        let inserted = self.nodes.len() - before;

        self.max_offset += self.nodes[index..index + inserted]
            .iter()
            .map(Node::offset_size)
            .sum::<usize>();
        self.relink_from(index);

        Ok(())
    }

    /// Remove `how_many` nodes starting at `index_start` and return them
    /// detached
    pub fn remove_nodes(&mut self, index_start: usize, how_many: usize) -> ModelResult<Vec<Node>> {
        let end = index_start
            .checked_add(how_many)
            .filter(|end| *end <= self.nodes.len())
            .ok_or(ModelError::RemoveOutOfBounds {
                index: index_start,
                how_many,
                length: self.nodes.len(),
            })?;

        let removed: Vec<Node> = self
            .nodes
            .drain(index_start..end)
            .map(|mut node| {
                node.detach();
                node
            })
            .collect();

        self.max_offset -= removed.iter().map(Node::offset_size).sum::<usize>();
        self.relink_from(index_start);

        Ok(removed)
    }

    /// Swap `how_many` nodes at `index` for `nodes`
    pub(crate) fn replace(&mut self, index: usize, how_many: usize, nodes: Vec<Node>) -> ModelResult<()> {
        self.remove_nodes(index, how_many)?;
        self.insert_nodes(index, nodes)
    }

    fn push_nodes(&mut self, nodes: impl Iterator<Item = Node>) {
        let start = self.nodes.len();
        self.nodes.extend(nodes);
        self.max_offset += self.nodes[start..]
            .iter()
            .map(Node::offset_size)
            .sum::<usize>();
        self.relink_from(start);
    }

    fn relink_from(&mut self, start: usize) {
        let mut offset = match start.checked_sub(1).and_then(|i| self.nodes.get(i)) {
            Some(previous) => previous.end_offset().unwrap_or(0),
            None => 0,
        };

        for (index, node) in self.nodes.iter_mut().enumerate().skip(start) {
            node.attach(index, offset);
            offset += node.offset_size();
        }
    }
}

impl PartialEq for NodeList {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Yields detached nodes
impl IntoIterator for NodeList {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        let mut nodes = self.nodes;
        for node in &mut nodes {
            node.detach();
        }
        nodes.into_iter()
    }
}

impl<N: Into<Node>> FromIterator<N> for NodeList {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}
