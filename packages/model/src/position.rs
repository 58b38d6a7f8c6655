//! # Positions
//!
//! A [`Position`] is an immutable address inside a tree: the name of a root
//! plus a path of offsets, one per level. The last entry is the offset inside
//! the parent element; all previous entries address the ancestors.
//!
//! ```text
//! $root
//! ├── paragraph      [0]
//! │   └── "Foobar"   [0, 0] .. [0, 6]
//! └── paragraph      [1]
//! ```
//!
//! `[0, 3]` is the position between "Foo" and "bar".
//!
//! ## Stickiness
//!
//! When content is inserted or moved exactly at a position, stickiness
//! decides whether the position travels with the content that follows it
//! (`ToNext`), stays attached to the content before it (`ToPrevious`) or is
//! simply pushed (`ToNone`). Stickiness is not serialized; every explicit
//! construction resets it to `ToNone`.

use crate::{Element, ModelError, ModelResult, Node, Text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stickiness {
    #[default]
    ToNone,
    ToNext,
    ToPrevious,
}

/// Result of comparing two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRelation {
    Before,
    After,
    Same,
    /// The positions live in different roots
    Different,
}

/// Source of root elements, implemented by anything that owns named roots
pub trait RootLookup {
    fn lookup_root(&self, root_name: &str) -> Option<&Element>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PositionJson")]
pub struct Position {
    root: String,
    path: Vec<usize>,
    #[serde(skip)]
    stickiness: Stickiness,
}

#[derive(Deserialize)]
struct PositionJson {
    root: String,
    path: Vec<usize>,
}

impl TryFrom<PositionJson> for Position {
    type Error = ModelError;

    fn try_from(json: PositionJson) -> Result<Self, Self::Error> {
        Position::new(json.root, json.path)
    }
}

/// How two offset paths relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathRelation {
    Same,
    Prefix,
    Extension,
    Differ(usize),
}

fn compare_paths(a: &[usize], b: &[usize]) -> PathRelation {
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(index) => PathRelation::Differ(index),
        None => match a.len().cmp(&b.len()) {
            Ordering::Equal => PathRelation::Same,
            Ordering::Less => PathRelation::Prefix,
            Ordering::Greater => PathRelation::Extension,
        },
    }
}

impl Position {
    /// Create a position from a root name and a non-empty path
    pub fn new(root: impl Into<String>, path: Vec<usize>) -> ModelResult<Self> {
        if path.is_empty() {
            return Err(ModelError::EmptyPath);
        }

        Ok(Self {
            root: root.into(),
            path,
            stickiness: Stickiness::ToNone,
        })
    }

    /// Position at `offset` inside the element addressed by `parent_path`
    pub fn at(root: impl Into<String>, parent_path: &[usize], offset: usize) -> Self {
        let mut path = Vec::with_capacity(parent_path.len() + 1);
        path.extend_from_slice(parent_path);
        path.push(offset);

        Self {
            root: root.into(),
            path,
            stickiness: Stickiness::ToNone,
        }
    }

    pub fn with_stickiness(mut self, stickiness: Stickiness) -> Self {
        self.stickiness = stickiness;
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn stickiness(&self) -> Stickiness {
        self.stickiness
    }

    /// Offset inside the parent element
    pub fn offset(&self) -> usize {
        self.path.last().copied().unwrap_or_default()
    }

    /// Path of the parent element
    pub fn parent_path(&self) -> &[usize] {
        &self.path[..self.path.len().saturating_sub(1)]
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Same parent, different offset
    pub fn with_offset(&self, offset: usize) -> Position {
        let mut position = self.clone();
        if let Some(last) = position.path.last_mut() {
            *last = offset;
        }
        position
    }

    /// Shift the offset, clamping at zero and saturating at `usize::MAX`
    pub fn shifted_by(&self, shift: isize) -> Position {
        let offset = if shift < 0 {
            self.offset().saturating_sub(shift.unsigned_abs())
        } else {
            self.offset().saturating_add(shift.unsigned_abs())
        };
        self.with_offset(offset)
    }

    pub fn compare(&self, other: &Position) -> PositionRelation {
        if self.root != other.root {
            return PositionRelation::Different;
        }

        match compare_paths(&self.path, &other.path) {
            PathRelation::Same => PositionRelation::Same,
            PathRelation::Prefix => PositionRelation::Before,
            PathRelation::Extension => PositionRelation::After,
            PathRelation::Differ(i) if self.path[i] < other.path[i] => PositionRelation::Before,
            PathRelation::Differ(_) => PositionRelation::After,
        }
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self.compare(other) == PositionRelation::Before
    }

    pub fn is_after(&self, other: &Position) -> bool {
        self.compare(other) == PositionRelation::After
    }

    /// Same root and path; stickiness is ignored
    pub fn is_equal(&self, other: &Position) -> bool {
        self.compare(other) == PositionRelation::Same
    }

    pub fn has_same_parent_as(&self, other: &Position) -> bool {
        self.root == other.root && self.parent_path() == other.parent_path()
    }

    /// Whether `self` lies inside the subtree of the node at `node_position`
    pub fn is_inside_node_at(&self, node_position: &Position) -> bool {
        self.root == node_position.root
            && compare_paths(&node_position.path, &self.path) == PathRelation::Prefix
    }

    /// The element this position is inside of
    pub fn parent<'a>(&self, root: &'a Element) -> ModelResult<&'a Element> {
        root.element_at_path(self.parent_path())
    }

    /// Index of the child at or containing this position's offset
    pub fn index(&self, root: &Element) -> ModelResult<usize> {
        self.parent(root)?.offset_to_index(self.offset())
    }

    /// The text node this position is strictly inside of, if any
    pub fn text_node<'a>(&self, root: &'a Element) -> ModelResult<Option<&'a Text>> {
        let parent = self.parent(root)?;
        let index = parent.offset_to_index(self.offset())?;

        Ok(parent
            .child(index)
            .filter(|node| node.start_offset().is_some_and(|start| start < self.offset()))
            .and_then(Node::as_text))
    }

    pub fn node_after<'a>(&self, root: &'a Element) -> ModelResult<Option<&'a Node>> {
        if self.text_node(root)?.is_some() {
            return Ok(None);
        }

        let parent = self.parent(root)?;
        Ok(parent.child(parent.offset_to_index(self.offset())?))
    }

    pub fn node_before<'a>(&self, root: &'a Element) -> ModelResult<Option<&'a Node>> {
        if self.text_node(root)?.is_some() {
            return Ok(None);
        }

        let parent = self.parent(root)?;
        let index = parent.offset_to_index(self.offset())?;
        Ok(index.checked_sub(1).and_then(|i| parent.child(i)))
    }

    /// Where this position ends up after `how_many` offset units are inserted
    /// at `insert_position`
    pub fn transformed_by_insertion(&self, insert_position: &Position, how_many: usize) -> Position {
        let mut transformed = self.clone();

        if self.root != insert_position.root {
            return transformed;
        }

        match compare_paths(insert_position.parent_path(), self.parent_path()) {
            PathRelation::Same => {
                let offset = self.offset();
                if insert_position.offset() < offset
                    || (insert_position.offset() == offset && self.stickiness != Stickiness::ToPrevious)
                {
                    transformed = transformed.with_offset(offset.saturating_add(how_many));
                }
            }
            PathRelation::Prefix => {
                let i = insert_position.path.len() - 1;
                if insert_position.offset() <= self.path[i] {
                    transformed.path[i] = transformed.path[i].saturating_add(how_many);
                }
            }
            _ => {}
        }

        transformed
    }

    /// Where this position ends up after `how_many` offset units starting at
    /// `delete_position` are removed. `None` when the position was inside the
    /// removed span.
    pub fn transformed_by_deletion(&self, delete_position: &Position, how_many: usize) -> Option<Position> {
        let mut transformed = self.clone();

        if self.root != delete_position.root {
            return Some(transformed);
        }

        match compare_paths(delete_position.parent_path(), self.parent_path()) {
            PathRelation::Same => {
                let offset = self.offset();
                if delete_position.offset() < offset {
                    if delete_position.offset().saturating_add(how_many) > offset {
                        return None;
                    }
                    transformed = transformed.with_offset(offset - how_many);
                }
            }
            PathRelation::Prefix => {
                let i = delete_position.path.len() - 1;
                if delete_position.offset() <= self.path[i] {
                    if delete_position.offset().saturating_add(how_many) > self.path[i] {
                        return None;
                    }
                    transformed.path[i] -= how_many;
                }
            }
            _ => {}
        }

        Some(transformed)
    }

    /// Where this position ends up after `how_many` offset units are moved
    /// from `source` to `target`
    pub fn transformed_by_move(&self, source: &Position, target: &Position, how_many: usize) -> Position {
        let target = target
            .transformed_by_deletion(source, how_many)
            .unwrap_or_else(|| target.clone());

        let transformed = self.transformed_by_deletion(source, how_many);
        let is_moved = transformed.is_none()
            || (source.is_equal(self) && self.stickiness == Stickiness::ToNext)
            || (source.shifted_by(isize::try_from(how_many).unwrap_or(isize::MAX)).is_equal(self)
                && self.stickiness == Stickiness::ToPrevious);

        match transformed {
            Some(transformed) if !is_moved => transformed.transformed_by_insertion(&target, how_many),
            _ => self.combined(source, &target),
        }
    }

    /// Re-root this position, which lies in content that started at
    /// `source`, onto `target`
    pub fn combined(&self, source: &Position, target: &Position) -> Position {
        let i = source.path.len() - 1;
        let own = self.path.get(i).copied().unwrap_or(source.offset());

        let mut combined = target.with_offset(target.offset().saturating_add(own).saturating_sub(source.offset()));
        combined.stickiness = self.stickiness;
        if let Some(rest) = self.path.get(i + 1..) {
            combined.path.extend_from_slice(rest);
        }

        combined
    }

    /// Decode a position, checking that its root exists
    pub fn from_json(value: &Value, roots: &impl RootLookup) -> ModelResult<Position> {
        let position: Position = serde_json::from_value(value.clone())?;

        if roots.lookup_root(&position.root).is_none() {
            return Err(ModelError::RootNotFound {
                root: position.root,
            });
        }

        Ok(position)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "root": self.root,
            "path": self.path,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.root, self.path)
    }
}

/// Longest shared prefix of two paths
pub fn common_path<'a>(a: &'a [usize], b: &[usize]) -> &'a [usize] {
    let shared = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    &a[..shared]
}
