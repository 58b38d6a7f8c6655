//! Ranges: ordered pairs of positions in one root.

use crate::{Element, ModelError, ModelResult, Node, Position, RootLookup};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// `start` and `end` share a root and `start` is never after `end`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeJson")]
pub struct Range {
    start: Position,
    end: Position,
}

#[derive(Deserialize)]
struct RangeJson {
    start: Position,
    end: Position,
}

impl TryFrom<RangeJson> for Range {
    type Error = ModelError;

    fn try_from(json: RangeJson) -> Result<Self, Self::Error> {
        Range::new(json.start, json.end)
    }
}

impl Range {
    pub fn new(start: Position, end: Position) -> ModelResult<Self> {
        if start.root() != end.root() {
            return Err(ModelError::invalid_range(format!(
                "start is in root '{}' but end is in root '{}'",
                start.root(),
                end.root()
            )));
        }

        if start.is_after(&end) {
            return Err(ModelError::invalid_range(format!(
                "start {:?} is after end {:?}",
                start.path(),
                end.path()
            )));
        }

        Ok(Self { start, end })
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position.clone(),
            end: position,
        }
    }

    /// Range from `position` spanning `shift` offset units in the same parent
    pub fn from_position_and_shift(position: &Position, shift: usize) -> Self {
        Self {
            start: position.clone(),
            end: position.with_offset(position.offset().saturating_add(shift)),
        }
    }

    /// Range covering exactly `node`, which sits right after `position`
    pub fn on_node(position: &Position, node: &Node) -> Self {
        Self::from_position_and_shift(position, node.offset_size())
    }

    /// Range covering the whole content of the element at `element_path`
    pub fn in_element(root: &str, element_path: &[usize], element: &Element) -> Self {
        Self {
            start: Position::at(root, element_path, 0),
            end: Position::at(root, element_path, element.max_offset()),
        }
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn root(&self) -> &str {
        self.start.root()
    }

    pub fn is_collapsed(&self) -> bool {
        self.start.is_equal(&self.end)
    }

    /// Both boundaries share a parent element
    pub fn is_flat(&self) -> bool {
        self.start.has_same_parent_as(&self.end)
    }

    /// Offset units covered by a flat range
    pub fn flat_len(&self) -> Option<usize> {
        self.is_flat()
            .then(|| self.end.offset() - self.start.offset())
    }

    /// Strictly between start and end
    pub fn contains_position(&self, position: &Position) -> bool {
        position.is_after(&self.start) && position.is_before(&self.end)
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        !other.start.is_before(&self.start)
            && !other.end.is_after(&self.end)
            && self.start.root() == other.start.root()
    }

    /// Nodes a flat range touches, including text nodes it only partially
    /// covers
    pub fn flat_items<'a>(&self, root: &'a Element) -> ModelResult<Vec<&'a Node>> {
        if !self.is_flat() {
            return Err(ModelError::invalid_range("range is not flat"));
        }

        if self.is_collapsed() {
            return Ok(Vec::new());
        }

        let parent = self.start.parent(root)?;
        let first = parent.offset_to_index(self.start.offset())?;
        let last = parent.offset_to_index(self.end.offset() - 1)?;

        Ok(parent.children().iter().skip(first).take(last + 1 - first).collect())
    }

    /// Decode a range, checking that its root exists
    pub fn from_json(value: &Value, roots: &impl RootLookup) -> ModelResult<Range> {
        let range: Range = serde_json::from_value(value.clone())?;

        if roots.lookup_root(range.root()).is_none() {
            return Err(ModelError::RootNotFound {
                root: range.root().to_string(),
            });
        }

        Ok(range)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "start": self.start.to_json(),
            "end": self.end.to_json(),
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{:?}", self.start, self.end.path())
    }
}
