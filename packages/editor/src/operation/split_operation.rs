use super::{utils, MergeOperation, Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError, GRAVEYARD};
use folio_model::{Node, Position, Range, Stickiness};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Split an element at `split_position`. Everything after the split moves
/// into a new sibling element created at `insertion_position`, or into the
/// element pulled back from `graveyard_position` when one is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOperation {
    pub split_position: Position,
    /// Offset units between the split position and the end of its parent
    pub how_many: usize,
    pub insertion_position: Position,
    pub graveyard_position: Option<Position>,
    pub base_version: u64,
}

impl SplitOperation {
    pub const VARIANT: &'static str = "SplitOperation";

    pub fn new(
        split_position: Position,
        how_many: usize,
        insertion_position: Position,
        graveyard_position: Option<Position>,
        base_version: u64,
    ) -> Self {
        Self {
            split_position: split_position.with_stickiness(Stickiness::ToNext),
            how_many,
            insertion_position: insertion_position.with_stickiness(Stickiness::ToNone),
            graveyard_position: graveyard_position
                .map(|position| position.with_stickiness(Stickiness::ToNext)),
            base_version,
        }
    }

    /// Split the element containing `split_position` in `document` as it is
    /// now, creating the new element right after it
    pub fn at(
        document: &Document,
        split_position: Position,
        base_version: u64,
    ) -> Result<Self, OperationError> {
        let insertion_position = Self::insertion_position_for(&split_position).ok_or_else(|| {
            OperationError::SplitInRoot {
                position: split_position.clone(),
            }
        })?;

        let element = document.element_at(split_position.root(), split_position.parent_path())?;
        let how_many = element
            .max_offset()
            .checked_sub(split_position.offset())
            .ok_or_else(|| OperationError::SplitPositionInvalid {
                position: split_position.clone(),
            })?;

        Ok(Self::new(
            split_position,
            how_many,
            insertion_position,
            None,
            base_version,
        ))
    }

    /// Position right after the element containing `split_position`.
    /// `None` when `split_position` is directly in a root.
    pub fn insertion_position_for(split_position: &Position) -> Option<Position> {
        let (offset, grandparent_path) = split_position.parent_path().split_last()?;

        Some(
            Position::at(split_position.root(), grandparent_path, offset + 1)
                .with_stickiness(Stickiness::ToPrevious),
        )
    }

    /// Start of the new element's content
    pub fn move_target_position(&self) -> Position {
        Position::at(
            self.insertion_position.root(),
            self.insertion_position.path(),
            0,
        )
    }

    /// Content that moves out of the split element
    pub fn moved_range(&self) -> Range {
        Range::from_position_and_shift(&self.split_position, self.how_many)
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = SplitOperation::deserialize(value)?;
        document.existing_root(raw.split_position.root())?;
        document.existing_root(raw.insertion_position.root())?;
        if let Some(graveyard_position) = &raw.graveyard_position {
            document.existing_root(graveyard_position.root())?;
        }

        Ok(SplitOperation::new(
            raw.split_position,
            raw.how_many,
            raw.insertion_position,
            raw.graveyard_position,
            raw.base_version,
        )
        .into())
    }
}

impl OperationVariant for SplitOperation {
    fn variant_name(&self) -> &'static str {
        Self::VARIANT
    }

    fn base_version(&self) -> u64 {
        self.base_version
    }

    fn set_base_version(&mut self, base_version: u64) {
        self.base_version = base_version;
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Split
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let split = &self.split_position;
        let split_invalid = || OperationError::SplitPositionInvalid {
            position: split.clone(),
        };

        let root = document.root(split.root()).ok_or_else(split_invalid)?;
        let element = split.parent(root).map_err(|_| split_invalid())?;

        if split.offset() > element.max_offset() {
            return Err(split_invalid());
        }

        if split.parent_path().is_empty() {
            return Err(OperationError::SplitInRoot {
                position: split.clone(),
            });
        }

        let expected = element.max_offset() - split.offset();
        if self.how_many != expected {
            return Err(OperationError::SplitHowManyInvalid {
                how_many: self.how_many,
                expected,
            });
        }

        let insertion = &self.insertion_position;
        let insertion_invalid = || OperationError::SplitInsertionPositionInvalid {
            position: insertion.clone(),
        };
        let insertion_root = document.root(insertion.root()).ok_or_else(insertion_invalid)?;
        let insertion_parent = insertion
            .parent(insertion_root)
            .map_err(|_| insertion_invalid())?;

        if insertion.offset() > insertion_parent.max_offset() {
            return Err(insertion_invalid());
        }

        // The new element cannot live inside the element being split
        let split_element_position = Position::new(split.root(), split.parent_path().to_vec())?;
        if insertion.is_inside_node_at(&split_element_position) {
            return Err(insertion_invalid());
        }

        if let Some(graveyard) = &self.graveyard_position {
            let graveyard_invalid = || OperationError::SplitGraveyardPositionInvalid {
                position: graveyard.clone(),
            };
            let graveyard_root = document.root(graveyard.root()).ok_or_else(graveyard_invalid)?;
            let node = graveyard
                .node_after(graveyard_root)
                .map_err(|_| graveyard_invalid())?;

            if !node.is_some_and(Node::is_element) {
                return Err(graveyard_invalid());
            }
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        let split = &self.split_position;
        let split_element_position = Position::new(split.root(), split.parent_path().to_vec())?;

        let split_element_position = match &self.graveyard_position {
            Some(graveyard) => {
                let range = Range::from_position_and_shift(graveyard, 1);
                utils::move_range(document, &range, &self.insertion_position)?;
                split_element_position.transformed_by_move(graveyard, &self.insertion_position, 1)
            }
            None => {
                let created = document
                    .element_at(split.root(), split.parent_path())?
                    .clone_shallow();
                utils::insert(document, &self.insertion_position, vec![Node::from(created)])?;
                split_element_position.transformed_by_insertion(&self.insertion_position, 1)
            }
        };

        let source = Position::at(
            split_element_position.root(),
            split_element_position.path(),
            split.offset(),
        );
        let range = Range::from_position_and_shift(&source, self.how_many);
        utils::move_range(document, &range, &self.move_target_position())?;

        Ok(())
    }

    fn reversed(&self) -> Operation {
        let graveyard = Position::at(GRAVEYARD, &[], 0);

        MergeOperation::new(
            self.move_target_position(),
            self.how_many,
            self.split_position.clone(),
            graveyard,
            self.base_version + 1,
        )
        .into()
    }
}
