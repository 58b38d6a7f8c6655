use super::{utils, Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError, GRAVEYARD};
use folio_model::{Position, Range, Stickiness};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move `how_many` offset units starting at `source_position` to
/// `target_position`. Moving into the graveyard is a remove; moving out of
/// it is a reinsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOperation {
    pub source_position: Position,
    pub how_many: usize,
    /// Given in coordinates from before the move
    pub target_position: Position,
    pub base_version: u64,
}

impl MoveOperation {
    pub const VARIANT: &'static str = "MoveOperation";

    pub fn new(
        source_position: Position,
        how_many: usize,
        target_position: Position,
        base_version: u64,
    ) -> Self {
        Self {
            source_position: source_position.with_stickiness(Stickiness::ToNext),
            how_many,
            target_position: target_position.with_stickiness(Stickiness::ToNone),
            base_version,
        }
    }

    /// Where the moved content starts once the move is done
    pub fn moved_range_start(&self) -> Position {
        self.target_position
            .transformed_by_deletion(&self.source_position, self.how_many)
            .unwrap_or_else(|| self.target_position.clone())
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = MoveOperation::deserialize(value)?;
        document.existing_root(raw.source_position.root())?;
        document.existing_root(raw.target_position.root())?;

        Ok(MoveOperation::new(
            raw.source_position,
            raw.how_many,
            raw.target_position,
            raw.base_version,
        )
        .into())
    }

    /// Target lands inside one of the moved nodes
    fn targets_moved_node(&self) -> bool {
        let source = &self.source_position;
        let target = &self.target_position;
        let level = source.depth() - 1;

        source.root() == target.root()
            && target.depth() > source.depth()
            && target.path().starts_with(source.parent_path())
            && (source.offset()..source.offset().saturating_add(self.how_many))
                .contains(&target.path()[level])
    }
}

impl OperationVariant for MoveOperation {
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
        if self.target_position.root() == GRAVEYARD {
            OperationKind::Remove
        } else if self.source_position.root() == GRAVEYARD {
            OperationKind::Reinsert
        } else {
            OperationKind::Move
        }
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let source = &self.source_position;
        let target = &self.target_position;

        let source_invalid = || OperationError::MoveSourceInvalid {
            position: source.clone(),
        };
        let target_invalid = || OperationError::MoveTargetInvalid {
            position: target.clone(),
        };

        let source_root = document.root(source.root()).ok_or_else(source_invalid)?;
        let source_element = source.parent(source_root).map_err(|_| source_invalid())?;

        let target_root = document.root(target.root()).ok_or_else(target_invalid)?;
        let target_element = target.parent(target_root).map_err(|_| target_invalid())?;

        let source_end = source
            .offset()
            .checked_add(self.how_many)
            .filter(|end| *end <= source_element.max_offset())
            .ok_or_else(|| OperationError::MoveNodesDoNotExist {
                source_position: source.clone(),
                how_many: self.how_many,
            })?;

        if target.offset() > target_element.max_offset() {
            return Err(target_invalid());
        }

        if source.has_same_parent_as(target)
            && source.offset() < target.offset()
            && target.offset() < source_end
        {
            return Err(OperationError::MoveRangeIntoItself {
                source_position: source.clone(),
                target_position: target.clone(),
            });
        }

        if self.targets_moved_node() {
            return Err(OperationError::MoveNodeIntoItself {
                source_position: source.clone(),
                target_position: target.clone(),
            });
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        let range = Range::from_position_and_shift(&self.source_position, self.how_many);
        utils::move_range(document, &range, &self.target_position)?;
        Ok(())
    }

    fn reversed(&self) -> Operation {
        let new_target = self
            .source_position
            .transformed_by_insertion(&self.target_position, self.how_many);

        MoveOperation::new(
            self.moved_range_start(),
            self.how_many,
            new_target,
            self.base_version + 1,
        )
        .into()
    }
}
