use super::{utils, Operation, OperationKind, OperationVariant, SplitOperation};
use crate::{Document, OperationError};
use folio_model::{Position, Range, Stickiness};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move the whole content of the element containing `source_position` to
/// `target_position`, then park the emptied element at
/// `graveyard_position`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOperation {
    pub source_position: Position,
    /// Offset units held by the merged element
    pub how_many: usize,
    pub target_position: Position,
    pub graveyard_position: Position,
    pub base_version: u64,
}

impl MergeOperation {
    pub const VARIANT: &'static str = "MergeOperation";

    pub fn new(
        source_position: Position,
        how_many: usize,
        target_position: Position,
        graveyard_position: Position,
        base_version: u64,
    ) -> Self {
        Self {
            source_position: source_position.with_stickiness(Stickiness::ToPrevious),
            how_many,
            target_position: target_position.with_stickiness(Stickiness::ToNext),
            graveyard_position: graveyard_position.with_stickiness(Stickiness::ToNone),
            base_version,
        }
    }

    /// Position right before the merged element
    pub fn deletion_position(&self) -> Position {
        let (offset, parent_path) = self
            .source_position
            .parent_path()
            .split_last()
            .map_or((0, &[][..]), |(offset, parent_path)| (*offset, parent_path));

        Position::at(self.source_position.root(), parent_path, offset)
    }

    /// Everything inside the merged element from the source position on
    pub fn moved_range(&self) -> Range {
        Range::from_position_and_shift(
            &self.source_position,
            usize::MAX - self.source_position.offset(),
        )
    }

    /// Where `position` ends up once this merge is applied
    pub fn transform_position(&self, position: &Position) -> Position {
        let deletion_position = self.deletion_position();
        let moved_range = self.moved_range();

        let is_contained = moved_range.contains_position(position)
            || moved_range.start().is_equal(position);

        if is_contained {
            let combined = position.combined(&self.source_position, &self.target_position);

            if self.source_position.is_before(&self.target_position) {
                return combined
                    .transformed_by_deletion(&deletion_position, 1)
                    .unwrap_or(combined);
            }

            return combined;
        }

        if position.is_equal(&deletion_position) {
            return deletion_position;
        }

        position.transformed_by_move(&deletion_position, &self.graveyard_position, 1)
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = MergeOperation::deserialize(value)?;
        document.existing_root(raw.source_position.root())?;
        document.existing_root(raw.target_position.root())?;
        document.existing_root(raw.graveyard_position.root())?;

        Ok(MergeOperation::new(
            raw.source_position,
            raw.how_many,
            raw.target_position,
            raw.graveyard_position,
            raw.base_version,
        )
        .into())
    }
}

impl OperationVariant for MergeOperation {
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
        OperationKind::Merge
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let source = &self.source_position;
        let target = &self.target_position;
        let graveyard = &self.graveyard_position;

        let source_invalid = || OperationError::MergeSourcePositionInvalid {
            position: source.clone(),
        };
        let target_invalid = || OperationError::MergeTargetPositionInvalid {
            position: target.clone(),
        };
        let graveyard_invalid = || OperationError::MergeGraveyardPositionInvalid {
            position: graveyard.clone(),
        };

        let source_root = document.root(source.root()).ok_or_else(source_invalid)?;
        let source_element = source.parent(source_root).map_err(|_| source_invalid())?;

        if source.parent_path().is_empty() || source.offset() != 0 {
            return Err(source_invalid());
        }

        let target_root = document.root(target.root()).ok_or_else(target_invalid)?;
        let target_element = target.parent(target_root).map_err(|_| target_invalid())?;

        // Only content appended at the end can be split back out
        if target.parent_path().is_empty() || target.offset() != target_element.max_offset() {
            return Err(target_invalid());
        }

        if self.how_many != source_element.max_offset() {
            return Err(OperationError::MergeHowManyInvalid {
                how_many: self.how_many,
                expected: source_element.max_offset(),
            });
        }

        let deletion_position = self.deletion_position();
        if target.is_inside_node_at(&deletion_position) {
            return Err(target_invalid());
        }

        let graveyard_root = document.root(graveyard.root()).ok_or_else(graveyard_invalid)?;
        let graveyard_parent = graveyard
            .parent(graveyard_root)
            .map_err(|_| graveyard_invalid())?;

        if graveyard.offset() > graveyard_parent.max_offset()
            || graveyard.is_inside_node_at(&deletion_position)
        {
            return Err(graveyard_invalid());
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        let merged_position = self.deletion_position();
        let merged_path = self.source_position.parent_path();

        let merged = document.element_at(self.source_position.root(), merged_path)?;
        let moved = merged.max_offset();
        let range = Range::in_element(self.source_position.root(), merged_path, merged);

        utils::move_range(document, &range, &self.target_position)?;

        let merged_position =
            merged_position.transformed_by_move(range.start(), &self.target_position, moved);
        let range = Range::from_position_and_shift(&merged_position, 1);
        utils::move_range(document, &range, &self.graveyard_position)?;

        Ok(())
    }

    fn reversed(&self) -> Operation {
        let target = self.transform_position(&self.target_position);
        let insertion = self.transform_position(&self.deletion_position());

        SplitOperation::new(
            target,
            self.how_many,
            insertion,
            Some(self.graveyard_position.clone()),
            self.base_version + 1,
        )
        .into()
    }
}
