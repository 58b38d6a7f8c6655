use super::{Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError};
use folio_model::{Node, Position, Stickiness};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Change the name of the element right after `position`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOperation {
    pub position: Position,
    pub old_name: String,
    pub new_name: String,
    pub base_version: u64,
}

impl RenameOperation {
    pub const VARIANT: &'static str = "RenameOperation";

    pub fn new(
        position: Position,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        base_version: u64,
    ) -> Self {
        Self {
            position: position.with_stickiness(Stickiness::ToNext),
            old_name: old_name.into(),
            new_name: new_name.into(),
            base_version,
        }
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = RenameOperation::deserialize(value)?;
        document.existing_root(raw.position.root())?;

        Ok(RenameOperation::new(raw.position, raw.old_name, raw.new_name, raw.base_version).into())
    }
}

impl OperationVariant for RenameOperation {
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
        OperationKind::Rename
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let wrong_position = || OperationError::RenameWrongPosition {
            position: self.position.clone(),
        };

        let root = document.root(self.position.root()).ok_or_else(wrong_position)?;
        let element = self
            .position
            .node_after(root)
            .map_err(|_| wrong_position())?
            .and_then(Node::as_element)
            .ok_or_else(wrong_position)?;

        if element.name() != self.old_name {
            return Err(OperationError::RenameWrongName {
                position: self.position.clone(),
                expected: self.old_name.clone(),
                actual: element.name().to_string(),
            });
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        if self.old_name == self.new_name {
            return Ok(());
        }

        document
            .element_at_mut(self.position.root(), self.position.path())?
            .set_name(self.new_name.clone());

        Ok(())
    }

    fn reversed(&self) -> Operation {
        RenameOperation::new(
            self.position.clone(),
            self.new_name.clone(),
            self.old_name.clone(),
            self.base_version + 1,
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::Element;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.create_root("main", "$root").unwrap();
        let position = Position::new("main", vec![0]).unwrap();
        doc.apply_operation(
            crate::InsertOperation::new(position, vec![Element::new("paragraph")], 0).into(),
        )
        .unwrap();
        doc.apply_operation(
            crate::InsertOperation::new(Position::new("main", vec![1]).unwrap(), "text", 1).into(),
        )
        .unwrap();
        doc
    }

    #[test]
    fn test_rename_and_reverse() {
        let mut doc = document();
        let op = RenameOperation::new(Position::new("main", vec![0]).unwrap(), "paragraph", "heading", 2);
        let reverse = Operation::from(op.clone()).reverse();

        doc.apply_operation(op.into()).unwrap();
        assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "heading");

        doc.apply_operation(reverse).unwrap();
        assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "paragraph");
    }

    #[test]
    fn test_wrong_name_and_position() {
        let doc = document();

        let op = RenameOperation::new(Position::new("main", vec![0]).unwrap(), "quote", "heading", 2);
        assert_eq!(op.validate(&doc).unwrap_err().code(), "rename-operation-wrong-name");

        let op = RenameOperation::new(Position::new("main", vec![1]).unwrap(), "text", "heading", 2);
        assert_eq!(op.validate(&doc).unwrap_err().code(), "rename-operation-wrong-position");
    }
}
