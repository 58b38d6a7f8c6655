use super::{utils, Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError};
use folio_model::{ModelError, Range};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Set, change or remove `key` on every node inside a flat range.
/// `None` stands for "attribute not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOperation {
    pub range: Range,
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub base_version: u64,
}

impl AttributeOperation {
    pub const VARIANT: &'static str = "AttributeOperation";

    pub fn new(
        range: Range,
        key: impl Into<String>,
        old_value: Option<Value>,
        new_value: Option<Value>,
        base_version: u64,
    ) -> Self {
        Self {
            range,
            key: key.into(),
            old_value,
            new_value,
            base_version,
        }
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = AttributeOperation::deserialize(value)?;
        document.existing_root(raw.range.root())?;

        Ok(AttributeOperation::new(
            raw.range,
            raw.key,
            raw.old_value,
            raw.new_value,
            raw.base_version,
        )
        .into())
    }
}

impl OperationVariant for AttributeOperation {
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
        match (&self.old_value, &self.new_value) {
            (None, _) => OperationKind::AddAttribute,
            (_, None) => OperationKind::RemoveAttribute,
            _ => OperationKind::ChangeAttribute,
        }
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        if !self.range.is_flat() {
            return Err(OperationError::AttributeRangeNotFlat {
                range: self.range.clone(),
            });
        }

        let root = document.existing_root(self.range.root())?;
        let parent = self.range.start().parent(root)?;
        if self.range.end().offset() > parent.max_offset() {
            return Err(ModelError::OffsetOutOfBounds {
                offset: self.range.end().offset(),
                max_offset: parent.max_offset(),
            }
            .into());
        }

        for item in self.range.flat_items(root)? {
            let current = item.attribute(&self.key);

            if self.old_value.is_some() && current != self.old_value.as_ref() {
                return Err(OperationError::AttributeWrongOldValue {
                    key: self.key.clone(),
                    expected: self.old_value.clone(),
                    actual: current.cloned(),
                });
            }

            if self.old_value.is_none() && self.new_value.is_some() && current.is_some() {
                return Err(OperationError::AttributeExists {
                    key: self.key.clone(),
                });
            }
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        if self.old_value == self.new_value {
            return Ok(());
        }

        utils::set_attribute(document, &self.range, &self.key, self.new_value.as_ref())
    }

    fn reversed(&self) -> Operation {
        AttributeOperation::new(
            self.range.clone(),
            self.key.clone(),
            self.new_value.clone(),
            self.old_value.clone(),
            self.base_version + 1,
        )
        .into()
    }
}
