use super::{Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError, GRAVEYARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Set, change or remove an attribute on a root element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootAttributeOperation {
    pub root: String,
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub base_version: u64,
}

impl RootAttributeOperation {
    pub const VARIANT: &'static str = "RootAttributeOperation";

    pub fn new(
        root: impl Into<String>,
        key: impl Into<String>,
        old_value: Option<Value>,
        new_value: Option<Value>,
        base_version: u64,
    ) -> Self {
        Self {
            root: root.into(),
            key: key.into(),
            old_value,
            new_value,
            base_version,
        }
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = RootAttributeOperation::deserialize(value)?;
        document.existing_root(&raw.root)?;

        Ok(raw.into())
    }
}

impl OperationVariant for RootAttributeOperation {
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
            (None, _) => OperationKind::AddRootAttribute,
            (_, None) => OperationKind::RemoveRootAttribute,
            _ => OperationKind::ChangeRootAttribute,
        }
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let root = document
            .root(&self.root)
            .filter(|_| self.root != GRAVEYARD)
            .ok_or_else(|| OperationError::RootAttributeNotARoot {
                root: self.root.clone(),
            })?;

        let current = root.attribute(&self.key);

        if self.old_value.is_some() && current != self.old_value.as_ref() {
            return Err(OperationError::RootAttributeWrongOldValue {
                key: self.key.clone(),
                expected: self.old_value.clone(),
                actual: current.cloned(),
            });
        }

        if self.old_value.is_none() && self.new_value.is_some() && current.is_some() {
            return Err(OperationError::RootAttributeExists {
                key: self.key.clone(),
            });
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        document
            .root_mut(&self.root)?
            .attributes_mut()
            .apply(&self.key, self.new_value.as_ref());

        Ok(())
    }

    fn reversed(&self) -> Operation {
        RootAttributeOperation::new(
            self.root.clone(),
            self.key.clone(),
            self.new_value.clone(),
            self.old_value.clone(),
            self.base_version + 1,
        )
        .into()
    }
}
