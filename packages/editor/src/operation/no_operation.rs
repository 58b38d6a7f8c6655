use super::{Operation, OperationKind, OperationVariant};
use crate::{Document, OperationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Does nothing but still consumes a version. Stands in for an operation
/// that was transformed away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoOperation {
    pub base_version: u64,
}

impl NoOperation {
    pub const VARIANT: &'static str = "NoOperation";

    pub fn new(base_version: u64) -> Self {
        Self { base_version }
    }

    pub(crate) fn from_json(value: &Value, _document: &Document) -> Result<Operation, OperationError> {
        Ok(NoOperation::deserialize(value)?.into())
    }
}

impl OperationVariant for NoOperation {
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
        OperationKind::NoOp
    }

    fn validate(&self, _document: &Document) -> Result<(), OperationError> {
        Ok(())
    }

    fn execute(&self, _document: &mut Document) -> Result<(), OperationError> {
        Ok(())
    }

    fn reversed(&self) -> Operation {
        NoOperation::new(self.base_version + 1).into()
    }
}
