//! Operation JSON
//!
//! ```text
//! { "variant": "MoveOperation", "baseVersion": 4,
//!   "sourcePosition": { "root": "main", "path": [0, 1] },
//!   "howMany": 2,
//!   "targetPosition": { "root": "main", "path": [1, 0] } }
//! ```
//!
//! Decoding goes through each variant's constructor so position stickiness
//! is restored, and rejects positions naming roots the document lacks.

use super::{
    AttributeOperation, InsertOperation, MergeOperation, MoveOperation, NoOperation, Operation,
    RenameOperation, RootAttributeOperation, SplitOperation,
};
use crate::{Document, OperationError};
use serde_json::Value;

pub type DecodeFn = fn(&Value, &Document) -> Result<Operation, OperationError>;

const DECODERS: &[(&str, DecodeFn)] = &[
    (InsertOperation::VARIANT, InsertOperation::from_json),
    (MoveOperation::VARIANT, MoveOperation::from_json),
    (SplitOperation::VARIANT, SplitOperation::from_json),
    (MergeOperation::VARIANT, MergeOperation::from_json),
    (RenameOperation::VARIANT, RenameOperation::from_json),
    (AttributeOperation::VARIANT, AttributeOperation::from_json),
    (RootAttributeOperation::VARIANT, RootAttributeOperation::from_json),
    (NoOperation::VARIANT, NoOperation::from_json),
];

/// Decoder registered for a `variant` tag
pub fn decoder_for(variant: &str) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find(|(name, _)| *name == variant)
        .map(|(_, decode)| *decode)
}

pub(super) fn encode(operation: &Operation) -> Result<Value, OperationError> {
    let mut value = match operation {
        Operation::Insert(op) => serde_json::to_value(op)?,
        Operation::Move(op) => serde_json::to_value(op)?,
        Operation::Split(op) => serde_json::to_value(op)?,
        Operation::Merge(op) => serde_json::to_value(op)?,
        Operation::Rename(op) => serde_json::to_value(op)?,
        Operation::Attribute(op) => serde_json::to_value(op)?,
        Operation::RootAttribute(op) => serde_json::to_value(op)?,
        Operation::NoOp(op) => serde_json::to_value(op)?,
    };

    let Value::Object(fields) = &mut value else {
        return Err(OperationError::malformed("operation did not encode to an object"));
    };
    fields.insert("variant".to_string(), Value::from(operation.variant_name()));

    Ok(value)
}

pub(super) fn decode(value: &Value, document: &Document) -> Result<Operation, OperationError> {
    let variant = value
        .get("variant")
        .and_then(Value::as_str)
        .ok_or_else(|| OperationError::malformed("missing string field `variant`"))?;

    let decode = decoder_for(variant).ok_or_else(|| OperationError::UnknownVariant {
        variant: variant.to_string(),
    })?;

    decode(value, document)
}
