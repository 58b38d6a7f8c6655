//! Error types for the editor
//!
//! Every [`OperationError`] carries a stable, kebab-case code (see
//! [`OperationError::code`]) that callers can match on without parsing the
//! message.

use folio_model::{ModelError, Position, Range};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("Operation base version {base_version} does not match document version {document_version}")]
    WrongVersion {
        base_version: u64,
        document_version: u64,
    },

    #[error("Root '{root}' does not exist")]
    RootNotFound { root: String },

    #[error("Root '{root}' already exists")]
    RootExists { root: String },

    #[error("Cannot insert at {position}")]
    InsertPositionInvalid { position: Position },

    #[error("Cannot move {how_many} offset units from {source_position}: nodes do not exist")]
    MoveNodesDoNotExist {
        source_position: Position,
        how_many: usize,
    },

    #[error("Cannot move a range from {source_position} into itself at {target_position}")]
    MoveRangeIntoItself {
        source_position: Position,
        target_position: Position,
    },

    #[error("Cannot move a node from {source_position} into itself at {target_position}")]
    MoveNodeIntoItself {
        source_position: Position,
        target_position: Position,
    },

    #[error("Move source {position} is invalid")]
    MoveSourceInvalid { position: Position },

    #[error("Move target {position} is invalid")]
    MoveTargetInvalid { position: Position },

    #[error("Split position {position} is invalid")]
    SplitPositionInvalid { position: Position },

    #[error("Cannot split the root at {position}")]
    SplitInRoot { position: Position },

    #[error("Split moves {how_many} offset units but {expected} follow the split position")]
    SplitHowManyInvalid { how_many: usize, expected: usize },

    #[error("Split insertion position {position} is invalid")]
    SplitInsertionPositionInvalid { position: Position },

    #[error("Split graveyard position {position} does not point at an element")]
    SplitGraveyardPositionInvalid { position: Position },

    #[error("Merge source {position} is invalid")]
    MergeSourcePositionInvalid { position: Position },

    #[error("Merge target {position} is invalid")]
    MergeTargetPositionInvalid { position: Position },

    #[error("Merge moves {how_many} offset units but the merged element holds {expected}")]
    MergeHowManyInvalid { how_many: usize, expected: usize },

    #[error("Merge graveyard position {position} is invalid")]
    MergeGraveyardPositionInvalid { position: Position },

    #[error("No element to rename at {position}")]
    RenameWrongPosition { position: Position },

    #[error("Element at {position} is named '{actual}', expected '{expected}'")]
    RenameWrongName {
        position: Position,
        expected: String,
        actual: String,
    },

    #[error("Attribute range {range} is not flat")]
    AttributeRangeNotFlat { range: Range },

    #[error("Attribute '{key}' has value {actual:?}, expected {expected:?}")]
    AttributeWrongOldValue {
        key: String,
        expected: Option<Value>,
        actual: Option<Value>,
    },

    #[error("Attribute '{key}' is already set")]
    AttributeExists { key: String },

    #[error("'{root}' is not a root")]
    RootAttributeNotARoot { root: String },

    #[error("Root attribute '{key}' has value {actual:?}, expected {expected:?}")]
    RootAttributeWrongOldValue {
        key: String,
        expected: Option<Value>,
        actual: Option<Value>,
    },

    #[error("Root attribute '{key}' is already set")]
    RootAttributeExists { key: String },

    #[error("Unknown operation variant '{variant}'")]
    UnknownVariant { variant: String },

    #[error("Malformed operation JSON: {reason}")]
    MalformedJson { reason: String },

    #[error("Undo stack expected document version {expected}, found {actual}")]
    HistoryOutOfSync { expected: u64, actual: u64 },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl OperationError {
    /// Stable identifier for this failure
    pub fn code(&self) -> &'static str {
        match self {
            OperationError::WrongVersion { .. } => "document-operation-wrong-version",
            OperationError::RootNotFound { .. } => "document-root-not-found",
            OperationError::RootExists { .. } => "document-create-root-name-exists",
            OperationError::InsertPositionInvalid { .. } => "insert-operation-position-invalid",
            OperationError::MoveNodesDoNotExist { .. } => "move-operation-nodes-do-not-exist",
            OperationError::MoveRangeIntoItself { .. } => "move-operation-range-into-itself",
            OperationError::MoveNodeIntoItself { .. } => "move-operation-node-into-itself",
            OperationError::MoveSourceInvalid { .. } => "move-operation-source-invalid",
            OperationError::MoveTargetInvalid { .. } => "move-operation-target-invalid",
            OperationError::SplitPositionInvalid { .. } => "split-operation-position-invalid",
            OperationError::SplitInRoot { .. } => "split-operation-split-in-root",
            OperationError::SplitHowManyInvalid { .. } => "split-operation-how-many-invalid",
            OperationError::SplitInsertionPositionInvalid { .. } => {
                "split-operation-insertion-position-invalid"
            }
            OperationError::SplitGraveyardPositionInvalid { .. } => {
                "split-operation-graveyard-position-invalid"
            }
            OperationError::MergeSourcePositionInvalid { .. } => {
                "merge-operation-source-position-invalid"
            }
            OperationError::MergeTargetPositionInvalid { .. } => {
                "merge-operation-target-position-invalid"
            }
            OperationError::MergeHowManyInvalid { .. } => "merge-operation-how-many-invalid",
            OperationError::MergeGraveyardPositionInvalid { .. } => {
                "merge-operation-graveyard-position-invalid"
            }
            OperationError::RenameWrongPosition { .. } => "rename-operation-wrong-position",
            OperationError::RenameWrongName { .. } => "rename-operation-wrong-name",
            OperationError::AttributeRangeNotFlat { .. } => "attribute-operation-range-not-flat",
            OperationError::AttributeWrongOldValue { .. } => "attribute-operation-wrong-old-value",
            OperationError::AttributeExists { .. } => "attribute-operation-attribute-exists",
            OperationError::RootAttributeNotARoot { .. } => "root-attribute-operation-not-a-root",
            OperationError::RootAttributeWrongOldValue { .. } => {
                "root-attribute-operation-wrong-old-value"
            }
            OperationError::RootAttributeExists { .. } => {
                "root-attribute-operation-attribute-exists"
            }
            OperationError::UnknownVariant { .. } => "operation-from-json-unknown-variant",
            OperationError::MalformedJson { .. } => "operation-from-json-malformed",
            OperationError::HistoryOutOfSync { .. } => "undo-stack-out-of-sync",
            OperationError::Model(error) => error.code(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        OperationError::MalformedJson {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for OperationError {
    fn from(e: serde_json::Error) -> Self {
        OperationError::malformed(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

impl EditorError {
    pub fn code(&self) -> &'static str {
        match self {
            EditorError::Operation(error) => error.code(),
            EditorError::Model(error) => error.code(),
            EditorError::Io(_) => "editor-io",
            EditorError::Json(_) => "editor-json-invalid",
            EditorError::Config(_) => "editor-config-invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through_model_errors() {
        let error = OperationError::from(ModelError::EmptyPath);
        assert_eq!(error.code(), "model-position-path-empty");

        let error = EditorError::from(error);
        assert_eq!(error.code(), "model-position-path-empty");
    }

    #[test]
    fn test_messages_include_positions() {
        let position = Position::new("main", vec![0, 3]).unwrap();
        let error = OperationError::InsertPositionInvalid { position };
        assert_eq!(error.to_string(), "Cannot insert at main[0, 3]");
        assert_eq!(error.code(), "insert-operation-position-invalid");
    }
}
