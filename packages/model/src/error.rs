//! Error types for the document model
//!
//! Every variant carries the offending index, offset or path so callers can
//! report exactly where a lookup failed. `code()` returns a stable identifier
//! that does not change when the display text is reworded.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Index {index} out of bounds for node list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    #[error("Offset {offset} out of bounds for node list with max offset {max_offset}")]
    OffsetOutOfBounds { offset: usize, max_offset: usize },

    #[error("Cannot remove {how_many} nodes at index {index} from node list of length {length}")]
    RemoveOutOfBounds {
        index: usize,
        how_many: usize,
        length: usize,
    },

    #[error("Invalid node: {reason}")]
    InvalidNode { reason: String },

    #[error("Position path is empty")]
    EmptyPath,

    #[error("Path {path:?} does not lead to an element")]
    PathIncorrect { path: Vec<usize> },

    #[error("Path {path:?} passes through a text node")]
    ParentIncorrect { path: Vec<usize> },

    #[error("Root not found: {root}")]
    RootNotFound { root: String },

    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("Malformed JSON: {0}")]
    Json(String),
}

impl ModelError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::IndexOutOfBounds { .. } => "nodelist-index-out-of-bounds",
            ModelError::OffsetOutOfBounds { .. } => "nodelist-offset-out-of-bounds",
            ModelError::RemoveOutOfBounds { .. } => "nodelist-remove-out-of-bounds",
            ModelError::InvalidNode { .. } => "model-node-invalid",
            ModelError::EmptyPath => "model-position-path-empty",
            ModelError::PathIncorrect { .. } => "model-position-path-incorrect",
            ModelError::ParentIncorrect { .. } => "model-position-parent-incorrect",
            ModelError::RootNotFound { .. } => "model-root-not-found",
            ModelError::InvalidRange { .. } => "model-range-invalid",
            ModelError::Json(_) => "model-json-invalid",
        }
    }

    pub fn invalid_node(reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            reason: reason.into(),
        }
    }

    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = ModelError::OffsetOutOfBounds {
            offset: 7,
            max_offset: 3,
        };
        assert_eq!(err.code(), "nodelist-offset-out-of-bounds");
        assert_eq!(
            err.to_string(),
            "Offset 7 out of bounds for node list with max offset 3"
        );
    }
}
