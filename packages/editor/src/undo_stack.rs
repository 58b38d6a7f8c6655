//! # Undo/Redo Stack
//!
//! Tracks applied operations and reverts them on request.
//!
//! ## Design
//!
//! - Operations are applied through the stack, which records them
//! - Undo applies the reverse of each operation in the batch, newest first,
//!   re-stamped with the document's current version
//! - Redo reverts the undo batch the same way
//! - New operations clear the redo stack
//! - Supports batched operations (group multiple operations as one undo step)
//! - If a reverse is rejected partway through a batch, the reverses already
//!   applied move to the opposite stack and the rest of the batch stays put
//! - The stack remembers the document version it last saw; if anything else
//!   applied operations in between, undo and redo refuse with
//!   `undo-stack-out-of-sync`
//!
//! ## Example
//!
//! ```rust
//! use folio_editor::{Document, InsertOperation, UndoStack};
//! use folio_model::Position;
//!
//! let mut doc = Document::new();
//! doc.create_root("main", "$root").unwrap();
//! let mut stack = UndoStack::new();
//!
//! let position = Position::new("main", vec![0]).unwrap();
//! stack.apply(InsertOperation::new(position, "Hello", 0).into(), &mut doc).unwrap();
//! assert_eq!(doc.root("main").unwrap().max_offset(), 5);
//!
//! stack.undo(&mut doc).unwrap();
//! assert_eq!(doc.root("main").unwrap().max_offset(), 0);
//!
//! stack.redo(&mut doc).unwrap();
//! assert_eq!(doc.root("main").unwrap().max_offset(), 5);
//! ```

use crate::{Document, EditorConfig, Operation, OperationError};
use tracing::{debug, instrument, warn};

/// A group of operations that should be undone/redone together
#[derive(Debug, Clone, Default)]
pub struct OperationBatch {
    /// The operations in this batch (in application order)
    pub operations: Vec<Operation>,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl OperationBatch {
    /// Create a single-operation batch
    pub fn single(operation: Operation) -> Self {
        Self {
            operations: vec![operation],
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A revert rejected partway. The reverses applied so far form a batch of
/// their own, and the operations not yet reverted stay together, so both
/// stacks still describe the document.
#[derive(Debug)]
struct RevertFailure {
    applied: Option<OperationBatch>,
    remaining: OperationBatch,
    error: OperationError,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<OperationBatch>,

    /// Stack of batches that undid something (most recent last)
    redo_stack: Vec<OperationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OperationBatch>,

    /// Document version after the last operation this stack applied
    synced_version: Option<u64>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            synced_version: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_max_levels(config.undo_levels)
    }

    /// Apply an operation and record it for undo. Returns the new document
    /// version.
    pub fn apply(&mut self, operation: Operation, doc: &mut Document) -> Result<u64, OperationError> {
        self.check_sync(doc)?;

        let version = doc.apply_operation(operation.clone())?;
        self.synced_version = Some(version);

        if let Some(batch) = &mut self.current_batch {
            batch.operations.push(operation);
        } else {
            self.push_batch(OperationBatch::single(operation));
        }

        Ok(version)
    }

    /// Start a batch of operations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(OperationBatch::default());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: OperationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch
    #[instrument(skip(self, doc), fields(version = doc.version()))]
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, OperationError> {
        self.check_sync(doc)?;

        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false); // Nothing to undo
        };

        match self.revert(&batch, doc) {
            Ok(reverted) => {
                debug!(operations = reverted.operations.len(), "Undid batch");
                self.redo_stack.push(reverted);
                Ok(true)
            }
            Err(failure) => {
                self.redo_stack.extend(failure.applied);
                self.undo_stack.push(failure.remaining);
                Err(failure.error)
            }
        }
    }

    /// Redo the most recently undone batch
    #[instrument(skip(self, doc), fields(version = doc.version()))]
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, OperationError> {
        self.check_sync(doc)?;

        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false); // Nothing to redo
        };

        match self.revert(&batch, doc) {
            Ok(reverted) => {
                debug!(operations = reverted.operations.len(), "Redid batch");
                self.undo_stack.push(reverted);
                Ok(true)
            }
            Err(failure) => {
                self.undo_stack.extend(failure.applied);
                self.redo_stack.push(failure.remaining);
                Err(failure.error)
            }
        }
    }

    /// Apply the reverse of every operation in `batch`, newest first
    fn revert(&mut self, batch: &OperationBatch, doc: &mut Document) -> Result<OperationBatch, RevertFailure> {
        let mut applied = Vec::with_capacity(batch.operations.len());

        for (position, operation) in batch.operations.iter().enumerate().rev() {
            let reverse = operation.reverse().with_base_version(doc.version());

            if let Err(error) = doc.apply_operation(reverse.clone()) {
                warn!(code = error.code(), reverted = applied.len(), "Revert stopped partway");
                let applied = OperationBatch {
                    operations: applied,
                    description: batch.description.clone(),
                };

                return Err(RevertFailure {
                    applied: (!applied.is_empty()).then_some(applied),
                    remaining: OperationBatch {
                        operations: batch.operations[..=position].to_vec(),
                        description: batch.description.clone(),
                    },
                    error,
                });
            }

            self.synced_version = Some(doc.version());
            doc.history_mut().set_operation_as_undone(operation, &reverse);
            applied.push(reverse);
        }

        Ok(OperationBatch {
            operations: applied,
            description: batch.description.clone(),
        })
    }

    fn check_sync(&self, doc: &Document) -> Result<(), OperationError> {
        match self.synced_version {
            Some(expected) if expected != doc.version() => Err(OperationError::HistoryOutOfSync {
                expected,
                actual: doc.version(),
            }),
            _ => Ok(()),
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
        self.synced_version = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InsertOperation, NoOperation, RenameOperation};
    use folio_model::{Element, Position};

    fn document() -> Document {
        let mut doc = Document::new();
        doc.create_root("main", "$root").unwrap();
        doc
    }

    fn insert_text(doc: &Document, text: &str) -> Operation {
        let root = doc.root("main").unwrap();
        let position = Position::new("main", vec![root.max_offset()]).unwrap();
        InsertOperation::new(position, text, doc.version()).into()
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_apply_and_undo_rename() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        let position = Position::new("main", vec![0]).unwrap();
        let insert = InsertOperation::new(position.clone(), vec![Element::new("paragraph")], 0);
        stack.apply(insert.into(), &mut doc).unwrap();

        let rename = RenameOperation::new(position, "paragraph", "heading", 1);
        stack.apply(rename.into(), &mut doc).unwrap();
        assert_eq!(stack.undo_levels(), 2);

        // Undo
        assert!(stack.undo(&mut doc).unwrap());
        assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "paragraph");
        assert_eq!(stack.redo_levels(), 1);

        // Redo
        assert!(stack.redo(&mut doc).unwrap());
        assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "heading");
        assert_eq!(stack.undo_levels(), 2);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_batched_operations() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        // Start batch
        stack.begin_batch();
        stack.set_batch_description("Type greeting");

        let first = insert_text(&doc, "Hello");
        stack.apply(first, &mut doc).unwrap();
        let second = insert_text(&doc, " world");
        stack.apply(second, &mut doc).unwrap();

        // End batch
        stack.end_batch();

        // Should be one batch with 2 operations
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Type greeting"));

        // Undo should revert both
        stack.undo(&mut doc).unwrap();
        assert_eq!(doc.root("main").unwrap().max_offset(), 0);
        assert_eq!(stack.redo_description(), Some("Type greeting"));
        assert_eq!(doc.version(), 4);
    }

    #[test]
    fn test_new_operation_clears_redo() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        let op = insert_text(&doc, "Hello");
        stack.apply(op, &mut doc).unwrap();
        stack.undo(&mut doc).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        let op = insert_text(&doc, "Bye");
        stack.apply(op, &mut doc).unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut doc = document();
        let mut stack = UndoStack::with_max_levels(2);

        for i in 0..3 {
            let op = insert_text(&doc, &format!("Text {i}"));
            stack.apply(op, &mut doc).unwrap();
        }

        // Should only keep 2 (max levels)
        assert_eq!(stack.undo_levels(), 2);
    }

    #[test]
    fn test_out_of_sync_rejected() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        let op = insert_text(&doc, "Hello");
        stack.apply(op, &mut doc).unwrap();

        // Someone else edits the document directly
        doc.apply_operation(NoOperation::new(doc.version()).into())
            .unwrap();

        let err = stack.undo(&mut doc).unwrap_err();
        assert_eq!(err.code(), "undo-stack-out-of-sync");
        assert_eq!(stack.undo_levels(), 1);
    }

    #[test]
    fn test_rejected_revert_keeps_both_parts() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        let insert = insert_text(&doc, "Hello");
        doc.apply_operation(insert.clone()).unwrap();

        // Its reverse renames an element that does not exist
        let stale: Operation = RenameOperation::new(
            Position::new("main", vec![0]).unwrap(),
            "paragraph",
            "heading",
            0,
        )
        .into();
        stack.undo_stack.push(OperationBatch {
            operations: vec![stale, insert],
            description: Some("Type".to_string()),
        });
        stack.synced_version = Some(doc.version());

        let err = stack.undo(&mut doc).unwrap_err();
        assert_eq!(err.code(), "rename-operation-wrong-position");
        assert_eq!(doc.root("main").unwrap().max_offset(), 0);
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Type"));

        // The part that was undone can still be redone
        assert!(stack.redo(&mut doc).unwrap());
        assert_eq!(doc.root("main").unwrap().max_offset(), 5);
    }

    #[test]
    fn test_undo_marks_history() {
        let mut doc = document();
        let mut stack = UndoStack::new();

        let op = insert_text(&doc, "Hello");
        stack.apply(op, &mut doc).unwrap();
        stack.undo(&mut doc).unwrap();

        let history = doc.history();
        let undoing = history.operation(1).unwrap();
        assert!(history.is_undoing_operation(undoing));
        assert!(history.is_undone_operation(history.operation(0).unwrap()));
    }
}
