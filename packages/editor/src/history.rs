//! # History
//!
//! Every operation a [`Document`](crate::Document) applies, in application
//! order, indexed by base version. Operation `n` in the list always has
//! base version `first_version + n`.
//!
//! Undo bookkeeping is kept alongside: the undo stack marks the pair of
//! (undone, undoing) operations so later consumers can tell them apart.

use crate::{Operation, OperationError};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct History {
    /// Base version of the first recorded operation
    first_version: u64,

    operations: Vec<Operation>,

    /// Undoing operation base version → undone operation base version
    undo_pairs: HashMap<u64, u64>,

    undone: HashSet<u64>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history whose next operation must have `version` as base
    pub fn starting_at(version: u64) -> Self {
        Self {
            first_version: version,
            ..Self::default()
        }
    }

    /// Base version the next recorded operation must carry
    pub fn version(&self) -> u64 {
        self.first_version + self.operations.len() as u64
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub(crate) fn add_operation(&mut self, operation: Operation) -> Result<(), OperationError> {
        if operation.base_version() != self.version() {
            return Err(OperationError::WrongVersion {
                base_version: operation.base_version(),
                document_version: self.version(),
            });
        }

        self.operations.push(operation);
        Ok(())
    }

    /// Operation applied at `base_version`
    pub fn operation(&self, base_version: u64) -> Option<&Operation> {
        let index = base_version.checked_sub(self.first_version)?;
        self.operations.get(usize::try_from(index).ok()?)
    }

    /// Operations with base versions in `from..to`, clamped to what is
    /// recorded
    pub fn operations(&self, from: u64, to: u64) -> &[Operation] {
        let start = from.saturating_sub(self.first_version).min(self.len() as u64) as usize;
        let end = to.saturating_sub(self.first_version).min(self.len() as u64) as usize;

        if start >= end {
            return &[];
        }

        &self.operations[start..end]
    }

    pub fn last_operation(&self) -> Option<&Operation> {
        self.operations.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Record that `undoing` reverted `undone`
    pub fn set_operation_as_undone(&mut self, undone: &Operation, undoing: &Operation) {
        self.undo_pairs
            .insert(undoing.base_version(), undone.base_version());
        self.undone.insert(undone.base_version());
    }

    pub fn is_undone_operation(&self, operation: &Operation) -> bool {
        self.undone.contains(&operation.base_version())
    }

    pub fn is_undoing_operation(&self, operation: &Operation) -> bool {
        self.undo_pairs.contains_key(&operation.base_version())
    }

    /// The operation `undoing` reverted, if it was an undo
    pub fn undone_operation(&self, undoing: &Operation) -> Option<&Operation> {
        self.undo_pairs
            .get(&undoing.base_version())
            .and_then(|version| self.operation(*version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoOperation;

    fn no_op(version: u64) -> Operation {
        NoOperation::new(version).into()
    }

    #[test]
    fn test_add_operation_checks_version() {
        let mut history = History::new();
        history.add_operation(no_op(0)).unwrap();
        history.add_operation(no_op(1)).unwrap();

        let err = history.add_operation(no_op(5)).unwrap_err();
        assert_eq!(err.code(), "document-operation-wrong-version");
        assert_eq!(history.len(), 2);
        assert_eq!(history.version(), 2);
    }

    #[test]
    fn test_operations_slice() {
        let mut history = History::starting_at(10);
        for version in 10..15 {
            history.add_operation(no_op(version)).unwrap();
        }

        assert_eq!(history.operations(11, 13).len(), 2);
        assert_eq!(history.operations(0, 100).len(), 5);
        assert!(history.operations(14, 12).is_empty());
        assert_eq!(history.operation(12).map(Operation::base_version), Some(12));
        assert!(history.operation(9).is_none());
        assert_eq!(history.last_operation().map(Operation::base_version), Some(14));
    }

    #[test]
    fn test_undo_pairs() {
        let mut history = History::new();
        history.add_operation(no_op(0)).unwrap();
        history.add_operation(no_op(1)).unwrap();

        let undone = no_op(0);
        let undoing = no_op(1);
        history.set_operation_as_undone(&undone, &undoing);

        assert!(history.is_undone_operation(&undone));
        assert!(history.is_undoing_operation(&undoing));
        assert!(!history.is_undoing_operation(&undone));
        assert_eq!(history.undone_operation(&undoing), Some(&undone));
    }
}
