//! # Operations
//!
//! The closed set of atomic edits a [`Document`] accepts. Every variant
//! knows how to:
//!
//! - validate itself against the current tree
//! - execute on the tree (only after validation passed)
//! - produce its reverse, which undoes it when applied right after
//!
//! ```text
//! Insert ──reverse──→ Move (to graveyard)
//! Move   ──reverse──→ Move
//! Split  ──reverse──→ Merge
//! Merge  ──reverse──→ Split (pulls the element back from the graveyard)
//! Rename / Attribute / RootAttribute ──reverse──→ same variant, values swapped
//! NoOp   ──reverse──→ NoOp
//! ```

mod attribute_operation;
mod codec;
mod insert_operation;
mod merge_operation;
mod move_operation;
mod no_operation;
mod rename_operation;
mod root_attribute_operation;
mod split_operation;
mod utils;

pub use attribute_operation::AttributeOperation;
pub use codec::{decoder_for, DecodeFn};
pub use insert_operation::{InsertOperation, NodeSet};
pub use merge_operation::MergeOperation;
pub use move_operation::MoveOperation;
pub use no_operation::NoOperation;
pub use rename_operation::RenameOperation;
pub use root_attribute_operation::RootAttributeOperation;
pub use split_operation::SplitOperation;

use crate::{Document, OperationError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Behaviour shared by every operation variant
///
/// Each variant implements this trait to provide:
/// - Validation logic
/// - Execute logic
/// - The reverse operation for undo
pub trait OperationVariant {
    /// Serialized `variant` tag, e.g. `"InsertOperation"`
    fn variant_name(&self) -> &'static str;

    fn base_version(&self) -> u64;

    fn set_base_version(&mut self, base_version: u64);

    fn kind(&self) -> OperationKind;

    /// Check that this operation can be executed on `document`
    fn validate(&self, document: &Document) -> Result<(), OperationError>;

    /// Mutate the tree. Assumes [`OperationVariant::validate`] passed.
    fn execute(&self, document: &mut Document) -> Result<(), OperationError>;

    /// Operation undoing this one, based on the version right after it
    fn reversed(&self) -> Operation;
}

/// Finer classification than the variant, e.g. a move into the graveyard
/// is a `Remove`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Insert,
    Move,
    Remove,
    Reinsert,
    Split,
    Merge,
    Rename,
    AddAttribute,
    ChangeAttribute,
    RemoveAttribute,
    AddRootAttribute,
    ChangeRootAttribute,
    RemoveRootAttribute,
    NoOp,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Move => "move",
            OperationKind::Remove => "remove",
            OperationKind::Reinsert => "reinsert",
            OperationKind::Split => "split",
            OperationKind::Merge => "merge",
            OperationKind::Rename => "rename",
            OperationKind::AddAttribute => "addAttribute",
            OperationKind::ChangeAttribute => "changeAttribute",
            OperationKind::RemoveAttribute => "removeAttribute",
            OperationKind::AddRootAttribute => "addRootAttribute",
            OperationKind::ChangeRootAttribute => "changeRootAttribute",
            OperationKind::RemoveRootAttribute => "removeRootAttribute",
            OperationKind::NoOp => "noop",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Insert(InsertOperation),
    Move(MoveOperation),
    Split(SplitOperation),
    Merge(MergeOperation),
    Rename(RenameOperation),
    Attribute(AttributeOperation),
    RootAttribute(RootAttributeOperation),
    NoOp(NoOperation),
}

impl Operation {
    fn as_variant(&self) -> &dyn OperationVariant {
        match self {
            Operation::Insert(op) => op,
            Operation::Move(op) => op,
            Operation::Split(op) => op,
            Operation::Merge(op) => op,
            Operation::Rename(op) => op,
            Operation::Attribute(op) => op,
            Operation::RootAttribute(op) => op,
            Operation::NoOp(op) => op,
        }
    }

    fn as_variant_mut(&mut self) -> &mut dyn OperationVariant {
        match self {
            Operation::Insert(op) => op,
            Operation::Move(op) => op,
            Operation::Split(op) => op,
            Operation::Merge(op) => op,
            Operation::Rename(op) => op,
            Operation::Attribute(op) => op,
            Operation::RootAttribute(op) => op,
            Operation::NoOp(op) => op,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        self.as_variant().variant_name()
    }

    /// Document version this operation expects to be applied to
    pub fn base_version(&self) -> u64 {
        self.as_variant().base_version()
    }

    /// Same operation re-stamped for another document version
    pub fn with_base_version(mut self, base_version: u64) -> Operation {
        self.as_variant_mut().set_base_version(base_version);
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.as_variant().kind()
    }

    pub fn validate(&self, document: &Document) -> Result<(), OperationError> {
        self.as_variant().validate(document)
    }

    pub(crate) fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        self.as_variant().execute(document)
    }

    /// Operation that undoes this one. Its base version is this operation's
    /// base version plus one.
    pub fn reverse(&self) -> Operation {
        self.as_variant().reversed()
    }

    /// `{ "variant": ..., "baseVersion": ..., ...fields }`
    pub fn to_json(&self) -> Result<Value, OperationError> {
        codec::encode(self)
    }

    /// Decode an operation, checking that every root it names exists in
    /// `document`
    pub fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        codec::decode(value, document)
    }
}

impl From<InsertOperation> for Operation {
    fn from(op: InsertOperation) -> Self {
        Operation::Insert(op)
    }
}

impl From<MoveOperation> for Operation {
    fn from(op: MoveOperation) -> Self {
        Operation::Move(op)
    }
}

impl From<SplitOperation> for Operation {
    fn from(op: SplitOperation) -> Self {
        Operation::Split(op)
    }
}

impl From<MergeOperation> for Operation {
    fn from(op: MergeOperation) -> Self {
        Operation::Merge(op)
    }
}

impl From<RenameOperation> for Operation {
    fn from(op: RenameOperation) -> Self {
        Operation::Rename(op)
    }
}

impl From<AttributeOperation> for Operation {
    fn from(op: AttributeOperation) -> Self {
        Operation::Attribute(op)
    }
}

impl From<RootAttributeOperation> for Operation {
    fn from(op: RootAttributeOperation) -> Self {
        Operation::RootAttribute(op)
    }
}

impl From<NoOperation> for Operation {
    fn from(op: NoOperation) -> Self {
        Operation::NoOp(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::Position;

    #[test]
    fn test_with_base_version() {
        let op = Operation::from(NoOperation::new(3)).with_base_version(7);
        assert_eq!(op.base_version(), 7);
        assert_eq!(op.reverse().base_version(), 8);
    }

    #[test]
    fn test_kind_of_moves() {
        let main = Position::new("main", vec![0]).unwrap();
        let graveyard = Position::new(crate::GRAVEYARD, vec![0]).unwrap();

        let op = Operation::from(MoveOperation::new(main.clone(), 1, graveyard.clone(), 0));
        assert_eq!(op.kind(), OperationKind::Remove);
        assert_eq!(op.reverse().kind(), OperationKind::Reinsert);

        let op = Operation::from(MoveOperation::new(main.clone(), 1, main.with_offset(3), 0));
        assert_eq!(op.kind(), OperationKind::Move);
        assert_eq!(op.kind().to_string(), "move");
    }
}
