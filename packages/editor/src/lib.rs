//! # Folio Editor
//!
//! Operation engine for Folio documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Element / Text / Position / Range    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + operations     │
//! │  - Named roots plus the graveyard           │
//! │  - Validate, execute, version, record       │
//! │  - Reverse operations for undo              │
//! │  - Operation JSON for replay and transport  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ UndoStack: batches of reversible operations │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Operations are the only writers**: the tree changes only through
//!    [`Document::apply_operation`]
//! 2. **Reject, never half-apply**: an operation that fails validation
//!    leaves the document exactly as it was
//! 3. **Nothing is deleted**: removed content moves to the graveyard so
//!    reverse operations can bring it back with its identity intact
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Document, InsertOperation, Operation, SplitOperation};
//! use folio_model::{Attributes, Element, Position};
//!
//! let mut doc = Document::new();
//! doc.create_root("main", "$root").unwrap();
//!
//! let paragraph = Element::with_children("paragraph", None::<Attributes>, vec!["Foobar"]);
//! let insert = InsertOperation::new(Position::new("main", vec![0]).unwrap(), paragraph, 0);
//! doc.apply_operation(insert.into()).unwrap();
//!
//! let split = SplitOperation::at(&doc, Position::new("main", vec![0, 3]).unwrap(), 1).unwrap();
//! let reverse = Operation::from(split.clone()).reverse();
//! doc.apply_operation(split.into()).unwrap();
//! assert_eq!(doc.root("main").unwrap().child_count(), 2);
//!
//! doc.apply_operation(reverse).unwrap();
//! assert_eq!(doc.root("main").unwrap().child_count(), 1);
//! assert_eq!(doc.version(), 3);
//! ```

mod config;
mod document;
mod errors;
mod history;
mod operation;
mod undo_stack;

pub use config::{EditorConfig, RootConfig, DEFAULT_CONFIG_NAME};
pub use document::{Document, GRAVEYARD, ROOT_ELEMENT_NAME};
pub use errors::{EditorError, OperationError};
pub use history::History;
pub use operation::{
    decoder_for, AttributeOperation, DecodeFn, InsertOperation, MergeOperation, MoveOperation,
    NoOperation, NodeSet, Operation, OperationKind, OperationVariant, RenameOperation,
    RootAttributeOperation, SplitOperation,
};
pub use undo_stack::{OperationBatch, UndoStack};
