//! # Folio Model
//!
//! Tree-structured content model for rich-text documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Element (name, attributes)                  │
//! │  └── NodeList                               │
//! │       ├── Node ─ Text ("Foo", bold)         │
//! │       ├── Node ─ Element (paragraph)        │
//! │       └── ...                               │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ Position (root + offset path), Range        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Offsets, not indices**: addresses are measured in offset units; a
//!    text node of length N occupies N units, any other node occupies one
//! 2. **Containers own children**: a node's cached index and start offset
//!    are written only by the list holding it
//! 3. **Errors, not clamping**: out-of-range lookups raise a [`ModelError`]
//!    with a stable code
//!
//! ## Usage
//!
//! ```rust
//! use folio_model::{Element, Node, Position};
//!
//! let root = Element::with_children(
//!     "$root",
//!     None::<folio_model::Attributes>,
//!     vec![Element::with_children("paragraph", None::<folio_model::Attributes>, vec!["Foobar"])],
//! );
//!
//! let position = Position::new("main", vec![0, 3]).unwrap();
//! let text = position.text_node(&root).unwrap().unwrap();
//! assert_eq!(text.data(), "Foobar");
//! assert_eq!(root.max_offset(), 1);
//! ```

mod attributes;
mod element;
mod error;
mod json;
mod node;
mod node_list;
mod position;
mod range;
mod text;

pub use attributes::Attributes;
pub use element::Element;
pub use error::{ModelError, ModelResult};
pub use node::{ElementId, Node, NodeKind};
pub use node_list::NodeList;
pub use position::{common_path, Position, PositionRelation, RootLookup, Stickiness};
pub use range::Range;
pub use text::Text;
