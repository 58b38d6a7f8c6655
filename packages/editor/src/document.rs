//! # Document
//!
//! Named roots, a version counter and the operation history.
//!
//! The tree is only ever mutated through [`Document::apply_operation`]:
//!
//! ```text
//! Operation ─→ base version check ─→ validate ─→ execute ─→ version += 1
//!                     │                  │                      │
//!                     └──── reject ──────┘                History::add
//! ```
//!
//! A rejected operation leaves the tree, the version and the history
//! untouched. Every document owns a graveyard root (`$graveyard`) where
//! removed content is parked so it can be reinserted by undo.

use crate::{History, Operation, OperationError};
use folio_model::{Element, ElementId, Position, RootLookup};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Name of the root holding removed content
pub const GRAVEYARD: &str = "$graveyard";

/// Default element name for roots
pub const ROOT_ELEMENT_NAME: &str = "$root";

#[derive(Debug, Clone)]
pub struct Document {
    /// Incremented by one for every applied operation
    version: u64,

    roots: Vec<Root>,

    graveyard: Element,

    history: History,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Root {
    root_name: String,
    element: Element,
}

#[derive(Serialize, Deserialize)]
struct DocumentJson {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    roots: Vec<Root>,
}

impl Document {
    /// Empty document at version 0 holding only the graveyard
    pub fn new() -> Self {
        Self {
            version: 0,
            roots: Vec::new(),
            graveyard: Element::new(ROOT_ELEMENT_NAME),
            history: History::new(),
        }
    }

    /// Add an empty root element named `element_name` under `root_name`
    pub fn create_root(
        &mut self,
        root_name: impl Into<String>,
        element_name: impl Into<String>,
    ) -> Result<&Element, OperationError> {
        let root_name = root_name.into();

        if self.root(&root_name).is_some() {
            return Err(OperationError::RootExists { root: root_name });
        }

        debug!(root = %root_name, "Creating root");
        self.roots.push(Root {
            root_name,
            element: Element::new(element_name),
        });

        let created = self.roots.len() - 1;
        Ok(&self.roots[created].element)
    }

    pub fn root(&self, root_name: &str) -> Option<&Element> {
        if root_name == GRAVEYARD {
            return Some(&self.graveyard);
        }

        self.roots
            .iter()
            .find(|root| root.root_name == root_name)
            .map(|root| &root.element)
    }

    pub fn graveyard(&self) -> &Element {
        &self.graveyard
    }

    /// Names of the non-graveyard roots, in creation order
    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(|root| root.root_name.as_str())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Check an operation against the current version and tree without
    /// applying it
    pub fn validate_operation(&self, operation: &Operation) -> Result<(), OperationError> {
        if operation.base_version() != self.version {
            return Err(OperationError::WrongVersion {
                base_version: operation.base_version(),
                document_version: self.version,
            });
        }

        operation.validate(self)
    }

    /// Validate and execute `operation`, then record it in the history.
    /// Returns the new document version.
    #[instrument(skip(self, operation), fields(variant = operation.variant_name(), base_version = operation.base_version()))]
    pub fn apply_operation(&mut self, operation: Operation) -> Result<u64, OperationError> {
        if let Err(error) = self.validate_operation(&operation) {
            warn!(code = error.code(), %error, "Rejected operation");
            return Err(error);
        }

        operation.execute(self)?;

        self.version += 1;
        self.history.add_operation(operation)?;

        debug!(version = self.version, "Applied operation");
        Ok(self.version)
    }

    pub(crate) fn root_mut(&mut self, root_name: &str) -> Result<&mut Element, OperationError> {
        if root_name == GRAVEYARD {
            return Ok(&mut self.graveyard);
        }

        self.roots
            .iter_mut()
            .find(|root| root.root_name == root_name)
            .map(|root| &mut root.element)
            .ok_or_else(|| OperationError::RootNotFound {
                root: root_name.to_string(),
            })
    }

    pub(crate) fn existing_root(&self, root_name: &str) -> Result<&Element, OperationError> {
        self.root(root_name).ok_or_else(|| OperationError::RootNotFound {
            root: root_name.to_string(),
        })
    }

    /// Element addressed by `path` (one offset per level) inside `root_name`
    pub fn element_at(&self, root_name: &str, path: &[usize]) -> Result<&Element, OperationError> {
        Ok(self.existing_root(root_name)?.element_at_path(path)?)
    }

    pub(crate) fn element_at_mut(
        &mut self,
        root_name: &str,
        path: &[usize],
    ) -> Result<&mut Element, OperationError> {
        Ok(self.root_mut(root_name)?.element_at_path_mut(path)?)
    }

    /// Position right before the element with `id`. Roots themselves have
    /// no position.
    pub fn path_of(&self, id: ElementId) -> Option<Position> {
        self.all_roots().find_map(|(name, element)| {
            element
                .path_to(id)
                .and_then(|path| Position::new(name, path).ok())
        })
    }

    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.all_roots().find_map(|(_, element)| element.find(id))
    }

    /// Deepest element containing both `a` and `b`
    pub fn common_ancestor(&self, a: ElementId, b: ElementId) -> Option<&Element> {
        self.all_roots()
            .find_map(|(_, element)| element.common_ancestor(a, b))
    }

    fn all_roots(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.roots
            .iter()
            .map(|root| (root.root_name.as_str(), &root.element))
            .chain(std::iter::once((GRAVEYARD, &self.graveyard)))
    }

    /// Snapshot of the version and every root, graveyard included
    pub fn to_json(&self) -> Result<Value, OperationError> {
        let roots = self
            .all_roots()
            .map(|(name, element)| Root {
                root_name: name.to_string(),
                element: element.clone(),
            })
            .collect();

        Ok(serde_json::to_value(DocumentJson {
            version: self.version,
            roots,
        })?)
    }

    /// Restore a snapshot. History starts empty at the snapshot version.
    pub fn from_json(value: &Value) -> Result<Document, OperationError> {
        let snapshot = DocumentJson::deserialize(value)?;

        let mut document = Document::new();
        document.version = snapshot.version;
        document.history = History::starting_at(snapshot.version);

        for root in snapshot.roots {
            if root.root_name == GRAVEYARD {
                document.graveyard = root.element;
                continue;
            }

            if document.root(&root.root_name).is_some() {
                return Err(OperationError::RootExists {
                    root: root.root_name,
                });
            }

            document.roots.push(root);
        }

        Ok(document)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl RootLookup for Document {
    fn lookup_root(&self, name: &str) -> Option<&Element> {
        self.root(name)
    }
}
