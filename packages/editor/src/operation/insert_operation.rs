use super::{utils, Operation, OperationKind, OperationVariant};
use crate::{Document, MoveOperation, OperationError, GRAVEYARD};
use folio_model::{Element, Node, NodeList, Position, Stickiness, Text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalised payload for an insert: strings become text nodes, empty text
/// is dropped and neighbouring texts with equal attributes are merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet(Vec<Node>);

impl NodeSet {
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut normalised: Vec<Node> = Vec::new();

        for node in nodes {
            if node.as_text().is_some_and(Text::is_empty) {
                continue;
            }

            let merged = match (normalised.last().and_then(Node::as_text), node.as_text()) {
                (Some(previous), Some(next)) if previous.has_same_attributes(next) => {
                    Some(previous.concat(next))
                }
                _ => None,
            };

            match merged {
                Some(text) => {
                    normalised.pop();
                    normalised.push(Node::from(text));
                }
                None => normalised.push(node),
            }
        }

        NodeSet(normalised)
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }
}

impl From<Node> for NodeSet {
    fn from(node: Node) -> Self {
        NodeSet::new([node])
    }
}

impl From<Element> for NodeSet {
    fn from(element: Element) -> Self {
        NodeSet::new([Node::from(element)])
    }
}

impl From<Text> for NodeSet {
    fn from(text: Text) -> Self {
        NodeSet::new([Node::from(text)])
    }
}

impl From<&str> for NodeSet {
    fn from(data: &str) -> Self {
        NodeSet::new([Node::from(data)])
    }
}

impl From<String> for NodeSet {
    fn from(data: String) -> Self {
        NodeSet::new([Node::from(data)])
    }
}

impl From<NodeList> for NodeSet {
    fn from(list: NodeList) -> Self {
        NodeSet::new(list)
    }
}

impl<T: Into<Node>> From<Vec<T>> for NodeSet {
    fn from(items: Vec<T>) -> Self {
        NodeSet::new(items.into_iter().map(Into::into))
    }
}

/// Insert nodes at a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOperation {
    pub position: Position,
    pub nodes: NodeList,
    pub base_version: u64,
}

impl InsertOperation {
    pub const VARIANT: &'static str = "InsertOperation";

    pub fn new(position: Position, nodes: impl Into<NodeSet>, base_version: u64) -> Self {
        Self {
            position: position.with_stickiness(Stickiness::ToNone),
            nodes: NodeList::from_nodes(nodes.into().into_nodes()),
            base_version,
        }
    }

    /// Offset units the payload occupies once inserted
    pub fn how_many(&self) -> usize {
        self.nodes.max_offset()
    }

    pub(crate) fn from_json(value: &Value, document: &Document) -> Result<Operation, OperationError> {
        let raw = InsertOperation::deserialize(value)?;
        document.existing_root(raw.position.root())?;

        Ok(InsertOperation::new(raw.position, raw.nodes, raw.base_version).into())
    }
}

impl OperationVariant for InsertOperation {
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
        OperationKind::Insert
    }

    fn validate(&self, document: &Document) -> Result<(), OperationError> {
        let invalid = || OperationError::InsertPositionInvalid {
            position: self.position.clone(),
        };

        let root = document.root(self.position.root()).ok_or_else(invalid)?;
        let parent = self.position.parent(root).map_err(|_| invalid())?;

        if self.position.offset() > parent.max_offset() {
            return Err(invalid());
        }

        Ok(())
    }

    fn execute(&self, document: &mut Document) -> Result<(), OperationError> {
        utils::insert(document, &self.position, self.nodes.iter().cloned().collect())?;
        Ok(())
    }

    fn reversed(&self) -> Operation {
        let graveyard = Position::at(GRAVEYARD, &[], 0);

        MoveOperation::new(
            self.position.clone(),
            self.how_many(),
            graveyard,
            self.base_version + 1,
        )
        .into()
    }
}
