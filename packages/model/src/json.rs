//! # Tree JSON
//!
//! ```text
//! Element → { "name": ..., "attributes"?: {...}, "children"?: [Node, ...] }
//! Text    → { "data": ..., "attributes"?: {...} }
//! ```
//!
//! Empty attribute maps and empty child lists are omitted when encoding and
//! default to empty when decoding. A value that is neither shape is rejected
//! with `model-node-invalid`.

use crate::{Attributes, Element, ModelError, ModelResult, Node, NodeKind, NodeList, Text};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeJson {
    Text {
        data: String,
        #[serde(default)]
        attributes: Attributes,
    },
    Element {
        name: String,
        #[serde(default)]
        attributes: Attributes,
        #[serde(default)]
        children: Vec<NodeJson>,
    },
}

impl From<NodeJson> for Node {
    fn from(json: NodeJson) -> Self {
        match json {
            NodeJson::Text { data, attributes } => Text::with_attributes(data, attributes).into(),
            NodeJson::Element {
                name,
                attributes,
                children,
            } => Element::with_children(name, attributes, children.into_iter().map(Node::from)).into(),
        }
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.attributes().is_empty() { 1 } else { 2 };
        let mut state = serializer.serialize_struct("Text", fields)?;
        state.serialize_field("data", self.data())?;
        if !self.attributes().is_empty() {
            state.serialize_field("attributes", self.attributes())?;
        }
        state.end()
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Element", 3)?;
        state.serialize_field("name", self.name())?;
        if !self.attributes().is_empty() {
            state.serialize_field("attributes", self.attributes())?;
        }
        if !self.is_empty() {
            state.serialize_field("children", self.children())?;
        }
        state.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind() {
            NodeKind::Text(text) => text.serialize(serializer),
            NodeKind::Element(element) => element.serialize(serializer),
        }
    }
}

impl Serialize for NodeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeJson::deserialize(deserializer).map(Node::from)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)?.into_kind() {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(serde::de::Error::custom("expected an element, found text")),
        }
    }
}

impl<'de> Deserialize<'de> for NodeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Node>::deserialize(deserializer).map(NodeList::from_nodes)
    }
}

impl Node {
    pub fn to_json(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: &Value) -> ModelResult<Node> {
        Node::deserialize(value).map_err(|e| ModelError::invalid_node(e.to_string()))
    }
}

impl Element {
    pub fn to_json(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: &Value) -> ModelResult<Element> {
        Element::deserialize(value).map_err(|e| ModelError::invalid_node(e.to_string()))
    }
}

impl NodeList {
    pub fn to_json(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: &Value) -> ModelResult<NodeList> {
        NodeList::deserialize(value).map_err(|e| ModelError::invalid_node(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_json() {
        let text = Node::from(Text::with_attributes("foo", [("bold", true)]));
        assert_eq!(
            text.to_json().unwrap(),
            json!({ "data": "foo", "attributes": { "bold": true } })
        );
        assert_eq!(Node::from("bar").to_json().unwrap(), json!({ "data": "bar" }));
    }

    #[test]
    fn test_element_json_omits_empty_fields() {
        let element = Element::new("paragraph");
        assert_eq!(element.to_json().unwrap(), json!({ "name": "paragraph" }));
    }

    #[test]
    fn test_tree_round_trip() {
        let tree = Element::with_children(
            "blockQuote",
            [("class", "wide")],
            vec![
                Node::from(Element::with_children("paragraph", None::<Attributes>, vec!["abc"])),
                Node::from(Text::with_attributes("x", [("italic", true)])),
            ],
        );

        let json = tree.to_json().unwrap();
        let decoded = Element::from_json(&json).unwrap();

        assert_eq!(decoded, tree);
        assert_eq!(decoded.max_offset(), 2);
        assert_ne!(decoded.id(), tree.id());
    }

    #[test]
    fn test_invalid_node_rejected() {
        let err = Node::from_json(&json!({ "foo": 1 })).unwrap_err();
        assert_eq!(err.code(), "model-node-invalid");

        let err = Element::from_json(&json!({ "data": "text" })).unwrap_err();
        assert_eq!(err.code(), "model-node-invalid");

        let err = NodeList::from_json(&json!([{ "data": "ok" }, 42])).unwrap_err();
        assert_eq!(err.code(), "model-node-invalid");
    }
}
