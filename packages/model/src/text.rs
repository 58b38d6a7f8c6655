//! Text leaf nodes.

use crate::Attributes;

/// A run of characters sharing one set of attributes.
///
/// The data is immutable once constructed: the offset size of a text node is
/// its character count, and the owning list caches offsets derived from it.
#[derive(Debug, Clone)]
pub struct Text {
    data: String,
    len: usize,
    attributes: Attributes,
}

impl Text {
    pub fn new(data: impl Into<String>) -> Self {
        Self::with_attributes(data, Attributes::new())
    }

    pub fn with_attributes(data: impl Into<String>, attributes: impl Into<Attributes>) -> Self {
        let data = data.into();
        let len = data.chars().count();

        Self {
            data,
            len,
            attributes: attributes.into(),
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Number of characters (offset units) in this node
    pub fn offset_size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Split into two runs at a character offset. Both halves keep the
    /// attributes of the original.
    pub fn split_at(&self, offset: usize) -> (Text, Text) {
        let byte = self
            .data
            .char_indices()
            .nth(offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.data.len());

        let (head, tail) = self.data.split_at(byte);
        (
            Text::with_attributes(head, self.attributes.clone()),
            Text::with_attributes(tail, self.attributes.clone()),
        )
    }

    /// Join `other` onto the end of this run, keeping this run's attributes
    pub fn concat(&self, other: &Text) -> Text {
        let mut data = String::with_capacity(self.data.len() + other.data.len());
        data.push_str(&self.data);
        data.push_str(&other.data);

        Text {
            data,
            len: self.len + other.len,
            attributes: self.attributes.clone(),
        }
    }

    pub fn has_same_attributes(&self, other: &Text) -> bool {
        self.attributes == other.attributes
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_size_counts_chars() {
        assert_eq!(Text::new("Foobar").offset_size(), 6);
        assert_eq!(Text::new("żółw").offset_size(), 4);
    }

    #[test]
    fn test_split_and_concat() {
        let text = Text::with_attributes("żółwik", [("bold", true)]);
        let (head, tail) = text.split_at(3);
        assert_eq!(head.data(), "żół");
        assert_eq!(tail.data(), "wik");
        assert!(head.has_same_attributes(&tail));
        assert_eq!(head.concat(&tail), text);
    }

    #[test]
    fn test_split_at_end() {
        let (head, tail) = Text::new("abc").split_at(3);
        assert_eq!(head.data(), "abc");
        assert!(tail.is_empty());
    }
}
