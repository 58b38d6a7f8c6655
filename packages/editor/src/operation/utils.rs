//! Tree mutation primitives shared by the operation variants.
//!
//! All of them keep text normalised: a text node is split when an edge falls
//! strictly inside it, and adjacent texts with equal attributes are merged
//! back once the edit is done. Callers validate first; these helpers only
//! surface lookup failures.

use crate::{Document, OperationError};
use folio_model::{Node, Position, Range};
use serde_json::Value;

/// Insert `nodes` at `position`. Returns the range they now occupy.
pub(crate) fn insert(
    document: &mut Document,
    position: &Position,
    nodes: Vec<Node>,
) -> Result<Range, OperationError> {
    let how_many: usize = nodes.iter().map(Node::offset_size).sum();
    let count = nodes.len();

    let parent = document.element_at_mut(position.root(), position.parent_path())?;
    parent.split_text_at(position.offset())?;

    let index = parent.offset_to_index(position.offset())?;
    parent.insert_children(index, nodes)?;

    parent.merge_texts_at(index + count)?;
    parent.merge_texts_at(index)?;

    Ok(Range::from_position_and_shift(position, how_many))
}

/// Detach the nodes covered by a flat `range`
pub(crate) fn remove(document: &mut Document, range: &Range) -> Result<Vec<Node>, OperationError> {
    let start = range.start();
    let end = range.end();

    let parent = document.element_at_mut(start.root(), start.parent_path())?;
    parent.split_text_at(start.offset())?;
    parent.split_text_at(end.offset())?;

    let first = parent.offset_to_index(start.offset())?;
    let last = parent.offset_to_index(end.offset())?;
    let removed = parent.remove_children(first, last - first)?;

    parent.merge_texts_at(first)?;

    Ok(removed)
}

/// Move the content of a flat `range` to `target`, given in pre-move
/// coordinates. Returns the range the content now occupies.
pub(crate) fn move_range(
    document: &mut Document,
    range: &Range,
    target: &Position,
) -> Result<Range, OperationError> {
    let how_many = range.end().offset() - range.start().offset();
    let nodes = remove(document, range)?;

    let target = target
        .transformed_by_deletion(range.start(), how_many)
        .ok_or_else(|| OperationError::MoveRangeIntoItself {
            source_position: range.start().clone(),
            target_position: target.clone(),
        })?;

    insert(document, &target, nodes)
}

/// Set (or with `None`, remove) `key` on every node of a flat `range`
pub(crate) fn set_attribute(
    document: &mut Document,
    range: &Range,
    key: &str,
    value: Option<&Value>,
) -> Result<(), OperationError> {
    let start = range.start();
    let end = range.end();

    let parent = document.element_at_mut(start.root(), start.parent_path())?;
    parent.split_text_at(start.offset())?;
    parent.split_text_at(end.offset())?;

    let first = parent.offset_to_index(start.offset())?;
    let last = parent.offset_to_index(end.offset())?;

    for index in first..last {
        parent.set_child_attribute(index, key, value)?;
    }

    // Highest index first so earlier merges do not shift later ones
    for index in (first..=last).rev() {
        parent.merge_texts_at(index)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::{Attributes, Element, Text};
    use serde_json::json;

    fn doc_with(children: Vec<Node>) -> Document {
        let mut doc = Document::new();
        doc.create_root("main", "$root").unwrap();
        let paragraph = Element::with_children("paragraph", None::<Attributes>, children);
        insert(&mut doc, &pos(&[0]), vec![paragraph.into()]).unwrap();
        doc
    }

    fn pos(path: &[usize]) -> Position {
        Position::new("main", path.to_vec()).unwrap()
    }

    fn paragraph(doc: &Document) -> &Element {
        doc.element_at("main", &[0]).unwrap()
    }

    #[test]
    fn test_insert_merges_adjacent_text() {
        let mut doc = doc_with(vec![Node::from("Foo")]);

        insert(&mut doc, &pos(&[0, 1]), vec![Node::from("xx")]).unwrap();

        let p = paragraph(&doc);
        assert_eq!(p.child_count(), 1);
        assert_eq!(p.child(0).and_then(Node::as_text).map(Text::data), Some("Fxxoo"));
    }

    #[test]
    fn test_remove_splits_and_merges() {
        let mut doc = doc_with(vec![Node::from("abcdef")]);
        let range = Range::new(pos(&[0, 2]), pos(&[0, 4])).unwrap();

        let removed = remove(&mut doc, &range).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].as_text().map(Text::data), Some("cd"));
        assert_eq!(paragraph(&doc).child_count(), 1);
        assert_eq!(paragraph(&doc).max_offset(), 4);
    }

    #[test]
    fn test_move_within_parent() {
        let mut doc = doc_with(vec![
            Node::from(Element::new("a")),
            Node::from(Element::new("b")),
            Node::from(Element::new("c")),
        ]);
        let range = Range::from_position_and_shift(&pos(&[0, 0]), 1);

        let moved = move_range(&mut doc, &range, &pos(&[0, 3])).unwrap();

        assert_eq!(moved.start().path(), &[0, 2]);
        let names: Vec<_> = paragraph(&doc)
            .children()
            .iter()
            .filter_map(Node::as_element)
            .map(Element::name)
            .collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_set_attribute_on_part_of_text() {
        let mut doc = doc_with(vec![Node::from("abcdef")]);
        let range = Range::new(pos(&[0, 2]), pos(&[0, 4])).unwrap();

        set_attribute(&mut doc, &range, "bold", Some(&json!(true))).unwrap();
        assert_eq!(paragraph(&doc).child_count(), 3);

        set_attribute(&mut doc, &range, "bold", None).unwrap();
        assert_eq!(paragraph(&doc).child_count(), 1);
    }
}
