//! End-to-end scenarios: build a document, apply operations, reverse them

use folio_editor::{
    AttributeOperation, Document, InsertOperation, MergeOperation, MoveOperation, Operation,
    RenameOperation, SplitOperation, GRAVEYARD,
};
use folio_model::{Attributes, Element, Node, Position, Range, Text};
use serde_json::json;

fn pos(path: &[usize]) -> Position {
    Position::new("main", path.to_vec()).unwrap()
}

fn document() -> Document {
    let mut doc = Document::new();
    doc.create_root("main", "$root").unwrap();
    doc
}

fn paragraph(children: Vec<Node>) -> Element {
    Element::with_children("paragraph", None::<Attributes>, children)
}

fn insert(doc: &mut Document, position: Position, nodes: Vec<Node>) {
    let op = InsertOperation::new(position, nodes, doc.version());
    doc.apply_operation(op.into()).unwrap();
}

fn text_of(element: &Element) -> String {
    element
        .children()
        .iter()
        .filter_map(Node::as_text)
        .map(Text::data)
        .collect()
}

fn main_root(doc: &Document) -> &Element {
    doc.root("main").unwrap()
}

#[test]
fn test_insert_text_into_empty_root() {
    let mut doc = document();

    insert(&mut doc, pos(&[0]), vec![Node::from("x")]);

    let root = main_root(&doc);
    assert_eq!(root.max_offset(), 1);
    assert_eq!(root.child(0).and_then(Node::as_text).map(Text::data), Some("x"));
    assert_eq!(doc.version(), 1);
}

#[test]
fn test_move_between_siblings_and_back() {
    let mut doc = document();
    insert(
        &mut doc,
        pos(&[0]),
        vec![
            paragraph(vec![Node::from(Element::new("image"))]).into(),
            paragraph(vec![]).into(),
        ],
    );
    let before = main_root(&doc).clone();

    let op = Operation::from(MoveOperation::new(pos(&[0, 0]), 1, pos(&[1, 0]), doc.version()));
    let reverse = op.reverse();
    doc.apply_operation(op).unwrap();

    assert_eq!(doc.element_at("main", &[0]).unwrap().max_offset(), 0);
    assert_eq!(doc.element_at("main", &[1]).unwrap().max_offset(), 1);

    doc.apply_operation(reverse).unwrap();
    assert_eq!(main_root(&doc), &before);
}

#[test]
fn test_split_and_merge_back() {
    let mut doc = document();
    insert(&mut doc, pos(&[0]), vec![paragraph(vec![Node::from("Foobar")]).into()]);

    let split = SplitOperation::at(&doc, pos(&[0, 3]), doc.version()).unwrap();
    assert_eq!(split.how_many, 3);

    let op = Operation::from(split);
    let reverse = op.reverse();
    assert!(matches!(reverse, Operation::Merge(_)));
    doc.apply_operation(op).unwrap();

    let root = main_root(&doc);
    assert_eq!(root.child_count(), 2);
    assert_eq!(text_of(doc.element_at("main", &[0]).unwrap()), "Foo");
    assert_eq!(text_of(doc.element_at("main", &[1]).unwrap()), "bar");
    assert_eq!(doc.element_at("main", &[1]).unwrap().name(), "paragraph");

    doc.apply_operation(reverse).unwrap();

    let root = main_root(&doc);
    assert_eq!(root.child_count(), 1);
    assert_eq!(text_of(doc.element_at("main", &[0]).unwrap()), "Foobar");
    // The emptied element is parked, not dropped
    assert_eq!(doc.graveyard().child_count(), 1);
}

#[test]
fn test_rename_and_reverse() {
    let mut doc = document();
    insert(&mut doc, pos(&[0]), vec![Element::new("oldName").into()]);

    let wrong = RenameOperation::new(pos(&[0]), "otherName", "newName", doc.version());
    let before = main_root(&doc).clone();
    let err = doc.apply_operation(wrong.into()).unwrap_err();
    assert_eq!(err.code(), "rename-operation-wrong-name");
    assert_eq!(main_root(&doc), &before);
    assert_eq!(doc.version(), 1);

    let op = Operation::from(RenameOperation::new(pos(&[0]), "oldName", "newName", doc.version()));
    let reverse = op.reverse();
    doc.apply_operation(op).unwrap();
    assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "newName");

    doc.apply_operation(reverse).unwrap();
    assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "oldName");
}

#[test]
fn test_merge_then_split_restores_identity() {
    let mut doc = document();
    insert(
        &mut doc,
        pos(&[0]),
        vec![
            paragraph(vec![Node::from("Foo")]).into(),
            paragraph(vec![Node::from("bar")]).into(),
        ],
    );
    let second_id = doc.element_at("main", &[1]).unwrap().id();
    let before = main_root(&doc).clone();

    let merge = MergeOperation::new(
        pos(&[1, 0]),
        3,
        pos(&[0, 3]),
        Position::at(GRAVEYARD, &[], 0),
        doc.version(),
    );
    let op = Operation::from(merge);
    let reverse = op.reverse();
    doc.apply_operation(op).unwrap();

    assert_eq!(main_root(&doc).child_count(), 1);
    assert_eq!(text_of(doc.element_at("main", &[0]).unwrap()), "Foobar");
    assert_eq!(doc.graveyard().child(0).and_then(Node::as_element).map(Element::id), Some(second_id));

    doc.apply_operation(reverse).unwrap();

    assert_eq!(main_root(&doc), &before);
    assert_eq!(doc.element_at("main", &[1]).unwrap().id(), second_id);
    assert_eq!(doc.graveyard().child_count(), 0);
}

#[test]
fn test_rejected_operations_leave_document_untouched() {
    let mut doc = document();
    insert(&mut doc, pos(&[0]), vec![paragraph(vec![Node::from("abc")]).into()]);
    let before = main_root(&doc).clone();
    let version = doc.version();

    let rejected: Vec<Operation> = vec![
        InsertOperation::new(pos(&[5]), "x", version).into(),
        MoveOperation::new(pos(&[0, 1]), 5, pos(&[0, 0]), version).into(),
        MoveOperation::new(pos(&[0]), 1, pos(&[0, 1]), version).into(),
        SplitOperation::new(pos(&[0]), 1, pos(&[1]), None, version).into(),
        SplitOperation::new(pos(&[0, 1]), 1, pos(&[1]), None, version).into(),
        RenameOperation::new(pos(&[0, 0]), "paragraph", "heading", version).into(),
        InsertOperation::new(pos(&[0]), "x", version + 1).into(),
    ];

    for op in rejected {
        assert!(doc.apply_operation(op.clone()).is_err(), "{op:?} should be rejected");
        assert_eq!(main_root(&doc), &before);
        assert_eq!(doc.version(), version);
        assert_eq!(doc.history().len(), 1);
    }
}

#[test]
fn test_versions_and_history_follow_applied_operations() {
    let mut doc = document();

    for i in 0..5 {
        insert(&mut doc, pos(&[i]), vec![Element::new("item").into()]);
    }

    assert_eq!(doc.version(), 5);
    assert_eq!(doc.history().len(), 5);

    for (expected, op) in doc.history().iter().enumerate() {
        assert_eq!(op.base_version(), expected as u64);
    }
}

#[test]
fn test_operation_json_round_trip() {
    let mut doc = document();
    insert(
        &mut doc,
        pos(&[0]),
        vec![
            paragraph(vec![Node::from("Foo")]).into(),
            paragraph(vec![Node::from("bar")]).into(),
        ],
    );

    let ops: Vec<Operation> = vec![
        InsertOperation::new(pos(&[0, 0]), vec![Node::from(Text::with_attributes("x", [("bold", true)]))], 1).into(),
        MoveOperation::new(pos(&[0, 1]), 2, pos(&[1, 0]), 2).into(),
        SplitOperation::new(pos(&[0, 3]), 0, pos(&[1]), None, 3).into(),
        SplitOperation::new(pos(&[0, 3]), 0, pos(&[1]), Some(Position::at(GRAVEYARD, &[], 0)), 3).into(),
        MergeOperation::new(pos(&[1, 0]), 3, pos(&[0, 3]), Position::at(GRAVEYARD, &[], 0), 4).into(),
        RenameOperation::new(pos(&[0]), "paragraph", "heading", 5).into(),
    ];

    for op in ops {
        let json = op.to_json().unwrap();
        assert_eq!(json["variant"], op.variant_name());
        let decoded = Operation::from_json(&json, &doc).unwrap();
        assert_eq!(decoded, op);
    }
}

#[test]
fn test_snapshot_file_round_trip() -> anyhow::Result<()> {
    let mut doc = document();
    insert(&mut doc, pos(&[0]), vec![paragraph(vec![Node::from("Foobar")]).into()]);
    let split = SplitOperation::at(&doc, pos(&[0, 3]), doc.version())?;
    doc.apply_operation(split.into())?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("document.json");
    std::fs::write(&path, serde_json::to_string_pretty(&doc.to_json()?)?)?;

    let restored = Document::from_json(&serde_json::from_str(&std::fs::read_to_string(&path)?)?)?;
    assert_eq!(restored.version(), 2);
    assert_eq!(restored.root("main"), doc.root("main"));

    // The restored document keeps accepting operations at its version
    let mut restored = restored;
    let rename = RenameOperation::new(pos(&[1]), "paragraph", "heading", restored.version());
    restored.apply_operation(rename.into())?;
    assert_eq!(restored.element_at("main", &[1])?.name(), "heading");

    Ok(())
}

/// Apply `op` then its reverse, checking every root comes back unchanged
fn assert_round_trip(doc: &mut Document, op: Operation) {
    let before = main_root(doc).clone();
    let reverse = op.reverse();

    doc.apply_operation(op.clone())
        .unwrap_or_else(|err| panic!("{op:?} rejected: {err}"));
    assert_ne!(main_root(doc), &before, "{op:?} changed nothing");

    doc.apply_operation(reverse.clone())
        .unwrap_or_else(|err| panic!("reverse {reverse:?} rejected: {err}"));
    assert_eq!(main_root(doc), &before, "{op:?} was not undone");
}

/// main: <p>Foo</p><p>bar</p><p>baz</p>
fn three_paragraphs() -> Document {
    let mut doc = document();
    insert(
        &mut doc,
        pos(&[0]),
        vec![
            paragraph(vec![Node::from("Foo")]).into(),
            paragraph(vec![Node::from("bar")]).into(),
            paragraph(vec![Node::from("baz")]).into(),
        ],
    );
    doc
}

#[test]
fn test_merge_round_trips_in_both_directions() {
    // Later element into an earlier one
    let mut doc = three_paragraphs();
    let op = MergeOperation::new(pos(&[2, 0]), 3, pos(&[0, 3]), Position::at(GRAVEYARD, &[], 0), doc.version());
    assert_round_trip(&mut doc, op.into());

    // Earlier element into a later one
    let mut doc = three_paragraphs();
    let op = MergeOperation::new(pos(&[0, 0]), 3, pos(&[2, 3]), Position::at(GRAVEYARD, &[], 0), doc.version());
    assert_round_trip(&mut doc, op.into());
    assert_eq!(text_of(doc.element_at("main", &[0]).unwrap()), "Foo");
}

#[test]
fn test_merge_into_start_of_element_is_rejected() {
    let mut doc = three_paragraphs();
    let before = main_root(&doc).clone();

    let op = MergeOperation::new(pos(&[0, 0]), 3, pos(&[2, 0]), Position::at(GRAVEYARD, &[], 0), doc.version());
    let err = doc.apply_operation(op.into()).unwrap_err();

    assert_eq!(err.code(), "merge-operation-target-position-invalid");
    assert_eq!(main_root(&doc), &before);
}

#[test]
fn test_move_round_trips() {
    // Into a later sibling's subtree, splitting its text
    let mut doc = three_paragraphs();
    let op = MoveOperation::new(pos(&[0]), 1, pos(&[1, 1]), doc.version());
    assert_round_trip(&mut doc, op.into());

    // Several nodes forward within one parent
    let mut doc = three_paragraphs();
    let op = MoveOperation::new(pos(&[0]), 2, pos(&[3]), doc.version());
    assert_round_trip(&mut doc, op.into());

    // Out of a nested element
    let mut doc = document();
    let quote = Element::with_children(
        "blockQuote",
        None::<Attributes>,
        vec![paragraph(vec![Node::from("a")]), paragraph(vec![Node::from("b")])],
    );
    insert(&mut doc, pos(&[0]), vec![quote.into()]);
    let op = MoveOperation::new(pos(&[0, 1]), 1, pos(&[1]), doc.version());
    assert_round_trip(&mut doc, op.into());

    // Part of a text node into another element
    let mut doc = three_paragraphs();
    let op = MoveOperation::new(pos(&[0, 1]), 2, pos(&[2, 3]), doc.version());
    assert_round_trip(&mut doc, op.into());
}

#[test]
fn test_split_round_trips_at_edges() {
    for offset in [0, 3, 6] {
        let mut doc = document();
        insert(&mut doc, pos(&[0]), vec![paragraph(vec![Node::from("Foobar")]).into()]);

        let split = SplitOperation::at(&doc, pos(&[0, offset]), doc.version()).unwrap();
        assert_eq!(split.how_many, 6 - offset);
        assert_round_trip(&mut doc, split.into());
    }
}

#[test]
fn test_attribute_round_trips_over_mixed_content() {
    let mut doc = document();
    insert(
        &mut doc,
        pos(&[0]),
        vec![paragraph(vec![
            Node::from("Foo"),
            Node::from(Element::new("image")),
            Node::from("bar"),
        ])
        .into()],
    );

    let range = Range::new(pos(&[0, 1]), pos(&[0, 6])).unwrap();
    let op = AttributeOperation::new(range, "bold", None, Some(json!(true)), doc.version());
    assert_round_trip(&mut doc, op.into());
    assert_eq!(doc.element_at("main", &[0]).unwrap().child_count(), 3);
}
