use crate::snapshot::{load_document, load_operations, write_document};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{Document, Operation};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document snapshot to start from
    pub document: PathBuf,

    /// JSON array of operations to apply in order
    pub operations: PathBuf,

    /// Write the resulting snapshot here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let mut document = load_document(&args.document, cwd)?;
    let operations = load_operations(&args.operations)?;

    let applied = apply_all(&mut document, &operations)?;

    write_document(&document, args.output.as_deref())?;

    if let Some(output) = &args.output {
        println!(
            "{} Applied {} operations, wrote version {} to {}",
            "✓".green(),
            applied,
            document.version(),
            output.display()
        );
    }

    Ok(())
}

/// Decode and apply each operation against the document as it is at that
/// point. Stops at the first failure.
pub fn apply_all(document: &mut Document, operations: &[Value]) -> Result<usize> {
    for (index, value) in operations.iter().enumerate() {
        let operation = Operation::from_json(value, document)
            .with_context(|| format!("Cannot decode operation #{index}"))?;

        document.apply_operation(operation).map_err(|err| {
            tracing::warn!(index, code = err.code(), "Replay stopped");
            anyhow::anyhow!("Operation #{index} rejected [{}]: {err}", err.code())
        })?;
    }

    Ok(operations.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.create_root("main", "$root").unwrap();
        doc
    }

    #[test]
    fn test_apply_all() {
        let mut doc = document();
        let operations = vec![
            json!({
                "variant": "InsertOperation",
                "baseVersion": 0,
                "position": { "root": "main", "path": [0] },
                "nodes": [{ "name": "paragraph", "children": [{ "data": "Foobar" }] }]
            }),
            json!({
                "variant": "RenameOperation",
                "baseVersion": 1,
                "position": { "root": "main", "path": [0] },
                "oldName": "paragraph",
                "newName": "heading"
            }),
        ];

        assert_eq!(apply_all(&mut doc, &operations).unwrap(), 2);
        assert_eq!(doc.version(), 2);
        assert_eq!(doc.element_at("main", &[0]).unwrap().name(), "heading");
    }

    #[test]
    fn test_apply_all_stops_on_rejection() {
        let mut doc = document();
        let operations = vec![
            json!({ "variant": "NoOperation", "baseVersion": 0 }),
            json!({ "variant": "NoOperation", "baseVersion": 5 }),
            json!({ "variant": "NoOperation", "baseVersion": 1 }),
        ];

        let err = apply_all(&mut doc, &operations).unwrap_err();
        assert!(err.to_string().contains("document-operation-wrong-version"));
        assert_eq!(doc.version(), 1);
    }
}
