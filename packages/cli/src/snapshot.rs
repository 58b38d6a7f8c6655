use anyhow::{anyhow, Context, Result};
use folio_editor::{Document, EditorConfig};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a document snapshot. A snapshot without `roots` gets the roots
/// listed in the config found in `cwd`.
pub fn load_document(path: &Path, cwd: &str) -> Result<Document> {
    let mut snapshot = read_json(path)?;

    if snapshot.get("roots").is_none() {
        let config = EditorConfig::load(cwd)?;
        let mut seeded = config.create_document()?.to_json()?;

        if let Some(version) = snapshot.get("version") {
            seeded["version"] = version.clone();
        }
        snapshot = seeded;
    }

    Document::from_json(&snapshot)
        .with_context(|| format!("Invalid document snapshot: {}", path.display()))
}

/// Load a JSON array of encoded operations
pub fn load_operations(path: &Path) -> Result<Vec<Value>> {
    match read_json(path)? {
        Value::Array(operations) => Ok(operations),
        _ => Err(anyhow!(
            "Expected an array of operations in {}",
            path.display()
        )),
    }
}

pub fn write_document(document: &Document, output: Option<&Path>) -> Result<()> {
    let content = serde_json::to_string_pretty(&document.to_json()?)?;

    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Cannot write {}", path.display()))?,
        None => println!("{content}"),
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
