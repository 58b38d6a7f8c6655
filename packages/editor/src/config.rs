use crate::{Document, EditorError, OperationError, ROOT_ELEMENT_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo steps kept (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Roots created for new documents
    #[serde(default = "default_roots")]
    pub roots: Vec<RootConfig>,
}

fn default_undo_levels() -> usize {
    100
}

fn default_roots() -> Vec<RootConfig> {
    vec![RootConfig {
        root_name: "main".to_string(),
        element_name: default_element_name(),
    }]
}

fn default_element_name() -> String {
    ROOT_ELEMENT_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootConfig {
    pub root_name: String,

    #[serde(default = "default_element_name")]
    pub element_name: String,
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            config.check()?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(EditorConfig::default())
        }
    }

    /// Write this config into `dir` as pretty JSON
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);
        std::fs::write(config_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Empty document with every configured root
    pub fn create_document(&self) -> Result<Document, OperationError> {
        let mut document = Document::new();

        for root in &self.roots {
            document.create_root(root.root_name.clone(), root.element_name.clone())?;
        }

        Ok(document)
    }

    fn check(&self) -> Result<(), EditorError> {
        if let Some(root) = self.roots.iter().find(|root| root.root_name.is_empty()) {
            return Err(EditorError::Config(format!(
                "root with element '{}' has an empty name",
                root.element_name
            )));
        }

        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_levels: default_undo_levels(),
            roots: default_roots(),
        }
    }
}
