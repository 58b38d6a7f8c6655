use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Maximum undo steps kept (0 = unlimited)
    #[arg(short, long)]
    pub undo_levels: Option<usize>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = EditorConfig::default();
    if let Some(undo_levels) = args.undo_levels {
        config.undo_levels = undo_levels;
    }
    config.save(cwd)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Add roots to {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: folio replay <document.json> <operations.json>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(InitArgs { undo_levels: Some(7), force: false }, &cwd).unwrap();
        assert_eq!(EditorConfig::load(&cwd).unwrap().undo_levels, 7);

        // Existing config is kept without --force
        init(InitArgs { undo_levels: Some(9), force: false }, &cwd).unwrap();
        assert_eq!(EditorConfig::load(&cwd).unwrap().undo_levels, 7);

        init(InitArgs { undo_levels: None, force: true }, &cwd).unwrap();
        assert_eq!(EditorConfig::load(&cwd).unwrap(), EditorConfig::default());
    }
}
