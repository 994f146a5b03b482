use anyhow::{Context, Result};
use colored::Colorize;
use snapvcs_core::Repository;
use std::path::PathBuf;

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let root = super::get_root(path)?;

    let repo = Repository::init(&root)
        .with_context(|| format!("Failed to initialize repository at {}", root.display()))?;

    println!("{}", "✓ Initiated snapvcs repository".green().bold());
    println!("   {}: {}", "Root".bold(), repo.root().display());
    println!("   {}: {}", "Backups".bold(), repo.store().root().display());
    if repo.tracked_count() > 0 {
        println!(
            "   {}: {}",
            "Tracked files".bold(),
            repo.tracked_count().to_string().cyan()
        );
    }

    Ok(())
}
