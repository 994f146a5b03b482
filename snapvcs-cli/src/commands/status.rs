use crate::display::status_label;
use anyhow::Result;
use colored::Colorize;
use snapvcs_core::TrackedFile;
use std::path::PathBuf;

pub fn run(json: bool, root: Option<PathBuf>) -> Result<()> {
    let repo = super::open_repo(root)?;

    if json {
        let files: Vec<&TrackedFile> = repo.tracked_files().collect();
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    println!("{}", "Repository Status".bold().cyan());
    println!("  {}: {}", "Root".bold(), repo.root().display());
    println!(
        "  {}: {}",
        "Commit mode".bold(),
        if repo.config().commit.retain_hash {
            "retain hash"
        } else {
            "reset to not changed"
        }
    );
    println!();

    if repo.tracked_count() == 0 {
        println!("{}", "No tracked files".yellow());
        println!("Run {} to start tracking", "snapvcs track <file>".cyan());
        return Ok(());
    }

    println!(
        "{} {}",
        "Tracked files:".bold(),
        format!("({})", repo.tracked_count()).yellow()
    );
    println!();

    for file in repo.tracked_files() {
        let backup = if repo.store().exists(&file.name) {
            "backed up".dimmed()
        } else {
            "no backup".red()
        };
        println!(
            "  {} - {} [{}]",
            file.name.white().bold(),
            status_label(&file.status),
            backup
        );
    }

    Ok(())
}
