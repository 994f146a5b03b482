use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: Option<PathBuf>) -> Result<()> {
    let mut repo = super::open_repo(root)?;

    if repo.tracked_count() == 0 {
        println!("{}", "No tracked files to commit".yellow());
        return Ok(());
    }

    println!("{}", "Creating commit...".bold());
    println!("  {}: {}", "Files".bold(), repo.tracked_count());
    println!();

    let outcome = repo.commit().context("Commit failed")?;

    println!();
    if outcome.is_complete() {
        println!("{}", "✓ Committed changes.".green().bold());
    } else {
        println!(
            "{}",
            format!(
                "⚠ Committed {}/{} files",
                outcome.committed.len(),
                outcome.committed.len() + outcome.failures.len()
            )
            .yellow()
            .bold()
        );
    }
    println!("  {}: {}", "Commit ID".bold(), outcome.id);
    println!(
        "  {}: {}",
        "Date".bold(),
        outcome.timestamp.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
