use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use std::path::PathBuf;

pub fn run(yes: bool, root: Option<PathBuf>) -> Result<()> {
    let mut repo = super::open_repo(root)?;

    if repo.tracked_count() == 0 {
        println!("{}", "No tracked files to revert".yellow());
        return Ok(());
    }

    println!("{}", "Files to be restored:".bold());
    for file in repo.tracked_files() {
        let note = if repo.store().exists(&file.name) {
            "will be restored".yellow()
        } else {
            "no backup".red()
        };
        println!("  {} {}", file.name, note);
    }
    println!();

    if !yes {
        let proceed = Confirm::new()
            .with_prompt("Overwrite the working copies with the last commit?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", "Revert cancelled".yellow());
            return Ok(());
        }
    }

    println!("{}", "Performing revert...".bold());
    let outcome = repo.revert().context("Revert failed")?;

    println!();
    if outcome.is_complete() {
        println!(
            "{}",
            format!("✓ Reverted {} file(s)", outcome.restored.len())
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "⚠ Reverted {}/{} files",
                outcome.restored.len(),
                outcome.restored.len() + outcome.failures.len()
            )
            .yellow()
            .bold()
        );
    }

    Ok(())
}
