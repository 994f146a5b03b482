use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: Option<PathBuf>) -> Result<()> {
    let mut repo = super::open_repo(root)?;

    println!("{}", "Currently performing integrity check...".bold());
    let report = repo.integrity_check();
    println!();

    if report.is_clean() {
        println!("{}", "✓ Integrity check completed.".green().bold());
        return Ok(());
    }

    println!(
        "  {}: {}  {}: {}",
        "Mismatched".bold(),
        report.mismatches.len().to_string().red(),
        "Unreadable".bold(),
        report.unreadable.len().to_string().red()
    );
    anyhow::bail!(
        "Integrity check failed for {} of {} file(s)",
        report.mismatches.len() + report.unreadable.len(),
        report.checked
    )
}
