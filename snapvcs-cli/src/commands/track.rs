use anyhow::{Context, Result};
use colored::Colorize;
use snapvcs_core::ErrorKind;
use std::path::PathBuf;

pub fn run(names: Vec<String>, root: Option<PathBuf>) -> Result<()> {
    let mut repo = super::open_repo(root)?;

    let mut failed = 0;
    for name in &names {
        match repo.track(name) {
            Ok(_) => {}
            // Index failures are reported without a name; the console leaves
            // them to us.
            Err(e) if e.kind() == ErrorKind::Database => {
                return Err(e).with_context(|| format!("Failed to record {} in the index", name));
            }
            Err(_) => failed += 1,
        }
    }

    println!();
    if failed == 0 {
        println!(
            "{}",
            format!("✓ Tracking {} file(s)", repo.tracked_count())
                .green()
                .bold()
        );
    } else {
        anyhow::bail!("{} of {} file(s) could not be tracked", failed, names.len());
    }

    Ok(())
}
