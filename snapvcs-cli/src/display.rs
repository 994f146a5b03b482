use colored::{ColoredString, Colorize};
use snapvcs_core::{Digest, Event, FileStatus, Reporter};

/// Prints repository events as they happen.
///
/// Failures without an entry name abort the whole operation and come back
/// as the command's error, so they are left for `main` to print.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &Event) {
        match event {
            Event::Failed { name: None, .. } => {}
            Event::Failed { .. } | Event::IntegrityMismatch { .. } => {
                eprintln!("  {} {}", "✗".red(), event.to_string().red());
            }
            _ => println!("  {} {}", "✓".green(), event),
        }
    }
}

pub fn short_digest(digest: &Digest) -> String {
    digest.to_hex()[..12].to_string()
}

pub fn status_label(status: &FileStatus) -> ColoredString {
    match status {
        FileStatus::Untracked => status.to_string().yellow(),
        FileStatus::NotChanged => status.to_string().green(),
        FileStatus::Hash(digest) => short_digest(digest).cyan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvcs_core::ContentHasher;

    #[test]
    fn test_short_digest() {
        let digest = ContentHasher::hash(b"");
        assert_eq!(short_digest(&digest), "e3b0c44298fc");
    }

    #[test]
    fn test_status_label_text() {
        colored::control::set_override(false);
        assert_eq!(status_label(&FileStatus::Untracked).to_string(), "untracked");
        assert_eq!(
            status_label(&FileStatus::NotChanged).to_string(),
            "not changed"
        );
    }
}
