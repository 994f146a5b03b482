use crate::error::Error;
use crate::hash::ContentHasher;
use crate::models::{EntryFailure, IntegrityReport};
use crate::registry::TrackedFileRegistry;
use crate::report::{Event, Reporter};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Compares the working copy against the registry's recorded digests.
/// Purely diagnostic: nothing is written.
pub struct IntegrityChecker<'a> {
    workdir: &'a Path,
    registry: &'a TrackedFileRegistry,
}

impl<'a> IntegrityChecker<'a> {
    pub fn new(workdir: &'a Path, registry: &'a TrackedFileRegistry) -> Self {
        Self { workdir, registry }
    }

    pub fn check(&self, reporter: &mut dyn Reporter) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        for (name, status) in self.registry.entries() {
            report.checked += 1;

            let content = match fs::read(self.workdir.join(name)) {
                Ok(content) => content,
                Err(e) => {
                    let error = Error::Read {
                        name: name.to_string(),
                        source: e,
                    };
                    reporter.report(&Event::failed(Some(name), &error));
                    report.unreadable.push(EntryFailure {
                        name: name.to_string(),
                        error,
                    });
                    continue;
                }
            };

            let digest = ContentHasher::hash(&content);
            if status.matches(&digest) {
                debug!("{} matches {}", name, digest);
            } else {
                reporter.report(&Event::IntegrityMismatch {
                    name: name.to_string(),
                });
                report.mismatches.push(name.to_string());
            }
        }

        if report.is_clean() {
            reporter.report(&Event::IntegrityPassed {
                checked: report.checked,
            });
        }

        info!(
            "Integrity check completed: {} checked, {} mismatched, {} unreadable",
            report.checked,
            report.mismatches.len(),
            report.unreadable.len()
        );

        report
    }
}
