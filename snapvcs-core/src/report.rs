//! Reporting sink for human-readable status lines
//!
//! Every operation surfaces its progress and each per-entry error as exactly
//! one [`Event`]. The default sink forwards events to `tracing`; callers that
//! need to render or inspect them use [`MemoryReporter`].

use crate::error::{Error, ErrorKind};
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Tracked { name: String, created: bool },
    Committed { id: String, files: usize },
    Reverted { name: String },
    IntegrityPassed { checked: usize },
    IntegrityMismatch { name: String },
    Failed {
        name: Option<String>,
        kind: ErrorKind,
        message: String,
    },
}

impl Event {
    pub fn failed(name: Option<&str>, error: &Error) -> Self {
        Event::Failed {
            name: name.map(str::to_string),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Failed { .. } | Event::IntegrityMismatch { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Tracked { name, created: true } => {
                write!(f, "Created and tracked file: {}", name)
            }
            Event::Tracked { name, created: false } => write!(f, "File tracked: {}", name),
            Event::Committed { id, files } => {
                write!(f, "Committed changes ({} file(s)) as {}", files, id)
            }
            Event::Reverted { name } => write!(f, "Reverted file: {}", name),
            Event::IntegrityPassed { checked } => {
                write!(f, "Integrity check passed for {} file(s)", checked)
            }
            Event::IntegrityMismatch { name } => {
                write!(f, "Integrity check failed for file: {}", name)
            }
            Event::Failed { message, .. } => write!(f, "Error: {}", message),
        }
    }
}

pub trait Reporter {
    fn report(&mut self, event: &Event);
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &Event) {
        match event {
            Event::Failed { .. } => error!("{}", event),
            Event::IntegrityMismatch { .. } => warn!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Collects events in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    events: Vec<Event>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(|e| e.is_error())
    }

    /// Failure kinds reported so far, in order.
    pub fn failure_kinds(&self) -> Vec<ErrorKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Failed { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
