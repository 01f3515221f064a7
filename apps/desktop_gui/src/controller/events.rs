//! Events flowing from the backend worker to the UI thread.

use std::path::PathBuf;

use client_core::{archive::ArchiveEntry, FormEvent};

pub enum UiEvent {
    BackendReady,
    BackendFailed(String),
    Form(FormEvent),
    SubmitFinished(SubmitReport),
}

/// What the status bar shows once a submission settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub saved_to: Option<PathBuf>,
    pub entries: Vec<ArchiveEntry>,
}

impl SubmitReport {
    pub fn status_line(&self) -> Option<String> {
        let path = self.saved_to.as_ref()?;
        if self.entries.is_empty() {
            return Some(format!("Saved {}", path.display()));
        }
        let names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        Some(format!("Saved {}: {}", path.display(), names.join(", ")))
    }
}
