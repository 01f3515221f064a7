//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    /// `None` clears the current selection.
    SelectFile { path: Option<PathBuf> },
    Submit,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SelectFile { path: Some(_) } => "select_file",
            BackendCommand::SelectFile { path: None } => "clear_file",
            BackendCommand::Submit => "submit",
        }
    }
}
