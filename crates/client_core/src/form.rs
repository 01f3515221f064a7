//! Upload form controller: selected file, display label and busy flag.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use shared::{
    domain::{is_allowed_file_name, Notification, NO_FILE_SELECTED},
    error::FailureKind,
    protocol::RESULT_ARCHIVE_NAME,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{delivery::DownloadSink, transport::PredictionService};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A user-chosen file. Path-backed handles are read when the form submits.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    source: FileSource,
}

impl FileHandle {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn in_memory(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Memory(contents),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(contents) => Ok(contents.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub label: String,
    pub has_file: bool,
    pub busy: bool,
}

impl FormSnapshot {
    pub fn can_submit(&self) -> bool {
        self.has_file && !self.busy
    }

    pub fn picker_enabled(&self) -> bool {
        !self.busy
    }
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self {
            label: NO_FILE_SELECTED.to_string(),
            has_file: false,
            busy: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    Notification(Notification),
    StateChanged(FormSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Accepted,
    Cleared,
    Rejected,
    /// The picker is disabled while a submission is in flight.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// `path` is `None` when the user dismissed the save prompt.
    Delivered {
        path: Option<PathBuf>,
        size_bytes: usize,
    },
    MissingFile,
    Failed,
    Ignored,
}

#[derive(Debug, Error)]
enum SubmitError {
    #[error("failed to read selected file: {0}")]
    ReadFile(#[source] std::io::Error),
    #[error("prediction request failed: {0:#}")]
    Prediction(anyhow::Error),
    #[error("failed to deliver prediction archive: {0:#}")]
    Delivery(anyhow::Error),
}

#[derive(Default)]
struct FormState {
    selected: Option<FileHandle>,
    label: String,
    busy: bool,
}

impl FormState {
    fn clear_selection(&mut self) {
        self.selected = None;
        self.label = NO_FILE_SELECTED.to_string();
    }

    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            label: self.label.clone(),
            has_file: self.selected.is_some(),
            busy: self.busy,
        }
    }
}

pub struct UploadForm {
    service: Arc<dyn PredictionService>,
    sink: Arc<dyn DownloadSink>,
    state: Mutex<FormState>,
    events: broadcast::Sender<FormEvent>,
}

/// Clears the busy flag when dropped, so a submission that errors, panics or
/// is dropped mid-request still returns the form to idle.
struct BusyGuard<'a> {
    form: &'a UploadForm,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let snapshot = {
            let mut state = self.form.lock_state();
            state.busy = false;
            state.snapshot()
        };
        self.form.emit(FormEvent::StateChanged(snapshot));
    }
}

impl UploadForm {
    pub fn new(service: Arc<dyn PredictionService>, sink: Arc<dyn DownloadSink>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut state = FormState::default();
        state.clear_selection();
        Arc::new(Self {
            service,
            sink,
            state: Mutex::new(state),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.lock_state().snapshot()
    }

    pub fn select_file(&self, candidate: Option<FileHandle>) -> SelectOutcome {
        let (outcome, snapshot) = {
            let mut state = self.lock_state();
            if state.busy {
                debug!("file picker is disabled while a submission is in flight");
                return SelectOutcome::Ignored;
            }

            let outcome = match candidate {
                None => {
                    state.clear_selection();
                    SelectOutcome::Cleared
                }
                Some(file) if !is_allowed_file_name(file.name()) => {
                    debug!(file_name = file.name(), "rejected file with unsupported extension");
                    state.clear_selection();
                    SelectOutcome::Rejected
                }
                Some(file) => {
                    state.label = file.name().to_string();
                    state.selected = Some(file);
                    SelectOutcome::Accepted
                }
            };
            (outcome, state.snapshot())
        };

        if outcome == SelectOutcome::Rejected {
            self.notify(FailureKind::Validation);
        }
        self.emit(FormEvent::StateChanged(snapshot));
        outcome
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let (file, snapshot) = {
            let mut state = self.lock_state();
            if state.busy {
                debug!("submit is unavailable while a submission is in flight");
                return SubmitOutcome::Ignored;
            }
            let Some(file) = state.selected.clone() else {
                drop(state);
                self.notify(FailureKind::Precondition);
                return SubmitOutcome::MissingFile;
            };
            state.busy = true;
            (file, state.snapshot())
        };
        let _busy = BusyGuard { form: self };
        self.emit(FormEvent::StateChanged(snapshot));

        info!(file_name = file.name(), "submitting file for prediction");
        match self.run_submission(&file).await {
            Ok((path, size_bytes)) => {
                info!(
                    size_bytes,
                    path = ?path,
                    "prediction archive delivered"
                );
                SubmitOutcome::Delivered { path, size_bytes }
            }
            Err(err) => {
                warn!(file_name = file.name(), "submission failed: {err}");
                self.notify(FailureKind::Transport);
                SubmitOutcome::Failed
            }
        }
    }

    async fn run_submission(
        &self,
        file: &FileHandle,
    ) -> Result<(Option<PathBuf>, usize), SubmitError> {
        let contents = file.read().await.map_err(SubmitError::ReadFile)?;
        let archive = self
            .service
            .predict(file.name(), contents)
            .await
            .map_err(SubmitError::Prediction)?;
        let path = self
            .sink
            .deliver(RESULT_ARCHIVE_NAME, &archive)
            .await
            .map_err(SubmitError::Delivery)?;
        Ok((path, archive.len()))
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, kind: FailureKind) {
        self.emit(FormEvent::Notification(kind.into()));
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
