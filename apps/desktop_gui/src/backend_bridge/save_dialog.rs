use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use client_core::DownloadSink;
use crossbeam_channel::Sender;
use tokio::sync::oneshot;

/// A request for the UI thread to ask where the archive goes. The reply is
/// `None` when the user dismissed the dialog.
#[derive(Debug)]
pub struct SaveRequest {
    pub file_name: String,
    pub reply: oneshot::Sender<Option<PathBuf>>,
}

/// Delivers the archive to a path the user picks in a native save dialog.
/// Native dialogs must run on the UI thread, so the prompt is delegated there.
pub struct SaveDialogSink {
    requests: Sender<SaveRequest>,
}

impl SaveDialogSink {
    pub fn new(requests: Sender<SaveRequest>) -> Self {
        Self { requests }
    }
}

#[async_trait]
impl DownloadSink for SaveDialogSink {
    async fn deliver(&self, file_name: &str, contents: &[u8]) -> Result<Option<PathBuf>> {
        let (reply, chosen) = oneshot::channel();
        self.requests
            .try_send(SaveRequest {
                file_name: file_name.to_string(),
                reply,
            })
            .map_err(|_| anyhow!("ui is not accepting save requests"))?;
        let chosen = chosen
            .await
            .context("save prompt closed without an answer")?;

        let Some(path) = chosen else {
            tracing::info!("save dialog dismissed; archive discarded");
            return Ok(None);
        };
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("failed to save archive to '{}'", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crossbeam_channel::{bounded, Receiver};

    use super::*;

    fn answer_with(
        requests: Receiver<SaveRequest>,
        answer: Option<PathBuf>,
    ) -> thread::JoinHandle<String> {
        thread::spawn(move || {
            let request = requests.recv().expect("save request");
            let _ = request.reply.send(answer);
            request.file_name
        })
    }

    #[tokio::test]
    async fn writes_archive_where_the_user_chose() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("chosen.zip");
        let (tx, rx) = bounded(1);
        let ui = answer_with(rx, Some(target.clone()));

        let saved = SaveDialogSink::new(tx)
            .deliver("resultado.zip", b"PK\x03\x04")
            .await
            .expect("deliver");

        assert_eq!(ui.join().expect("ui thread"), "resultado.zip");
        assert_eq!(saved, Some(target.clone()));
        assert_eq!(std::fs::read(&target).expect("read back"), b"PK\x03\x04");
    }

    #[tokio::test]
    async fn dismissed_dialog_discards_archive_without_error() {
        let (tx, rx) = bounded(1);
        let ui = answer_with(rx, None);

        let saved = SaveDialogSink::new(tx)
            .deliver("resultado.zip", b"bytes")
            .await
            .expect("deliver");

        ui.join().expect("ui thread");
        assert_eq!(saved, None);
    }

    #[tokio::test]
    async fn closed_ui_is_a_delivery_failure() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert!(SaveDialogSink::new(tx)
            .deliver("resultado.zip", b"bytes")
            .await
            .is_err());

        let (tx, rx) = bounded::<SaveRequest>(1);
        let ui = thread::spawn(move || drop(rx.recv().expect("save request")));
        assert!(SaveDialogSink::new(tx)
            .deliver("resultado.zip", b"bytes")
            .await
            .is_err());
        ui.join().expect("ui thread");
    }
}
