//! Runtime bridge between UI command queue and the upload form controller.

use std::{sync::Arc, thread};

use client_core::{
    archive, FileHandle, FormEvent, HttpPredictionService, SubmitOutcome, UploadForm,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::backend_bridge::{
    commands::BackendCommand,
    save_dialog::{SaveDialogSink, SaveRequest},
};
use crate::controller::events::{SubmitReport, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    save_tx: Sender<SaveRequest>,
    api_url: String,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let form = UploadForm::new(
                Arc::new(HttpPredictionService::new(api_url.clone())),
                Arc::new(SaveDialogSink::new(save_tx)),
            );
            let mut events = form.subscribe_events();
            tracing::info!(%api_url, "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::BackendReady);

            // The loop is sequential: while a submission is awaited, further
            // commands wait in the queue and the form ignores them once run.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SelectFile { path } => {
                        form.select_file(path.map(FileHandle::from_path));
                        forward_pending(&mut events, &ui_tx);
                    }
                    BackendCommand::Submit => submit_and_report(&form, &mut events, &ui_tx).await,
                }
            }
        });
    });
}

/// Runs one submission, forwarding form events while it is in flight.
/// `SubmitFinished` is sent only after every event the submission emitted.
async fn submit_and_report(
    form: &UploadForm,
    events: &mut broadcast::Receiver<FormEvent>,
    ui_tx: &Sender<UiEvent>,
) {
    let submission = form.submit();
    tokio::pin!(submission);
    let outcome = loop {
        tokio::select! {
            biased;
            received = events.recv() => match received {
                Ok(event) => forward(event, ui_tx),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "form event forwarder lagged");
                }
                Err(RecvError::Closed) => {}
            },
            outcome = &mut submission => break outcome,
        }
    };
    forward_pending(events, ui_tx);
    let _ = ui_tx.try_send(UiEvent::SubmitFinished(report_for(outcome)));
}

fn forward_pending(events: &mut broadcast::Receiver<FormEvent>, ui_tx: &Sender<UiEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => forward(event, ui_tx),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "form event forwarder lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn forward(event: FormEvent, ui_tx: &Sender<UiEvent>) {
    if ui_tx.try_send(UiEvent::Form(event)).is_err() {
        tracing::warn!("ui event queue unavailable; dropping form event");
    }
}

fn report_for(outcome: SubmitOutcome) -> SubmitReport {
    match outcome {
        SubmitOutcome::Delivered {
            path: Some(path), ..
        } => {
            let entries = archive::summarize_file(&path);
            SubmitReport {
                saved_to: Some(path),
                entries,
            }
        }
        _ => SubmitReport::default(),
    }
}
