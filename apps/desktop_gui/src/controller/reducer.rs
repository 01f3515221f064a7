//! Folds backend events into the state the form renders from.

use std::time::{Duration, Instant};

use client_core::{FormEvent, FormSnapshot};
use shared::domain::{Notification, Severity};

use crate::controller::events::UiEvent;

pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct FormView {
    pub form: FormSnapshot,
    pub backend_ready: bool,
    /// Submit was queued but the backend has not reported it yet.
    pub submit_pending: bool,
    pub toasts: Vec<Toast>,
    pub status: String,
}

impl Default for FormView {
    fn default() -> Self {
        Self {
            form: FormSnapshot::default(),
            backend_ready: false,
            submit_pending: false,
            toasts: Vec::new(),
            status: "Starting backend worker...".to_string(),
        }
    }
}

impl FormView {
    pub fn is_processing(&self) -> bool {
        self.submit_pending || self.form.busy
    }

    pub fn can_submit(&self) -> bool {
        self.backend_ready && !self.submit_pending && self.form.can_submit()
    }

    pub fn picker_enabled(&self) -> bool {
        self.backend_ready && !self.submit_pending && self.form.picker_enabled()
    }

    pub fn mark_submit_requested(&mut self) {
        self.submit_pending = true;
    }

    pub fn push_toast(&mut self, notification: Notification, now: Instant) {
        self.toasts.push(Toast {
            notification,
            expires_at: now + TOAST_TTL,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::BackendReady => {
                self.backend_ready = true;
                self.status = "Ready".to_string();
            }
            UiEvent::BackendFailed(message) => {
                self.backend_ready = false;
                self.submit_pending = false;
                self.status = message.clone();
                self.push_toast(Notification::new(Severity::Error, message), now);
            }
            UiEvent::Form(FormEvent::StateChanged(snapshot)) => {
                if snapshot.busy {
                    self.submit_pending = false;
                }
                self.form = snapshot;
            }
            UiEvent::Form(FormEvent::Notification(notification)) => {
                self.push_toast(notification, now);
            }
            UiEvent::SubmitFinished(report) => {
                self.submit_pending = false;
                if let Some(line) = report.status_line() {
                    self.status = line;
                }
            }
        }
    }
}
