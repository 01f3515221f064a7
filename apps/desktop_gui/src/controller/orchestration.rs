//! Command orchestration helpers from UI actions to backend command queue.

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{Notification, Severity};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::FormView;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    view: &mut FormView,
) {
    let cmd_name = cmd.name();
    let is_submit = matches!(cmd, BackendCommand::Submit);

    let failure = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            if is_submit {
                view.mark_submit_requested();
            }
            return;
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure); restart the app"
        }
    };
    tracing::warn!(command = cmd_name, "{failure}");
    view.status = failure.to_string();
    view.push_toast(Notification::new(Severity::Error, failure), Instant::now());
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queued_submit_marks_view_pending() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut view = FormView::default();

        dispatch_backend_command(&cmd_tx, BackendCommand::Submit, &mut view);

        assert!(view.submit_pending);
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::Submit)));
    }

    #[test]
    fn full_queue_reports_and_leaves_submit_available() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut view = FormView::default();
        dispatch_backend_command(&cmd_tx, BackendCommand::SelectFile { path: None }, &mut view);

        dispatch_backend_command(&cmd_tx, BackendCommand::Submit, &mut view);

        assert!(!view.submit_pending);
        assert!(view.status.contains("queue is full"));
        assert_eq!(view.toasts.len(), 1);
    }

    #[test]
    fn disconnected_backend_is_reported() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        let mut view = FormView::default();

        dispatch_backend_command(&cmd_tx, BackendCommand::Submit, &mut view);

        assert!(view.status.contains("disconnected"));
    }
}
