use crate::domain::Severity;

/// Every way a form interaction can go wrong, as far as the user is told.
///
/// Transport covers network errors, non-success statuses and failed
/// deliveries alike; the user is never told which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Precondition,
    Transport,
}

impl FailureKind {
    pub fn severity(self) -> Severity {
        match self {
            FailureKind::Validation | FailureKind::Transport => Severity::Error,
            FailureKind::Precondition => Severity::Warning,
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Validation => "invalid format, send an .xlsx file",
            FailureKind::Precondition => "select a file first",
            FailureKind::Transport => "failed to process the file; check the format and retry",
        }
    }
}
