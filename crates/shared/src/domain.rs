use std::fmt;

use crate::error::FailureKind;

/// Spreadsheet extensions the prediction service accepts, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx"];

/// Label shown while no file is selected.
pub const NO_FILE_SELECTED: &str = "No file selected";

/// Returns the lowercased substring after the last `.` of `name`.
///
/// Names without any `.` have no extension. A trailing dot yields an empty
/// extension, which is never allowed.
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
}

/// Extension-only check. File contents and MIME type are not inspected.
pub fn is_allowed_file_name(name: &str) -> bool {
    match file_extension(name) {
        Some(extension) => ALLOWED_EXTENSIONS.contains(&extension.as_str()),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Transient, user-facing message. How it is rendered is up to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl From<FailureKind> for Notification {
    fn from(kind: FailureKind) -> Self {
        Self::new(kind.severity(), kind.user_message())
    }
}
