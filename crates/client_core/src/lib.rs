//! Client side of the prediction upload flow: validate a spreadsheet, post it
//! to the prediction service and hand the returned archive to the user.

pub mod archive;
pub mod config;
pub mod delivery;
pub mod form;
pub mod transport;

pub use delivery::{DirectorySink, DownloadSink};
pub use form::{FileHandle, FormEvent, FormSnapshot, SelectOutcome, SubmitOutcome, UploadForm};
pub use transport::{HttpPredictionService, PredictionService};
