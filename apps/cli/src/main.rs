use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    archive::{self, ArchiveEntry},
    config::{load_settings, normalize_api_url},
    DirectorySink, FileHandle, FormEvent, HttpPredictionService, SelectOutcome, SubmitOutcome,
    UploadForm,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

/// Upload an .xlsx spreadsheet for price prediction and save the returned archive.
#[derive(Parser, Debug)]
#[command(name = "predict")]
struct Args {
    /// Spreadsheet to upload.
    file: PathBuf,
    /// Prediction service base URL. Overrides predict.toml and PREDICT_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Directory resultado.zip is written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings();
    let api_url = normalize_api_url(args.api_url.as_deref().unwrap_or(&settings.api_url))?;
    let output_dir = args.output_dir.unwrap_or(settings.output_dir);
    info!(%api_url, output_dir = %output_dir.display(), "prediction client configured");

    let form = UploadForm::new(
        Arc::new(HttpPredictionService::new(api_url)),
        Arc::new(DirectorySink::new(output_dir)),
    );
    let mut events = form.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(FormEvent::Notification(notification)) => {
                    eprintln!("{}: {}", notification.severity, notification.message);
                }
                Ok(FormEvent::StateChanged(_)) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = upload(&form, &args.file).await;
    // Closing the form's event channel lets the printer drain and exit.
    drop(form);
    let _ = printer.await;

    let Some((path, size_bytes)) = result? else {
        println!("archive was not saved");
        return Ok(());
    };
    let entries = archive::summarize_file(&path);
    for line in summary_lines(&path, size_bytes, &entries) {
        println!("{line}");
    }
    Ok(())
}

async fn upload(form: &UploadForm, file: &Path) -> Result<Option<(PathBuf, usize)>> {
    if form.select_file(Some(FileHandle::from_path(file))) == SelectOutcome::Rejected {
        bail!("'{}' is not an .xlsx file", file.display());
    }

    match form.submit().await {
        SubmitOutcome::Delivered { path, size_bytes } => {
            Ok(path.map(|path| (path, size_bytes)))
        }
        SubmitOutcome::MissingFile | SubmitOutcome::Ignored => {
            bail!("no file was submitted")
        }
        SubmitOutcome::Failed => bail!("prediction failed for '{}'", file.display()),
    }
}

fn summary_lines(path: &Path, size_bytes: usize, entries: &[ArchiveEntry]) -> Vec<String> {
    let mut lines = vec![format!("saved {} ({size_bytes} bytes)", path.display())];
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("  {} ({} bytes)", entry.name, entry.size_bytes)),
    );
    lines
}
