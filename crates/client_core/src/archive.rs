//! Read-only listing of a delivered result archive.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use tracing::debug;
use zip::ZipArchive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// Lists a saved archive. Anything that is not a readable zip yields an empty
/// listing; the file itself is left untouched.
pub fn summarize_file(path: &Path) -> Vec<ArchiveEntry> {
    let listing = File::open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))
        .and_then(|file| ZipArchive::new(file).context("not a zip archive"))
        .and_then(collect_entries);
    match listing {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %path.display(), "skipping archive listing: {err:#}");
            Vec::new()
        }
    }
}

fn collect_entries<R>(mut archive: ZipArchive<R>) -> Result<Vec<ArchiveEntry>>
where
    R: std::io::Read + std::io::Seek,
{
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .with_context(|| format!("failed to read archive entry {index}"))?;
        if entry.is_dir() {
            continue;
        }
        entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            size_bytes: entry.size(),
        });
    }
    Ok(entries)
}
