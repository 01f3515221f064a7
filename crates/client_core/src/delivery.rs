use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tempfile::NamedTempFile;

/// Hands the result archive to the user.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Returns where the bytes ended up, or `None` if the user declined to save them.
    async fn deliver(&self, file_name: &str, contents: &[u8]) -> Result<Option<PathBuf>>;
}

/// Saves archives into a fixed directory, replacing any previous file of the
/// same name.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, file_name: &str, contents: &[u8]) -> Result<Option<PathBuf>> {
        let dir = self.dir.clone();
        let target = dir.join(file_name);
        let contents = contents.to_vec();
        let saved = tokio::task::spawn_blocking(move || write_via_staging(&dir, &target, &contents))
            .await
            .context("archive writer task failed")??;
        Ok(Some(saved))
    }
}

// The staging file is removed on drop unless it was persisted.
fn write_via_staging(dir: &Path, target: &Path, contents: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage archive in '{}'", dir.display()))?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged
        .persist(target)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to save archive to '{}'", target.display()))?;
    Ok(target.to_path_buf())
}
