//! Durable, atomic publication of rendered zone text.

use std::path::{Path, PathBuf};

use tokio::fs;

/// Publishes zone text to a fixed path with atomic-replace semantics.
///
/// The text is written to a sibling temp file and renamed over the target,
/// so a concurrent reader sees either the previous zone or the new one in
/// full, never a truncated file.
#[derive(Debug, Clone)]
pub struct ZoneWriter {
    path: PathBuf,
}

impl ZoneWriter {
    /// Create a writer publishing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The publication target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `text` to the target path atomically.
    pub async fn publish(&self, text: &str) -> std::io::Result<()> {
        // Sibling path, so the rename stays on one filesystem.
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
