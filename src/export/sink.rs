use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for exported files
///
/// Exports are produced in memory first; a sink keeps an extra copy of what
/// was produced (the server writes them next to its other recordings).
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `name`, replacing any previous artifact of that name
    fn persist(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Get sink name for logging
    fn name(&self) -> &str;
}

/// Writes artifacts as flat files in one directory
///
/// Names are deterministic, so concurrent exports with the same gap or index
/// overwrite each other.
pub struct DirectorySink {
    dir: PathBuf,
    label: String,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        // Create output directory if it doesn't exist
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        info!("Persisting exports to {}", dir.display());

        let label = format!("directory:{}", dir.display());
        Ok(Self { dir, label })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn persist(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}
