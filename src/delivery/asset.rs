//! The distributable application archive.

use std::path::{Path, PathBuf};

use crate::core::error::AppResult;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// The archive served by /download.
///
/// Availability is decided once at startup; a file deleted afterwards
/// surfaces as a request-time send failure, not as a flag change.
#[derive(Debug)]
pub struct Asset {
    path: PathBuf,
    available: bool,
    size_bytes: u64,
}

impl Asset {
    /// Probes `path` once and records whether the archive exists.
    pub fn probe(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match fs_err::metadata(&path) {
            Ok(meta) => {
                let size_bytes = meta.len();
                log::info!(
                    "application archive found at {} ({:.2} MB)",
                    path.display(),
                    size_bytes as f64 / BYTES_PER_MB
                );
                Self {
                    path,
                    available: true,
                    size_bytes,
                }
            }
            Err(e) => {
                log::warn!("application archive not found at {}: {}", path.display(), e);
                log::info!("the bot will run, but /download is unavailable");
                Self {
                    path,
                    available: false,
                    size_bytes: 0,
                }
            }
        }
    }

    pub fn available(&self) -> bool {
        self.available
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size recorded at startup, in megabytes.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// Current on-disk size in megabytes. Errors if the file vanished
    /// after startup.
    pub fn current_size_mb(&self) -> AppResult<f64> {
        let meta = fs_err::metadata(&self.path)?;
        Ok(meta.len() as f64 / BYTES_PER_MB)
    }
}
