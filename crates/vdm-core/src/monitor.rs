//! Download progress as a pure function of a filesystem snapshot.
//!
//! The download directory is written by the external browser download
//! agent; this module only ever reads sizes and modification times. While a
//! transfer is running the agent keeps an interim file with a provider
//! suffix (Chrome: `.crdownload`); on completion it renames to the final
//! filename.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};

/// Default interim-file suffix used by Chrome's download agent.
pub const DEFAULT_TEMP_SUFFIX: &str = ".crdownload";

/// The one download this session is waiting on: where the agent writes,
/// what the final file is called, and how big it must get.
#[derive(Debug, Clone)]
pub struct ExpectedDownload {
    pub dir: PathBuf,
    pub filename: String,
    pub expected_bytes: u64,
    pub temp_suffix: String,
}

impl ExpectedDownload {
    pub fn progress(&self) -> Result<f64> {
        progress(&self.dir, &self.filename, self.expected_bytes, &self.temp_suffix)
    }

    pub fn is_complete(&self) -> Result<bool> {
        is_complete(&self.dir, &self.filename, self.expected_bytes)
    }

    pub fn final_path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// One filesystem snapshot of an expected download. Transient, recomputed
/// each poll, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadState {
    pub bytes_written: u64,
    pub expected_bytes: u64,
    /// True when the bytes were read from the final file rather than an
    /// interim one.
    pub finalized: bool,
}

impl DownloadState {
    /// Percent complete in [0, 100].
    ///
    /// An in-progress file is capped at 99.99 so it is never reported as
    /// finished, even if it transiently reaches full size.
    pub fn percent(&self) -> f64 {
        if self.finalized {
            if self.bytes_written >= self.expected_bytes {
                return 100.0;
            }
            return 0.0;
        }
        (self.bytes_written as f64 / self.expected_bytes as f64 * 100.0).min(99.99)
    }
}

/// Snapshot the download directory for `filename`.
///
/// Prefers the most-recently-modified interim file; falls back to the
/// final file. `expected_bytes` must be positive: it always comes from a
/// parsed catalog size, never operator input.
pub fn snapshot(
    dir: &Path,
    filename: &str,
    expected_bytes: u64,
    temp_suffix: &str,
) -> Result<Option<DownloadState>> {
    if expected_bytes == 0 {
        bail!("expected download size must be positive");
    }

    if let Some(temp) = newest_temp_file(dir, temp_suffix)? {
        let bytes = fs::metadata(&temp)
            .with_context(|| format!("stat {}", temp.display()))?
            .len();
        return Ok(Some(DownloadState {
            bytes_written: bytes,
            expected_bytes,
            finalized: false,
        }));
    }

    let final_path = dir.join(filename);
    match fs::metadata(&final_path) {
        Ok(meta) => Ok(Some(DownloadState {
            bytes_written: meta.len(),
            expected_bytes,
            finalized: true,
        })),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("stat {}", final_path.display())),
    }
}

/// Percent complete in [0, 100]; 0 when neither an interim nor a final
/// file exists yet.
pub fn progress(dir: &Path, filename: &str, expected_bytes: u64, temp_suffix: &str) -> Result<f64> {
    Ok(snapshot(dir, filename, expected_bytes, temp_suffix)?
        .map(|s| s.percent())
        .unwrap_or(0.0))
}

/// True iff the final file exists and has reached the expected size.
pub fn is_complete(dir: &Path, filename: &str, expected_bytes: u64) -> Result<bool> {
    if expected_bytes == 0 {
        bail!("expected download size must be positive");
    }
    match fs::metadata(dir.join(filename)) {
        Ok(meta) => Ok(meta.len() >= expected_bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Most-recently-modified file in `dir` ending with `suffix`, if any.
fn newest_temp_file(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read dir {}", dir.display())),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.ends_with(suffix) {
            continue;
        }
        let mtime = entry
            .metadata()?
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().map(|(t, _)| mtime > *t).unwrap_or(true) {
            newest = Some((mtime, entry.path()));
        }
    }
    Ok(newest.map(|(_, path)| path))
}
