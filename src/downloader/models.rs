// Common data models for the downloader

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::formats::FormatPreset;
use super::utils::default_output_dir;

/// Everything needed for one download invocation.
///
/// Fields are transient and re-entered per invocation; nothing here is
/// persisted between runs.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub preset: FormatPreset,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    /// Build a request; a missing output directory falls back to the
    /// platform downloads folder.
    pub fn new(url: impl Into<String>, preset: FormatPreset, output_dir: Option<PathBuf>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            preset,
            output_dir: output_dir.unwrap_or_else(default_output_dir),
        }
    }

    /// Pre-flight validation, run before any external process is spawned.
    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.url.is_empty() {
            return Err(DownloadError::EmptyUrl);
        }
        Ok(())
    }
}

/// Metadata parsed from `yt-dlp --dump-json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub ext: String,
    pub uploader: String,
    pub duration: String,
}

/// Result record handed back to the shells after a successful download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub title: String,
    pub output_dir: PathBuf,
    pub file_path: PathBuf,
    pub format_label: String,
}
