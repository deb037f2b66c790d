// Error types for the download engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Rejected before any external process is spawned.
    #[error("URL cannot be empty")]
    EmptyUrl,

    /// The MP3 preset was chosen but the ffmpeg probe failed.
    #[error(
        "FFmpeg is required for audio extraction. \
         Please install FFmpeg and add it to your PATH."
    )]
    TranscoderMissing,

    /// yt-dlp itself could not be found or spawned.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Engine failure whose text mentions the transcoder.
    #[error("FFmpeg error: {0}\nPlease install FFmpeg from https://ffmpeg.org/download.html")]
    Transcoder(String),

    /// Engine failure surfaced verbatim to the user.
    #[error("Download error: {0}")]
    Download(String),

    /// yt-dlp metadata output could not be parsed.
    #[error("Failed to parse yt-dlp output: {0}")]
    Parse(String),

    /// Bounded external call did not finish in time.
    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Translate a failed yt-dlp run into a user-facing error.
///
/// Failures that mention the transcoder get the install hint; everything
/// else is surfaced verbatim.
pub fn classify_engine_failure(stderr: &str) -> DownloadError {
    let message = condense_stderr(stderr);
    let lower = message.to_lowercase();
    if lower.contains("ffmpeg") || lower.contains("postprocess") {
        DownloadError::Transcoder(message)
    } else {
        DownloadError::Download(message)
    }
}

/// Keep the ERROR lines if yt-dlp printed any, otherwise the whole output.
fn condense_stderr(stderr: &str) -> String {
    let error_lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();

    if error_lines.is_empty() {
        stderr.trim().to_string()
    } else {
        error_lines.join("\n")
    }
}
