// yt-dlp engine: builds the argument vector for a request, spawns the
// binary, and streams progress back through a ProgressSink.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use super::errors::{classify_engine_failure, DownloadError};
use super::models::{DownloadOutcome, DownloadRequest, VideoInfo};
use super::progress::{parse_progress_line, ProgressSink, ProgressUpdate};
use super::tools::{self, Tool};
use super::utils::run_output_with_timeout;

const INFO_TIMEOUT_SECS: u64 = 30;

/// Seam between the shells and the external download engine. Both the GUI
/// commands and the CLI loop go through this; tests substitute a mock.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch metadata without downloading.
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DownloadError>;

    /// Run the download, reporting progress to `sink`.
    async fn download(
        &self,
        request: &DownloadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError>;
}

/// Engine driving the native `yt-dlp` binary.
pub struct YtDlpEngine {
    ytdlp_path: String,
    ffmpeg_available: bool,
}

impl YtDlpEngine {
    pub fn new() -> Self {
        Self {
            ytdlp_path: tools::resolve(Tool::YtDlp),
            ffmpeg_available: tools::is_available(Tool::Ffmpeg),
        }
    }

    /// Constructor with explicit tool state, for tests.
    #[cfg(test)]
    fn with_tools(ytdlp_path: &str, ffmpeg_available: bool) -> Self {
        Self {
            ytdlp_path: ytdlp_path.to_string(),
            ffmpeg_available,
        }
    }

    /// Build the yt-dlp argument vector for a request.
    ///
    /// The MP3 preset requires ffmpeg for its post-processing step; when
    /// the transcoder probe failed, the request is rejected here, before
    /// anything is spawned, with the documented warning.
    fn build_download_args(&self, request: &DownloadRequest) -> Result<Vec<String>, DownloadError> {
        if request.preset.needs_transcoder() && !self.ffmpeg_available {
            return Err(DownloadError::TranscoderMissing);
        }

        let mut args = vec![
            "-f".to_string(),
            request.preset.selector().to_string(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "-P".to_string(),
            request.output_dir.to_string_lossy().to_string(),
            // Default yt-dlp template appends " [id]" to the title
            "-o".to_string(),
            "%(title)s.%(ext)s".to_string(),
        ];

        if request.preset.needs_transcoder() {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
                "--audio-quality".to_string(),
                "192K".to_string(),
            ]);
        }

        args.push(request.url.clone());
        Ok(args)
    }
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadBackend for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DownloadError> {
        let args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];

        let output = run_output_with_timeout(&self.ytdlp_path, &args, INFO_TIMEOUT_SECS).await?;
        if !output.status.success() {
            return Err(classify_engine_failure(&String::from_utf8_lossy(
                &output.stderr,
            )));
        }

        parse_video_info(&output.stdout)
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        request.validate()?;
        let args = self.build_download_args(request)?;

        // Availability check before the transfer, and the source of the
        // title for the result record.
        let info = self.fetch_info(&request.url).await?;
        log::info!("[engine] downloading \"{}\" as {}", info.title, request.preset.label());

        let mut child = TokioCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DownloadError::ToolNotFound(format!("yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Download("failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Download("failed to capture stderr".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let mut reader = BufReader::new(stderr);
            let _ = reader.read_to_string(&mut buf).await;
            buf
        });

        // Track the engine's destination lines; post-processing stages
        // (audio extraction) overwrite earlier ones.
        let mut destination: Option<PathBuf> = None;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(update) = parse_progress_line(&line) {
                if let ProgressUpdate::Started { file } = &update {
                    destination = Some(PathBuf::from(file));
                }
                sink.update(update);
            }
            log::debug!("[yt-dlp] {}", line);
        }

        let status = child.wait().await?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(classify_engine_failure(&stderr_text));
        }

        let file_path = destination.unwrap_or_else(|| {
            let ext = if request.preset.needs_transcoder() {
                "mp3"
            } else {
                &info.ext
            };
            request.output_dir.join(format!("{}.{}", info.title, ext))
        });

        sink.update(ProgressUpdate::Finished {
            file: Some(file_path.to_string_lossy().to_string()),
        });

        Ok(DownloadOutcome {
            title: info.title,
            output_dir: request.output_dir.clone(),
            file_path,
            format_label: request.preset.label().to_string(),
        })
    }
}

/// Parse `--dump-json` output into the fields the shells display.
fn parse_video_info(stdout: &[u8]) -> Result<VideoInfo, DownloadError> {
    let json: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| DownloadError::Parse(e.to_string()))?;

    let duration_secs = json["duration"].as_f64().unwrap_or(0.0) as i64;
    let duration = format!("{}:{:02}", duration_secs / 60, duration_secs % 60);

    Ok(VideoInfo {
        title: json["title"].as_str().unwrap_or("Unknown").to_string(),
        ext: json["ext"].as_str().unwrap_or("mp4").to_string(),
        uploader: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
        duration,
    })
}
