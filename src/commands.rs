// Tauri command layer: thin adapters between the window and the engine.

use std::path::PathBuf;

use serde::Serialize;
use tauri::Emitter;

use crate::downloader::progress::{ProgressSink, ProgressUpdate};
use crate::downloader::tools::{self, ToolStatus};
use crate::downloader::utils;
use crate::downloader::{
    DownloadBackend, DownloadOutcome, DownloadRequest, FormatPreset, VideoInfo, YtDlpEngine,
};

/// Payload of the `download-progress` event consumed by the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub percent: f32,
    pub status: String,
}

/// Sink that forwards engine progress to the window.
struct EventSink {
    app: tauri::AppHandle,
}

impl ProgressSink for EventSink {
    fn update(&self, update: ProgressUpdate) {
        let _ = self.app.emit(
            "download-progress",
            ProgressEvent {
                percent: update.percent(),
                status: update.status_line(),
            },
        );
    }
}

/// Preset labels in UI order; the first is the default.
#[tauri::command]
pub fn list_formats() -> Vec<&'static str> {
    FormatPreset::labels()
}

#[tauri::command]
pub fn default_output_dir() -> String {
    utils::default_output_dir().to_string_lossy().to_string()
}

#[tauri::command]
pub async fn probe_tools() -> Vec<ToolStatus> {
    tools::probe_all()
}

#[tauri::command]
pub async fn fetch_info(url: String) -> Result<VideoInfo, String> {
    let engine = YtDlpEngine::new();
    engine.fetch_info(url.trim()).await.map_err(|e| e.to_string())
}

/// Run one download off the event loop, streaming progress events back to
/// the window. Errors are returned as user-facing strings.
#[tauri::command]
pub async fn start_download(
    url: String,
    format_label: String,
    output_dir: Option<String>,
    app: tauri::AppHandle,
) -> Result<DownloadOutcome, String> {
    let preset = FormatPreset::from_label(&format_label);
    let dir = output_dir
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .map(PathBuf::from);
    let request = DownloadRequest::new(url, preset, dir);

    log::info!("[gui] download requested: {} ({})", request.url, preset.label());

    let engine = YtDlpEngine::new();
    let sink = EventSink { app };
    engine
        .download(&request, &sink)
        .await
        .map_err(|e| e.to_string())
}
