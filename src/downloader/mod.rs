// Downloader core: preset formats, option building, tool probes and the
// progress adapter around the external yt-dlp / ffmpeg binaries.

pub mod engine;
pub mod errors;
pub mod formats;
pub mod models;
pub mod progress;
pub mod tools;
pub mod utils;

pub use engine::{DownloadBackend, YtDlpEngine};
pub use errors::DownloadError;
pub use formats::FormatPreset;
pub use models::{DownloadOutcome, DownloadRequest, VideoInfo};
pub use progress::{ProgressSink, ProgressUpdate};
