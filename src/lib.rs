mod cli;
mod commands;
pub mod downloader;

use downloader::tools::{self, Tool};

use commands::{default_output_dir, fetch_info, list_formats, probe_tools, start_download};

/// Entry point shared by the binary and the mobile shell. `--cli` selects
/// the terminal prompt loop; the default is the Tauri window.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if !tools::is_available(Tool::YtDlp) {
        log::error!("yt-dlp was not found. Install it and make sure it is on your PATH.");
    }
    if !tools::is_available(Tool::Ffmpeg) {
        log::warn!("FFmpeg is not installed or not in PATH.");
        log::warn!("Audio extraction (MP3) will be unavailable until FFmpeg is installed.");
    }

    if std::env::args().any(|arg| arg == "--cli") {
        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
        let code = runtime.block_on(cli::run());
        std::process::exit(code);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            list_formats,
            default_output_dir,
            probe_tools,
            fetch_info,
            start_download,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
