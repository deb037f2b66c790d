// Terminal shell: line prompts instead of the window, same engine.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::downloader::progress::{ProgressSink, ProgressUpdate};
use crate::downloader::tools::{self, Tool};
use crate::downloader::utils::default_output_dir;
use crate::downloader::{DownloadBackend, DownloadRequest, FormatPreset, YtDlpEngine};

/// Sink that rewrites a single status line on stdout.
struct TerminalSink;

impl ProgressSink for TerminalSink {
    fn update(&self, update: ProgressUpdate) {
        match &update {
            ProgressUpdate::Downloading { .. } => {
                print!("\r{}        ", update.status_line());
                let _ = io::stdout().flush();
            }
            _ => println!("\n{}", update.status_line()),
        }
    }
}

fn prompt(question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Interactive prompt loop. Returns a process exit code.
pub async fn run() -> i32 {
    println!("===== Video Downloader (CLI) =====\n");

    if !tools::is_available(Tool::Ffmpeg) {
        println!("Warning: FFmpeg is not installed or not in PATH.");
        println!("Audio extraction (MP3) will not work until you install it.\n");
    }

    let url = match prompt("Enter video URL: ") {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: failed to read input: {}", e);
            return 1;
        }
    };
    if url.is_empty() {
        eprintln!("Error: URL cannot be empty");
        return 1;
    }

    println!("\nAvailable formats:");
    let labels = FormatPreset::labels();
    for (i, label) in labels.iter().enumerate() {
        println!("{}. {}", i + 1, label);
    }

    let preset = match prompt("\nSelect format (number): ") {
        Ok(choice) => match choice.parse::<usize>() {
            Ok(n) if (1..=labels.len()).contains(&n) => FormatPreset::ALL[n - 1],
            _ => {
                println!("Invalid choice. Using default format.");
                FormatPreset::default()
            }
        },
        Err(_) => {
            println!("Invalid choice. Using default format.");
            FormatPreset::default()
        }
    };

    let default_dir = default_output_dir();
    let output_dir = match prompt(&format!(
        "\nOutput directory (default: {}): ",
        default_dir.display()
    )) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => None,
    };

    let request = DownloadRequest::new(url, preset, output_dir);
    println!("\nDownloading {} in {} format...", request.url, preset.label());

    let engine = YtDlpEngine::new();
    match engine.download(&request, &TerminalSink).await {
        Ok(outcome) => {
            println!("\nDownload successful!");
            println!("Title: {}", outcome.title);
            println!("Saved to: {}", outcome.output_dir.display());
            0
        }
        Err(e) => {
            eprintln!("\nDownload failed: {}", e);
            1
        }
    }
}
