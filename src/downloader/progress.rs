// Progress adapter: parses yt-dlp `--newline` output and fans updates out
// to whichever shell is listening.

use lazy_static::lazy_static;
use regex::Regex;

/// One progress update from the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// yt-dlp announced its destination file.
    Started { file: String },
    /// Transfer in progress.
    Downloading {
        percent: f32,
        size: String,
        speed: String,
        eta: Option<String>,
    },
    /// Post-processing (merging streams or extracting audio).
    Processing,
    /// The file was already present.
    AlreadyDone,
    /// Transfer finished; post-processing may still follow.
    Finished { file: Option<String> },
}

impl ProgressUpdate {
    /// Progress-bar value for this update.
    pub fn percent(&self) -> f32 {
        match self {
            ProgressUpdate::Started { .. } => 0.0,
            ProgressUpdate::Downloading { percent, .. } => *percent,
            ProgressUpdate::Processing => 99.0,
            ProgressUpdate::AlreadyDone | ProgressUpdate::Finished { .. } => 100.0,
        }
    }

    /// Single-line status shared by the GUI status label and the CLI
    /// progress line.
    pub fn status_line(&self) -> String {
        match self {
            ProgressUpdate::Started { file } => {
                let short: String = file
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(file)
                    .chars()
                    .take(60)
                    .collect();
                format!("Starting: {}", short)
            }
            ProgressUpdate::Downloading {
                percent,
                size,
                speed,
                eta,
            } => match eta {
                Some(eta) => {
                    format!("Downloading: {:.1}% of {} @ {}, ETA {}", percent, size, speed, eta)
                }
                None => format!("Downloading: {:.1}% of {} @ {}", percent, size, speed),
            },
            ProgressUpdate::Processing => "Processing file...".to_string(),
            ProgressUpdate::AlreadyDone => "File already downloaded".to_string(),
            ProgressUpdate::Finished { file } => match file {
                Some(file) => format!("Download complete: {}", file),
                None => "Download complete".to_string(),
            },
        }
    }
}

/// Receives engine progress. The GUI re-emits updates as window events;
/// the CLI rewrites a status line.
pub trait ProgressSink: Send + Sync {
    fn update(&self, update: ProgressUpdate);
}

/// Sink that drops everything, for callers that do not track progress.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _update: ProgressUpdate) {}
}

lazy_static! {
    // [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)
    static ref PROGRESS_RE: Regex = Regex::new(
        r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)\s+at\s+(\d+\.?\d*\s*\w+/s)(?:\s+ETA\s+(\S+))?"
    )
    .unwrap();
    // [download] Destination: ... / [ExtractAudio] Destination: ...
    static ref DEST_RE: Regex = Regex::new(r"\[\w+\]\s+Destination:\s+(.+)").unwrap();
    static ref POSTPROCESS_RE: Regex = Regex::new(r"\[(?:Merger|ExtractAudio)\]").unwrap();
    static ref ALREADY_RE: Regex = Regex::new(r"has already been downloaded").unwrap();
}

/// Parse one line of yt-dlp `--newline` output. Returns `None` for lines
/// that carry no progress information.
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    if let Some(caps) = DEST_RE.captures(line) {
        let file = caps.get(1)?.as_str().trim().to_string();
        return Some(ProgressUpdate::Started { file });
    }

    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        let size = caps.get(2)?.as_str().trim().to_string();
        let speed = caps.get(3)?.as_str().trim().to_string();
        let eta = caps.get(4).map(|m| m.as_str().to_string());
        return Some(ProgressUpdate::Downloading {
            percent,
            size,
            speed,
            eta,
        });
    }

    if POSTPROCESS_RE.is_match(line) {
        return Some(ProgressUpdate::Processing);
    }

    if ALREADY_RE.is_match(line) {
        return Some(ProgressUpdate::AlreadyDone);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_download_line_with_eta() {
        let line = "[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)";
        match parse_progress_line(line) {
            Some(ProgressUpdate::Downloading {
                percent,
                size,
                speed,
                eta,
            }) => {
                assert!((percent - 6.2).abs() < f32::EPSILON);
                assert_eq!(size, "343.72MiB");
                assert_eq!(speed, "420.30KiB/s");
                assert_eq!(eta.as_deref(), Some("12:32"));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn parses_download_line_without_eta() {
        let line = "[download] 100% of 10.00MiB at 2.00MiB/s";
        match parse_progress_line(line) {
            Some(ProgressUpdate::Downloading { percent, eta, .. }) => {
                assert_eq!(percent, 100.0);
                assert!(eta.is_none());
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn parses_destination_lines_from_download_and_extract_stages() {
        let dl = parse_progress_line("[download] Destination: /tmp/My Video.webm");
        assert_eq!(
            dl,
            Some(ProgressUpdate::Started {
                file: "/tmp/My Video.webm".to_string()
            })
        );

        let extract = parse_progress_line("[ExtractAudio] Destination: /tmp/My Video.mp3");
        assert_eq!(
            extract,
            Some(ProgressUpdate::Started {
                file: "/tmp/My Video.mp3".to_string()
            })
        );
    }

    #[test]
    fn parses_postprocess_and_already_downloaded_lines() {
        assert_eq!(
            parse_progress_line("[Merger] Merging formats into \"out.mp4\""),
            Some(ProgressUpdate::Processing)
        );
        assert_eq!(
            parse_progress_line("[download] out.mp4 has already been downloaded"),
            Some(ProgressUpdate::AlreadyDone)
        );
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert_eq!(parse_progress_line("[youtube] abc: Downloading webpage"), None);
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn status_lines_and_percent_track_the_update() {
        let update = ProgressUpdate::Downloading {
            percent: 42.5,
            size: "100MiB".to_string(),
            speed: "1.00MiB/s".to_string(),
            eta: Some("0:58".to_string()),
        };
        assert_eq!(update.percent(), 42.5);
        assert_eq!(
            update.status_line(),
            "Downloading: 42.5% of 100MiB @ 1.00MiB/s, ETA 0:58"
        );

        assert_eq!(ProgressUpdate::Processing.percent(), 99.0);
        assert_eq!(ProgressUpdate::AlreadyDone.percent(), 100.0);
    }
}
