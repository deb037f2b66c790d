// External binary detection: yt-dlp (downloader) and ffmpeg (transcoder)

use std::process::Command;

use serde::{Deserialize, Serialize};

/// The two external binaries this application drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    YtDlp,
    Ffmpeg,
}

impl Tool {
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::YtDlp => "yt-dlp",
            Tool::Ffmpeg => "ffmpeg",
        }
    }

    /// Flag used to probe the binary; a probe succeeds iff the process
    /// spawns and exits 0.
    fn version_arg(&self) -> &'static str {
        match self {
            Tool::YtDlp => "--version",
            // ffmpeg uses a single dash
            Tool::Ffmpeg => "-version",
        }
    }
}

/// Probe result for one tool, shown in the GUI footer and CLI header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<String>,
    pub version: Option<String>,
    pub available: bool,
}

/// Resolve a tool to an invocable path: well-known install locations
/// first, then `which`, then the bare name.
pub fn resolve(tool: Tool) -> String {
    let name = tool.binary_name();

    let common_paths = [
        format!("/opt/homebrew/bin/{}", name),
        format!("/usr/local/bin/{}", name),
        format!("/usr/bin/{}", name),
    ];
    for path in common_paths {
        if std::path::Path::new(&path).exists() {
            return path;
        }
    }

    if let Ok(output) = Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return path;
            }
        }
    }

    name.to_string()
}

/// Probe one tool and report its status.
pub fn probe(tool: Tool) -> ToolStatus {
    let path = resolve(tool);
    let version = query_version(&path, tool);

    ToolStatus {
        name: tool.binary_name().to_string(),
        path: version.is_some().then(|| path),
        available: version.is_some(),
        version,
    }
}

/// Probe both tools, in display order.
pub fn probe_all() -> Vec<ToolStatus> {
    vec![probe(Tool::YtDlp), probe(Tool::Ffmpeg)]
}

pub fn is_available(tool: Tool) -> bool {
    probe(tool).available
}

fn query_version(path: &str, tool: Tool) -> Option<String> {
    match Command::new(path).arg(tool.version_arg()).output() {
        Ok(output) if output.status.success() => {
            Some(first_line(&String::from_utf8_lossy(&output.stdout)))
        }
        _ => None,
    }
}

/// ffmpeg prints a banner; only the first line is a version string.
fn first_line(output: &str) -> String {
    output.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_output_is_reduced_to_first_line() {
        let banner = "ffmpeg version 6.1.1 Copyright (c) 2000-2023\nbuilt with gcc 13\n";
        assert_eq!(first_line(banner), "ffmpeg version 6.1.1 Copyright (c) 2000-2023");
        assert_eq!(first_line("2024.08.06\n"), "2024.08.06");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn missing_tool_probe_reports_unavailable() {
        // query_version against a nonexistent binary must not panic
        let version = query_version("definitely-not-a-real-binary", Tool::Ffmpeg);
        assert!(version.is_none());
    }

    #[test]
    fn probe_all_reports_both_tools_in_order() {
        let statuses = probe_all();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "yt-dlp");
        assert_eq!(statuses[1].name, "ffmpeg");
        for status in statuses {
            assert_eq!(status.available, status.version.is_some());
        }
    }
}
