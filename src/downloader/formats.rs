// Preset format labels and their yt-dlp format selectors.

use serde::{Deserialize, Serialize};

/// One of the five preset download formats shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatPreset {
    /// Best available video + audio ("best")
    BestAv,
    /// Best audio only, converted to MP3 via ffmpeg post-processing
    AudioMp3,
    /// 720p MP4
    Mp4At720,
    /// 1080p MP4
    Mp4At1080,
    /// 480p MP4
    Mp4At480,
}

impl FormatPreset {
    /// All presets in the order they appear in the UI.
    /// The first entry is the default.
    pub const ALL: [FormatPreset; 5] = [
        FormatPreset::BestAv,
        FormatPreset::AudioMp3,
        FormatPreset::Mp4At720,
        FormatPreset::Mp4At1080,
        FormatPreset::Mp4At480,
    ];

    /// Human-readable label shown in the format combo / menu.
    pub fn label(&self) -> &'static str {
        match self {
            FormatPreset::BestAv => "Best Video + Audio",
            FormatPreset::AudioMp3 => "Best Audio Only (MP3)",
            FormatPreset::Mp4At720 => "720p MP4",
            FormatPreset::Mp4At1080 => "1080p MP4",
            FormatPreset::Mp4At480 => "480p MP4",
        }
    }

    /// yt-dlp `-f` selector expression for this preset.
    pub fn selector(&self) -> &'static str {
        match self {
            FormatPreset::BestAv => "best",
            FormatPreset::AudioMp3 => "bestaudio/best",
            FormatPreset::Mp4At720 => {
                "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]"
            }
            FormatPreset::Mp4At1080 => {
                "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]"
            }
            FormatPreset::Mp4At480 => {
                "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]/best[height<=480][ext=mp4]"
            }
        }
    }

    /// Whether this preset adds an ffmpeg post-processing step
    /// (audio extraction to MP3 at 192K).
    pub fn needs_transcoder(&self) -> bool {
        matches!(self, FormatPreset::AudioMp3)
    }

    /// Resolve a label back to its preset. Unknown labels fall back to the
    /// default preset rather than failing.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .iter()
            .find(|p| p.label() == label)
            .copied()
            .unwrap_or_default()
    }

    /// Labels in UI order, for populating the format combo / CLI menu.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.label()).collect()
    }
}

impl Default for FormatPreset {
    fn default() -> Self {
        FormatPreset::BestAv
    }
}
