//! Media classification by file extension

use serde::{Deserialize, Serialize};

/// The renderer family a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "audio")]
    Audio,
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "unsupported")]
    Unsupported,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Pdf => "pdf",
            MediaKind::Image => "image",
            MediaKind::Unsupported => "unsupported",
        }
    }

    /// Kinds the backend streams or pages through `/media/{kind}`
    pub fn is_streamed(self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Audio | MediaKind::Pdf)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file name by the text after its last `.`
pub fn classify(file_name: &str) -> MediaKind {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return MediaKind::Unsupported;
    };

    match extension.to_lowercase().as_str() {
        "mp4" | "mov" | "webm" | "mkv" => MediaKind::Video,
        "mp3" | "wav" => MediaKind::Audio,
        "pdf" => MediaKind::Pdf,
        "jpg" | "jpeg" | "png" => MediaKind::Image,
        _ => MediaKind::Unsupported,
    }
}
