use serde::{Deserialize, Serialize};

/// Audio quality tier sent with a download request.
///
/// The server expects the bitrate as a literal string ("128", "192", "320"),
/// so the variants serialize to those exact values. `Kbps192` is the transfer
/// default; the UI-facing settings default is a separate knob (see `config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Quality {
    #[serde(rename = "128")]
    Kbps128,
    #[default]
    #[serde(rename = "192")]
    Kbps192,
    #[serde(rename = "320")]
    Kbps320,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Kbps128 => "128",
            Quality::Kbps192 => "192",
            Quality::Kbps320 => "320",
        }
    }

    /// Parse a settings value. Unrecognized values fall back to the transfer
    /// default rather than failing the download.
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "128" => Quality::Kbps128,
            "320" => Quality::Kbps320,
            _ => Quality::Kbps192,
        }
    }
}

/// Body of `POST /download`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: Quality,
}

/// The single JSON metadata line prefixed to a download response body.
///
/// Wire field names come from the server; `youtube_id` is the external
/// identifier we use as the dedup key (`source_id` everywhere else in the
/// crate).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: Option<String>,
    /// Track length in seconds.
    pub duration: i64,
    #[serde(rename = "youtube_id")]
    pub source_id: String,
    #[serde(rename = "file_size")]
    pub file_size: i64,
    /// Optional inline artwork, possibly prefixed with a data-URI marker.
    #[serde(rename = "thumbnail_base64")]
    pub thumbnail_base64: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
