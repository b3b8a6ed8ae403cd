use crate::api::TrackMetadata;
use crate::import::LocalAudioRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A cataloged audio track.
///
/// A track is either remotely downloaded (`is_local=false`, `source_id` set —
/// the dedup key) or discovered on the device by the local importer
/// (`is_local=true`, `source_id` absent). Mixed states are never produced.
/// There is no field-level update path: replace-on-conflict upsert keyed by
/// `id` is the only write primitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbTrack {
    pub id: String,
    /// External identifier assigned by the download server. Unique among
    /// tracks that have one.
    pub source_id: Option<String>,
    pub title: String,
    pub artist: Option<String>,
    pub duration_seconds: i64,
    /// Absolute path to the audio file. The local importer relies on this
    /// being unique across tracks for its own dedup.
    pub file_path: String,
    /// Path to locally materialized artwork, when we have it.
    pub thumbnail_path: Option<String>,
    pub file_size_bytes: i64,
    pub is_local: bool,
    pub created_at: DateTime<Utc>,
}

impl DbTrack {
    /// Build a catalog entry for a freshly downloaded track.
    pub fn from_download(
        metadata: &TrackMetadata,
        audio_path: &Path,
        thumbnail_path: Option<String>,
    ) -> Self {
        DbTrack {
            id: Uuid::new_v4().to_string(),
            source_id: Some(metadata.source_id.clone()),
            title: metadata.title.clone(),
            artist: metadata.artist.clone(),
            duration_seconds: metadata.duration,
            file_path: audio_path.to_string_lossy().to_string(),
            thumbnail_path,
            file_size_bytes: metadata.file_size,
            is_local: false,
            created_at: Utc::now(),
        }
    }

    /// Build a catalog entry for an audio file found on the device.
    pub fn from_local_record(record: &LocalAudioRecord) -> Self {
        DbTrack {
            id: Uuid::new_v4().to_string(),
            source_id: None,
            title: record.title.clone(),
            artist: Some(record.artist.clone()),
            duration_seconds: record.duration_ms / 1000,
            file_path: record.path.clone(),
            thumbnail_path: None,
            file_size_bytes: record.size_bytes,
            is_local: true,
            created_at: Utc::now(),
        }
    }
}
