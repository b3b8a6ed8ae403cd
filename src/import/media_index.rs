use async_trait::async_trait;
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum MediaIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Media index query failed: {0}")]
    Query(String),
}

/// An audio file as reported by the device's media index.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAudioRecord {
    /// Identifier assigned by the index itself.
    pub device_id: i64,
    pub title: String,
    pub artist: String,
    pub duration_ms: i64,
    pub path: String,
    pub size_bytes: i64,
}

/// The on-device media index. The importer only needs the full listing; how
/// the platform maintains that index is not this crate's concern.
#[async_trait]
pub trait MediaIndex: Send + Sync {
    async fn audio_files(&self) -> Result<Vec<LocalAudioRecord>, MediaIndexError>;
}

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "flac", "wav", "m4a", "aac", "ogg"];

/// Filesystem-backed media index: walks a root directory and reads tags from
/// every audio file found. Used on platforms without an OS-level index.
pub struct FsMediaIndex {
    root: PathBuf,
}

impl FsMediaIndex {
    pub fn new(root: PathBuf) -> Self {
        FsMediaIndex { root }
    }

    fn is_audio_file(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    fn scan(root: &std::path::Path) -> Result<Vec<LocalAudioRecord>, MediaIndexError> {
        let mut records = Vec::new();

        for (index, entry) in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .enumerate()
        {
            let path = entry.path();
            if !path.is_file() || !Self::is_audio_file(path) {
                continue;
            }

            let size_bytes = entry.metadata().map(|m| m.len() as i64).unwrap_or(0);

            // Fall back to the file stem when the tags are missing or empty.
            let mut title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown")
                .to_string();
            let mut artist = "Unknown Artist".to_string();
            let mut duration_ms = 0i64;

            if let Ok(tagged) = lofty::read_from_path(path) {
                duration_ms = tagged.properties().duration().as_millis() as i64;

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                        if !v.trim().is_empty() {
                            title = v.to_string();
                        }
                    }
                    if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                        if !v.trim().is_empty() {
                            artist = v.trim().to_string();
                        }
                    }
                }
            }

            records.push(LocalAudioRecord {
                device_id: index as i64,
                title,
                artist,
                duration_ms,
                path: path.to_string_lossy().to_string(),
                size_bytes,
            });
        }

        debug!("Found {} audio files under {}", records.len(), root.display());
        Ok(records)
    }
}

#[async_trait]
impl MediaIndex for FsMediaIndex {
    async fn audio_files(&self) -> Result<Vec<LocalAudioRecord>, MediaIndexError> {
        let root = self.root.clone();
        // Tag reading is blocking work; keep it off the async executor.
        tokio::task::spawn_blocking(move || Self::scan(&root))
            .await
            .map_err(|e| MediaIndexError::Query(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scans_only_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.mp3"), b"not really audio").unwrap();
        std::fs::write(dir.path().join("two.M4A"), b"still not audio").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let index = FsMediaIndex::new(dir.path().to_path_buf());
        let records = index.audio_files().await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.path.ends_with(".txt")));
    }

    #[tokio::test]
    async fn untagged_files_fall_back_to_stem_and_unknown_artist() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my song.mp3"), b"junk").unwrap();

        let index = FsMediaIndex::new(dir.path().to_path_buf());
        let records = index.audio_files().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "my song");
        assert_eq!(records[0].artist, "Unknown Artist");
    }

    #[tokio::test]
    async fn finds_files_in_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("albums").join("live");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("deep.flac"), b"junk").unwrap();

        let index = FsMediaIndex::new(dir.path().to_path_buf());
        let records = index.audio_files().await.unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].path.ends_with("deep.flac"));
    }
}
