use crate::db::{Database, DbTrack};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared catalog service used by both the downloader and the local importer.
///
/// Wraps the database and adds change notification: every upsert or delete
/// bumps a version token on a `watch` channel. Callers that need a live view
/// hold a receiver and re-query `all_tracks` whenever the version changes, so
/// no update can be missed regardless of how many writes happened in between.
#[derive(Debug, Clone)]
pub struct LibraryManager {
    database: Database,
    changes: watch::Sender<u64>,
}

impl LibraryManager {
    pub fn new(database: Database) -> Self {
        let (changes, _) = watch::channel(0);
        LibraryManager { database, changes }
    }

    /// Subscribe to catalog changes. The receiver yields a monotonically
    /// increasing version; re-query on every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn notify_changed(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    /// All tracks, newest first.
    pub async fn all_tracks(&self) -> Result<Vec<DbTrack>, LibraryError> {
        Ok(self.database.all_tracks().await?)
    }

    pub async fn track_by_id(&self, id: &str) -> Result<Option<DbTrack>, LibraryError> {
        Ok(self.database.get_track_by_id(id).await?)
    }

    pub async fn track_by_source_id(
        &self,
        source_id: &str,
    ) -> Result<Option<DbTrack>, LibraryError> {
        Ok(self.database.get_track_by_source_id(source_id).await?)
    }

    /// True if a track with this source id is already cataloged.
    pub async fn is_duplicate(&self, source_id: &str) -> Result<bool, LibraryError> {
        Ok(self.track_by_source_id(source_id).await?.is_some())
    }

    /// Idempotent replace keyed by track id.
    pub async fn upsert_track(&self, track: &DbTrack) -> Result<(), LibraryError> {
        self.database.insert_or_replace_track(track).await?;
        self.notify_changed();
        Ok(())
    }

    /// Delete a track and its backing files.
    ///
    /// File removal is best-effort: a missing or locked file is logged and
    /// never blocks the catalog deletion.
    pub async fn delete_track(&self, track: &DbTrack) -> Result<(), LibraryError> {
        if let Err(e) = tokio::fs::remove_file(&track.file_path).await {
            warn!("Could not remove audio file {}: {}", track.file_path, e);
        }
        if let Some(thumbnail_path) = &track.thumbnail_path {
            if let Err(e) = tokio::fs::remove_file(thumbnail_path).await {
                warn!("Could not remove thumbnail {}: {}", thumbnail_path, e);
            }
        }

        self.database.delete_track_by_id(&track.id).await?;
        self.notify_changed();

        info!("Deleted track {} ({})", track.title, track.id);
        Ok(())
    }

    pub async fn track_count(&self) -> Result<i64, LibraryError> {
        Ok(self.database.track_count().await?)
    }

    /// All cataloged file paths, for the importer's set-difference.
    pub async fn all_file_paths(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.database.all_file_paths().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TrackMetadata;
    use std::path::Path;

    async fn manager() -> LibraryManager {
        LibraryManager::new(Database::new_in_memory().await.unwrap())
    }

    fn downloaded_track(source_id: &str, file_path: &str) -> DbTrack {
        let metadata = TrackMetadata {
            title: "Song".to_string(),
            artist: Some("Artist".to_string()),
            duration: 180,
            source_id: source_id.to_string(),
            file_size: 42,
            thumbnail_base64: None,
        };
        DbTrack::from_download(&metadata, Path::new(file_path), None)
    }

    #[tokio::test]
    async fn is_duplicate_tracks_source_ids() {
        let library = manager().await;
        assert!(!library.is_duplicate("abc123").await.unwrap());

        let track = downloaded_track("abc123", "/music/abc123.m4a");
        library.upsert_track(&track).await.unwrap();

        assert!(library.is_duplicate("abc123").await.unwrap());
        assert!(!library.is_duplicate("other").await.unwrap());
    }

    #[tokio::test]
    async fn writes_bump_the_version_token() {
        let library = manager().await;
        let mut changes = library.subscribe();
        let initial = *changes.borrow_and_update();

        let track = downloaded_track("abc123", "/music/abc123.m4a");
        library.upsert_track(&track).await.unwrap();

        assert!(changes.has_changed().unwrap());
        let after_upsert = *changes.borrow_and_update();
        assert!(after_upsert > initial);

        library.delete_track(&track).await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert!(*changes.borrow_and_update() > after_upsert);
    }

    #[tokio::test]
    async fn delete_removes_backing_files_best_effort() {
        let library = manager().await;
        let dir = tempfile::tempdir().unwrap();

        let audio_path = dir.path().join("abc123.m4a");
        let thumb_path = dir.path().join("abc123.jpg");
        std::fs::write(&audio_path, b"audio").unwrap();
        std::fs::write(&thumb_path, b"jpeg").unwrap();

        let mut track = downloaded_track("abc123", audio_path.to_str().unwrap());
        track.thumbnail_path = Some(thumb_path.to_string_lossy().to_string());
        library.upsert_track(&track).await.unwrap();

        library.delete_track(&track).await.unwrap();

        assert!(!audio_path.exists());
        assert!(!thumb_path.exists());
        assert_eq!(library.track_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_with_missing_files_still_deletes_the_row() {
        let library = manager().await;
        let track = downloaded_track("abc123", "/nonexistent/abc123.m4a");
        library.upsert_track(&track).await.unwrap();

        library.delete_track(&track).await.unwrap();
        assert_eq!(library.track_count().await.unwrap(), 0);
    }
}
