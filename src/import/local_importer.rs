use crate::db::DbTrack;
use crate::import::media_index::{MediaIndex, MediaIndexError};
use crate::library::{LibraryError, LibraryManager};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Media index error: {0}")]
    MediaIndex(#[from] MediaIndexError),
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

/// Merges device-resident audio files into the catalog as `is_local` tracks.
///
/// Each invocation is a full-scan set-difference against the cataloged file
/// paths — no watermark is kept between runs, which is fine at catalog sizes
/// of a few thousand tracks. Running it twice with no new files is a no-op.
pub struct LocalImporter {
    media_index: Arc<dyn MediaIndex>,
    library: LibraryManager,
}

impl LocalImporter {
    pub fn new(media_index: Arc<dyn MediaIndex>, library: LibraryManager) -> Self {
        LocalImporter {
            media_index,
            library,
        }
    }

    /// Import device files the catalog does not know yet. Returns the number
    /// of newly added tracks.
    pub async fn import_new(&self) -> Result<usize, ImportError> {
        let records = self.media_index.audio_files().await?;
        let existing_paths: HashSet<String> =
            self.library.all_file_paths().await?.into_iter().collect();

        let mut imported = 0;
        for record in &records {
            if existing_paths.contains(&record.path) {
                continue;
            }

            let track = DbTrack::from_local_record(record);
            self.library.upsert_track(&track).await?;
            imported += 1;
        }

        info!(
            "Local import finished: {} of {} device files were new",
            imported,
            records.len()
        );
        Ok(imported)
    }
}
