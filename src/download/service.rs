use crate::api::{self, DownloadRequest, Quality, ServerClient};
use crate::config::Settings;
use crate::db::DbTrack;
use crate::download::notifier::MediaIndexNotifier;
use crate::download::thumbnails::save_thumbnail;
use crate::download::types::{DownloadError, DownloadOutcome, DownloadStage};
use crate::library::LibraryManager;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Sequences one download end to end: request, metadata split, dedup check,
/// streamed audio write, OS-index notify, thumbnail, catalog insert.
///
/// Each invocation is a single sequential unit of work; run it off the
/// interactive thread by spawning the future. The progress callback fires
/// synchronously inside that unit at fixed checkpoints (0.1, 0.4, 0.6, 0.9,
/// 1.0); marshal it yourself if you need delivery somewhere else.
pub struct Downloader {
    settings: Settings,
    library: LibraryManager,
    notifier: Arc<dyn MediaIndexNotifier>,
    thumbnail_dir: PathBuf,
}

impl Downloader {
    pub fn new(
        settings: Settings,
        library: LibraryManager,
        notifier: Arc<dyn MediaIndexNotifier>,
        thumbnail_dir: PathBuf,
    ) -> Self {
        Downloader {
            settings,
            library,
            notifier,
            thumbnail_dir,
        }
    }

    /// True only if the configured server answers its health endpoint.
    /// An unconfigured server is simply "not healthy", never an error.
    pub async fn check_server_health(&self) -> bool {
        let server_url = self.settings.server_url();
        if server_url.is_empty() {
            return false;
        }

        match ServerClient::new(&server_url) {
            Ok(client) => client.check_health().await,
            Err(_) => false,
        }
    }

    /// Download one track. Exactly one outcome is returned per call; no
    /// failure escapes as a panic or error type.
    pub async fn download(
        &self,
        url: &str,
        on_progress: impl Fn(f32),
    ) -> DownloadOutcome {
        match self.run(url, &on_progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Download of {} failed: {}", url, e);
                DownloadOutcome::Error(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        url: &str,
        on_progress: &impl Fn(f32),
    ) -> Result<DownloadOutcome, DownloadError> {
        let mut stage = DownloadStage::Validating;
        debug!(%stage, url, "Starting download");

        if url.trim().is_empty() {
            return Err(DownloadError::Configuration("URL is empty".to_string()));
        }
        let server_url = self.settings.server_url();
        if server_url.is_empty() {
            // Fail fast: no network call is ever issued without a server.
            return Err(DownloadError::Configuration(
                "Server URL not configured".to_string(),
            ));
        }

        let quality = Quality::from_setting(&self.settings.audio_quality());
        let client = ServerClient::new(&server_url)?;
        on_progress(0.1);

        stage = DownloadStage::Requesting;
        debug!(%stage, "Issuing download request");
        let request = DownloadRequest {
            url: url.to_string(),
            quality,
        };
        let response = client.request_download(&request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Server(status.as_u16()));
        }
        if response.content_length() == Some(0) {
            return Err(DownloadError::EmptyBody);
        }

        stage = DownloadStage::Parsing;
        debug!(%stage, "Reading metadata header line");
        let reader = api::into_reader(response);
        let (metadata, mut audio) = api::split_metadata(reader).await?;
        on_progress(0.4);

        // Cheap check before the expensive write: a duplicate must never
        // cause a large file to be written.
        stage = DownloadStage::DedupCheck;
        debug!(%stage, source_id = %metadata.source_id, "Checking catalog");
        if self.library.is_duplicate(&metadata.source_id).await? {
            info!("Track {} already in library", metadata.source_id);
            return Ok(DownloadOutcome::AlreadyExists(
                "Track already in library".to_string(),
            ));
        }
        on_progress(0.6);

        stage = DownloadStage::Writing;
        let music_dir = self.music_dir()?;
        tokio::fs::create_dir_all(&music_dir).await?;
        let audio_path = music_dir.join(format!("{}.m4a", metadata.source_id));
        debug!(%stage, path = %audio_path.display(), "Streaming audio to disk");
        {
            let mut file = tokio::fs::File::create(&audio_path).await?;
            tokio::io::copy(&mut audio, &mut file).await?;
            file.flush().await?;
        }

        stage = DownloadStage::Indexing;
        debug!(%stage, "Notifying media index");
        if let Err(e) = self.notifier.scan_file(&audio_path).await {
            warn!("Media index notification failed: {}", e);
        }
        on_progress(0.9);

        stage = DownloadStage::ThumbnailSave;
        debug!(%stage, "Materializing thumbnail");
        let thumbnail_path = save_thumbnail(
            metadata.thumbnail_base64.as_deref(),
            &metadata.source_id,
            &self.thumbnail_dir,
        )
        .await
        .map(|path| path.to_string_lossy().to_string());

        stage = DownloadStage::Persisting;
        debug!(%stage, "Upserting catalog entry");
        let track = DbTrack::from_download(&metadata, &audio_path, thumbnail_path);
        self.library.upsert_track(&track).await?;
        on_progress(1.0);

        stage = DownloadStage::Done;
        info!(%stage, "Downloaded {} ({})", track.title, metadata.source_id);
        Ok(DownloadOutcome::Success(track))
    }

    fn music_dir(&self) -> Result<PathBuf, DownloadError> {
        let configured = self.settings.music_dir();
        if !configured.is_empty() {
            return Ok(PathBuf::from(configured));
        }

        Settings::default_music_dir().ok_or_else(|| {
            DownloadError::Configuration("No music directory available".to_string())
        })
    }
}
