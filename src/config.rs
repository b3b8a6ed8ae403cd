use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::info;

/// UI-facing default; the wire-level transfer default is `Quality::default()`.
const DEFAULT_AUDIO_QUALITY: &str = "320";

#[derive(Debug, Default)]
struct SettingsData {
    server_url: String,
    audio_quality: String,
    music_dir: String,
}

/// The three user-configurable knobs: server base URL (blank means
/// "unconfigured"), audio quality tier, and music storage location (blank
/// means "use the default public directory").
///
/// A cheap cloneable handle over shared state, so the downloader and whatever
/// owns the settings screen observe the same values.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: Arc<RwLock<SettingsData>>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            inner: Arc::new(RwLock::new(SettingsData {
                server_url: String::new(),
                audio_quality: DEFAULT_AUDIO_QUALITY.to_string(),
                music_dir: String::new(),
            })),
        }
    }
}

impl Settings {
    /// Bootstrap from environment variables (dev mode and headless use).
    pub fn from_env() -> Self {
        let settings = Settings::default();

        if let Ok(url) = std::env::var("TUNEDROP_SERVER_URL") {
            info!("Settings: server URL loaded from environment");
            settings.set_server_url(&url);
        }
        if let Ok(quality) = std::env::var("TUNEDROP_AUDIO_QUALITY") {
            settings.set_audio_quality(&quality);
        }
        if let Ok(dir) = std::env::var("TUNEDROP_MUSIC_DIR") {
            settings.set_music_dir(&dir);
        }

        settings
    }

    pub fn server_url(&self) -> String {
        self.inner.read().unwrap().server_url.clone()
    }

    pub fn set_server_url(&self, url: &str) {
        self.inner.write().unwrap().server_url = url.trim().to_string();
    }

    pub fn audio_quality(&self) -> String {
        self.inner.read().unwrap().audio_quality.clone()
    }

    pub fn set_audio_quality(&self, quality: &str) {
        self.inner.write().unwrap().audio_quality = quality.trim().to_string();
    }

    /// Blank means "use the default public music directory".
    pub fn music_dir(&self) -> String {
        self.inner.read().unwrap().music_dir.clone()
    }

    pub fn set_music_dir(&self, dir: &str) {
        self.inner.write().unwrap().music_dir = dir.trim().to_string();
    }

    /// Default public music directory when no override is configured.
    pub fn default_music_dir() -> Option<PathBuf> {
        dirs::audio_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join("TuneDrop"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconfigured_except_quality() {
        let settings = Settings::default();
        assert_eq!(settings.server_url(), "");
        assert_eq!(settings.music_dir(), "");
        assert_eq!(settings.audio_quality(), "320");
    }

    #[test]
    fn handles_share_state() {
        let settings = Settings::default();
        let other = settings.clone();

        settings.set_server_url("http://192.168.1.10:8000/");
        assert_eq!(other.server_url(), "http://192.168.1.10:8000/");
    }
}
