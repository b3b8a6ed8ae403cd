pub mod notifier;
pub mod service;
pub mod thumbnails;
pub mod types;

pub use notifier::{MediaIndexNotifier, NullMediaIndexNotifier};
pub use service::Downloader;
pub use thumbnails::save_thumbnail;
pub use types::{DownloadError, DownloadOutcome, DownloadStage};
