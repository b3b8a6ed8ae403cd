use crate::api::{ApiError, ProtocolError};
use crate::db::DbTrack;
use crate::library::LibraryError;
use std::fmt;
use thiserror::Error;

/// Terminal outcome of one download invocation. Exactly one of these is
/// returned per call; nothing propagates past the orchestrator as a fault.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// Track fully written and cataloged.
    Success(DbTrack),
    /// A track with the same source id is already cataloged; nothing was
    /// written. Informational, not a failure.
    AlreadyExists(String),
    /// Any other failure, as a human-readable message.
    Error(String),
}

/// The linear state sequence a download moves through. Each transition
/// replaces the previous stage wholesale; there is no branching back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStage {
    Validating,
    Requesting,
    Parsing,
    DedupCheck,
    Writing,
    Indexing,
    ThumbnailSave,
    Persisting,
    Done,
}

impl fmt::Display for DownloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownloadStage::Validating => "validating",
            DownloadStage::Requesting => "requesting",
            DownloadStage::Parsing => "parsing",
            DownloadStage::DedupCheck => "dedup-check",
            DownloadStage::Writing => "writing",
            DownloadStage::Indexing => "indexing",
            DownloadStage::ThumbnailSave => "thumbnail-save",
            DownloadStage::Persisting => "persisting",
            DownloadStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Internal failure taxonomy. Converted to `DownloadOutcome::Error` at the
/// orchestrator boundary; the messages are what callers present.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("{0}")]
    Configuration(String),
    #[error("Server error: {0}")]
    Server(u16),
    #[error("Empty response")]
    EmptyBody,
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Library(#[from] LibraryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
