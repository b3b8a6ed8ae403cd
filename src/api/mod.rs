pub mod client;
pub mod models;
pub mod stream;

pub use client::{ApiError, ServerClient};
pub use models::{DownloadRequest, HealthResponse, Quality, TrackMetadata};
pub use stream::{into_reader, split_metadata, ProtocolError};
