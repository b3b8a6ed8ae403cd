use crate::api::models::TrackMetadata;
use futures::TryStreamExt;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::io::StreamReader;

#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The response body ended before a metadata line was seen. Usually means
    /// the server is an incompatible version.
    #[error("invalid response format")]
    MissingMetadata,
    #[error("malformed metadata line: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("IO error while reading metadata: {0}")]
    Io(#[from] io::Error),
}

/// Adapt a streaming HTTP response body into an `AsyncRead` without buffering
/// it in full.
pub fn into_reader(response: reqwest::Response) -> impl AsyncRead + Unpin {
    let body = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    StreamReader::new(Box::pin(body))
}

/// Split a download response into its metadata header and the raw audio bytes.
///
/// The first line of the body is a single JSON object; everything after the
/// line terminator is audio, copied verbatim by the caller. The returned
/// `BufReader` retains whatever the line read pulled into its buffer, so the
/// audio stream continues exactly one byte past the terminator — nothing is
/// lost and nothing is read ahead of the caller.
pub async fn split_metadata<R>(reader: R) -> Result<(TrackMetadata, BufReader<R>), ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);

    let mut line = String::new();
    let bytes_read = reader.read_line(&mut line).await?;
    if bytes_read == 0 {
        return Err(ProtocolError::MissingMetadata);
    }

    let metadata: TrackMetadata = serde_json::from_str(line.trim_end())?;
    Ok((metadata, reader))
}
