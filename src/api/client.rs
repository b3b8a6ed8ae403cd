use crate::api::models::{DownloadRequest, HealthResponse};
use reqwest::{Client, Error as ReqwestError, Response};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Connect quickly or give up; the server is on the local network.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// The server transcodes before the first byte is emitted, so reads can stall
/// for a long time without anything being wrong.
const READ_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
}

/// Client for the conversion/download server.
///
/// Health checks never fail across this boundary: any network error, timeout,
/// or unexpected body is reported as "not healthy". Download requests surface
/// non-2xx statuses as plain responses so the caller can classify them.
#[derive(Clone)]
pub struct ServerClient {
    client: Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// True only if the endpoint answers 2xx with `{"status": "ok"}`.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthResponse>().await {
                    Ok(body) => body.status == "ok",
                    Err(e) => {
                        warn!("Health check returned unexpected body: {}", e);
                        false
                    }
                }
            }
            Ok(response) => {
                debug!("Health check returned status {}", response.status());
                false
            }
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Issue a download request and hand back the streaming response.
    ///
    /// A non-2xx status is not an error here; the orchestrator inspects the
    /// status code and classifies it. Only transport failures become errors.
    pub async fn request_download(
        &self,
        request: &DownloadRequest,
    ) -> Result<Response, ApiError> {
        let url = format!("{}/download", self.base_url);
        debug!(
            "Requesting download from {} (quality {})",
            url,
            request.quality.as_str()
        );

        let response = self.client.post(&url).json(request).send().await?;
        Ok(response)
    }
}
