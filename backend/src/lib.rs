//! Client for the upstream matcher API.
//!
//! # Architecture
//!
//! [`ReviewBackend`] is the seam between the review engine and the network.
//! Every method takes owned arguments and returns a `'static` boxed future so
//! callers can hand the future straight to `tokio::spawn` without holding a
//! borrow on the backend.
//!
//! | Call | Route |
//! |------|-------|
//! | [`ReviewBackend::fetch_queue`] | `GET /api/matches/queue` |
//! | [`ReviewBackend::submit_decision`] | `POST /api/matches/{id}/decision` |
//! | [`ReviewBackend::fetch_crop`] | `GET /api/matches/{id}/crop/{a,b}` |
//!
//! # Error Handling
//!
//! There is no retry layer. Every failure is returned as a [`BackendError`] and
//! the caller decides whether it matters (for decisions it only gets logged).

use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use pairdeck_types::{CandidateId, EndpointSide, MatchCandidate, SourceFilter, Verdict};

const CONNECT_TIMEOUT_SECS: u64 = 5;
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid server URL `{0}`")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("server did not accept the decision")]
    Rejected,
}

/// Response body of the submit-decision call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
}

pub trait ReviewBackend: Send + Sync {
    fn fetch_queue(
        &self,
        filter: SourceFilter,
    ) -> BoxFuture<'static, Result<Vec<MatchCandidate>, BackendError>>;

    fn submit_decision(
        &self,
        id: CandidateId,
        verdict: Verdict,
    ) -> BoxFuture<'static, Result<SubmitAck, BackendError>>;

    fn fetch_crop(
        &self,
        id: CandidateId,
        side: EndpointSide,
    ) -> BoxFuture<'static, Result<Vec<u8>, BackendError>>;
}

/// [`ReviewBackend`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url).map_err(|_| BackendError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .user_agent(concat!("pairdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(BackendError::Status {
        status: status.as_u16(),
        body: read_capped_error_body(response).await,
    })
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

impl ReviewBackend for HttpBackend {
    fn fetch_queue(
        &self,
        filter: SourceFilter,
    ) -> BoxFuture<'static, Result<Vec<MatchCandidate>, BackendError>> {
        let url = self.endpoint(&["api", "matches", "queue"]);
        get_queue(self.client.clone(), url, filter).boxed()
    }

    fn submit_decision(
        &self,
        id: CandidateId,
        verdict: Verdict,
    ) -> BoxFuture<'static, Result<SubmitAck, BackendError>> {
        let url = self.endpoint(&["api", "matches", id.as_str(), "decision"]);
        post_decision(self.client.clone(), url, verdict).boxed()
    }

    fn fetch_crop(
        &self,
        id: CandidateId,
        side: EndpointSide,
    ) -> BoxFuture<'static, Result<Vec<u8>, BackendError>> {
        let url = self.endpoint(&["api", "matches", id.as_str(), "crop", side.as_str()]);
        get_bytes(self.client.clone(), url).boxed()
    }
}

async fn get_queue(
    client: reqwest::Client,
    url: Result<Url, BackendError>,
    filter: SourceFilter,
) -> Result<Vec<MatchCandidate>, BackendError> {
    let response = client.get(url?).query(&filter.query_pairs()).send().await?;
    let candidates = ensure_success(response)
        .await?
        .json::<Vec<MatchCandidate>>()
        .await?;
    tracing::debug!(count = candidates.len(), "Fetched review queue");
    Ok(candidates)
}

async fn post_decision(
    client: reqwest::Client,
    url: Result<Url, BackendError>,
    verdict: Verdict,
) -> Result<SubmitAck, BackendError> {
    let response = client.post(url?).json(&verdict).send().await?;
    let ack = ensure_success(response).await?.json::<SubmitAck>().await?;
    if ack.success {
        Ok(ack)
    } else {
        Err(BackendError::Rejected)
    }
}

async fn get_bytes(
    client: reqwest::Client,
    url: Result<Url, BackendError>,
) -> Result<Vec<u8>, BackendError> {
    let response = client.get(url?).send().await?;
    let bytes = ensure_success(response).await?.bytes().await?;
    Ok(bytes.to_vec())
}
