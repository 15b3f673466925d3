use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use ureq::Agent;

/// One decoded payload from the sample source.
///
/// All four fields are mandatory; a body missing any of them fails
/// deserialization and surfaces as [`FetchError::MalformedPayload`].
#[derive(Debug, Clone, Deserialize)]
pub struct Reading {
    pub left_rpm: f64,
    pub right_rpm: f64,
    pub linear_vel: f64,
    pub angular_vel: f64,
}

/// Classification of a single failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Polls the telemetry endpoint, one blocking GET per call.
pub struct Fetcher {
    agent: Agent,
    endpoint: String,
}

impl Fetcher {
    pub fn new(endpoint: String) -> Self {
        Self {
            agent: Agent::new(),
            endpoint,
        }
    }

    /// Issue one GET and decode the body.
    ///
    /// Logs a summary of the reading or the failure on every call; the
    /// caller only sees the returned `Result`.
    pub fn fetch(&self) -> Result<Reading, FetchError> {
        let result = self.request();
        match &result {
            Ok(r) => info!(
                "left {:.2} rpm | right {:.2} rpm | linear {:.2} m/s | angular {:.2} rad/s",
                r.left_rpm, r.right_rpm, r.linear_vel, r.angular_vel
            ),
            Err(e) => warn!("fetch failed: {}", e),
        }
        result
    }

    fn request(&self) -> Result<Reading, FetchError> {
        let body = match self.agent.get(&self.endpoint).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| FetchError::Connection(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => return Err(FetchError::UnexpectedStatus(code)),
            Err(ureq::Error::Transport(t)) => return Err(FetchError::Connection(t.to_string())),
        };
        Ok(serde_json::from_str(&body)?)
    }
}
