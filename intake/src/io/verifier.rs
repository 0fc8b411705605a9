//! Verification backend abstraction.
//!
//! The [`Verifier`] trait decouples the session gate from the HTTP transport.
//! Tests use scripted verifiers that return predetermined outcomes without
//! opening sockets.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::io::config::IntakeConfig;

/// Why a credential could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Backend answered with a non-success status.
    #[error("backend rejected token with status {status}")]
    Rejected { status: u16 },
    /// Request could not be sent or the response could not be read.
    #[error("verification request failed: {0}")]
    Transport(String),
    /// Success response whose body is not JSON.
    #[error("verification response is not valid JSON: {0}")]
    Parse(String),
}

impl VerifyError {
    /// True when the backend itself refused the token.
    pub fn is_rejection(&self) -> bool {
        matches!(self, VerifyError::Rejected { .. })
    }
}

/// Abstraction over credential verification backends.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Verify `token`; on success returns the known partner names.
    async fn verify(&self, token: &str) -> Result<Vec<String>, VerifyError>;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Verifier that posts the token to `{api_base}/verify`.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: Client,
    url: String,
}

impl HttpVerifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build verification http client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(cfg: &IntakeConfig) -> Result<Self> {
        Self::new(cfg.verify_url(), cfg.request_timeout())
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn verify(&self, token: &str) -> Result<Vec<String>, VerifyError> {
        info!("verifying credential");
        let response = self
            .client
            .post(&self.url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|err| VerifyError::Transport(err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "verification rejected");
            return Err(VerifyError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| VerifyError::Transport(err.to_string()))?;
        parse_names(&body)
    }
}

/// Extract the known-name list from a success body.
///
/// A missing or non-array `names` yields an empty list; non-string entries
/// are skipped. Only a body that is not JSON at all is an error.
pub fn parse_names(body: &str) -> Result<Vec<String>, VerifyError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| VerifyError::Parse(err.to_string()))?;
    let names = match value.get("names") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => {
            debug!("verification response has no name list");
            Vec::new()
        }
    };
    Ok(names)
}
