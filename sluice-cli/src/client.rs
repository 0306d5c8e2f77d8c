//! Coordinator submission client.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use sluice_core::TransactionRequest;

const ACCEPT_PATH: &str = "/api/v1/coinjoin/accept";

/// Coordinator reply to an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcceptResponse {
    #[serde(alias = "transaction_id")]
    pub txid: String,
}

/// Anything that can hand a request to a coinjoin coordinator.
pub trait SubmissionClient {
    fn accept(&self, request: &TransactionRequest) -> Result<AcceptResponse>;
}

pub struct HttpSubmissionClient {
    base_url: String,
    http_client: reqwest::blocking::Client,
}

impl HttpSubmissionClient {
    pub fn new(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            http_client: reqwest::blocking::Client::new(),
        }
    }

    pub fn accept_url(&self) -> String {
        format!("{}{}", self.base_url, ACCEPT_PATH)
    }
}

impl SubmissionClient for HttpSubmissionClient {
    fn accept(&self, request: &TransactionRequest) -> Result<AcceptResponse> {
        let url = self.accept_url();
        let res = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("failed to reach coordinator at {url}"))?;

        let status = res.status();
        let body = res.text().context("failed to read coordinator response")?;

        if !status.is_success() {
            return Err(anyhow!(
                "coordinator rejected transaction ({}): {}",
                status,
                body.trim()
            ));
        }

        serde_json::from_str::<AcceptResponse>(&body)
            .context("failed to parse coordinator response")
    }
}

/// Submit a request and return the coordinator's transaction id.
pub fn submit(client: &dyn SubmissionClient, request: &TransactionRequest) -> Result<String> {
    tracing::info!(outputs = request.outs.len(), "submitting coinjoin transaction");
    let response = client.accept(request)?;
    tracing::info!(txid = %response.txid, "coordinator accepted transaction");
    Ok(response.txid)
}
