//! Release payload assembly and delivery to the release-notes generator (RENOA).
//!
//! [`build_payload`] turns two ordered issue lists into a [`ReleasePayload`];
//! [`forward`] hands it to a [`ReleaseNotesSink`] or, when no endpoint is
//! configured, prints it and reports [`SendOutcome::NotSent`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::FORWARD_TIMEOUT;
use crate::contract::{ForwardError, Issue, ReleaseNotesSink, ReleasePayload, SendOutcome};

/// Shareable tracker URL of a saved filter; `None` for an empty ID.
pub fn filter_url(base_url: &str, filter_id: &str) -> Option<String> {
    let filter_id = filter_id.trim();
    if filter_id.is_empty() {
        return None;
    }
    Some(format!("{}/issues/?filter={}", base_url.trim_end_matches('/'), filter_id))
}

fn issue_keys(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .filter(|i| !i.key.is_empty())
        .map(|i| i.key.clone())
        .collect()
}

/// Assemble the payload. Filter URLs are only set for non-empty filter IDs.
pub fn build_payload(
    base_url: &str,
    release: &str,
    resolved: &[Issue],
    known: &[Issue],
    resolved_filter_id: &str,
    known_filter_id: &str,
) -> ReleasePayload {
    ReleasePayload {
        release: release.to_string(),
        resolved_issues: issue_keys(resolved),
        known_issues: issue_keys(known),
        resolved_filter_url: filter_url(base_url, resolved_filter_id),
        known_filter_url: filter_url(base_url, known_filter_id),
    }
}

/// Pretty JSON rendering used for dry runs and unsent payloads.
pub fn render_payload(payload: &ReleasePayload) -> Result<String, ForwardError> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// HTTP client posting payloads to the RENOA endpoint.
pub struct RenoaClient {
    http: Client,
    endpoint: String,
}

impl RenoaClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ForwardError> {
        let http = Client::builder().timeout(FORWARD_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReleaseNotesSink for RenoaClient {
    async fn submit(&self, payload: &ReleasePayload) -> Result<(), ForwardError> {
        info!(
            endpoint = %self.endpoint,
            release = %payload.release,
            resolved = payload.resolved_issues.len(),
            known = payload.known_issues.len(),
            "Posting release payload"
        );
        let response = self.http.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, endpoint = %self.endpoint, "Release-notes endpoint returned an error");
            return Err(ForwardError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }
        info!(status = %status, "Release payload accepted");
        Ok(())
    }
}

/// Send `payload` through `sink`, or print it when there is no sink.
pub async fn forward<S>(sink: Option<&S>, payload: &ReleasePayload) -> Result<SendOutcome, ForwardError>
where
    S: ReleaseNotesSink + ?Sized,
{
    match sink {
        Some(sink) => {
            sink.submit(payload).await?;
            Ok(SendOutcome::Sent)
        }
        None => {
            warn!("RENOA_URL is not set, skipping release-notes request");
            println!("RENOA_URL is not set. Skipping RENOA request.");
            println!("Payload that would be sent:");
            println!("{}", render_payload(payload)?);
            Ok(SendOutcome::NotSent)
        }
    }
}
