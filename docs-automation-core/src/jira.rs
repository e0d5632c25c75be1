//! JIRA REST (v2) implementation of [`IssueTracker`].
//!
//! Only two endpoints are used:
//! - `GET /rest/api/2/filter/{id}` to resolve a saved filter to its JQL.
//! - `GET /rest/api/2/search?jql=&startAt=&maxResults=&fields=summary` for paged results.
//!
//! Requests carry basic auth when both user and token are configured, and time out
//! after [`TRACKER_TIMEOUT`]. Any non-2xx status becomes [`TrackerError::Status`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::{TrackerConfig, TRACKER_TIMEOUT};
use crate::contract::{IssueTracker, SearchHit, SearchPage, TrackerError};

#[derive(Debug, Deserialize)]
struct FilterResponse {
    #[serde(default)]
    jql: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: Option<RawFields>,
}

#[derive(Debug, Deserialize)]
struct RawFields {
    #[serde(default)]
    summary: Option<String>,
}

pub struct JiraClient {
    http: Client,
    config: TrackerConfig,
}

impl JiraClient {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        let http = Client::builder().timeout(TRACKER_TIMEOUT).build()?;
        info!(base_url = %config.base_url, auth = config.has_credentials(), "Initialised JIRA client");
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url);
        match (&self.config.user, &self.config.api_token) {
            (Some(user), Some(token)) => request.basic_auth(user, Some(token)),
            _ => request,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, TrackerError> {
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, url, "JIRA request failed");
            TrackerError::Http(e)
        })?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = %status, url, "JIRA returned an error status");
            return Err(TrackerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, url, "Failed to decode JIRA response");
            TrackerError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn filter_jql(&self, filter_id: &str) -> Result<String, TrackerError> {
        let url = format!("{}/rest/api/2/filter/{}", self.config.base_url, filter_id);
        debug!(url = %url, filter_id, "Resolving saved filter");
        let filter: FilterResponse = self.fetch_json(&url, self.get(&url)).await?;
        Ok(filter.jql.unwrap_or_default())
    }

    async fn search(
        &self,
        jql: &str,
        start_at: u64,
        max_results: u64,
    ) -> Result<SearchPage, TrackerError> {
        let url = format!("{}/rest/api/2/search", self.config.base_url);
        let request = self.get(&url).query(&[
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
            ("fields", "summary".to_string()),
        ]);
        debug!(url = %url, start_at, max_results, "Fetching search page");
        let page: SearchResponse = self.fetch_json(&url, request).await?;

        let hits = page
            .issues
            .into_iter()
            .map(|raw| SearchHit {
                key: raw.key.unwrap_or_default(),
                summary: raw.fields.and_then(|f| f.summary).unwrap_or_default(),
            })
            .collect();
        Ok(SearchPage {
            hits,
            total: page.total,
        })
    }

    fn browse_url(&self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }
        format!("{}/browse/{}", self.config.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> JiraClient {
        JiraClient::new(TrackerConfig::new("https://jira.example.com/", None, None)).unwrap()
    }

    #[test]
    fn browse_url_uses_trimmed_base() {
        assert_eq!(client().browse_url("OADP-1"), "https://jira.example.com/browse/OADP-1");
    }

    #[test]
    fn browse_url_empty_for_empty_key() {
        assert_eq!(client().browse_url(""), "");
    }

    #[test]
    fn search_response_tolerates_missing_fields() {
        let raw = r#"{"issues":[{"key":"OADP-9"},{"fields":{"summary":"no key"}}],"total":2}"#;
        let page: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.issues[0].key.as_deref(), Some("OADP-9"));
        assert!(page.issues[0].fields.is_none());
        assert!(page.issues[1].key.is_none());
    }
}
