//! # contract: shared types and trait seams
//!
//! This module defines the plain data passed between pipeline stages and the two
//! traits that hide network transport from the pipeline logic:
//!
//! - [`IssueTracker`]: resolves saved filters and runs paged searches (JIRA in production).
//! - [`ReleaseNotesSink`]: accepts a finished [`ReleasePayload`] (the RENOA endpoint in production).
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so tests can script tracker pages and
//!   sink responses without a server.
//!
//! ## Errors
//! - Each concern has its own `thiserror` enum; the CLI wraps them in `anyhow`.

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// One issue returned by a tracker search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker identifier, e.g. `OADP-1234`. May be empty if the tracker omitted it.
    pub key: String,
    pub summary: String,
    /// Browse URL derived from the tracker base URL and `key`; empty when `key` is.
    pub link: String,
}

/// Raw item of a search page, before a link is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub key: String,
    pub summary: String,
}

/// One page of search results plus the server-reported total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub total: u64,
}

/// The record sent to the release-notes generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePayload {
    pub release: String,
    pub resolved_issues: Vec<String>,
    pub known_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_filter_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_filter_url: Option<String>,
}

/// Result of a forward attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// No endpoint configured; the payload was printed instead.
    NotSent,
}

/// Errors raised while talking to the issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("tracker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tracker returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected tracker response: {0}")]
    Decode(String),
}

/// Errors raised while submitting a payload.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("release-notes request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("release-notes endpoint returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not serialise payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by the shortdesc normaliser.
#[derive(Debug, thiserror::Error)]
pub enum ShortdescError {
    #[error("repo is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid override file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("error walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Access to an issue tracker's saved filters and search.
///
/// Implemented by [`crate::jira::JiraClient`] and by `MockIssueTracker` in tests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Return the stored query expression of a saved filter (may be empty).
    async fn filter_jql(&self, filter_id: &str) -> Result<String, TrackerError>;

    /// Run one page of a search.
    async fn search(
        &self,
        jql: &str,
        start_at: u64,
        max_results: u64,
    ) -> Result<SearchPage, TrackerError>;

    /// Browse URL for an issue key.
    fn browse_url(&self, key: &str) -> String;
}

/// Destination for finished release payloads.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ReleaseNotesSink: Send + Sync {
    /// Submit the payload; any non-2xx answer is an error.
    async fn submit(&self, payload: &ReleasePayload) -> Result<(), ForwardError>;
}
