use std::env;
use std::time::Duration;

use tracing::{debug, info};

pub const DEFAULT_JIRA_BASE_URL: &str = "https://issues.redhat.com";
pub const TRACKER_TIMEOUT: Duration = Duration::from_secs(30);
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_RENOA_URL: &str = "RENOA_URL";
pub const ENV_JIRA_BASE_URL: &str = "JIRA_BASE_URL";
pub const ENV_FILTER_RESOLVED: &str = "OADP_JIRA_FILTER_RESOLVED";
pub const ENV_FILTER_KNOWN: &str = "OADP_JIRA_FILTER_KNOWN";
pub const ENV_JIRA_USER: &str = "JIRA_USER";
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_JIRA_API_KEY: &str = "JIRA_API_KEY";

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Connection settings for the issue tracker.
#[derive(Clone)]
pub struct TrackerConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub user: Option<String>,
    pub api_token: Option<String>,
}

// Keeps the token out of logs.
impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("api_token_set", &self.api_token.is_some())
            .finish()
    }
}

impl TrackerConfig {
    pub fn new(base_url: &str, user: Option<String>, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            user,
            api_token,
        }
    }

    /// Reads `JIRA_BASE_URL`, `JIRA_USER` and `JIRA_API_TOKEN` (falling back to `JIRA_API_KEY`).
    pub fn from_env() -> Self {
        let base_url =
            env_non_empty(ENV_JIRA_BASE_URL).unwrap_or_else(|| DEFAULT_JIRA_BASE_URL.to_string());
        let user = env_non_empty(ENV_JIRA_USER);
        let api_token = env_non_empty(ENV_JIRA_API_TOKEN).or_else(|| env_non_empty(ENV_JIRA_API_KEY));
        let config = Self::new(&base_url, user, api_token);
        debug!(?config, "Tracker configuration read from environment");
        config
    }

    pub fn has_credentials(&self) -> bool {
        self.user.is_some() && self.api_token.is_some()
    }
}

/// Settings for the release-notes run that do not concern the tracker connection.
#[derive(Debug, Clone, Default)]
pub struct ReleaseNotesConfig {
    /// Release-notes endpoint; `None` means payloads are printed, not sent.
    pub endpoint: Option<String>,
    /// Default filter IDs, overridable on the command line.
    pub resolved_filter_id: String,
    pub known_filter_id: String,
}

impl ReleaseNotesConfig {
    /// Reads `RENOA_URL`, `OADP_JIRA_FILTER_RESOLVED` and `OADP_JIRA_FILTER_KNOWN`.
    pub fn from_env() -> Self {
        let config = Self {
            endpoint: env_non_empty(ENV_RENOA_URL),
            resolved_filter_id: env_non_empty(ENV_FILTER_RESOLVED).unwrap_or_default(),
            known_filter_id: env_non_empty(ENV_FILTER_KNOWN).unwrap_or_default(),
        };
        info!(
            endpoint_set = config.endpoint.is_some(),
            resolved_filter_id = %config.resolved_filter_id,
            known_filter_id = %config.known_filter_id,
            "Release-notes configuration read from environment"
        );
        config
    }
}
