use std::env;

use docs_automation_core::config::{ReleaseNotesConfig, TrackerConfig, DEFAULT_JIRA_BASE_URL};
use serial_test::serial;

const VARS: [&str; 7] = [
    "RENOA_URL",
    "JIRA_BASE_URL",
    "OADP_JIRA_FILTER_RESOLVED",
    "OADP_JIRA_FILTER_KNOWN",
    "JIRA_USER",
    "JIRA_API_TOKEN",
    "JIRA_API_KEY",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_when_environment_is_empty() {
    clear_env();
    let tracker = TrackerConfig::from_env();
    assert_eq!(tracker.base_url, DEFAULT_JIRA_BASE_URL);
    assert!(!tracker.has_credentials());

    let release = ReleaseNotesConfig::from_env();
    assert_eq!(release.endpoint, None);
    assert!(release.resolved_filter_id.is_empty());
    assert!(release.known_filter_id.is_empty());
}

#[test]
#[serial]
fn api_key_is_used_when_token_missing() {
    clear_env();
    env::set_var("JIRA_BASE_URL", "https://jira.example.com/");
    env::set_var("JIRA_USER", "writer@example.com");
    env::set_var("JIRA_API_KEY", "key-123");

    let tracker = TrackerConfig::from_env();
    assert_eq!(tracker.base_url, "https://jira.example.com");
    assert_eq!(tracker.api_token.as_deref(), Some("key-123"));
    assert!(tracker.has_credentials());
    assert!(!format!("{tracker:?}").contains("key-123"));
    clear_env();
}

#[test]
#[serial]
fn release_settings_read_from_environment() {
    clear_env();
    env::set_var("RENOA_URL", "https://renoa.example.com/api/generate");
    env::set_var("OADP_JIRA_FILTER_RESOLVED", " 111 ");
    env::set_var("OADP_JIRA_FILTER_KNOWN", "");

    let release = ReleaseNotesConfig::from_env();
    assert_eq!(release.endpoint.as_deref(), Some("https://renoa.example.com/api/generate"));
    assert_eq!(release.resolved_filter_id, "111");
    assert!(release.known_filter_id.is_empty());
    clear_env();
}
