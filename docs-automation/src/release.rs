//! `release-notes` subcommand: validate inputs, fetch issues, build and forward the payload.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use docs_automation_core::config::{ReleaseNotesConfig, TrackerConfig};
use docs_automation_core::contract::{IssueTracker, ReleaseNotesSink, ReleasePayload, SendOutcome};
use docs_automation_core::issues::fetch_issues_from_filter;
use docs_automation_core::jira::JiraClient;
use docs_automation_core::release_notes::{build_payload, forward, render_payload, RenoaClient};
use tracing::info;

/// Raw command-line values for `release-notes`.
#[derive(Debug, Default, Clone)]
pub struct ReleaseNotesArgs {
    pub release: Option<String>,
    pub dry_run: bool,
    pub resolved_filter: Option<String>,
    pub known_filter: Option<String>,
}

/// Validated inputs; at least one filter ID is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInputs {
    pub release: String,
    pub resolved_filter_id: String,
    pub known_filter_id: String,
}

/// Ask on stdout and read one trimmed line from stdin (empty on EOF).
pub fn prompt_stdin(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Fill in missing values from the environment defaults or by prompting, and reject
/// runs that cannot succeed. Nothing here touches the network.
pub fn resolve_inputs<P>(
    args: &ReleaseNotesArgs,
    settings: &ReleaseNotesConfig,
    tracker: &TrackerConfig,
    mut prompt: P,
) -> Result<ReleaseInputs>
where
    P: FnMut(&str) -> Result<String>,
{
    let release = match non_empty(args.release.clone()) {
        Some(release) => release,
        None => prompt("Enter OADP release number (e.g. 1.5.5): ")?,
    };
    if release.is_empty() {
        bail!("Release number is required.");
    }

    if !tracker.has_credentials() {
        bail!("Set JIRA_USER and JIRA_API_TOKEN (or JIRA_API_KEY) in the environment.");
    }

    let mut resolved_filter_id = non_empty(args.resolved_filter.clone())
        .unwrap_or_else(|| settings.resolved_filter_id.trim().to_string());
    let mut known_filter_id = non_empty(args.known_filter.clone())
        .unwrap_or_else(|| settings.known_filter_id.trim().to_string());

    if resolved_filter_id.is_empty() {
        resolved_filter_id = prompt("JIRA filter ID for Resolved issues (or leave blank to skip): ")?;
    }
    if known_filter_id.is_empty() {
        known_filter_id = prompt("JIRA filter ID for Known issues (or leave blank to skip): ")?;
    }
    if resolved_filter_id.is_empty() && known_filter_id.is_empty() {
        bail!("At least one JIRA filter ID is required (Resolved or Known issues).");
    }

    Ok(ReleaseInputs {
        release,
        resolved_filter_id,
        known_filter_id,
    })
}

/// How a release-notes run ended once its inputs were valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// `--dry-run`: the payload was printed and the endpoint was never called.
    DryRun(ReleasePayload),
    Forwarded(SendOutcome),
}

pub async fn run_release_notes(args: ReleaseNotesArgs) -> Result<()> {
    let settings = ReleaseNotesConfig::from_env();
    let tracker_config = TrackerConfig::from_env();
    let inputs = resolve_inputs(&args, &settings, &tracker_config, prompt_stdin)?;
    info!(command = "release-notes", release = %inputs.release, dry_run = args.dry_run, "Starting release-notes run");

    let tracker = JiraClient::new(tracker_config).context("Failed to construct JIRA client")?;
    let sink = settings
        .endpoint
        .map(RenoaClient::new)
        .transpose()
        .context("Failed to construct RENOA client")?;
    publish_release_notes(&tracker, sink.as_ref(), tracker.base_url(), &inputs, args.dry_run)
        .await?;
    Ok(())
}

/// Fetch both filters, build the payload and print it (`dry_run`) or forward it.
///
/// Fails when neither filter yields an issue. `base_url` is the tracker root used
/// for the filter links in the payload.
pub async fn publish_release_notes<T, S>(
    tracker: &T,
    sink: Option<&S>,
    base_url: &str,
    inputs: &ReleaseInputs,
    dry_run: bool,
) -> Result<ReleaseOutcome>
where
    T: IssueTracker + ?Sized,
    S: ReleaseNotesSink + ?Sized,
{
    println!("Release: {}", inputs.release);

    println!("Fetching Resolved issues...");
    let resolved = fetch_issues_from_filter(tracker, &inputs.resolved_filter_id)
        .await
        .context("Failed to fetch resolved issues")?;
    println!("  -> {} issues", resolved.len());

    println!("Fetching Known issues...");
    let known = fetch_issues_from_filter(tracker, &inputs.known_filter_id)
        .await
        .context("Failed to fetch known issues")?;
    println!("  -> {} issues", known.len());

    if resolved.is_empty() && known.is_empty() {
        bail!("No issues found. Check filter IDs and JIRA credentials.");
    }

    let payload = build_payload(
        base_url,
        &inputs.release,
        &resolved,
        &known,
        &inputs.resolved_filter_id,
        &inputs.known_filter_id,
    );

    if dry_run {
        println!("\n[DRY RUN] Payload that would be sent to RENOA:");
        println!("{}", render_payload(&payload)?);
        return Ok(ReleaseOutcome::DryRun(payload));
    }

    let outcome = forward(sink, &payload)
        .await
        .context("Failed to send payload to RENOA")?;
    match outcome {
        SendOutcome::Sent => println!("Successfully sent data to RENOA."),
        SendOutcome::NotSent => println!("RENOA URL not set; payload printed above."),
    }
    Ok(ReleaseOutcome::Forwarded(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_automation_core::contract::{
        ForwardError, MockIssueTracker, MockReleaseNotesSink, SearchHit, SearchPage,
    };

    const BASE: &str = "https://issues.example.com";

    fn inputs(resolved: &str, known: &str) -> ReleaseInputs {
        ReleaseInputs {
            release: "1.5.5".to_string(),
            resolved_filter_id: resolved.to_string(),
            known_filter_id: known.to_string(),
        }
    }

    /// Filter `"1"` matches OADP-1 and OADP-2; any other filter has an empty query.
    fn scripted_tracker() -> MockIssueTracker {
        let mut tracker = MockIssueTracker::new();
        tracker.expect_filter_jql().returning(|id| {
            Ok(if id == "1" { "project = OADP".to_string() } else { String::new() })
        });
        tracker.expect_search().returning(|_, _, _| {
            Ok(SearchPage {
                hits: ["OADP-1", "OADP-2"]
                    .into_iter()
                    .map(|key| SearchHit {
                        key: key.to_string(),
                        summary: format!("Summary of {key}"),
                    })
                    .collect(),
                total: 2,
            })
        });
        tracker
            .expect_browse_url()
            .returning(|key| format!("{BASE}/browse/{key}"));
        tracker
    }

    fn tracker(with_credentials: bool) -> TrackerConfig {
        let (user, token) = if with_credentials {
            (Some("writer".to_string()), Some("token".to_string()))
        } else {
            (None, None)
        };
        TrackerConfig::new("https://issues.example.com", user, token)
    }

    fn no_prompt(message: &str) -> Result<String> {
        panic!("unexpected prompt: {message}")
    }

    #[test]
    fn flags_override_environment_defaults() {
        let args = ReleaseNotesArgs {
            release: Some("1.5.5".to_string()),
            resolved_filter: Some("10".to_string()),
            ..Default::default()
        };
        let settings = ReleaseNotesConfig {
            endpoint: None,
            resolved_filter_id: "1".to_string(),
            known_filter_id: "2".to_string(),
        };
        let inputs = resolve_inputs(&args, &settings, &tracker(true), no_prompt).unwrap();
        assert_eq!(inputs.release, "1.5.5");
        assert_eq!(inputs.resolved_filter_id, "10");
        assert_eq!(inputs.known_filter_id, "2");
    }

    #[test]
    fn prompts_for_missing_values() {
        let mut answers = vec!["", "33", "1.6.0"];
        let inputs = resolve_inputs(
            &ReleaseNotesArgs::default(),
            &ReleaseNotesConfig::default(),
            &tracker(true),
            |_| Ok(answers.pop().unwrap_or_default().to_string()),
        )
        .unwrap();
        assert_eq!(inputs.release, "1.6.0");
        assert_eq!(inputs.resolved_filter_id, "33");
        assert_eq!(inputs.known_filter_id, "");
    }

    #[test]
    fn missing_release_is_rejected() {
        let err = resolve_inputs(
            &ReleaseNotesArgs::default(),
            &ReleaseNotesConfig::default(),
            &tracker(true),
            |_| Ok(String::new()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Release number is required"));
    }

    #[test]
    fn missing_credentials_are_rejected_before_filters() {
        let args = ReleaseNotesArgs {
            release: Some("1.5.5".to_string()),
            ..Default::default()
        };
        let err = resolve_inputs(&args, &ReleaseNotesConfig::default(), &tracker(false), no_prompt)
            .unwrap_err();
        assert!(err.to_string().contains("JIRA_USER"));
    }

    #[test]
    fn both_filters_blank_is_rejected() {
        let args = ReleaseNotesArgs {
            release: Some("1.5.5".to_string()),
            ..Default::default()
        };
        let err = resolve_inputs(&args, &ReleaseNotesConfig::default(), &tracker(true), |_| {
            Ok(String::new())
        })
        .unwrap_err();
        assert!(err.to_string().contains("At least one JIRA filter ID"));
    }

    #[tokio::test]
    async fn empty_filters_fail_without_forwarding() {
        let mut tracker = MockIssueTracker::new();
        tracker
            .expect_filter_jql()
            .times(2)
            .returning(|_| Ok(String::new()));
        tracker.expect_search().never();
        let mut sink = MockReleaseNotesSink::new();
        sink.expect_submit().never();

        let err = publish_release_notes(&tracker, Some(&sink), BASE, &inputs("1", "2"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No issues found"));
    }

    #[tokio::test]
    async fn dry_run_never_calls_endpoint() {
        let mut sink = MockReleaseNotesSink::new();
        sink.expect_submit().never();

        let tracker = scripted_tracker();
        let outcome = publish_release_notes(&tracker, Some(&sink), BASE, &inputs("1", ""), true)
            .await
            .unwrap();
        let ReleaseOutcome::DryRun(payload) = &outcome else {
            panic!("expected a dry run, got {outcome:?}");
        };
        assert_eq!(payload.resolved_issues, vec!["OADP-1", "OADP-2"]);
        assert!(payload.known_issues.is_empty());
        assert_eq!(
            payload.resolved_filter_url.as_deref(),
            Some("https://issues.example.com/issues/?filter=1")
        );
        assert_eq!(payload.known_filter_url, None);
    }

    #[tokio::test]
    async fn payload_is_sent_to_configured_sink() {
        let mut sink = MockReleaseNotesSink::new();
        sink.expect_submit()
            .withf(|p| p.release == "1.5.5" && p.known_issues == vec!["OADP-1", "OADP-2"])
            .times(1)
            .returning(|_| Ok(()));

        let tracker = scripted_tracker();
        let outcome = publish_release_notes(&tracker, Some(&sink), BASE, &inputs("", "1"), false)
            .await
            .unwrap();
        assert_eq!(outcome, ReleaseOutcome::Forwarded(SendOutcome::Sent));
    }

    #[tokio::test]
    async fn missing_endpoint_reports_not_sent() {
        let outcome = publish_release_notes::<_, MockReleaseNotesSink>(
            &scripted_tracker(),
            None,
            BASE,
            &inputs("1", "1"),
            false,
        )
        .await
        .unwrap();
        assert_eq!(outcome, ReleaseOutcome::Forwarded(SendOutcome::NotSent));
    }

    #[tokio::test]
    async fn sink_failure_is_reported() {
        let mut sink = MockReleaseNotesSink::new();
        sink.expect_submit().times(1).returning(|_| {
            Err(ForwardError::Status {
                url: "https://renoa.example.com/api/generate".to_string(),
                status: 500,
                body: "boom".to_string(),
            })
        });

        let tracker = scripted_tracker();
        let err = publish_release_notes(&tracker, Some(&sink), BASE, &inputs("1", ""), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to send payload to RENOA"));
    }
}
