//! Command-line interface for docs-automation.
//!
//! Two subcommands, one per pipeline:
//! - `fix-shortdesc`: add missing `[role="_abstract"]` shortdescs to an AsciiDoc
//!   tree and fix abstracts that are too long or too short.
//! - `release-notes`: collect issue keys from saved JIRA filters and send them
//!   to the RENOA release-notes generator.
//!
//! All pipeline logic lives in `docs-automation-core`; this module parses
//! arguments, prints the user-facing report and turns failures into
//! `anyhow` errors (exit code 1).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docs_automation_core::normalize::normalize_repo;

use crate::release::{run_release_notes, ReleaseNotesArgs};

/// Default repo root for `fix-shortdesc`.
pub const DEFAULT_REPO: &str = ".";

/// CLI for docs-automation: shortdesc fixes and release-notes forwarding.
#[derive(Parser)]
#[clap(
    name = "docs-automation",
    version,
    about = "Fix AsciiDoc shortdescs and forward JIRA release notes to RENOA"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add missing [role="_abstract"] shortdescs or adjust their length
    FixShortdesc {
        /// Preview changes without writing files
        #[clap(long)]
        dry_run: bool,
        /// Repository root containing .adoc files
        #[clap(default_value = DEFAULT_REPO)]
        repo: PathBuf,
    },
    /// Fetch OADP JIRA issues from saved filters and send them to RENOA
    ReleaseNotes {
        /// OADP release number (e.g. 1.5.5); prompted for when missing
        #[clap(long, short)]
        release: Option<String>,
        /// Only fetch and print issues; do not call RENOA
        #[clap(long)]
        dry_run: bool,
        /// JIRA filter ID for resolved issues (overrides OADP_JIRA_FILTER_RESOLVED)
        #[clap(long)]
        resolved_filter: Option<String>,
        /// JIRA filter ID for known issues (overrides OADP_JIRA_FILTER_KNOWN)
        #[clap(long)]
        known_filter: Option<String>,
    },
}

/// Async entrypoint shared by `main` and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::FixShortdesc { dry_run, repo } => fix_shortdesc(repo, dry_run),
        Commands::ReleaseNotes {
            release,
            dry_run,
            resolved_filter,
            known_filter,
        } => {
            run_release_notes(ReleaseNotesArgs {
                release,
                dry_run,
                resolved_filter,
                known_filter,
            })
            .await
        }
    }
}

fn fix_shortdesc(repo: PathBuf, dry_run: bool) -> Result<()> {
    tracing::info!(command = "fix-shortdesc", repo = %repo.display(), dry_run, "Starting shortdesc fixes");
    let report = normalize_repo(&repo, dry_run)
        .with_context(|| format!("Shortdesc fixes failed for {}", repo.display()))?;

    if report.dry_run {
        println!("[DRY RUN] No files were written.");
    }
    for change in &report.changes {
        println!("{}: {}", change.kind, change.rel_path);
    }
    println!("Total changes: {}", report.total());
    Ok(())
}
