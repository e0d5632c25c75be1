//! Shortdesc normaliser: inserts missing abstracts and fixes their length.
//!
//! A run over a repo is two passes over the same document list:
//!
//! 1. Documents without a `[role="_abstract"]` marker get one, filled from the
//!    override map or derived from the title.
//! 2. Documents that already had a marker get their paragraph shortened or padded
//!    when it falls outside the allowed length.
//!
//! Each document is rewritten at most once per pass, in place. In dry-run mode the
//! same decisions are made and reported but nothing is written. A second run over
//! an already-normalised tree reports no changes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::contract::ShortdescError;
use crate::overrides::load_overrides;
use crate::scan::{collect_missing_shortdescs, discover_documents, Document};
use crate::shortdesc::{
    add_abstract, char_len, expand_paragraph, extract_title, first_paragraph_after_abstract,
    has_abstract, replace_paragraph, shorten_paragraph, SHORTDESC_MAX, SHORTDESC_MIN,
    SHORTEN_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Abstract block added after the title.
    Inserted,
    Shortened,
    Expanded,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Inserted => "Fixed",
            ChangeKind::Shortened => "Shortened",
            ChangeKind::Expanded => "Expanded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub rel_path: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Default)]
pub struct NormalizeReport {
    pub changes: Vec<Change>,
    pub dry_run: bool,
}

impl NormalizeReport {
    pub fn total(&self) -> usize {
        self.changes.len()
    }
}

/// Decide which edit, if any, applies to `content`.
///
/// `missing_shortdesc` is the value to insert when the document has no abstract.
/// Returns the kind of change and the new text; `None` leaves the document as is.
pub fn plan_edit(content: &str, missing_shortdesc: Option<&str>) -> Option<(ChangeKind, String)> {
    if !has_abstract(content) {
        let shortdesc = missing_shortdesc.filter(|s| !s.is_empty())?;
        extract_title(content)?;
        let updated = add_abstract(content, shortdesc);
        return (updated != content).then_some((ChangeKind::Inserted, updated));
    }

    let para = first_paragraph_after_abstract(content)?;
    let len = char_len(&para.text);
    if len > SHORTDESC_MAX {
        let shortened = shorten_paragraph(&para.text, SHORTEN_LIMIT);
        (shortened != para.text)
            .then(|| (ChangeKind::Shortened, replace_paragraph(content, &para, &shortened)))
    } else if len < SHORTDESC_MIN {
        let expanded = expand_paragraph(&para.text);
        if expanded.is_none() {
            debug!(len, "Padded shortdesc still below minimum, leaving it unchanged");
        }
        expanded.map(|text| (ChangeKind::Expanded, replace_paragraph(content, &para, &text)))
    } else {
        None
    }
}

/// Apply [`plan_edit`] to one file, writing it unless `dry_run`.
pub fn fix_document(
    doc: &Document,
    missing_shortdesc: Option<&str>,
    dry_run: bool,
) -> Result<Option<ChangeKind>, ShortdescError> {
    let content = doc.read()?;
    let Some((kind, updated)) = plan_edit(&content, missing_shortdesc) else {
        return Ok(None);
    };
    if !dry_run {
        fs::write(&doc.path, updated).map_err(|source| ShortdescError::Io {
            path: doc.path.clone(),
            source,
        })?;
    }
    info!(path = %doc.rel_path, change = %kind, dry_run, "Shortdesc updated");
    Ok(Some(kind))
}

/// Normalise every document under `repo`.
pub fn normalize_repo(repo: &Path, dry_run: bool) -> Result<NormalizeReport, ShortdescError> {
    if !repo.is_dir() {
        return Err(ShortdescError::NotADirectory(repo.to_path_buf()));
    }

    let overrides = load_overrides(repo)?;
    let documents = discover_documents(repo)?;
    let missing: BTreeMap<String, String> = collect_missing_shortdescs(&documents, &overrides)?;
    info!(
        documents = documents.len(),
        missing = missing.len(),
        dry_run,
        "Starting shortdesc normalisation"
    );

    let mut report = NormalizeReport {
        changes: Vec::new(),
        dry_run,
    };
    let mut record = |doc: &Document, kind: Option<ChangeKind>| {
        if let Some(kind) = kind {
            report.changes.push(Change {
                rel_path: doc.rel_path.clone(),
                kind,
            });
        }
    };

    for doc in documents.iter().filter(|d| missing.contains_key(&d.rel_path)) {
        let shortdesc = missing.get(&doc.rel_path).map(String::as_str);
        record(doc, fix_document(doc, shortdesc, dry_run)?);
    }
    for doc in documents.iter().filter(|d| !missing.contains_key(&d.rel_path)) {
        record(doc, fix_document(doc, None, dry_run)?);
    }

    info!(total = report.total(), "Shortdesc normalisation finished");
    Ok(report)
}
