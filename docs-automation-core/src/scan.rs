//! Document discovery and classification for the shortdesc normaliser.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::contract::ShortdescError;
use crate::overrides::OverrideMap;
use crate::shortdesc::{derive_shortdesc_from_title, extract_title, has_abstract, FALLBACK_TITLE};

pub const DOC_EXTENSION: &str = "adoc";
/// Directories with this name are never scanned.
pub const EXCLUDED_DIR: &str = "website";

/// An AsciiDoc file found under the repo root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Repo-relative path with `/` separators; the key used for overrides and reports.
    pub rel_path: String,
    pub path: PathBuf,
}

impl Document {
    pub fn read(&self) -> Result<String, ShortdescError> {
        fs::read_to_string(&self.path).map_err(|source| ShortdescError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// `path` relative to `repo`, joined with `/`. `None` if `path` is outside `repo`.
pub fn relative_posix(repo: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(repo).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// All `*.adoc` files under `repo`, sorted by path, skipping `website` subtrees.
pub fn discover_documents(repo: &Path) -> Result<Vec<Document>, ShortdescError> {
    let mut documents = Vec::new();
    let walker = WalkDir::new(repo)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let excluded = e.depth() > 0 && e.file_type().is_dir() && e.file_name() == EXCLUDED_DIR;
            if excluded {
                debug!(path = %e.path().display(), "Skipping excluded directory");
            }
            !excluded
        });

    for entry in walker {
        let entry = entry.map_err(|source| ShortdescError::Walk {
            path: repo.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|e| e.to_str()) != Some(DOC_EXTENSION)
        {
            continue;
        }
        if let Some(rel_path) = relative_posix(repo, entry.path()) {
            documents.push(Document {
                rel_path,
                path: entry.into_path(),
            });
        }
    }

    info!(repo = %repo.display(), count = documents.len(), "Discovered documents");
    Ok(documents)
}

/// Shortdesc to insert for every document without an abstract marker.
///
/// A non-empty override wins; otherwise the value is derived from the document title,
/// or from a fallback title when the document has no heading.
pub fn collect_missing_shortdescs(
    documents: &[Document],
    overrides: &OverrideMap,
) -> Result<BTreeMap<String, String>, ShortdescError> {
    let mut missing = BTreeMap::new();
    for doc in documents {
        let content = doc.read()?;
        if has_abstract(&content) {
            continue;
        }
        let shortdesc = match overrides.get(&doc.rel_path).filter(|s| !s.is_empty()) {
            Some(value) => value.clone(),
            None => {
                let title = extract_title(&content).unwrap_or_else(|| FALLBACK_TITLE.to_string());
                derive_shortdesc_from_title(&title)
            }
        };
        debug!(path = %doc.rel_path, %shortdesc, "Document is missing a shortdesc");
        missing.insert(doc.rel_path.clone(), shortdesc);
    }
    Ok(missing)
}
