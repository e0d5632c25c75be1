//! Optional per-document shortdesc overrides.
//!
//! The file `shortdesc_overrides.csv` in the repo root maps a repo-relative,
//! `/`-separated document path to the shortdesc to insert for it. There is no
//! header row; rows with fewer than two columns are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::contract::ShortdescError;

pub const OVERRIDES_FILENAME: &str = "shortdesc_overrides.csv";

/// Document path -> override shortdesc.
pub type OverrideMap = BTreeMap<String, String>;

/// Load overrides from `repo/shortdesc_overrides.csv`; an absent file yields an empty map.
pub fn load_overrides(repo: &Path) -> Result<OverrideMap, ShortdescError> {
    let path = repo.join(OVERRIDES_FILENAME);
    let mut overrides = OverrideMap::new();
    if !path.is_file() {
        debug!(path = %path.display(), "No override file present");
        return Ok(overrides);
    }

    let csv_err = |source| ShortdescError::Csv {
        path: path.clone(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .map_err(csv_err)?;

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if let (Some(doc), Some(shortdesc)) = (record.get(0), record.get(1)) {
            overrides.insert(doc.trim().to_string(), shortdesc.trim().to_string());
        }
    }

    info!(path = %path.display(), count = overrides.len(), "Loaded shortdesc overrides");
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_gives_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_overrides(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn reads_quoted_rows_and_skips_short_ones() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(OVERRIDES_FILENAME),
            "modules/a.adoc, Plain override text \n\
             \"modules/b.adoc\",\"Backs up, then restores.\"\n\
             lonely-column\n",
        )
        .unwrap();

        let overrides = load_overrides(dir.path()).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["modules/a.adoc"], "Plain override text");
        assert_eq!(overrides["modules/b.adoc"], "Backs up, then restores.");
    }
}
