//! Text-analysis results produced by the reading-level extractor.

use crate::lighthouse::json_files;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Raw text-analysis output for one site.
///
/// Keyed by extraction method (e.g. `dragnet`), each holding a map of
/// analysis mode to value:
/// ```json
/// { "dragnet": { "standard": "7th and 8th grade", "flesch": 61.2 } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TextAnalysis {
    methods: HashMap<String, Value>,
}

impl TextAnalysis {
    /// Returns the string label recorded for `method` and `mode`, if any.
    pub fn label(&self, method: &str, mode: &str) -> Option<&str> {
        self.methods.get(method)?.get(mode)?.as_str()
    }
}

/// Text-analysis results for every site, keyed by site URL.
pub type LanguageData = HashMap<String, TextAnalysis>;

/// Loads the most recently modified `*.json` file in `dir`.
///
/// An empty directory yields empty data so the run can still complete.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_latest(dir: &Path) -> Result<LanguageData> {
    let Some(latest) = latest_file(dir)? else {
        warn!("No text-analysis files found, reading ages will be absent");
        return Ok(LanguageData::new());
    };

    let bytes = std::fs::read(&latest)
        .with_context(|| format!("failed to read {}", latest.display()))?;
    let data: LanguageData = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to decode {}", latest.display()))?;

    info!(file = %latest.display(), sites = data.len(), "Text analysis loaded");
    Ok(data)
}

fn latest_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for path in json_files(dir)? {
        let modified = std::fs::metadata(&path)?.modified()?;
        if latest.as_ref().is_none_or(|(seen, _)| modified >= *seen) {
            latest = Some((modified, path));
        }
    }

    Ok(latest.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_lookup() {
        let analysis: TextAnalysis = serde_json::from_value(json!({
            "dragnet": { "standard": "7th and 8th grade", "flesch": 61.2 },
            "trafilatura": "unexpected"
        }))
        .unwrap();

        assert_eq!(analysis.label("dragnet", "standard"), Some("7th and 8th grade"));
        assert_eq!(analysis.label("dragnet", "flesch"), None);
        assert_eq!(analysis.label("trafilatura", "standard"), None);
        assert_eq!(analysis.label("newspaper", "standard"), None);
    }

    #[test]
    fn test_load_latest_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_latest(dir.path()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_load_latest_reads_sites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2020-05-01.json"),
            r#"{"https://a.example/": {"dragnet": {"standard": "9th and 10th grade"}}}"#,
        )
        .unwrap();

        let data = load_latest(dir.path()).unwrap();
        assert_eq!(
            data["https://a.example/"].label("dragnet", "standard"),
            Some("9th and 10th grade")
        );
    }
}
