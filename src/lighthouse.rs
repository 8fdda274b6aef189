//! Lighthouse report decoding and discovery.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One audit result for one site on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSnapshot {
    pub final_url: String,
    pub date: NaiveDate,
    pub accessibility: Option<f64>,
    /// Lighthouse "performance" category score.
    pub speed: Option<f64>,
}

/// Snapshots for one site keyed by the date they were fetched.
pub type DatedSnapshots = BTreeMap<NaiveDate, AuditSnapshot>;

#[derive(Deserialize)]
struct LighthouseReport {
    #[serde(rename = "finalUrl")]
    final_url: String,
    #[serde(rename = "fetchTime")]
    fetch_time: String,
    #[serde(default)]
    categories: Categories,
}

#[derive(Default, Deserialize)]
struct Categories {
    accessibility: Option<Category>,
    performance: Option<Category>,
}

#[derive(Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Deserialize)]
struct ReportUrl {
    #[serde(rename = "finalUrl")]
    final_url: String,
}

/// Decodes a Lighthouse JSON report into an [`AuditSnapshot`].
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON report with `finalUrl` and a
/// `fetchTime` starting with a `YYYY-MM-DD` date.
pub fn parse_snapshot(bytes: &[u8]) -> Result<AuditSnapshot> {
    let report: LighthouseReport = serde_json::from_slice(bytes)?;
    let day = report
        .fetch_time
        .split('T')
        .next()
        .unwrap_or_default();
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("invalid fetchTime '{}'", report.fetch_time))?;

    Ok(AuditSnapshot {
        final_url: report.final_url,
        date,
        accessibility: report.categories.accessibility.and_then(|c| c.score),
        speed: report.categories.performance.and_then(|c| c.score),
    })
}

/// Report files on disk grouped by the URL Lighthouse finally landed on.
#[derive(Debug, Default)]
pub struct LighthouseIndex {
    files: HashMap<String, Vec<PathBuf>>,
}

impl LighthouseIndex {
    /// Scans `dir` for `*.json` reports and groups them by `finalUrl`.
    ///
    /// Files that cannot be read or lack `finalUrl` are logged and skipped.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self> {
        let mut index = Self::default();
        for path in json_files(dir)? {
            match read_final_url(&path) {
                Ok(url) => index.insert(url, path),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping lighthouse report"),
            }
        }

        info!(sites = index.files.len(), "Lighthouse index built");
        Ok(index)
    }

    pub fn insert(&mut self, url: String, path: PathBuf) {
        self.files.entry(url).or_default().push(path);
    }

    pub fn get(&self, url: &str) -> Option<&[PathBuf]> {
        self.files.get(url).map(Vec::as_slice)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.files.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Every `*.json` file directly inside `dir`, in path order.
pub(crate) fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .with_context(|| format!("non UTF-8 path {}", dir.display()))?;
    let pattern = format!("{}/*.json", glob::Pattern::escape(dir_str));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!(error = %e, "Skipping unreadable directory entry"),
        }
    }
    Ok(files)
}

fn read_final_url(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let report: ReportUrl = serde_json::from_slice(&bytes)?;
    Ok(report.final_url)
}

/// Loads every report in `files` and indexes them by fetch date.
///
/// When several reports share a date, the one loaded last wins.
pub fn load_site_snapshots(files: &[PathBuf]) -> DatedSnapshots {
    let mut snapshots = DatedSnapshots::new();

    for path in files {
        let parsed = std::fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| parse_snapshot(&bytes));
        match parsed {
            Ok(snapshot) => {
                debug!(path = %path.display(), date = %snapshot.date, "Snapshot loaded");
                snapshots.insert(snapshot.date, snapshot);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping lighthouse report"),
        }
    }

    snapshots
}
