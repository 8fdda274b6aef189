//! Report emission: per-site JSON, the index and the leaderboard CSV.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::leaderboard::LeaderboardEntry;
use crate::analyzers::ranking::Metric;
use crate::analyzers::types::RunReport;
use csv::WriterBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.json";
pub const LEADERBOARD_FILE: &str = "leaderboard.csv";

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    place: usize,
    name: &'a str,
    url: &'a str,
    speed: String,
    accessibility: String,
    reading_age: String,
    overall: i64,
}

/// Writes the leaderboard as CSV, one row per site in leaderboard order.
///
/// Ranks are one-based; a site missing from a ranking shows `—`.
pub fn write_leaderboard(path: &Path, entries: &[LeaderboardEntry]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for (i, entry) in entries.iter().enumerate() {
        writer.serialize(LeaderboardRow {
            place: i + 1,
            name: &entry.name,
            url: &entry.url,
            speed: entry.rank_cell(Metric::Speed),
            accessibility: entry.rank_cell(Metric::Accessibility),
            reading_age: entry.rank_cell(Metric::ReadingAge),
            overall: entry.overall,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes every report of a run into `dir` and returns the written paths.
pub fn write_run(dir: &Path, run: &RunReport) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(run.sites.len() + 2);

    for report in &run.sites {
        let path = dir.join(format!("{}.json", report.stub));
        write_json(&path, report)?;
        written.push(path);
    }

    let index_path = dir.join(INDEX_FILE);
    write_json(&index_path, &run.index())?;
    written.push(index_path);

    let leaderboard_path = dir.join(LEADERBOARD_FILE);
    write_leaderboard(&leaderboard_path, &run.leaderboard)?;
    written.push(leaderboard_path);

    info!(dir = %dir.display(), files = written.len(), "Reports written");
    Ok(written)
}
