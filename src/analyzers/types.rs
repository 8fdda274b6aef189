//! Data types emitted by the rating pipeline.

use crate::analyzers::leaderboard::LeaderboardEntry;
use crate::analyzers::ranking::{Rankings, ScoreBoard};
use crate::analyzers::summary::SiteScoreSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything known about one site for this run, written as `<stub>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub url: String,
    pub name: String,
    /// File stem for this site's report and screenshots.
    pub stub: String,
    pub summary: SiteScoreSummary,
    pub reading_age: Option<u8>,
    pub timelapse_url: Option<String>,
    pub video_url: Option<String>,
}

impl SiteReport {
    /// Path of the rendered detail page, relative to the site root.
    pub fn detail_path(&self) -> String {
        format!("/{}.html", self.stub)
    }
}

/// Directory entry for a site in the index.
#[derive(Debug, Clone, Serialize)]
pub struct SiteListing {
    pub url: String,
    pub name: String,
    pub detail: String,
}

/// Top-level index of a run, served as `index.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportIndex {
    pub generated_at: DateTime<Utc>,
    pub sites: Vec<SiteListing>,
    pub rankings: Rankings,
    pub averages: ScoreBoard,
    pub top: ScoreBoard,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Complete result of rating every site.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub sites: Vec<SiteReport>,
    /// Sites whose summary could not be computed.
    pub failed: Vec<String>,
    pub averages: ScoreBoard,
    pub top: ScoreBoard,
    pub rankings: Rankings,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl RunReport {
    pub fn index(&self) -> ReportIndex {
        ReportIndex {
            generated_at: self.generated_at,
            sites: self
                .sites
                .iter()
                .map(|r| SiteListing {
                    url: r.url.clone(),
                    name: r.name.clone(),
                    detail: r.detail_path(),
                })
                .collect(),
            rankings: self.rankings.clone(),
            averages: self.averages.clone(),
            top: self.top.clone(),
            leaderboard: self.leaderboard.clone(),
        }
    }

    pub fn site(&self, url: &str) -> Option<&SiteReport> {
        self.sites.iter().find(|r| r.url == url)
    }
}
