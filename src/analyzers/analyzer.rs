use crate::analyzers::leaderboard::build_leaderboard;
use crate::analyzers::ranking::{Metric, ScoreBoard, build_rankings};
use crate::analyzers::reading_age::resolve_reading_age;
use crate::analyzers::series::extract_scores;
use crate::analyzers::summary::{SiteScoreSummary, summarize};
use crate::analyzers::types::{RunReport, SiteReport};
use crate::config::{RaterConfig, UrlAliases};
use crate::error::RaterError;
use crate::language::{self, LanguageData};
use crate::lighthouse::{DatedSnapshots, LighthouseIndex, load_site_snapshots};
use crate::sites::{Site, clean_url, url_stub};
use crate::timelapse::{generate_timelapse, loading_video_link};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Supplies date-indexed audit snapshots for a site.
pub trait AuditSource {
    /// Snapshots filed for `url`, or `None` if the site has no audit data.
    fn snapshots(&self, url: &str) -> Option<DatedSnapshots>;
}

impl AuditSource for HashMap<String, DatedSnapshots> {
    fn snapshots(&self, url: &str) -> Option<DatedSnapshots> {
        self.get(url).cloned()
    }
}

/// Lighthouse reports on disk, looked up through the URL alias table.
pub struct LighthouseStore {
    index: LighthouseIndex,
    aliases: UrlAliases,
}

impl LighthouseStore {
    pub fn new(index: LighthouseIndex, aliases: UrlAliases) -> Self {
        Self { index, aliases }
    }
}

impl AuditSource for LighthouseStore {
    fn snapshots(&self, url: &str) -> Option<DatedSnapshots> {
        let key = self.aliases.resolve(url, |u| self.index.contains(u));
        if key != url {
            debug!(site = url, filed_under = key, "Resolved URL alias");
        }
        let files = self.index.get(key)?;
        Some(load_site_snapshots(files))
    }
}

/// Builds the score summary for one site.
///
/// # Errors
///
/// [`RaterError::MissingSiteData`] or [`RaterError::NoSnapshots`] when there
/// is nothing to summarize; [`RaterError::Computation`] when the scores
/// themselves are unusable.
pub fn rate_site(
    url: &str,
    audits: &impl AuditSource,
    today: NaiveDate,
) -> Result<SiteScoreSummary, RaterError> {
    let snapshots = audits
        .snapshots(url)
        .ok_or_else(|| RaterError::MissingSiteData {
            url: url.to_string(),
        })?;

    let series = extract_scores(url, &snapshots, today)?;
    let latest_date = snapshots
        .keys()
        .next_back()
        .copied()
        .ok_or_else(|| RaterError::NoSnapshots {
            url: url.to_string(),
        })?;

    summarize(url, series, latest_date)
}

/// Rates every site in list order and composes the rankings and leaderboard.
///
/// Sites without data get an empty summary. A site whose summary cannot be
/// computed is logged, gets no report and contributes no values, but is still
/// listed on the leaderboard.
pub fn rate_sites(
    sites: &[Site],
    audits: &impl AuditSource,
    language: &LanguageData,
    today: NaiveDate,
) -> RunReport {
    let mut reports = Vec::with_capacity(sites.len());
    let mut failed = Vec::new();
    let mut averages = ScoreBoard::default();
    let mut top = ScoreBoard::default();

    for site in sites {
        let summary = match rate_site(&site.url, audits, today) {
            Ok(summary) => summary,
            Err(e) if e.is_missing_data() => {
                warn!(site = %site.url, error = %e, "No sign of lighthouse data");
                SiteScoreSummary::empty()
            }
            Err(e) => {
                error!(site = %site.url, error = %e, "Failed to summarize site scores");
                failed.push(site.url.clone());
                continue;
            }
        };

        let reading_age = match language.get(&site.url) {
            Some(analysis) => resolve_reading_age(analysis),
            None => {
                debug!(site = %site.url, "No text analysis for site");
                None
            }
        };

        record(&mut averages, &site.url, [
            (Metric::Speed, summary.average_speed()),
            (Metric::Accessibility, summary.average_accessibility()),
            (Metric::ReadingAge, reading_age.map(f64::from)),
        ]);
        record(&mut top, &site.url, [
            (Metric::Speed, summary.max_speed()),
            (Metric::Accessibility, summary.max_accessibility()),
            (Metric::ReadingAge, reading_age.map(f64::from)),
        ]);

        info!(site = %site.url, days = summary.over_time.len(), ?reading_age, "Produced report");

        reports.push(SiteReport {
            url: site.url.clone(),
            name: site.name.clone(),
            stub: url_stub(&site.url),
            summary,
            reading_age,
            timelapse_url: None,
            video_url: None,
        });
    }

    let rankings = build_rankings(&averages);
    let leaderboard = build_leaderboard(sites, &rankings);

    info!(
        sites = sites.len(),
        reports = reports.len(),
        failed = failed.len(),
        "Rating complete"
    );

    RunReport {
        generated_at: Utc::now(),
        sites: reports,
        failed,
        averages,
        top,
        rankings,
        leaderboard,
    }
}

/// Loads the inputs described by `config` and rates `sites`.
pub fn rate_from_disk(
    config: &RaterConfig,
    sites: &[Site],
    aliases: UrlAliases,
    today: NaiveDate,
) -> Result<RunReport> {
    let index = LighthouseIndex::load(&config.lighthouse)?;
    let language = language::load_latest(&config.languages)?;
    let store = LighthouseStore::new(index, aliases);

    Ok(rate_sites(sites, &store, &language, today))
}

/// Fills in timelapse and page-load recording links for every site report.
///
/// Timelapse generation shells out to GraphicsMagick and only runs when
/// `timelapses` is set. Failures are logged and leave the link empty.
pub fn attach_media(run: &mut RunReport, config: &RaterConfig, timelapses: bool) {
    for report in &mut run.sites {
        if timelapses {
            report.timelapse_url = generate_timelapse(&config.base, &config.timelapses, &report.stub)
                .unwrap_or_else(|e| {
                    warn!(site = %report.url, error = %e, "Timelapse generation failed");
                    None
                });
        }
        report.video_url = loading_video_link(&config.loading, &clean_url(&report.url));
    }
}

fn record<const N: usize>(board: &mut ScoreBoard, url: &str, values: [(Metric, Option<f64>); N]) {
    for (metric, value) in values {
        if let Some(value) = value {
            board.insert(metric, url, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighthouse::AuditSnapshot;

    #[test]
    fn test_missing_site_gets_empty_summary() {
        let audits: HashMap<String, DatedSnapshots> = HashMap::new();
        let sites = vec![Site::new("https://gone.example/", "Gone")];

        let report = rate_sites(&sites, &audits, &LanguageData::new(), date(10));

        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.sites[0].summary, SiteScoreSummary::empty());
        assert_eq!(report.leaderboard.len(), 1);
        assert_eq!(report.leaderboard[0].overall, 0);
        assert!(report.averages.speed.is_empty());
    }

    #[test]
    fn test_rates_and_ranks_sites() {
        let mut audits = HashMap::new();
        audits.insert("https://a.example/".to_string(), snapshots(&[(1, 0.9, 0.2), (3, 0.7, 0.4)]));
        audits.insert("https://b.example/".to_string(), snapshots(&[(2, 0.5, 0.8)]));

        let language: LanguageData = serde_json::from_value(serde_json::json!({
            "https://a.example/": { "dragnet": { "standard": "7th and 8th grade" } },
            "https://b.example/": { "trafilatura": { "standard": "10th and 11th grade" } }
        }))
        .unwrap();

        let sites = vec![
            Site::new("https://a.example/", "Alpha"),
            Site::new("https://b.example/", "Beta"),
        ];

        let report = rate_sites(&sites, &audits, &language, date(5));

        let a = report.site("https://a.example/").unwrap();
        assert_eq!(a.summary.over_time.len(), 5);
        assert_eq!(a.summary.current_accessibility(), Some(0.7));
        assert_eq!(a.reading_age, Some(12));

        // Speed: B (0.8) > A (0.3). Accessibility: A (0.8) > B (0.5).
        // Reading age: A (12) < B (15).
        assert_eq!(report.rankings.speed.urls().next(), Some("https://b.example/"));
        assert_eq!(report.leaderboard[0].url, "https://a.example/");
        assert_eq!(report.leaderboard[0].overall, 2 + 2 + 2);
        assert_eq!(report.leaderboard[1].overall, 4 + 1 + 1);
        assert_eq!(report.top.accessibility.get("https://a.example/"), Some(0.9));
    }

    #[test]
    fn test_computation_failure_skips_only_that_site() {
        let mut audits = HashMap::new();
        audits.insert("https://bad.example/".to_string(), snapshots(&[(1, f64::NAN, 0.5)]));
        audits.insert("https://ok.example/".to_string(), snapshots(&[(1, 0.5, 0.5)]));
        let sites = vec![
            Site::new("https://bad.example/", "Bad"),
            Site::new("https://ok.example/", "Ok"),
        ];

        let report = rate_sites(&sites, &audits, &LanguageData::new(), date(2));

        assert_eq!(report.failed, ["https://bad.example/"]);
        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.leaderboard.len(), 2);
        assert_eq!(report.leaderboard[0].url, "https://ok.example/");
    }

    #[test]
    fn test_store_resolves_aliases() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("r.json"),
            r#"{"finalUrl":"https://new.example/","fetchTime":"2020-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        let index = LighthouseIndex::load(dir.path()).unwrap();
        let store = LighthouseStore::new(
            index,
            UrlAliases::from_pairs([("https://old.example/", "https://new.example/")]),
        );

        assert_eq!(store.snapshots("https://old.example/").map(|s| s.len()), Some(1));
        assert!(store.snapshots("https://other.example/").is_none());
    }

    // Helper functions for tests
    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, day).unwrap()
    }

    fn snapshots(rows: &[(u32, f64, f64)]) -> DatedSnapshots {
        rows.iter()
            .map(|&(day, accessibility, speed)| {
                (
                    date(day),
                    AuditSnapshot {
                        final_url: String::new(),
                        date: date(day),
                        accessibility: Some(accessibility),
                        speed: Some(speed),
                    },
                )
            })
            .collect()
    }
}
