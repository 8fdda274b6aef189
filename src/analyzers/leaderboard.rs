//! Blends the three rankings into a single leaderboard.

use crate::analyzers::ranking::{Metric, Placement, Rankings};
use crate::sites::Site;
use serde::Serialize;
use std::collections::HashSet;

/// How many times a ranking position counts towards the overall score.
/// Speed counts double.
static WEIGHTS: &[(Metric, i64)] = &[
    (Metric::Speed, 2),
    (Metric::Accessibility, 1),
    (Metric::ReadingAge, 1),
];

/// Shown in place of a placement for a site missing from a ranking.
pub const ABSENT_CELL: &str = "—";

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub url: String,
    pub name: String,
    pub speed: Option<Placement>,
    pub accessibility: Option<Placement>,
    pub reading_age: Option<Placement>,
    pub overall: i64,
}

impl LeaderboardEntry {
    pub fn placement(&self, metric: Metric) -> Option<Placement> {
        match metric {
            Metric::Speed => self.speed,
            Metric::Accessibility => self.accessibility,
            Metric::ReadingAge => self.reading_age,
        }
    }

    /// One-based rank for `metric`, or [`ABSENT_CELL`].
    pub fn rank_cell(&self, metric: Metric) -> String {
        self.placement(metric)
            .map(|p| (p.position + 1).to_string())
            .unwrap_or_else(|| ABSENT_CELL.to_string())
    }
}

/// Scores every listed site from its ranking positions and sorts the result.
///
/// With `N` listed sites, a site at zero-based position `p` in a ranking earns
/// `weight * (N - p)` for it. Rankings a site is missing from add nothing.
/// The output is sorted by `overall` descending; ties keep site-list order.
pub fn build_leaderboard(sites: &[Site], rankings: &Rankings) -> Vec<LeaderboardEntry> {
    let mut seen = HashSet::new();
    let listed: Vec<&Site> = sites.iter().filter(|s| seen.insert(s.url.as_str())).collect();
    let site_count = listed.len() as i64;

    let mut entries: Vec<LeaderboardEntry> = listed
        .into_iter()
        .map(|site| {
            let overall = WEIGHTS
                .iter()
                .filter_map(|&(metric, weight)| {
                    let placement = rankings.get(metric).placement(&site.url)?;
                    Some(weight * (site_count - placement.position as i64))
                })
                .sum();

            LeaderboardEntry {
                url: site.url.clone(),
                name: site.name.clone(),
                speed: rankings.speed.placement(&site.url),
                accessibility: rankings.accessibility.placement(&site.url),
                reading_age: rankings.reading_age.placement(&site.url),
                overall,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.overall.cmp(&a.overall));
    entries
}
