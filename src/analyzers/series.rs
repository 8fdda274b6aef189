//! Gap-filled daily time series of audit scores.

use crate::error::RaterError;
use crate::lighthouse::DatedSnapshots;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Scores recorded for one day. `None` means no audit ran or the category was missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyScores {
    pub accessibility: Option<f64>,
    pub speed: Option<f64>,
}

/// One entry per calendar day from a site's first snapshot through the run date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyTimeSeries {
    days: BTreeMap<NaiveDate, DailyScores>,
}

impl DailyTimeSeries {
    pub fn get(&self, date: NaiveDate) -> Option<&DailyScores> {
        self.days.get(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DailyScores)> {
        self.days.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn accessibility_values(&self) -> Vec<f64> {
        self.days.values().filter_map(|d| d.accessibility).collect()
    }

    pub fn speed_values(&self) -> Vec<f64> {
        self.days.values().filter_map(|d| d.speed).collect()
    }
}

impl FromIterator<(NaiveDate, DailyScores)> for DailyTimeSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, DailyScores)>>(iter: T) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Expands a site's snapshots into a [`DailyTimeSeries`] ending on `today`.
///
/// Days without a snapshot are recorded with both scores absent. If the
/// first snapshot is dated after `today` the series is empty.
///
/// # Errors
///
/// Returns [`RaterError::NoSnapshots`] when `snapshots` is empty.
pub fn extract_scores(
    url: &str,
    snapshots: &DatedSnapshots,
    today: NaiveDate,
) -> Result<DailyTimeSeries, RaterError> {
    let Some(first_date) = snapshots.keys().next().copied() else {
        return Err(RaterError::NoSnapshots {
            url: url.to_string(),
        });
    };

    let series = first_date
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| {
            let scores = snapshots
                .get(&day)
                .map(|s| DailyScores {
                    accessibility: s.accessibility,
                    speed: s.speed,
                })
                .unwrap_or_default();
            (day, scores)
        })
        .collect();

    Ok(series)
}
