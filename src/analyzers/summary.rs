//! Per-site score statistics.

use crate::analyzers::series::DailyTimeSeries;
use crate::analyzers::utility::{max, mean};
use crate::error::RaterError;
use chrono::NaiveDate;
use serde::Serialize;

/// Max, mean and latest value for one metric.
///
/// Only built when at least one sample exists; `current` is the value on the
/// most recent snapshot date and may still be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub max: f64,
    pub average: f64,
    pub current: Option<f64>,
}

/// Summary statistics for one site plus the series they were computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteScoreSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<MetricSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<MetricSummary>,
    pub over_time: DailyTimeSeries,
}

impl SiteScoreSummary {
    /// Summary for a site with no audit data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn max_accessibility(&self) -> Option<f64> {
        self.accessibility.map(|m| m.max)
    }

    pub fn average_accessibility(&self) -> Option<f64> {
        self.accessibility.map(|m| m.average)
    }

    pub fn current_accessibility(&self) -> Option<f64> {
        self.accessibility.and_then(|m| m.current)
    }

    pub fn max_speed(&self) -> Option<f64> {
        self.speed.map(|m| m.max)
    }

    pub fn average_speed(&self) -> Option<f64> {
        self.speed.map(|m| m.average)
    }

    pub fn current_speed(&self) -> Option<f64> {
        self.speed.and_then(|m| m.current)
    }
}

/// Computes per-metric statistics over the non-absent samples of `series`.
///
/// `latest_date` is the most recent snapshot date; its entry supplies the
/// `current` values.
///
/// # Errors
///
/// Returns [`RaterError::Computation`] naming `url` if a sample is not a
/// finite number.
pub fn summarize(
    url: &str,
    series: DailyTimeSeries,
    latest_date: NaiveDate,
) -> Result<SiteScoreSummary, RaterError> {
    let latest = series.get(latest_date).copied().unwrap_or_default();

    let accessibility = metric_summary(
        url,
        "accessibility",
        &series.accessibility_values(),
        latest.accessibility,
    )?;
    let speed = metric_summary(url, "speed", &series.speed_values(), latest.speed)?;

    Ok(SiteScoreSummary {
        accessibility,
        speed,
        over_time: series,
    })
}

fn metric_summary(
    url: &str,
    metric: &str,
    values: &[f64],
    current: Option<f64>,
) -> Result<Option<MetricSummary>, RaterError> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(RaterError::Computation {
            url: url.to_string(),
            reason: format!("{metric} sample {bad} is not a finite number"),
        });
    }

    let (Some(highest), Some(average)) = (max(values), mean(values)) else {
        return Ok(None);
    };

    Ok(Some(MetricSummary {
        max: highest,
        average,
        current,
    }))
}
