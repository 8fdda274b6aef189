//! Cross-site rankings, one per metric.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// The three metrics sites are ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Speed,
    Accessibility,
    ReadingAge,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Speed, Metric::Accessibility, Metric::ReadingAge];

    /// Speed and accessibility are better when higher; a lower reading age
    /// means simpler text and is better.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Metric::ReadingAge)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Speed => "speed",
            Metric::Accessibility => "accessibility",
            Metric::ReadingAge => "reading age",
        })
    }
}

/// Per-site values for one metric, kept in the order sites were recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricValues(Vec<(String, f64)>);

impl MetricValues {
    /// Records `value` for `url`, replacing an earlier value in place.
    pub fn insert(&mut self, url: &str, value: f64) {
        match self.0.iter_mut().find(|(u, _)| u == url) {
            Some(entry) => entry.1 = value,
            None => self.0.push((url.to_string(), value)),
        }
    }

    pub fn get(&self, url: &str) -> Option<f64> {
        self.0.iter().find(|(u, _)| u == url).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(u, v)| (u.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricValues {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut values = MetricValues::default();
        for (url, value) in iter {
            values.insert(&url.into(), value);
        }
        values
    }
}

/// Per-site values for every metric, accumulated as sites are processed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreBoard {
    pub speed: MetricValues,
    pub accessibility: MetricValues,
    pub reading_age: MetricValues,
}

impl ScoreBoard {
    pub fn insert(&mut self, metric: Metric, url: &str, value: f64) {
        self.values_mut(metric).insert(url, value);
    }

    pub fn values(&self, metric: Metric) -> &MetricValues {
        match metric {
            Metric::Speed => &self.speed,
            Metric::Accessibility => &self.accessibility,
            Metric::ReadingAge => &self.reading_age,
        }
    }

    fn values_mut(&mut self, metric: Metric) -> &mut MetricValues {
        match metric {
            Metric::Speed => &mut self.speed,
            Metric::Accessibility => &mut self.accessibility,
            Metric::ReadingAge => &mut self.reading_age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSite {
    pub url: String,
    pub value: f64,
}

/// A site's place in one ranking. `position` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub position: usize,
    pub value: f64,
}

/// Sites ordered best first for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub metric: Metric,
    pub entries: Vec<RankedSite>,
}

impl Ranking {
    pub fn placement(&self, url: &str) -> Option<Placement> {
        self.entries
            .iter()
            .position(|e| e.url == url)
            .map(|position| Placement {
                position,
                value: self.entries[position].value,
            })
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Orders sites best first for `metric`.
///
/// The sort is stable, so equal values keep the order they were recorded in.
pub fn build_ranking(metric: Metric, values: &MetricValues) -> Ranking {
    let mut entries: Vec<RankedSite> = values
        .iter()
        .map(|(url, value)| RankedSite {
            url: url.to_string(),
            value,
        })
        .collect();

    let ascending = |a: &RankedSite, b: &RankedSite| -> Ordering { a.value.total_cmp(&b.value) };
    if metric.higher_is_better() {
        entries.sort_by(|a, b| ascending(b, a));
    } else {
        entries.sort_by(ascending);
    }

    Ranking { metric, entries }
}

/// The speed, accessibility and reading-age rankings for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub speed: Ranking,
    pub accessibility: Ranking,
    pub reading_age: Ranking,
}

impl Rankings {
    pub fn get(&self, metric: Metric) -> &Ranking {
        match metric {
            Metric::Speed => &self.speed,
            Metric::Accessibility => &self.accessibility,
            Metric::ReadingAge => &self.reading_age,
        }
    }
}

/// Builds one ranking per metric from the per-site averages.
pub fn build_rankings(averages: &ScoreBoard) -> Rankings {
    Rankings {
        speed: build_ranking(Metric::Speed, &averages.speed),
        accessibility: build_ranking(Metric::Accessibility, &averages.accessibility),
        reading_age: build_ranking(Metric::ReadingAge, &averages.reading_age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_and_accessibility_rank_descending() {
        let values = values(&[("a", 0.5), ("b", 0.9), ("c", 0.1)]);

        for metric in [Metric::Speed, Metric::Accessibility] {
            let ranking = build_ranking(metric, &values);
            assert_eq!(ranking.urls().collect::<Vec<_>>(), ["b", "a", "c"]);
        }
    }

    #[test]
    fn test_reading_age_ranks_ascending() {
        let ranking = build_ranking(
            Metric::ReadingAge,
            &values(&[("a", 14.0), ("b", 18.0), ("c", 10.0)]),
        );
        assert_eq!(ranking.urls().collect::<Vec<_>>(), ["c", "a", "b"]);
    }

    #[test]
    fn test_ties_keep_recorded_order() {
        let values = values(&[("a", 0.5), ("b", 0.7), ("c", 0.5), ("d", 0.5)]);

        let descending = build_ranking(Metric::Speed, &values);
        assert_eq!(descending.urls().collect::<Vec<_>>(), ["b", "a", "c", "d"]);

        let ascending = build_ranking(Metric::ReadingAge, &values);
        assert_eq!(ascending.urls().collect::<Vec<_>>(), ["a", "c", "d", "b"]);
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let values = values(&[("a", 0.3), ("b", 0.3), ("c", 0.8), ("d", 0.1)]);
        let first = build_ranking(Metric::Accessibility, &values);
        for _ in 0..10 {
            assert_eq!(build_ranking(Metric::Accessibility, &values), first);
        }
    }

    #[test]
    fn test_negated_values_reverse_descending_order() {
        let original = values(&[("a", 0.2), ("b", 0.9), ("c", 0.5)]);
        let negated: MetricValues = original.iter().map(|(u, v)| (u, -v)).collect();

        let forward: Vec<_> = build_ranking(Metric::Speed, &original)
            .urls()
            .map(str::to_string)
            .collect();
        let mut backward: Vec<_> = build_ranking(Metric::Speed, &negated)
            .urls()
            .map(str::to_string)
            .collect();
        backward.reverse();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_placement_lookup() {
        let ranking = build_ranking(Metric::Speed, &values(&[("a", 0.5), ("b", 0.9)]));

        assert_eq!(
            ranking.placement("a"),
            Some(Placement {
                position: 1,
                value: 0.5
            })
        );
        assert_eq!(ranking.placement("missing"), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut values = values(&[("a", 0.5), ("b", 0.9)]);
        values.insert("a", 0.1);

        assert_eq!(values.len(), 2);
        assert_eq!(values.iter().next(), Some(("a", 0.1)));
    }

    #[test]
    fn test_build_rankings_uses_each_metric() {
        let mut board = ScoreBoard::default();
        board.insert(Metric::Speed, "a", 0.4);
        board.insert(Metric::Speed, "b", 0.6);
        board.insert(Metric::ReadingAge, "a", 12.0);

        let rankings = build_rankings(&board);
        assert_eq!(rankings.get(Metric::Speed).urls().collect::<Vec<_>>(), ["b", "a"]);
        assert!(rankings.accessibility.is_empty());
        assert_eq!(rankings.reading_age.len(), 1);
    }

    fn values(pairs: &[(&str, f64)]) -> MetricValues {
        pairs.iter().map(|&(u, v)| (u, v)).collect()
    }
}
