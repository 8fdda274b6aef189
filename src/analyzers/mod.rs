//! Scoring, ranking and leaderboard composition.
//!
//! Snapshots become a gap-filled daily series per site, the series is
//! summarized, per-site averages are ranked per metric and the three rankings
//! are blended into one leaderboard.

pub mod analyzer;
pub mod leaderboard;
pub mod ranking;
pub mod reading_age;
pub mod series;
pub mod summary;
pub mod types;
pub mod utility;
pub mod writetos3;
