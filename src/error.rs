//! Error types for the rating pipeline.

use thiserror::Error;

/// Failures raised while turning audit data into site summaries.
///
/// Missing metric samples and ranking misses are not errors: they surface as
/// `None` values instead.
#[derive(Error, Debug)]
pub enum RaterError {
    /// No audit or text-analysis data was found for the site.
    #[error("no audit data found for {url}")]
    MissingSiteData { url: String },

    /// Audit files exist for the site but none produced a dated snapshot.
    #[error("no dated snapshots for {url}, cannot derive a first date")]
    NoSnapshots { url: String },

    /// Anything else that went wrong while summarizing a site's scores.
    #[error("problem computing scores for {url}: {reason}")]
    Computation { url: String, reason: String },
}

impl RaterError {
    /// Returns `true` for the recoverable "nothing to summarize" conditions.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            RaterError::MissingSiteData { .. } | RaterError::NoSnapshots { .. }
        )
    }

    /// The site the error was raised for.
    pub fn url(&self) -> &str {
        match self {
            RaterError::MissingSiteData { url }
            | RaterError::NoSnapshots { url }
            | RaterError::Computation { url, .. } => url,
        }
    }
}
