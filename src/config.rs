//! Run configuration: directory layout and the URL alias table.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where inputs are read from and reports are written to.
#[derive(Debug, Clone)]
pub struct RaterConfig {
    pub base: PathBuf,
    pub lighthouse: PathBuf,
    pub languages: PathBuf,
    pub reports: PathBuf,
    pub timelapses: PathBuf,
    pub loading: PathBuf,
}

impl RaterConfig {
    /// Derives the standard layout under `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let reports = base.join("reports");
        Self {
            lighthouse: base.join("lighthouse"),
            languages: base.join("languages"),
            timelapses: reports.join("timelapses"),
            loading: reports.join("loading"),
            reports,
            base,
        }
    }

    /// Creates the output directories if they do not exist yet.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [&self.reports, &self.timelapses] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Maps canonical site URLs to the URL their audits are filed under.
///
/// Some sites redirect, so Lighthouse records a different `finalUrl` than the
/// one in the site list. Stored as a plain JSON object on disk:
/// ```json
/// {
///   "https://health.example/covid": "https://health.example/covid/",
///   "https://old.example/": "https://new.example/"
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct UrlAliases {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl UrlAliases {
    /// Loads the alias table from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read aliases {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("failed to decode aliases {}", path.display()))?;
        Ok(Self::from_pairs(entries))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut aliases = Self::default();
        for (from, to) in pairs {
            let (from, to) = (from.into(), to.into());
            aliases.reverse.entry(to.clone()).or_insert_with(|| from.clone());
            aliases.forward.insert(from, to);
        }
        aliases
    }

    /// Picks the key audit data is filed under for `url`.
    ///
    /// `url` itself wins when `is_known` accepts it; otherwise the forward
    /// alias, then the reverse alias. Falls back to `url` unchanged.
    pub fn resolve<'a>(&'a self, url: &'a str, is_known: impl Fn(&str) -> bool) -> &'a str {
        if is_known(url) {
            return url;
        }
        [self.forward.get(url), self.reverse.get(url)]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|candidate| is_known(*candidate))
            .unwrap_or(url)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(urls: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |u: &str| urls.iter().any(|known| *known == u)
    }

    #[test]
    fn test_layout() {
        let config = RaterConfig::new("/data");
        assert_eq!(config.lighthouse, PathBuf::from("/data/lighthouse"));
        assert_eq!(config.languages, PathBuf::from("/data/languages"));
        assert_eq!(config.timelapses, PathBuf::from("/data/reports/timelapses"));
        assert_eq!(config.loading, PathBuf::from("/data/reports/loading"));
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let aliases = UrlAliases::from_pairs([("https://a.example", "https://a.example/")]);
        let resolved = aliases.resolve("https://a.example", known(&["https://a.example", "https://a.example/"]));
        assert_eq!(resolved, "https://a.example");
    }

    #[test]
    fn test_resolve_both_directions() {
        let aliases = UrlAliases::from_pairs([("https://old.example/", "https://new.example/")]);

        assert_eq!(
            aliases.resolve("https://old.example/", known(&["https://new.example/"])),
            "https://new.example/"
        );
        assert_eq!(
            aliases.resolve("https://new.example/", known(&["https://old.example/"])),
            "https://old.example/"
        );
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let aliases = UrlAliases::default();
        assert_eq!(aliases.resolve("https://x.example/", known(&[])), "https://x.example/");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, r#"{"https://a.example": "https://a.example/"}"#).unwrap();

        let aliases = UrlAliases::load(&path).unwrap();
        assert_eq!(aliases.len(), 1);
        assert!(UrlAliases::load(&dir.path().join("missing.json")).is_err());
    }
}
