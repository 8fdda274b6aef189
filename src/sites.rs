//! The list of monitored sites.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Longest file stem used for a site's report and screenshots.
const STUB_LEN: usize = 100;

/// A monitored website, identified by its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Government name")]
    pub name: String,
}

impl Site {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Parses the site list CSV (`URL`, `Government name` columns).
///
/// Rows with an empty URL are dropped; extra columns are ignored.
pub fn load_site_list(bytes: &[u8]) -> Result<Vec<Site>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut sites = Vec::new();
    for result in rdr.deserialize() {
        let site: Site = result?;
        if !site.url.is_empty() {
            sites.push(site);
        }
    }

    Ok(sites)
}

/// Makes a URL safe to use as a file name.
///
/// The scheme is dropped and every character outside `[A-Za-z0-9._-]`
/// becomes `_`.
pub fn clean_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The cleaned URL truncated to the length used for report file names.
pub fn url_stub(url: &str) -> String {
    clean_url(url).chars().take(STUB_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_site_list() {
        let csv = "URL,Government name,Region\n\
                   https://a.example/,Alpha,North\n\
                   ,Nobody,South\n\
                   https://b.example/covid , Beta ,East\n";

        let sites = load_site_list(csv.as_bytes()).unwrap();
        assert_eq!(
            sites,
            vec![
                Site::new("https://a.example/", "Alpha"),
                Site::new("https://b.example/covid", "Beta"),
            ]
        );
    }

    #[test]
    fn test_load_site_list_missing_column() {
        let csv = "URL\nhttps://a.example/\n";
        assert!(load_site_list(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_clean_url() {
        assert_eq!(
            clean_url("https://www.gov.example/page?id=2"),
            "www.gov.example_page_id_2"
        );
        assert_eq!(clean_url("http://a.example/"), "a.example_");
    }

    #[test]
    fn test_url_stub_truncates() {
        let long = format!("https://a.example/{}", "x".repeat(200));
        assert_eq!(url_stub(&long).len(), 100);
        assert_eq!(url_stub("https://a.example/"), "a.example_");
    }
}
