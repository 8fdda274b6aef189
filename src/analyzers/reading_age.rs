//! Reading-level labels to approximate comprehension ages.

use crate::language::TextAnalysis;
use regex::Regex;
use std::sync::LazyLock;

/// Extraction methods tried in order.
const METHODS: [&str; 2] = ["dragnet", "trafilatura"];
const MODE: &str = "standard";
/// Label the analyzer emits when a page had no readable text.
const NO_CONTENT: &str = "-1th and 0th grade";

const OLDEST_AGE: u8 = 18;
const GRADE_TO_AGE: u8 = 5;

static GRADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("grade pattern is valid"));

/// Picks the reading-level label for a site.
///
/// Uses the first extraction method that recorded a `standard` label. The
/// "no readable content" sentinel is treated as absent.
pub fn find_reading_level(analysis: &TextAnalysis) -> Option<&str> {
    let label = METHODS
        .iter()
        .find_map(|method| analysis.label(method, MODE))?;

    (label != NO_CONTENT).then_some(label)
}

/// Maps a grade-level label such as `"7th and 8th grade"` to an approximate age.
///
/// The first integer in the label is the grade. Grades 1–12 map to
/// `grade + 5`; anything above 12 maps to 18. Zero, negative or missing
/// grades yield `None`.
pub fn translate_reading_age(label: &str) -> Option<u8> {
    let grade: i64 = GRADE.find(label)?.as_str().parse().ok()?;

    match grade {
        1..=12 => Some(grade as u8 + GRADE_TO_AGE),
        g if g > 12 => Some(OLDEST_AGE),
        _ => None,
    }
}

/// Approximate comprehension age for a site's text, if one can be derived.
pub fn resolve_reading_age(analysis: &TextAnalysis) -> Option<u8> {
    find_reading_level(analysis).and_then(translate_reading_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_translate_grades() {
        assert_eq!(translate_reading_age("7th and 8th grade"), Some(12));
        assert_eq!(translate_reading_age("1st and 2nd grade"), Some(6));
        assert_eq!(translate_reading_age("12th and 13th grade"), Some(17));
        assert_eq!(translate_reading_age("13th and 14th grade"), Some(18));
        assert_eq!(translate_reading_age("14th and 15th grade"), Some(18));
    }

    #[test]
    fn test_translate_absent_cases() {
        assert_eq!(translate_reading_age("0th and 1st grade"), None);
        assert_eq!(translate_reading_age("-1th and 0th grade"), None);
        assert_eq!(translate_reading_age("college"), None);
        assert_eq!(translate_reading_age(""), None);
    }

    #[test]
    fn test_translate_is_independent_of_call_order() {
        let first = translate_reading_age("14th and 15th grade");
        let second = translate_reading_age("7th and 8th grade");
        let again = translate_reading_age("14th and 15th grade");
        assert_eq!((first, second, again), (Some(18), Some(12), Some(18)));
    }

    #[test]
    fn test_primary_method_wins() {
        let analysis = analysis(json!({
            "dragnet": { "standard": "9th and 10th grade" },
            "trafilatura": { "standard": "5th and 6th grade" }
        }));
        assert_eq!(find_reading_level(&analysis), Some("9th and 10th grade"));
        assert_eq!(resolve_reading_age(&analysis), Some(14));
    }

    #[test]
    fn test_falls_back_to_secondary_method() {
        let analysis = analysis(json!({
            "dragnet": { "flesch": 40.1 },
            "trafilatura": { "standard": "5th and 6th grade" }
        }));
        assert_eq!(resolve_reading_age(&analysis), Some(10));
    }

    #[test]
    fn test_sentinel_and_missing_are_absent() {
        let sentinel = analysis(json!({ "dragnet": { "standard": "-1th and 0th grade" } }));
        assert_eq!(find_reading_level(&sentinel), None);
        assert_eq!(resolve_reading_age(&sentinel), None);

        let empty = analysis(json!({}));
        assert_eq!(resolve_reading_age(&empty), None);
    }

    fn analysis(value: serde_json::Value) -> TextAnalysis {
        serde_json::from_value(value).unwrap()
    }
}
