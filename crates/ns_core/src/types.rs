use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Delimiter used to join keywords into the `keywords` query parameter.
pub const KEYWORD_DELIMITER: &str = ",";

/// Wire format for every date parameter sent to the backend.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| Error::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD): {}", raw, e)))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    /// Anything the backend sends that is not one of the three labels,
    /// including `null` and non-string values.
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for SentimentLabel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("positive") => SentimentLabel::Positive,
            Some("neutral") => SentimentLabel::Neutral,
            Some("negative") => SentimentLabel::Negative,
            _ => SentimentLabel::Unknown,
        })
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(rename = "sentiment", alias = "label", default)]
    pub label: SentimentLabel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scores: SentimentScores,
}

impl SentimentResult {
    /// Confidence clamped into `[0, 1]`, with NaN treated as zero.
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "abstract", alias = "content", default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment: SentimentResult,
}

impl Article {
    /// Parses `published_date`, accepting RFC 3339, the `+0000` offset form
    /// and bare dates. Returns `None` when nothing matches.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_date.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(raw.get(..10)?, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Ordered set of trimmed, non-empty, case-sensitive keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims `keyword` and appends it. Returns `false` if the trimmed value
    /// is empty or already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.contains(keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    /// Removes an exact match. Returns `false` if nothing was removed.
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.keywords.iter().position(|k| k == keyword) {
            Some(index) => {
                self.keywords.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.keywords.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(raw: Vec<String>) -> Self {
        raw.iter().map(String::as_str).collect()
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Any,
    /// Articles published on or after this date.
    Since(NaiveDate),
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Builds a range filter, rejecting `start > end`. An open range on
    /// both sides collapses to `Any`.
    pub fn range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        match (start, end) {
            (None, None) => Ok(DateFilter::Any),
            (Some(s), Some(e)) if s > e => Err(Error::Validation(format!(
                "Start date {} is after end date {}",
                format_date(s),
                format_date(e)
            ))),
            _ => Ok(DateFilter::Range { start, end }),
        }
    }

    /// The single lower bound sent as `begin_date` on keyword fetches.
    pub fn begin_date(&self) -> Option<NaiveDate> {
        match self {
            DateFilter::Any => None,
            DateFilter::Since(date) => Some(*date),
            DateFilter::Range { start, .. } => *start,
        }
    }

    pub fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            DateFilter::Any => (None, None),
            DateFilter::Since(date) => (Some(*date), None),
            DateFilter::Range { start, end } => (*start, *end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn test_keyword_insert_is_idempotent() {
        let mut once = KeywordSet::new();
        once.insert("inflation");

        let mut twice = KeywordSet::new();
        twice.insert("inflation");
        assert!(!twice.insert("  inflation "));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_keyword_insert_rejects_blank() {
        let mut set = KeywordSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   \t"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_keywords_are_case_sensitive_and_ordered() {
        let set: KeywordSet = ["Fed", "fed", "rates", "Fed"].into_iter().collect();
        assert_eq!(set.as_slice(), &["Fed", "fed", "rates"]);
    }

    #[test]
    fn test_remove_after_insert_restores_set() {
        let mut set: KeywordSet = ["oil", "gold"].into_iter().collect();
        let before = set.clone();
        set.insert("copper");
        assert!(set.remove("copper"));
        assert_eq!(set, before);
        assert!(!set.remove("silver"));
    }

    #[test]
    fn test_keyword_set_json_is_plain_array() {
        let set: KeywordSet = ["a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);

        let parsed: KeywordSet = serde_json::from_str(r#"[" a ", "", "b", "a"]"#).unwrap();
        assert_eq!(parsed.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_article_deserialization() {
        let json = r#"{
            "title": "Fed rate hike",
            "abstract": null,
            "url": "https://example.com/fed",
            "published_date": "2024-01-15T10:00:00+0000",
            "sentiment": {
                "sentiment": "negative",
                "confidence": 0.91,
                "scores": {"positive": 0.02, "neutral": 0.07, "negative": 0.91}
            }
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary, "");
        assert_eq!(article.sentiment.label, SentimentLabel::Negative);
        assert_eq!(article.published_at().unwrap().to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }

    #[test]
    fn test_article_content_alias_and_missing_sentiment() {
        let json = r#"{"title": "t", "content": "body", "url": "u", "published_date": "2024-02-01"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary, "body");
        assert_eq!(article.sentiment.label, SentimentLabel::Unknown);
        assert_eq!(article.published_at().unwrap().date_naive(), date("2024-02-01"));
    }

    #[test]
    fn test_unknown_sentiment_label() {
        let result: SentimentResult =
            serde_json::from_str(r#"{"sentiment": "bullish", "confidence": 0.5}"#).unwrap();
        assert_eq!(result.label, SentimentLabel::Unknown);
        assert_eq!(result.scores, SentimentScores::default());
    }

    #[test]
    fn test_null_or_numeric_label_keeps_the_batch() {
        let json = r#"[
            {"title": "Rates hold", "abstract": "", "url": "https://example.com/a", "published_date": "2024-03-01",
             "sentiment": {"sentiment": "positive", "confidence": 0.9}},
            {"title": "Markets drift", "abstract": "", "url": "https://example.com/b", "published_date": "2024-03-02",
             "sentiment": {"sentiment": null, "confidence": 0.4}},
            {"title": "Oil slips", "abstract": "", "url": "https://example.com/c", "published_date": "2024-03-03",
             "sentiment": {"label": 2, "confidence": 0.7}}
        ]"#;
        let articles: Vec<Article> = serde_json::from_str(json).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].sentiment.label, SentimentLabel::Positive);
        assert_eq!(articles[1].sentiment.label, SentimentLabel::Unknown);
        assert_eq!(articles[1].sentiment.confidence, 0.4);
        assert_eq!(articles[2].sentiment.label, SentimentLabel::Unknown);
    }

    #[test]
    fn test_clamped_confidence() {
        let mut result = SentimentResult::default();
        result.confidence = 1.7;
        assert_eq!(result.clamped_confidence(), 1.0);
        result.confidence = -0.3;
        assert_eq!(result.clamped_confidence(), 0.0);
        result.confidence = f64::NAN;
        assert_eq!(result.clamped_confidence(), 0.0);
    }

    #[test]
    fn test_unparseable_published_date() {
        let article = Article {
            title: String::new(),
            summary: String::new(),
            url: String::new(),
            published_date: "yesterday".to_string(),
            sentiment: SentimentResult::default(),
        };
        assert!(article.published_at().is_none());
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateFilter::range(Some(date("2024-02-01")), Some(date("2024-01-01"))).is_err());
        assert_eq!(DateFilter::range(None, None).unwrap(), DateFilter::Any);

        let filter = DateFilter::range(Some(date("2024-01-01")), None).unwrap();
        assert_eq!(filter.begin_date(), Some(date("2024-01-01")));
        assert_eq!(filter.bounds(), (Some(date("2024-01-01")), None));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("01/15/2024").is_err());
        assert_eq!(format_date(date(" 2024-01-15 ")), "2024-01-15");
    }
}
