use chrono::{DateTime, Utc};
use ns_core::{Article, SentimentLabel};

pub const POSITIVE_EMOJIS: [&str; 5] = ["😃", "😊", "🙂", "😄", "😁"];
pub const NEUTRAL_EMOJIS: [&str; 5] = ["😐", "🤔", "😶", "😑", "😕"];
pub const NEGATIVE_EMOJIS: [&str; 5] = ["😞", "😔", "😟", "😢", "😭"];
pub const FALLBACK_EMOJI: &str = "❓";

pub const EMPTY_MESSAGE: &str = "No articles found. Add keywords and click refresh to fetch news.";

/// Picks one of five glyphs for `label` by bucketing `confidence` into equal
/// bins over `[0, 1]`. Out-of-range confidences are clamped, NaN lands in the
/// first bucket, and an unrecognised label gets the fallback glyph.
pub fn sentiment_emoji(label: SentimentLabel, confidence: f64) -> &'static str {
    let emojis = match label {
        SentimentLabel::Positive => &POSITIVE_EMOJIS,
        SentimentLabel::Neutral => &NEUTRAL_EMOJIS,
        SentimentLabel::Negative => &NEGATIVE_EMOJIS,
        SentimentLabel::Unknown => return FALLBACK_EMOJI,
    };
    let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
    let index = ((confidence * emojis.len() as f64).floor() as usize).min(emojis.len() - 1);
    emojis[index]
}

/// Case-insensitive substring match on title or abstract, in input order.
pub fn filter_articles<'a>(articles: &'a [Article], search_term: &str) -> Vec<&'a Article> {
    let needle = search_term.to_lowercase();
    if needle.is_empty() {
        return articles.iter().collect();
    }
    articles
        .iter()
        .filter(|article| {
            article.title.to_lowercase().contains(&needle) || article.summary.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView<'a> {
    pub emoji: &'static str,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub title: &'a str,
    pub summary: &'a str,
    pub url: &'a str,
    pub published_at: Option<DateTime<Utc>>,
}

impl<'a> ArticleView<'a> {
    pub fn new(article: &'a Article) -> Self {
        let confidence = article.sentiment.clamped_confidence();
        Self {
            emoji: sentiment_emoji(article.sentiment.label, confidence),
            label: article.sentiment.label,
            confidence,
            title: &article.title,
            summary: &article.summary,
            url: &article.url,
            published_at: article.published_at(),
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `87.5%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

impl<'a> From<&'a Article> for ArticleView<'a> {
    fn from(article: &'a Article) -> Self {
        ArticleView::new(article)
    }
}

pub fn article_views<'a>(articles: &'a [Article], search_term: &str) -> Vec<ArticleView<'a>> {
    filter_articles(articles, search_term)
        .into_iter()
        .map(ArticleView::new)
        .collect()
}
