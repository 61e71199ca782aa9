use async_trait::async_trait;
use chrono::NaiveDate;
use crate::types::{Article, SentimentResult};
use crate::Result;

/// Backend that serves articles with embedded sentiment results.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch articles matching any of `keywords`, optionally published on or after `begin_date`
    async fn fetch_articles(&self, keywords: &[String], begin_date: Option<NaiveDate>) -> Result<Vec<Article>>;

    /// Free-text search with optional date bounds
    async fn search_articles(
        &self,
        query: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Article>>;

    /// Ask the backend to refresh its own article cache
    async fn refresh_articles(&self) -> Result<()>;

    /// Run sentiment analysis on arbitrary text
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult>;
}
