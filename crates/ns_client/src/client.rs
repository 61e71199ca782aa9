use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;
use ns_core::{format_date, Article, Error, NewsSource, Result, SentimentResult, KEYWORD_DELIMITER};
use crate::config::{ClientConfig, ANALYZE_PATH, REFRESH_PATH, SEARCH_PATH};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// HTTP client for the news sentiment backend.
///
/// One instance is built per session and shared behind an `Arc`; every call
/// makes exactly one request with no caching and no retries.
pub struct NewsClient {
    client: Arc<Client>,
    config: ClientConfig,
}

impl NewsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends `path` to the base URL, keeping any path prefix the base
    /// already has (e.g. `http://host/api`) and a trailing slash on `path`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Validation(format!("Base URL cannot carry a path: {}", self.config.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if path.ends_with('/') {
                segments.push("");
            }
        }
        Ok(url)
    }

    async fn get_articles(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<Article>> {
        let url = self.endpoint(path)?;
        debug!("GET {} {:?}", url, params);
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await?;
        let articles: Vec<Article> = read_json(check_status(response).await?).await?;
        info!("📰 Received {} articles from {}", articles.len(), url.path());
        Ok(articles)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Server {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let url = response.url().clone();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Parse(format!("Malformed response from {}: {}", url.path(), e)))
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url.as_str())
            .field("news_path", &self.config.news_path)
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    fn name(&self) -> &str {
        self.config.base_url.as_str()
    }

    async fn fetch_articles(&self, keywords: &[String], begin_date: Option<NaiveDate>) -> Result<Vec<Article>> {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(Error::EmptyKeywords);
        }

        let mut params = vec![("keywords", keywords.join(KEYWORD_DELIMITER))];
        if let Some(date) = begin_date {
            params.push(("begin_date", format_date(date)));
        }
        self.get_articles(&self.config.news_path, &params).await
    }

    async fn search_articles(
        &self,
        query: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Article>> {
        let mut params = Vec::new();
        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            params.push(("q", query.to_string()));
        }
        if let Some(date) = start_date {
            params.push(("start_date", format_date(date)));
        }
        if let Some(date) = end_date {
            params.push(("end_date", format_date(date)));
        }
        self.get_articles(SEARCH_PATH, &params).await
    }

    async fn refresh_articles(&self) -> Result<()> {
        let url = self.endpoint(REFRESH_PATH)?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await?;
        check_status(response).await?;
        info!("🔄 Backend refresh completed");
        Ok(())
    }

    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult> {
        let url = self.endpoint(ANALYZE_PATH)?;
        debug!("POST {} ({} chars)", url, text.len());
        let response = self
            .client
            .post(url)
            .json(&AnalyzeRequest { text })
            .send()
            .await?;
        read_json(check_status(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> NewsClient {
        NewsClient::new(ClientConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let client = client("http://localhost:8000/api");
        assert_eq!(
            client.endpoint("/news/latest/").unwrap().as_str(),
            "http://localhost:8000/api/news/latest/"
        );
        assert_eq!(
            client.endpoint("/analyze-sentiment").unwrap().as_str(),
            "http://localhost:8000/api/analyze-sentiment"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = client("http://localhost:8000");
        assert_eq!(client.endpoint("/news").unwrap().as_str(), "http://localhost:8000/news");
        assert_eq!(
            client.endpoint(SEARCH_PATH).unwrap().as_str(),
            "http://localhost:8000/news/search/"
        );
    }

    #[test]
    fn test_debug_hides_client() {
        let rendered = format!("{:?}", client("http://localhost:8000"));
        assert!(rendered.contains("<reqwest::Client>"));
    }

    #[test]
    fn test_name_is_base_url() {
        assert_eq!(client("http://localhost:8000").name(), "http://localhost:8000/");
        assert_eq!(client("http://localhost:8000/api").name(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_empty_keywords_rejected_before_request() {
        // Nothing listens on port 9; a request would surface as a transport error.
        let client = client("http://127.0.0.1:9");
        let err = client.fetch_articles(&[], None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyKeywords));

        let err = client.fetch_articles(&["  ".to_string()], None).await.unwrap_err();
        assert!(err.is_validation());
    }
}
