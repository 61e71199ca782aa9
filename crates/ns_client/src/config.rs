use std::time::Duration;
use url::Url;
use ns_core::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_NEWS_PATH: &str = "/news";
pub const SEARCH_PATH: &str = "/news/search/";
pub const REFRESH_PATH: &str = "/news/refresh/";
pub const ANALYZE_PATH: &str = "/analyze-sentiment";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Path of the keyword fetch endpoint, `/news` or `/news/latest/` depending on the backend
    pub news_path: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            news_path: DEFAULT_NEWS_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_news_path(mut self, path: impl Into<String>) -> Self {
        self.news_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
