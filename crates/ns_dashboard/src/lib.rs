pub mod dashboard;
pub mod filter;
pub mod keywords;
pub mod state;
pub mod view;

pub use dashboard::{Dashboard, FetchOutcome, DEFAULT_REFRESH_INTERVAL};
pub use filter::FilterState;
pub use keywords::KeywordStore;
pub use state::{DashboardState, Event, Level, Notification, Phase, Query, MAX_NOTIFICATIONS};
pub use view::{article_views, filter_articles, sentiment_emoji, ArticleView, EMPTY_MESSAGE};

pub mod prelude {
    pub use super::{Dashboard, FilterState, KeywordStore, Query};
    pub use ns_core::{Article, Error, KeywordSet, NewsSource, Result};
}
