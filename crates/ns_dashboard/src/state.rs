use std::fmt;
use chrono::NaiveDate;
use ns_core::{format_date, Article, KeywordSet, NewsSource, Result};
use crate::filter::FilterState;
use crate::view::{article_views, ArticleView};

/// A request the dashboard can (re)issue against a [`NewsSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Keywords {
        keywords: Vec<String>,
        begin_date: Option<NaiveDate>,
    },
    Search {
        query: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
}

impl Query {
    pub fn keywords(keywords: &KeywordSet, filter: &FilterState) -> Self {
        Query::Keywords {
            keywords: keywords.as_slice().to_vec(),
            begin_date: filter.dates().begin_date(),
        }
    }

    pub fn search(filter: &FilterState) -> Self {
        let (start_date, end_date) = filter.dates().bounds();
        let query = Some(filter.search_term().trim().to_string()).filter(|q| !q.is_empty());
        Query::Search {
            query,
            start_date,
            end_date,
        }
    }

    pub async fn run(&self, source: &dyn NewsSource) -> Result<Vec<Article>> {
        match self {
            Query::Keywords { keywords, begin_date } => source.fetch_articles(keywords, *begin_date).await,
            Query::Search {
                query,
                start_date,
                end_date,
            } => source.search_articles(query.as_deref(), *start_date, *end_date).await,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Keywords { keywords, begin_date } => {
                write!(f, "keywords [{}]", keywords.join(", "))?;
                if let Some(date) = begin_date {
                    write!(f, " since {}", format_date(*date))?;
                }
                Ok(())
            }
            Query::Search {
                query,
                start_date,
                end_date,
            } => {
                write!(f, "search '{}'", query.as_deref().unwrap_or(""))?;
                if let Some(date) = start_date {
                    write!(f, " from {}", format_date(*date))?;
                }
                if let Some(date) = end_date {
                    write!(f, " to {}", format_date(*date))?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A user-facing message, the terminal equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FetchStarted { query: Query },
    FetchSucceeded { generation: u64, articles: Vec<Article> },
    FetchFailed { generation: u64, notification: Notification },
    Notify(Notification),
    /// The view went away; anything still in flight must not be applied.
    Detached,
}

/// Most recent notifications kept in [`DashboardState::notifications`].
pub const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub phase: Phase,
    pub articles: Vec<Article>,
    pub last_query: Option<Query>,
    /// The latest notifications, oldest first, capped at [`MAX_NOTIFICATIONS`].
    pub notifications: Vec<Notification>,
    /// Total notifications ever recorded, including those dropped by the cap.
    pub notified: u64,
    /// Bumped by every started fetch and by detaching. Completions carrying
    /// an older generation are ignored.
    pub generation: u64,
}

impl DashboardState {
    pub fn apply(&self, event: Event) -> DashboardState {
        let mut next = self.clone();
        match event {
            Event::FetchStarted { query } => {
                next.generation += 1;
                next.phase = Phase::Loading;
                next.last_query = Some(query);
            }
            Event::FetchSucceeded { generation, articles } => {
                if self.is_current(generation) {
                    next.phase = Phase::Idle;
                    next.articles = articles;
                }
            }
            Event::FetchFailed { generation, notification } => {
                if self.is_current(generation) {
                    next.phase = Phase::Idle;
                    next.push_notification(notification);
                }
            }
            Event::Notify(notification) => next.push_notification(notification),
            Event::Detached => {
                next.generation += 1;
                next.phase = Phase::Idle;
            }
        }
        next
    }

    fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let excess = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..excess);
        }
        self.notified += 1;
    }

    /// Notifications recorded after the first `seen` ones, as far as the cap
    /// still holds them.
    pub fn notifications_since(&self, seen: u64) -> &[Notification] {
        let unseen = self.notified.saturating_sub(seen);
        let unseen = usize::try_from(unseen).unwrap_or(usize::MAX).min(self.notifications.len());
        &self.notifications[self.notifications.len() - unseen..]
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn visible_articles(&self, search_term: &str) -> Vec<ArticleView<'_>> {
        article_views(&self.articles, search_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_core::SentimentResult;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            summary: String::new(),
            url: format!("https://example.com/{}", title),
            published_date: String::new(),
            sentiment: SentimentResult::default(),
        }
    }

    fn query() -> Query {
        Query::Keywords {
            keywords: vec!["Fed".to_string()],
            begin_date: None,
        }
    }

    #[test]
    fn test_fetch_lifecycle() {
        let state = DashboardState::default();
        let loading = state.apply(Event::FetchStarted { query: query() });
        assert!(loading.is_loading());
        assert_eq!(loading.generation, 1);
        assert_eq!(loading.last_query, Some(query()));

        let done = loading.apply(Event::FetchSucceeded {
            generation: 1,
            articles: vec![article("a"), article("b")],
        });
        assert_eq!(done.phase, Phase::Idle);
        assert_eq!(done.articles.len(), 2);
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn test_failure_keeps_articles() {
        let state = DashboardState::default()
            .apply(Event::FetchStarted { query: query() })
            .apply(Event::FetchSucceeded { generation: 1, articles: vec![article("a")] })
            .apply(Event::FetchStarted { query: query() })
            .apply(Event::FetchFailed {
                generation: 2,
                notification: Notification::error("Error fetching news"),
            });

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.articles, vec![article("a")]);
        assert_eq!(state.notifications, vec![Notification::error("Error fetching news")]);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let state = DashboardState::default()
            .apply(Event::FetchStarted { query: query() })
            .apply(Event::FetchStarted { query: query() });

        let after = state.apply(Event::FetchSucceeded { generation: 1, articles: vec![article("old")] });
        assert_eq!(after, state);

        let after = state.apply(Event::FetchFailed {
            generation: 1,
            notification: Notification::error("late"),
        });
        assert!(after.notifications.is_empty());
        assert!(after.is_loading());
    }

    #[test]
    fn test_detach_discards_in_flight() {
        let state = DashboardState::default()
            .apply(Event::FetchStarted { query: query() })
            .apply(Event::Detached);
        assert!(!state.is_loading());

        let after = state.apply(Event::FetchSucceeded { generation: 1, articles: vec![article("a")] });
        assert!(after.articles.is_empty());
    }

    #[test]
    fn test_notifications_capped() {
        let mut state = DashboardState::default();
        for i in 0..MAX_NOTIFICATIONS + 5 {
            state = state.apply(Event::Notify(Notification::error(format!("failure {}", i))));
        }

        assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(state.notified, (MAX_NOTIFICATIONS + 5) as u64);
        assert_eq!(state.notifications[0].message, "failure 5");
        assert_eq!(
            state.notifications.last().unwrap().message,
            format!("failure {}", MAX_NOTIFICATIONS + 4)
        );

        let seen = state.notified;
        let state = state.apply(Event::Notify(Notification::info("fresh")));
        assert_eq!(state.notifications_since(seen), &[Notification::info("fresh")]);
        assert_eq!(state.notifications_since(0).len(), MAX_NOTIFICATIONS);
        assert!(state.notifications_since(state.notified).is_empty());
    }

    #[test]
    fn test_search_query_from_filter() {
        let mut filter = FilterState::new();
        filter.set_search_term("  rates ");
        filter
            .set_range(Some(ns_core::parse_date("2024-01-01").unwrap()), None)
            .unwrap();

        let query = Query::search(&filter);
        assert_eq!(query.to_string(), "search 'rates' from 2024-01-01");

        filter.reset();
        assert_eq!(
            Query::search(&filter),
            Query::Search { query: None, start_date: None, end_date: None }
        );
    }
}
