use std::sync::Arc;
use std::time::Duration;
use ns_core::{Error, KeywordSet, NewsSource, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use crate::filter::FilterState;
use crate::state::{DashboardState, Event, Notification, Query};

/// Ten minutes between background refetches.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed articles.
    Applied(usize),
    /// A newer fetch (or a detach) superseded this one; nothing changed.
    Stale,
    /// There was nothing to re-run.
    Skipped,
}

/// Page-level controller: owns the state, talks to the news source, and
/// publishes every state change to subscribers.
pub struct Dashboard {
    source: Arc<dyn NewsSource>,
    state: watch::Sender<DashboardState>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self { source, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Applies `event` and returns the generation afterwards. Subscribers are
    /// only woken when the state actually changed.
    fn dispatch(&self, event: Event) -> u64 {
        let mut generation = 0;
        self.state.send_if_modified(|state| {
            let next = state.apply(event);
            let changed = next != *state;
            *state = next;
            generation = state.generation;
            changed
        });
        generation
    }

    pub fn notify(&self, notification: Notification) {
        self.dispatch(Event::Notify(notification));
    }

    /// Fetches articles for `keywords`. An empty set is rejected with a
    /// warning before the source is called.
    pub async fn fetch_news(&self, keywords: &KeywordSet, filter: &FilterState) -> Result<FetchOutcome> {
        if keywords.is_empty() {
            warn!("⚠️ Fetch requested without keywords");
            self.notify(Notification::warning(Error::EmptyKeywords.to_string()));
            return Err(Error::EmptyKeywords);
        }
        self.run(Query::keywords(keywords, filter)).await
    }

    /// Backend refresh followed by a keyword fetch, with the same empty-set check.
    pub async fn refresh_news(&self, keywords: &KeywordSet, filter: &FilterState) -> Result<FetchOutcome> {
        if keywords.is_empty() {
            warn!("⚠️ Refresh requested without keywords");
            self.notify(Notification::warning(Error::EmptyKeywords.to_string()));
            return Err(Error::EmptyKeywords);
        }
        self.refresh(Query::keywords(keywords, filter)).await
    }

    pub async fn search_news(&self, filter: &FilterState) -> Result<FetchOutcome> {
        self.run(Query::search(filter)).await
    }

    pub async fn run(&self, query: Query) -> Result<FetchOutcome> {
        self.execute(query, false).await
    }

    /// Asks the backend to refresh, then re-runs `query` under the same
    /// loading guard.
    pub async fn refresh(&self, query: Query) -> Result<FetchOutcome> {
        self.execute(query, true).await
    }

    /// Re-runs the most recent query, if any.
    pub async fn rerun_latest(&self) -> Result<FetchOutcome> {
        let last_query = self.state.borrow().last_query.clone();
        match last_query {
            Some(query) => self.run(query).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    /// Drops interest in anything in flight, e.g. when the view is torn down.
    pub fn detach(&self) {
        let generation = self.dispatch(Event::Detached);
        debug!("Dashboard detached at generation {}", generation);
    }

    async fn execute(&self, query: Query, refresh_first: bool) -> Result<FetchOutcome> {
        let generation = self.dispatch(Event::FetchStarted { query: query.clone() });
        info!("🔍 Fetch #{} started: {}", generation, query);

        let result = if refresh_first {
            match self.source.refresh_articles().await {
                Ok(()) => query.run(self.source.as_ref()).await,
                Err(e) => Err(e),
            }
        } else {
            query.run(self.source.as_ref()).await
        };

        match result {
            Ok(articles) => {
                let count = articles.len();
                if self.dispatch(Event::FetchSucceeded { generation, articles }) != generation {
                    debug!("⏭️ Discarding stale response for fetch #{}", generation);
                    return Ok(FetchOutcome::Stale);
                }
                info!("✨ Fetch #{} applied {} articles", generation, count);
                Ok(FetchOutcome::Applied(count))
            }
            Err(e) => {
                let notification = if e.is_validation() {
                    Notification::warning(e.to_string())
                } else if refresh_first {
                    Notification::error(format!("Error refreshing news: {}", e))
                } else {
                    Notification::error(format!("Error fetching news: {}", e))
                };
                if self.dispatch(Event::FetchFailed { generation, notification }) == generation {
                    error!("❌ Fetch #{} failed: {}", generation, e);
                } else {
                    debug!("⏭️ Ignoring failure of stale fetch #{}: {}", generation, e);
                }
                Err(e)
            }
        }
    }

    /// Re-runs the latest query every `period` until the handle is aborted.
    /// Ticks that find a fetch already in flight are skipped.
    pub fn spawn_auto_refresh(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let dashboard = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if dashboard.is_loading() {
                    debug!("⏭️ Skipping auto-refresh, a fetch is in flight");
                    continue;
                }
                match dashboard.rerun_latest().await {
                    Ok(FetchOutcome::Skipped) => debug!("Auto-refresh has nothing to re-run yet"),
                    Ok(_) => {}
                    Err(e) => warn!("⚠️ Auto-refresh failed: {}", e),
                }
            }
        })
    }
}
