use std::fmt::Write;
use ns_core::{KeywordSet, SentimentResult};
use ns_dashboard::{sentiment_emoji, ArticleView, DashboardState, Level, Notification, EMPTY_MESSAGE};

const PUBLISHED_FORMAT: &str = "%b %-d, %Y";

pub fn keywords(keywords: &KeywordSet) -> String {
    if keywords.is_empty() {
        return "No keywords yet. Add one with `ns keywords add <keyword>`.".to_string();
    }
    let chips: Vec<String> = keywords.iter().map(|k| format!("[{}]", k)).collect();
    format!("Keywords: {}", chips.join(" "))
}

pub fn article(view: &ArticleView<'_>) -> String {
    let published = view
        .published_at
        .map(|dt| dt.format(PUBLISHED_FORMAT).to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let mut out = format!("{}  {}  {}\n", view.emoji, published, view.title);
    if !view.summary.is_empty() {
        let _ = writeln!(out, "    {}", view.summary);
    }
    let _ = writeln!(out, "    Confidence: {} · {}", view.confidence_percent(), view.url);
    out
}

pub fn notification(notification: &Notification) -> String {
    let icon = match notification.level {
        Level::Info => "ℹ️",
        Level::Warning => "⚠️",
        Level::Error => "❌",
    };
    format!("{} {}", icon, notification.message)
}

pub fn sentiment(result: &SentimentResult) -> String {
    let confidence = result.clamped_confidence();
    format!(
        "{} {} ({:.1}%)  positive {:.2} · neutral {:.2} · negative {:.2}",
        sentiment_emoji(result.label, confidence),
        result.label,
        confidence * 100.0,
        result.scores.positive,
        result.scores.neutral,
        result.scores.negative,
    )
}

/// Prints dashboard snapshots, showing each notification only once.
#[derive(Debug, Default)]
pub struct Renderer {
    shown_notifications: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, state: &DashboardState, search_term: &str) -> String {
        let mut out = String::new();
        for item in state.notifications_since(self.shown_notifications) {
            let _ = writeln!(out, "{}", notification(item));
        }
        self.shown_notifications = state.notified;

        if state.is_loading() {
            out.push_str("Loading...\n");
            return out;
        }

        let views = state.visible_articles(search_term);
        if views.is_empty() {
            let _ = writeln!(out, "{}", EMPTY_MESSAGE);
            return out;
        }
        for view in &views {
            out.push_str(&article(view));
            out.push('\n');
        }
        let _ = writeln!(out, "{} of {} articles shown", views.len(), state.articles.len());
        out
    }
}
