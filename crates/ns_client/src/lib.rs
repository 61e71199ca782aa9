pub mod client;
pub mod config;

pub use client::NewsClient;
pub use config::ClientConfig;

pub mod prelude {
    pub use super::{ClientConfig, NewsClient};
    pub use ns_core::{Article, Error, NewsSource, Result, SentimentResult};
}
