pub mod models;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::NewsSource;
pub use storage::KeywordStorage;
pub use types::{
    format_date, parse_date, Article, DateFilter, KeywordSet, SentimentLabel, SentimentResult,
    SentimentScores, DATE_FORMAT, KEYWORD_DELIMITER,
};
