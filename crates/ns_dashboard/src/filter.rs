use chrono::NaiveDate;
use ns_core::{DateFilter, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    dates: DateFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn dates(&self) -> DateFilter {
        self.dates
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_since(&mut self, date: Option<NaiveDate>) {
        self.dates = date.map(DateFilter::Since).unwrap_or_default();
    }

    /// Rejects `start > end` and leaves the previous dates untouched.
    pub fn set_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        self.dates = DateFilter::range(start, end)?;
        Ok(())
    }

    pub fn clear_dates(&mut self) {
        self.dates = DateFilter::Any;
    }

    /// Clears both the search term and the dates.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
