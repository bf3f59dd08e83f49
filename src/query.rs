// src/query.rs

use crate::db::Store;
use crate::error::{LogsiftError, Result};
use crate::models::Log;
use crate::normalize::normalize;
use chrono::NaiveDateTime;

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Newest,
    Oldest,
    #[default]
    Unspecified,
}

impl Order {
    /// `"newest"` and `"oldest"`; anything else leaves the order unspecified.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("newest") => Order::Newest,
            Some("oldest") => Order::Oldest,
            _ => Order::Unspecified,
        }
    }
}

/// Validated search parameters for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub keyword: Option<String>,
    pub order: Order,
}

impl SearchFilter {
    /// Normalizes raw form values. Fails when the dates are invalid or when
    /// no criterion at all was given.
    pub fn from_raw(
        start: Option<&str>,
        end: Option<&str>,
        keyword: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self> {
        let (start_date, end_date) = normalize(start, end)?;
        let filter = SearchFilter {
            start_date,
            end_date,
            keyword: keyword.filter(|k| !k.is_empty()).map(str::to_string),
            order: Order::from_param(order),
        };
        if filter.is_empty() {
            return Err(LogsiftError::validation("Please enter something to search."));
        }
        Ok(filter)
    }

    /// True when no date bound and no keyword is set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.keyword.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    DateAtLeast(NaiveDateTime),
    DateAtMost(NaiveDateTime),
    ContentContains(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    DateDescending,
    DateAscending,
}

/// Store-neutral description of a read: all predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub predicates: Vec<Predicate>,
    pub sort: Option<Sort>,
}

pub fn build_query(filter: &SearchFilter) -> QuerySpec {
    let mut predicates = Vec::new();
    if let Some(start) = filter.start_date {
        predicates.push(Predicate::DateAtLeast(start));
    }
    if let Some(end) = filter.end_date {
        predicates.push(Predicate::DateAtMost(end));
    }
    if let Some(keyword) = filter.keyword.as_ref().filter(|k| !k.is_empty()) {
        predicates.push(Predicate::ContentContains(keyword.clone()));
    }

    let sort = match filter.order {
        Order::Newest => Some(Sort::DateDescending),
        Order::Oldest => Some(Sort::DateAscending),
        Order::Unspecified => None,
    };

    QuerySpec { predicates, sort }
}

/// Returns every log matching `filter`, with full content.
pub fn search(store: &Store, filter: &SearchFilter) -> Result<Vec<Log>> {
    let spec = build_query(filter);
    let logs = store.query(&spec)?;
    tracing::debug!(predicates = spec.predicates.len(), order = ?filter.order, results = logs.len(), "search executed");
    Ok(logs)
}
