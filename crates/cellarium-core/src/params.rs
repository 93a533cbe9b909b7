//! Named parameter accumulation for query-service calls.
//!
//! One [`QueryParams`] is built per marshalling invocation and dropped with
//! it; binder state never leaks between calls. Values are always bound by
//! name and never spliced into query text.

use std::collections::BTreeMap;

/// A single bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Long(i64),
    /// Id list for `in (:name)` filters.
    LongList(Vec<i64>),
    Text(String),
}

/// Paging window applied by the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

/// Accumulator for the named parameters and paging window of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    named: BTreeMap<String, Param>,
    window: Option<Window>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a named integer scalar.
    pub fn add_long(&mut self, name: &str, value: i64) {
        self.named.insert(name.to_string(), Param::Long(value));
    }

    /// Bind a named id list for an `in` filter.
    pub fn add_longs(&mut self, name: &str, values: Vec<i64>) {
        self.named.insert(name.to_string(), Param::LongList(values));
    }

    /// Bind a named text scalar.
    pub fn add_text(&mut self, name: &str, value: &str) {
        self.named
            .insert(name.to_string(), Param::Text(value.to_string()));
    }

    /// Bind the conventional `:id` parameter.
    pub fn add_id(&mut self, value: i64) {
        self.add_long("id", value);
    }

    /// Apply an explicit offset/limit window.
    pub fn page(&mut self, offset: i64, limit: i64) {
        self.window = Some(Window { offset, limit });
    }

    /// Translate a 1-based page number into a window: offset is
    /// `(page - 1) * limit`. A page of `None` or any non-positive value
    /// disables paging entirely, leaving the result unbounded.
    pub fn paginate(&mut self, page: Option<i64>, limit: i64) {
        if let Some(page) = page {
            if page > 0 {
                self.page((page - 1) * limit, limit);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.named.get(name)
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.window.is_none()
    }
}
