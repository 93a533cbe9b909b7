//! Scripted collaborator doubles for engine tests.
//!
//! The engine is exercised against a scripted query service that replays
//! canned row sets and records every call, so tests can assert both the
//! marshalled records and the query text, bound parameters, and scoping
//! options sent to the store.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use cellarium_core::{
    Error, Permissions, QueryParams, QueryService, Result, Row, ServiceOptions, ShareDirectory,
    ShareItemRef, Value,
};

/// One recorded query-service call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: String,
    pub params: QueryParams,
    pub options: ServiceOptions,
}

/// Query service double that replays scripted row sets in call order and
/// records every call for assertions. Calls beyond the scripted replies
/// return no rows.
#[derive(Default)]
pub struct ScriptedQueryService {
    replies: Mutex<VecDeque<Vec<Row>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next projection call.
    pub fn enqueue(&self, rows: Vec<Row>) {
        self.replies.lock().unwrap().push_back(rows);
    }

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The single recorded call; panics unless exactly one was made.
    pub fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one query, saw {}", calls.len());
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn projection(
        &self,
        query: &str,
        params: &QueryParams,
        opts: &ServiceOptions,
    ) -> Result<Vec<Row>> {
        self.calls.lock().unwrap().push(RecordedCall {
            query: query.to_string(),
            params: params.clone(),
            options: *opts,
        });
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Query service double that fails every call, for pass-through error tests.
pub struct FailingQueryService;

#[async_trait]
impl QueryService for FailingQueryService {
    async fn projection(
        &self,
        _query: &str,
        _params: &QueryParams,
        _opts: &ServiceOptions,
    ) -> Result<Vec<Row>> {
        Err(Error::Query("backend unavailable".to_string()))
    }
}

/// Share directory double returning a fixed content list per share id.
#[derive(Default)]
pub struct StaticShares {
    contents: BTreeMap<i64, Vec<ShareItemRef>>,
}

impl StaticShares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(mut self, share_id: i64, items: Vec<ShareItemRef>) -> Self {
        self.contents.insert(share_id, items);
        self
    }
}

#[async_trait]
impl ShareDirectory for StaticShares {
    async fn contents(&self, share_id: i64) -> Result<Vec<ShareItemRef>> {
        Ok(self.contents.get(&share_id).cloned().unwrap_or_default())
    }
}

/// Wrap alias/value pairs as the single-map row shape of structured
/// projections.
pub fn map_row(pairs: &[(&str, Value)]) -> Row {
    let mut map = BTreeMap::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    vec![Value::Map(map)]
}

/// Permission descriptor with every capability bit set.
pub fn full_perms() -> Value {
    Value::Perms(Permissions::full())
}

/// Permission descriptor with no capability bits set.
pub fn no_perms() -> Value {
    Value::Perms(Permissions::none())
}
