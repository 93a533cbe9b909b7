//! Collaborator seams consumed by the browse engine.
//!
//! These traits define the interfaces the remote metadata store exposes,
//! enabling pluggable transports and testability. The engine never talks to
//! a concrete backend directly.

use async_trait::async_trait;

use crate::error::Result;
use crate::params::QueryParams;
use crate::scope::ServiceOptions;
use crate::value::Row;

/// Remote metadata query service.
///
/// Accepts a query-language string, a named-parameter bundle and scoping
/// options, and returns ordered projection rows of wrapped values. Failures
/// propagate to the caller unchanged; this layer adds no resilience logic.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn projection(
        &self,
        query: &str,
        params: &QueryParams,
        opts: &ServiceOptions,
    ) -> Result<Vec<Row>>;
}

/// Kind of an item declared as a share member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareItemKind {
    Image,
    Dataset,
    Project,
    Other,
}

/// Reference to one declared member item of a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareItemRef {
    pub kind: ShareItemKind,
    pub id: i64,
}

impl ShareItemRef {
    pub fn image(id: i64) -> Self {
        Self {
            kind: ShareItemKind::Image,
            id,
        }
    }

    pub fn dataset(id: i64) -> Self {
        Self {
            kind: ShareItemKind::Dataset,
            id,
        }
    }
}

/// Stored share content directory.
#[async_trait]
pub trait ShareDirectory: Send + Sync {
    /// Raw list of member item references declared for a share, in their
    /// declared order.
    async fn contents(&self, share_id: i64) -> Result<Vec<ShareItemRef>>;
}
