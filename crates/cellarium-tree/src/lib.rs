//! # cellarium-tree
//!
//! Query construction and row marshalling engine for the cellarium tree UI.
//!
//! This crate provides:
//! - A [`Browser`] facade over the remote metadata query service
//! - One marshaller per entity kind, producing flat, ordered records
//! - Conditional clause composition for dynamically assembled queries
//! - Orphan detection, tag hierarchy traversal, and share content
//!   reconciliation
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use cellarium_core::{CallContext, Scope};
//! use cellarium_tree::Browser;
//!
//! # async fn example(svc: Arc<dyn cellarium_core::QueryService>,
//! #                  shares: Arc<dyn cellarium_core::ShareDirectory>) {
//! let browser = Browser::new(svc, shares, CallContext::new(5));
//! let projects = browser
//!     .marshal_projects(&Scope::for_group(3))
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod acquisitions;
pub mod clause;
pub mod datasets;
pub mod experimenters;
pub mod groups;
pub mod images;
pub mod orphans;
pub mod plates;
pub mod projects;
pub mod screens;
pub mod shares;
pub mod tagged;
pub mod tags;

#[cfg(test)]
mod tests;

// Scripted collaborator doubles.
// Note: always compiled so integration tests (in tests/) can use them.
pub mod test_fixtures;

pub use clause::build_clause;
pub use images::ImageFilter;

use std::sync::Arc;

use cellarium_core::defaults::PAGE_LIMIT;
use cellarium_core::{CallContext, Page, QueryService, ShareDirectory};

/// Read-only browse facade over the metadata query service.
///
/// One `Browser` serves one caller identity. Every marshalling call builds
/// its own parameter set and reads the store's current state; nothing is
/// cached or retained across calls.
pub struct Browser {
    svc: Arc<dyn QueryService>,
    shares: Arc<dyn ShareDirectory>,
    ctx: CallContext,
    page_limit: i64,
}

impl Browser {
    /// Create a browser for the given collaborators and caller identity.
    pub fn new(
        svc: Arc<dyn QueryService>,
        shares: Arc<dyn ShareDirectory>,
        ctx: CallContext,
    ) -> Self {
        Self {
            svc,
            shares,
            ctx,
            page_limit: PAGE_LIMIT,
        }
    }

    /// Override the page size used when a caller does not pass one.
    pub fn with_page_limit(mut self, limit: i64) -> Self {
        self.page_limit = limit;
        self
    }

    /// Caller identity this browser marshals for.
    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    pub(crate) fn limit_for(&self, page: &Page) -> i64 {
        page.limit.unwrap_or(self.page_limit)
    }
}
