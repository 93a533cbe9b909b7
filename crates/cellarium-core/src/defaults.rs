//! Centralized default constants for the cellarium browse layer.
//!
//! **This module is the single source of truth** for shared default values.
//! Callers should reference these constants instead of defining their own
//! magic numbers; the page size in particular is threaded into the engine
//! explicitly rather than read from ambient state.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for tree listings.
pub const PAGE_LIMIT: i64 = 200;

// =============================================================================
// TAGS
// =============================================================================

/// Reserved namespace marking a tag as a tag-set (a grouping tag whose
/// children are other tags).
pub const NS_TAGSET: &str = "cellarium.org/ns/tagset";

// =============================================================================
// GROUPS
// =============================================================================

/// Reserved catch-all group every experimenter belongs to; excluded from
/// group directory listings.
pub const USER_GROUP_NAME: &str = "user";
