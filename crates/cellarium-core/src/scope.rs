//! Group scoping and paging controls.
//!
//! Callers address groups and owners with the `-1`/absent sentinel meaning
//! "unfiltered"; [`id_filter`] normalizes both spellings. Which group scope a
//! query runs under is load-bearing per entity kind: directory listings
//! (groups, experimenters, plate acquisitions) cross all groups, container
//! listings scope to the caller-specified group, and share listings leave
//! the session scope untouched.

/// Normalize an id filter argument: `None` and `-1` both mean unfiltered.
pub fn id_filter(value: Option<i64>) -> Option<i64> {
    match value {
        None | Some(-1) => None,
        Some(v) => Some(v),
    }
}

/// Group restriction applied at the service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupScope {
    /// Inherit whatever group the session is currently scoped to.
    #[default]
    Session,
    /// No group restriction; spans every group the caller can see.
    All,
    /// Restrict to a single group.
    Only(i64),
}

impl GroupScope {
    /// Map a caller-supplied group id to a scope. `None` and `-1` both
    /// select the cross-group scope.
    pub fn from_id(group_id: Option<i64>) -> Self {
        match id_filter(group_id) {
            None => GroupScope::All,
            Some(group) => GroupScope::Only(group),
        }
    }
}

/// Options forwarded to the query service alongside each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceOptions {
    pub group: GroupScope,
}

impl ServiceOptions {
    /// Cross-group options, used by the directory listings.
    pub fn all_groups() -> Self {
        Self {
            group: GroupScope::All,
        }
    }

    /// Options scoped to the given group selection.
    pub fn scoped(group: GroupScope) -> Self {
        Self { group }
    }
}

/// Paging selection: a 1-based page number plus an optional per-call limit
/// overriding the engine default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub number: Option<i64>,
    pub limit: Option<i64>,
}

impl Page {
    /// First page with the engine's default limit.
    pub fn first() -> Self {
        Self {
            number: Some(1),
            limit: None,
        }
    }

    /// Disable paging: all matching rows.
    pub fn all() -> Self {
        Self::default()
    }

    /// The given 1-based page with the engine's default limit.
    pub fn at(number: i64) -> Self {
        Self {
            number: Some(number),
            limit: None,
        }
    }

    /// Override the per-page limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Scoping arguments shared by the container marshallers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope {
    /// Group to restrict to, `-1`/`None` for every visible group.
    pub group_id: Option<i64>,
    /// Owner to restrict to, `-1`/`None` for all owners.
    pub experimenter_id: Option<i64>,
    pub page: Page,
}

impl Scope {
    /// Scope restricted to one group, unfiltered on owner, first page.
    pub fn for_group(group_id: i64) -> Self {
        Self {
            group_id: Some(group_id),
            experimenter_id: None,
            page: Page::first(),
        }
    }

    /// Restrict to items owned by the given experimenter.
    pub fn owned_by(mut self, experimenter_id: i64) -> Self {
        self.experimenter_id = Some(experimenter_id);
        self
    }

    /// Use the given paging selection.
    pub fn paged(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Effective group scope for the query.
    pub fn group(&self) -> GroupScope {
        GroupScope::from_id(self.group_id)
    }

    /// Effective owner filter, with the `-1` sentinel normalized away.
    pub fn experimenter(&self) -> Option<i64> {
        id_filter(self.experimenter_id)
    }
}
