//! Permission descriptors and capability classification.

use serde::{Deserialize, Serialize};

/// Opaque permission descriptor attached to every stored item.
///
/// The descriptor is owned by the metadata store and read-only here. The
/// four capability bits drive [`permissions_css`]; `perm` is the symbolic
/// permission string reported verbatim for groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Symbolic permission string, e.g. `rwra--`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perm: Option<String>,
    pub can_edit: bool,
    pub can_annotate: bool,
    pub can_link: bool,
    pub can_delete: bool,
}

impl Permissions {
    /// Descriptor with every capability bit set.
    pub fn full() -> Self {
        Self {
            perm: None,
            can_edit: true,
            can_annotate: true,
            can_link: true,
            can_delete: true,
        }
    }

    /// Descriptor with no capability bits set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach the symbolic permission string.
    pub fn with_perm(mut self, perm: &str) -> Self {
        self.perm = Some(perm.to_string());
        self
    }
}

/// Identity a marshalling pass runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub user_id: i64,
    pub is_admin: bool,
}

impl CallContext {
    /// Context for a regular (non-administrator) caller.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// Context for an administrator caller.
    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }
}

/// Classify a permission descriptor into a string of space separated
/// capability classes.
///
/// The four capability bits are tested in fixed order (`canEdit`,
/// `canAnnotate`, `canLink`, `canDelete`) and each set bit contributes its
/// label. `isOwned` is appended when the caller owns the item, and
/// `canChgrp` when the caller owns the item or is an administrator.
pub fn permissions_css(permissions: &Permissions, owner_id: i64, ctx: &CallContext) -> String {
    let mut classes: Vec<&str> = Vec::new();
    if permissions.can_edit {
        classes.push("canEdit");
    }
    if permissions.can_annotate {
        classes.push("canAnnotate");
    }
    if permissions.can_link {
        classes.push("canLink");
    }
    if permissions.can_delete {
        classes.push("canDelete");
    }
    if owner_id == ctx.user_id {
        classes.push("isOwned");
    }
    if owner_id == ctx.user_id || ctx.is_admin {
        classes.push("canChgrp");
    }
    classes.join(" ")
}
