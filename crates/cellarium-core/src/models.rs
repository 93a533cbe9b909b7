//! Produced record shapes for the tree UI.
//!
//! Every record is flat, serde-serializable with the camelCase field names
//! the UI consumes, and built fresh per call from the store's current state.
//! A record exists in output iff its backing query row was returned; the one
//! exception is the deleted-image placeholder synthesized during share
//! reconciliation.

use serde::{Deserialize, Serialize};

// =============================================================================
// DIRECTORY RECORDS
// =============================================================================

/// Group directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
    /// Symbolic permission string taken directly from the store's
    /// descriptor, not from the capability classifier.
    pub perm: String,
}

/// Experimenter (user) directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimenterRecord {
    pub id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Omitted when the store holds no (or an empty) address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// CONTAINER RECORDS
// =============================================================================

/// Project container entry. `childCount` counts dataset links under the
/// project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub child_count: i64,
    pub perms_css: String,
}

/// Dataset container entry. `childCount` counts image links under the
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub child_count: i64,
    pub perms_css: String,
}

/// Screen container entry. `childCount` counts plate links under the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub child_count: i64,
    pub perms_css: String,
}

/// Plate container entry. `childCount` counts the plate's acquisition runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub child_count: i64,
    pub perms_css: String,
}

// =============================================================================
// IMAGE RECORDS
// =============================================================================

/// A live image entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub perms_css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileset_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_z: Option<i64>,
    /// Set when the image was reached through a share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_id: Option<i64>,
}

/// Placeholder for an image a share declares but the store no longer holds.
/// Carries nothing beyond the id and the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedImage {
    pub id: i64,
    pub deleted: bool,
}

impl DeletedImage {
    pub fn new(id: i64) -> Self {
        Self { id, deleted: true }
    }
}

/// Image listing entry: live row or deleted placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRecord {
    Live(ImageEntry),
    Deleted(DeletedImage),
}

impl ImageRecord {
    pub fn id(&self) -> i64 {
        match self {
            ImageRecord::Live(entry) => entry.id,
            ImageRecord::Deleted(placeholder) => placeholder.id,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, ImageRecord::Deleted(_))
    }
}

// =============================================================================
// ACQUISITION, TAG, SHARE RECORDS
// =============================================================================

/// Plate acquisition ("run") entry. `name` is derived: the stored name,
/// else a start/end timestamp rendering, else `Run <id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub perms_css: String,
}

/// Tag entry. `set` marks tags carrying the reserved tag-set namespace;
/// `childCount` counts tag-to-tag links whose parent is this tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub id: i64,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: i64,
    pub perms_css: String,
    pub set: bool,
    pub child_count: i64,
}

/// Share entry (item count above zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub id: i64,
    pub owner_id: i64,
    pub child_count: i64,
}

/// Discussion entry: the same underlying relation as a share, partitioned
/// by an item count of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionRecord {
    pub id: i64,
    pub owner_id: i64,
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// Aggregate orphaned-image count. `id` echoes the owner filter, `-1` when
/// unfiltered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedSummary {
    pub id: i64,
    pub child_count: i64,
}

/// Result of the tagged fan-out: one ordered list per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedRecords {
    pub projects: Vec<ProjectRecord>,
    pub datasets: Vec<DatasetRecord>,
    pub images: Vec<ImageRecord>,
    pub screens: Vec<ScreenRecord>,
    pub plates: Vec<PlateRecord>,
    pub acquisitions: Vec<AcquisitionRecord>,
}
