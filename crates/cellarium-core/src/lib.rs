//! # cellarium-core
//!
//! Core types, traits, and abstractions for the cellarium browse layer.
//!
//! This crate provides:
//! - The produced record shapes for the tree UI
//! - The wrapped value model of the metadata query service
//! - Named parameter binding and paging windows
//! - Group scoping controls
//! - Permission descriptor classification
//! - The collaborator traits the engine consumes

pub mod defaults;
pub mod error;
pub mod models;
pub mod params;
pub mod perms;
pub mod scope;
pub mod traits;
pub mod value;

pub use error::{Error, Result};
pub use models::{
    AcquisitionRecord, DatasetRecord, DeletedImage, DiscussionRecord, ExperimenterRecord,
    GroupRecord, ImageEntry, ImageRecord, OrphanedSummary, PlateRecord, ProjectRecord,
    ScreenRecord, ShareRecord, TagRecord, TaggedRecords,
};
pub use params::{Param, QueryParams, Window};
pub use perms::{permissions_css, CallContext, Permissions};
pub use scope::{id_filter, GroupScope, Page, Scope, ServiceOptions};
pub use traits::{QueryService, ShareDirectory, ShareItemKind, ShareItemRef};
pub use value::{col, map_columns, Row, Value};
