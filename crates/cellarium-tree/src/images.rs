//! Image marshalling, including orphan listing and share reconciliation.

use tracing::debug;

use cellarium_core::{
    col, id_filter, map_columns, permissions_css, CallContext, DeletedImage, ImageEntry,
    ImageRecord, QueryParams, Result, Scope, ServiceOptions, Value,
};

use crate::build_clause;
use crate::Browser;

pub(crate) const IMAGE_COLUMNS: [&str; 5] = ["id", "name", "ownerId", "perms", "filesetId"];
const PIXEL_COLUMNS: [&str; 3] = ["sizeX", "sizeY", "sizeZ"];

/// Filter axes for image listings. A dataset id takes precedence over the
/// orphan flag; a share id triggers reconciliation against the share's
/// declared content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilter {
    pub dataset_id: Option<i64>,
    pub orphaned: bool,
    pub share_id: Option<i64>,
    /// Load the X/Y/Z dimensions from the joined pixels relation.
    pub load_pixels: bool,
}

impl ImageFilter {
    /// Images linked under the given dataset.
    pub fn in_dataset(dataset_id: i64) -> Self {
        Self {
            dataset_id: Some(dataset_id),
            ..Default::default()
        }
    }

    /// Images declared as members of the given share.
    pub fn in_share(share_id: i64) -> Self {
        Self {
            share_id: Some(share_id),
            ..Default::default()
        }
    }

    /// Images with no parent dataset and no well-sample reference.
    pub fn orphans() -> Self {
        Self {
            orphaned: true,
            ..Default::default()
        }
    }

    pub fn with_pixels(mut self) -> Self {
        self.load_pixels = true;
        self
    }
}

/// Decode an image row: id, name, ownerId, permission descriptor,
/// filesetId. Shared with the tagged fan-out.
pub(crate) fn record_image(row: &[Value], ctx: &CallContext) -> Result<ImageEntry> {
    let owner_id = col(row, 2)?.as_long()?;
    Ok(ImageEntry {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
        fileset_id: col(row, 4)?.as_opt_long()?,
        size_x: None,
        size_y: None,
        size_z: None,
        share_id: None,
    })
}

impl Browser {
    /// Marshal images in the scoped group: all of them, the children of one
    /// dataset, the orphans, or the members of a share.
    ///
    /// For a share, the declared member ids are resolved first; an empty
    /// declaration short-circuits without querying the store. Declared ids
    /// the query does not return (deleted images) are appended as
    /// placeholder records after the live rows, in declared order.
    pub async fn marshal_images(
        &self,
        filter: &ImageFilter,
        scope: &Scope,
    ) -> Result<Vec<ImageRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut from_clause: Vec<String> = Vec::new();
        let mut where_clause: Vec<String> = Vec::new();
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            where_clause.push("image.details.owner.id = :id".to_string());
        }

        let pixel_columns = if filter.load_pixels {
            ",
                   pix.sizeX as sizeX,
                   pix.sizeY as sizeY,
                   pix.sizeZ as sizeZ"
        } else {
            ""
        };

        let mut q = format!(
            r#"
            select new map(image.id as id,
                   image.name as name,
                   image.details.owner.id as ownerId,
                   image.details.permissions as perms,
                   image.fileset.id as filesetId{pixel_columns})
            "#
        );

        from_clause.push("Image image".to_string());
        if filter.load_pixels {
            from_clause.push("image.pixels pix".to_string());
        }

        if let Some(did) = id_filter(filter.dataset_id) {
            params.add_long("did", did);
            from_clause.push("image.datasetLinks dlink".to_string());
            where_clause.push("dlink.parent.id = :did".to_string());
        } else if filter.orphaned {
            // A cross-linked image is not an orphan, and an image reached
            // only through a plate well never is, whoever owns the well.
            where_clause.push(
                "not exists (select dilink from DatasetImageLink as dilink \
                 where dilink.child = image.id)"
                    .to_string(),
            );
            where_clause.push(
                "not exists (select ws from WellSample ws \
                 where ws.image.id = image.id)"
                    .to_string(),
            );
        }

        // Working copy of the declared share members; live rows are removed
        // as they stream past and the remainder marks deleted images.
        let mut declared: Vec<i64> = Vec::new();
        let share_id = id_filter(filter.share_id);
        if let Some(sid) = share_id {
            declared = self.share_image_ids(sid).await?;
            if declared.is_empty() {
                return Ok(Vec::new());
            }
            params.add_longs("iids", declared.clone());
            where_clause.push("image.id in (:iids)".to_string());
        }

        q.push_str(&format!(
            "{}{}order by lower(image.name), image.id",
            build_clause(&from_clause, "from", "join"),
            build_clause(&where_clause, "where", "and")
        ));

        let mut images = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &IMAGE_COLUMNS)?;
            let mut entry = record_image(&columns, &self.ctx)?;

            if filter.load_pixels {
                let pixels = map_columns(&row, &PIXEL_COLUMNS)?;
                entry.size_x = col(&pixels, 0)?.as_opt_long()?;
                entry.size_y = col(&pixels, 1)?.as_opt_long()?;
                entry.size_z = col(&pixels, 2)?.as_opt_long()?;
            }

            if share_id.is_some() {
                if let Some(pos) = declared.iter().position(|id| *id == entry.id) {
                    declared.remove(pos);
                    entry.share_id = share_id;
                }
            }

            images.push(ImageRecord::Live(entry));
        }

        // Whatever the share declared but the query did not return has been
        // deleted underneath the share.
        if share_id.is_some() {
            for id in declared {
                images.push(ImageRecord::Deleted(DeletedImage::new(id)));
            }
        }

        debug!(
            result_count = images.len(),
            orphaned = filter.orphaned,
            "marshal_images"
        );
        Ok(images)
    }
}
