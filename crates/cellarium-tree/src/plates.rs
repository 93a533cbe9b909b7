//! Plate container marshalling.

use tracing::debug;

use cellarium_core::{
    col, id_filter, map_columns, permissions_css, CallContext, PlateRecord, QueryParams, Result,
    Scope, ServiceOptions, Value,
};

use crate::build_clause;
use crate::Browser;

pub(crate) const PLATE_COLUMNS: [&str; 5] = ["id", "name", "ownerId", "perms", "childCount"];

/// Decode a plate row: id, name, ownerId, permission descriptor,
/// childCount. Shared with the tagged fan-out.
pub(crate) fn record_plate(row: &[Value], ctx: &CallContext) -> Result<PlateRecord> {
    let owner_id = col(row, 2)?.as_long()?;
    Ok(PlateRecord {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
        child_count: col(row, 4)?.as_long()?,
    })
}

impl Browser {
    /// Marshal plates in the scoped group: all of them, the children of one
    /// screen, or the orphans with no parent screen. A parent id takes
    /// precedence over the orphan flag. Child counts are the plate's
    /// acquisition runs.
    pub async fn marshal_plates(
        &self,
        screen_id: Option<i64>,
        orphaned: bool,
        scope: &Scope,
    ) -> Result<Vec<PlateRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut where_clause: Vec<String> = Vec::new();
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            where_clause.push("plate.details.owner.id = :id".to_string());
        }

        let mut q = r#"
            select new map(plate.id as id,
                   plate.name as name,
                   plate.details.owner.id as ownerId,
                   plate.details.permissions as perms,
                   (select count(pa.id) from PlateAcquisition pa
                    where pa.plate.id = plate.id) as childCount)
            from Plate plate
            "#
        .to_string();

        if let Some(sid) = id_filter(screen_id) {
            params.add_long("sid", sid);
            q.push_str("join plate.screenLinks slink");
            where_clause.push("slink.parent.id = :sid".to_string());
        } else if orphaned {
            where_clause.push(
                "not exists (select splink from ScreenPlateLink as splink \
                 where splink.child = plate.id)"
                    .to_string(),
            );
        }

        q.push_str(&format!(
            "{}order by lower(plate.name), plate.id",
            build_clause(&where_clause, "where", "and")
        ));

        let mut plates = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &PLATE_COLUMNS)?;
            plates.push(record_plate(&columns, &self.ctx)?);
        }
        debug!(result_count = plates.len(), orphaned, "marshal_plates");
        Ok(plates)
    }
}
