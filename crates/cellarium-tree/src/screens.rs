//! Screen container marshalling.

use tracing::debug;

use cellarium_core::{
    col, map_columns, permissions_css, CallContext, QueryParams, Result, Scope, ScreenRecord,
    ServiceOptions, Value,
};

use crate::Browser;

pub(crate) const SCREEN_COLUMNS: [&str; 5] = ["id", "name", "ownerId", "perms", "childCount"];

/// Decode a screen row: id, name, ownerId, permission descriptor,
/// childCount. Shared with the tagged fan-out.
pub(crate) fn record_screen(row: &[Value], ctx: &CallContext) -> Result<ScreenRecord> {
    let owner_id = col(row, 2)?.as_long()?;
    Ok(ScreenRecord {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
        child_count: col(row, 4)?.as_long()?,
    })
}

impl Browser {
    /// Marshal screens in the scoped group, optionally restricted to one
    /// owner. Child counts come from the screen-to-plate link table.
    pub async fn marshal_screens(&self, scope: &Scope) -> Result<Vec<ScreenRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut where_clause = "";
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            where_clause = "where screen.details.owner.id = :id";
        }

        let q = format!(
            r#"
            select new map(screen.id as id,
                   screen.name as name,
                   screen.details.owner.id as ownerId,
                   screen.details.permissions as perms,
                   (select count(spl.id) from ScreenPlateLink spl
                    where spl.parent = screen.id) as childCount)
            from Screen screen
            {where_clause}
            order by lower(screen.name), screen.id
            "#
        );

        let mut screens = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &SCREEN_COLUMNS)?;
            screens.push(record_screen(&columns, &self.ctx)?);
        }
        debug!(result_count = screens.len(), "marshal_screens");
        Ok(screens)
    }
}
