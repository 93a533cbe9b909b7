//! Aggregate orphaned-image counting.

use tracing::debug;

use cellarium_core::{col, OrphanedSummary, QueryParams, Result, Scope, ServiceOptions};

use crate::build_clause;
use crate::Browser;

impl Browser {
    /// Count the images in the scoped group that have no parent dataset link
    /// and no well-sample reference, optionally restricted to one owner.
    ///
    /// This is the aggregate companion of the per-entity orphan listings:
    /// one summary record, not a record list. When unfiltered on owner the
    /// owner clause is dropped entirely and the summary id is `-1`.
    pub async fn marshal_orphaned(&self, scope: &Scope) -> Result<OrphanedSummary> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut where_clause: Vec<String> = Vec::new();
        let experimenter = scope.experimenter();
        if let Some(eid) = experimenter {
            params.add_id(eid);
            where_clause.push("image.details.owner.id = :id".to_string());
        }
        where_clause.push(
            "not exists (select dilink from DatasetImageLink as dilink \
             where dilink.child.id = image.id)"
                .to_string(),
        );
        where_clause.push(
            "not exists (select ws from WellSample ws \
             where ws.image.id = image.id)"
                .to_string(),
        );

        let q = format!(
            "select count(image.id) from Image image{}",
            build_clause(&where_clause, "where", "and")
        );

        let rows = self.svc.projection(&q, &params, &opts).await?;
        let child_count = match rows.first() {
            Some(row) => col(row, 0)?.as_long()?,
            None => 0,
        };

        debug!(child_count, "marshal_orphaned");
        Ok(OrphanedSummary {
            id: experimenter.unwrap_or(-1),
            child_count,
        })
    }
}
