//! Dataset container marshalling.

use tracing::debug;

use cellarium_core::{
    col, id_filter, map_columns, permissions_css, CallContext, DatasetRecord, QueryParams, Result,
    Scope, ServiceOptions, Value,
};

use crate::build_clause;
use crate::Browser;

pub(crate) const DATASET_COLUMNS: [&str; 5] = ["id", "name", "ownerId", "perms", "childCount"];

/// Decode a dataset row: id, name, ownerId, permission descriptor,
/// childCount. Shared with the tagged fan-out.
pub(crate) fn record_dataset(row: &[Value], ctx: &CallContext) -> Result<DatasetRecord> {
    let owner_id = col(row, 2)?.as_long()?;
    Ok(DatasetRecord {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
        child_count: col(row, 4)?.as_long()?,
    })
}

impl Browser {
    /// Marshal datasets in the scoped group: all of them, the children of
    /// one project, or the orphans with no parent project. A parent id takes
    /// precedence over the orphan flag.
    pub async fn marshal_datasets(
        &self,
        project_id: Option<i64>,
        orphaned: bool,
        scope: &Scope,
    ) -> Result<Vec<DatasetRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut where_clause: Vec<String> = Vec::new();
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            where_clause.push("dataset.details.owner.id = :id".to_string());
        }

        let mut q = r#"
            select new map(dataset.id as id,
                   dataset.name as name,
                   dataset.details.owner.id as ownerId,
                   dataset.details.permissions as perms,
                   (select count(dil.id) from DatasetImageLink dil
                    where dil.parent = dataset.id) as childCount)
            from Dataset dataset
            "#
        .to_string();

        if let Some(pid) = id_filter(project_id) {
            params.add_long("pid", pid);
            q.push_str("join dataset.projectLinks plink");
            where_clause.push("plink.parent.id = :pid".to_string());
        } else if orphaned {
            where_clause.push(
                "not exists (select pdlink from ProjectDatasetLink as pdlink \
                 where pdlink.child = dataset.id)"
                    .to_string(),
            );
        }

        q.push_str(&format!(
            "{}order by lower(dataset.name), dataset.id",
            build_clause(&where_clause, "where", "and")
        ));

        let mut datasets = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &DATASET_COLUMNS)?;
            datasets.push(record_dataset(&columns, &self.ctx)?);
        }
        debug!(result_count = datasets.len(), orphaned, "marshal_datasets");
        Ok(datasets)
    }
}
