//! Project container marshalling.

use tracing::debug;

use cellarium_core::{
    col, map_columns, permissions_css, CallContext, ProjectRecord, QueryParams, Result, Scope,
    ServiceOptions, Value,
};

use crate::Browser;

pub(crate) const PROJECT_COLUMNS: [&str; 5] = ["id", "name", "ownerId", "perms", "childCount"];

/// Decode a project row: id, name, ownerId, permission descriptor,
/// childCount. Shared with the tagged fan-out, which projects the same
/// columns positionally.
pub(crate) fn record_project(row: &[Value], ctx: &CallContext) -> Result<ProjectRecord> {
    let owner_id = col(row, 2)?.as_long()?;
    Ok(ProjectRecord {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        owner_id,
        perms_css: permissions_css(col(row, 3)?.as_perms()?, owner_id, ctx),
        child_count: col(row, 4)?.as_long()?,
    })
}

impl Browser {
    /// Marshal projects in the scoped group, optionally restricted to one
    /// owner. Child counts come from a correlated sub-query over the
    /// project-to-dataset link table.
    pub async fn marshal_projects(&self, scope: &Scope) -> Result<Vec<ProjectRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let mut where_clause = "";
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            where_clause = "where project.details.owner.id = :id";
        }

        let q = format!(
            r#"
            select new map(project.id as id,
                   project.name as name,
                   project.details.owner.id as ownerId,
                   project.details.permissions as perms,
                   (select count(pdl.id) from ProjectDatasetLink pdl
                    where pdl.parent = project.id) as childCount)
            from Project project
            {where_clause}
            order by lower(project.name), project.id
            "#
        );

        let mut projects = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &PROJECT_COLUMNS)?;
            projects.push(record_project(&columns, &self.ctx)?);
        }
        debug!(result_count = projects.len(), "marshal_projects");
        Ok(projects)
    }
}
