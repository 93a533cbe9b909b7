//! Group directory marshalling.

use tracing::debug;

use cellarium_core::defaults::USER_GROUP_NAME;
use cellarium_core::{
    col, id_filter, GroupRecord, Page, QueryParams, Result, ServiceOptions, Value,
};

use crate::Browser;

/// Decode a group row: id, name, permission descriptor.
fn decode_group(row: &[Value]) -> Result<GroupRecord> {
    let perms = col(row, 2)?.as_perms()?;
    Ok(GroupRecord {
        id: col(row, 0)?.as_long()?,
        name: col(row, 1)?.as_text()?,
        perm: perms.perm.clone().ok_or_else(|| {
            cellarium_core::Error::Decode("group descriptor missing perm string".to_string())
        })?,
    })
}

impl Browser {
    /// Marshal the group directory, optionally restricted to groups a given
    /// experimenter is a member of. Spans all groups the caller can see; the
    /// reserved catch-all group is excluded.
    pub async fn marshal_groups(
        &self,
        member_id: Option<i64>,
        page: &Page,
    ) -> Result<Vec<GroupRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::all_groups();

        params.paginate(page.number, self.limit_for(page));
        params.add_text("excluded", USER_GROUP_NAME);

        let mut join_clause = "";
        let mut where_clause = "";
        if let Some(mid) = id_filter(member_id) {
            params.add_long("mid", mid);
            join_clause = " join grp.groupExperimenterMap grexp ";
            where_clause = " and grexp.child.id = :mid ";
        }

        let q = format!(
            r#"
            select grp.id,
                   grp.name,
                   grp.details.permissions
            from ExperimenterGroup grp
            {join_clause}
            where grp.name != :excluded
            {where_clause}
            order by lower(grp.name), grp.id
            "#
        );

        let mut groups = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            groups.push(decode_group(&row)?);
        }
        debug!(result_count = groups.len(), "marshal_groups");
        Ok(groups)
    }
}
