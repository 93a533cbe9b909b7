//! Experimenter directory marshalling.

use tracing::debug;

use cellarium_core::{
    col, id_filter, Error, ExperimenterRecord, Page, QueryParams, Result, ServiceOptions, Value,
};

use crate::Browser;

/// Decode an experimenter row: id, userName, firstName, lastName, email.
fn decode_experimenter(row: &[Value]) -> Result<ExperimenterRecord> {
    // Email is not mandatory; an empty address is treated as absent.
    let email = col(row, 4)?.as_opt_text()?.filter(|email| !email.is_empty());
    Ok(ExperimenterRecord {
        id: col(row, 0)?.as_long()?,
        user_name: col(row, 1)?.as_text()?,
        first_name: col(row, 2)?.as_text()?,
        last_name: col(row, 3)?.as_text()?,
        email,
    })
}

impl Browser {
    /// Marshal the experimenter directory, optionally restricted to members
    /// of a given group. The restriction is expressed in the query itself;
    /// the call always runs cross-group.
    pub async fn marshal_experimenters(
        &self,
        group_id: Option<i64>,
        page: &Page,
    ) -> Result<Vec<ExperimenterRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::all_groups();

        params.paginate(page.number, self.limit_for(page));

        let mut where_clause = "";
        if let Some(gid) = id_filter(group_id) {
            params.add_long("gid", gid);
            where_clause = "join experimenter.groupExperimenterMap grexp where grexp.parent.id = :gid";
        }

        let q = format!(
            r#"
            select experimenter.id,
                   experimenter.userName,
                   experimenter.firstName,
                   experimenter.lastName,
                   experimenter.email
            from Experimenter experimenter {where_clause}
            order by lower(experimenter.userName), experimenter.id
            "#
        );

        let mut experimenters = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            experimenters.push(decode_experimenter(&row)?);
        }
        debug!(result_count = experimenters.len(), "marshal_experimenters");
        Ok(experimenters)
    }

    /// Marshal a single experimenter by id. Fails with a not-found error
    /// unless the lookup matches exactly one row.
    pub async fn marshal_experimenter(&self, experimenter_id: i64) -> Result<ExperimenterRecord> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::all_groups();

        params.add_id(experimenter_id);

        let q = r#"
            select experimenter.id,
                   experimenter.userName,
                   experimenter.firstName,
                   experimenter.lastName,
                   experimenter.email
            from Experimenter experimenter
            where experimenter.id = :id
            "#;

        let rows = self.svc.projection(q, &params, &opts).await?;
        if rows.len() != 1 {
            return Err(Error::ExperimenterNotFound(experimenter_id));
        }
        decode_experimenter(&rows[0])
    }
}
