//! Share and discussion marshalling.
//!
//! Shares and discussions live in the same underlying member relation,
//! partitioned by item count: a share carries items, a discussion carries
//! none. Both listings leave the session's group scope untouched.

use tracing::debug;

use cellarium_core::{
    col, id_filter, DiscussionRecord, Page, QueryParams, Result, ServiceOptions, ShareItemKind,
    ShareRecord, Value,
};

use crate::build_clause;
use crate::Browser;

/// Decode a share row: id, ownerId, itemCount.
fn decode_share(row: &[Value]) -> Result<ShareRecord> {
    Ok(ShareRecord {
        id: col(row, 0)?.as_long()?,
        owner_id: col(row, 1)?.as_long()?,
        child_count: col(row, 2)?.as_long()?,
    })
}

/// Decode a discussion row: id, ownerId.
fn decode_discussion(row: &[Value]) -> Result<DiscussionRecord> {
    Ok(DiscussionRecord {
        id: col(row, 0)?.as_long()?,
        owner_id: col(row, 1)?.as_long()?,
    })
}

/// Membership/ownership filter fragments shared by both listings.
fn member_filters(
    params: &mut QueryParams,
    member_id: Option<i64>,
    owner_id: Option<i64>,
) -> Vec<String> {
    let mut filters = Vec::new();
    if let Some(mid) = id_filter(member_id) {
        params.add_long("mid", mid);
        filters.push("mem.child.id = :mid".to_string());
    }
    if let Some(owid) = id_filter(owner_id) {
        params.add_long("owid", owid);
        filters.push("mem.parent.owner.id = :owid".to_string());
    }
    filters
}

impl Browser {
    /// Declared member image ids of a share, in declared order.
    pub(crate) async fn share_image_ids(&self, share_id: i64) -> Result<Vec<i64>> {
        let refs = self.shares.contents(share_id).await?;
        Ok(refs
            .into_iter()
            .filter(|item| item.kind == ShareItemKind::Image)
            .map(|item| item.id)
            .collect())
    }

    /// Marshal shares, optionally filtered by membership and/or ownership.
    pub async fn marshal_shares(
        &self,
        member_id: Option<i64>,
        owner_id: Option<i64>,
        page: &Page,
    ) -> Result<Vec<ShareRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::default();

        params.paginate(page.number, self.limit_for(page));
        let filters = member_filters(&mut params, member_id, owner_id);

        let q = format!(
            r#"
            select distinct mem.parent.id,
                   mem.parent.owner.id,
                   mem.parent.itemCount
            from ShareMember mem
            where mem.parent.itemCount > 0
            {}
            order by mem.parent.id
            "#,
            build_clause(&filters, "and", "and")
        );

        let mut shares = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            shares.push(decode_share(&row)?);
        }
        debug!(result_count = shares.len(), "marshal_shares");
        Ok(shares)
    }

    /// Marshal discussions, optionally filtered by membership and/or
    /// ownership.
    pub async fn marshal_discussions(
        &self,
        member_id: Option<i64>,
        owner_id: Option<i64>,
        page: &Page,
    ) -> Result<Vec<DiscussionRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::default();

        params.paginate(page.number, self.limit_for(page));
        let filters = member_filters(&mut params, member_id, owner_id);

        let q = format!(
            r#"
            select distinct mem.parent.id,
                   mem.parent.owner.id,
                   mem.parent.itemCount
            from ShareMember mem
            where mem.parent.itemCount = 0
            {}
            order by mem.parent.id
            "#,
            build_clause(&filters, "and", "and")
        );

        let mut discussions = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            discussions.push(decode_discussion(&row)?);
        }
        debug!(result_count = discussions.len(), "marshal_discussions");
        Ok(discussions)
    }
}
