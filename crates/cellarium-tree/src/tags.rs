//! Tag marshalling and tag hierarchy traversal.
//!
//! A tag whose namespace equals the reserved tag-set namespace is a tag-set:
//! a grouping tag whose children are other tags. Children of a tag-set and
//! children of a plain tag use the identical link traversal; only the `set`
//! flag on the queried tag differs in how callers read the result.

use tracing::debug;

use cellarium_core::defaults::NS_TAGSET;
use cellarium_core::{
    col, id_filter, map_columns, permissions_css, CallContext, QueryParams, Result, Scope,
    ServiceOptions, TagRecord, Value,
};

use crate::build_clause;
use crate::Browser;

const TAG_COLUMNS: [&str; 7] = [
    "id",
    "textValue",
    "description",
    "ownerId",
    "perms",
    "ns",
    "childCount",
];

/// Decode a tag row: id, textValue, description, ownerId, permission
/// descriptor, namespace, childCount.
fn record_tag(row: &[Value], ctx: &CallContext) -> Result<TagRecord> {
    let owner_id = col(row, 3)?.as_long()?;
    let namespace = col(row, 5)?.as_opt_text()?;
    Ok(TagRecord {
        id: col(row, 0)?.as_long()?,
        value: col(row, 1)?.as_text()?,
        description: col(row, 2)?.as_opt_text()?.filter(|desc| !desc.is_empty()),
        owner_id,
        perms_css: permissions_css(col(row, 4)?.as_perms()?, owner_id, ctx),
        set: namespace.as_deref() == Some(NS_TAGSET),
        child_count: col(row, 6)?.as_long()?,
    })
}

impl Browser {
    /// Marshal tags in the scoped group.
    ///
    /// With a `tag_id`, traverses the tag-to-tag link table and returns the
    /// children of that tag. Otherwise returns all tags, restricted to those
    /// not targeted by any tag-set-namespaced parent link when `orphaned` is
    /// set. Both modes count each tag's child links the same way and order
    /// by id.
    pub async fn marshal_tags(
        &self,
        tag_id: Option<i64>,
        orphaned: bool,
        scope: &Scope,
    ) -> Result<Vec<TagRecord>> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));

        let q = if let Some(tid) = id_filter(tag_id) {
            params.add_long("tid", tid);

            let mut q = r#"
                select new map(link.child.id as id,
                       link.child.textValue as textValue,
                       link.child.description as description,
                       link.child.details.owner.id as ownerId,
                       link.child.details.permissions as perms,
                       link.child.ns as ns,
                       (select count(link2.id)
                        from TagAnnotationLink link2
                        where link2.parent.id = link.child.id) as childCount)
                from TagAnnotationLink link
                where link.parent.id = :tid
                "#
            .to_string();

            if let Some(eid) = scope.experimenter() {
                params.add_id(eid);
                q.push_str(" and link.child.details.owner.id = :id ");
            }
            q.push_str(" order by link.child.id ");
            q
        } else {
            let mut where_clause: Vec<String> = Vec::new();

            // Orphaned tags are those not grouped under any tag-set.
            if orphaned {
                params.add_text("tagns", NS_TAGSET);
                where_clause.push(
                    "not exists (select link from TagAnnotationLink as link \
                     where link.child = tag.id and link.parent.ns = :tagns)"
                        .to_string(),
                );
            }
            if let Some(eid) = scope.experimenter() {
                params.add_id(eid);
                where_clause.push("tag.details.owner.id = :id".to_string());
            }

            format!(
                r#"
                select new map(tag.id as id,
                       tag.textValue as textValue,
                       tag.description as description,
                       tag.details.owner.id as ownerId,
                       tag.details.permissions as perms,
                       tag.ns as ns,
                       (select count(link2.id)
                        from TagAnnotationLink link2
                        where link2.parent.id = tag.id) as childCount)
                from TagAnnotation tag
                {}
                order by tag.id
                "#,
                build_clause(&where_clause, "where", "and")
            )
        };

        let mut tags = Vec::new();
        for row in self.svc.projection(&q, &params, &opts).await? {
            let columns = map_columns(&row, &TAG_COLUMNS)?;
            tags.push(record_tag(&columns, &self.ctx)?);
        }
        debug!(result_count = tags.len(), orphaned, "marshal_tags");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cellarium_core::defaults::NS_TAGSET;
    use cellarium_core::{CallContext, Param, Scope, Value};

    use crate::test_fixtures::{full_perms, map_row, ScriptedQueryService, StaticShares};
    use crate::Browser;

    fn setup() -> (Arc<ScriptedQueryService>, Browser) {
        let svc = Arc::new(ScriptedQueryService::new());
        let browser = Browser::new(
            svc.clone(),
            Arc::new(StaticShares::new()),
            CallContext::new(5),
        );
        (svc, browser)
    }

    fn tag_row(id: i64, value: &str, ns: Value, children: i64) -> Vec<Value> {
        map_row(&[
            ("id", Value::Long(id)),
            ("textValue", Value::from(value)),
            ("description", Value::Null),
            ("ownerId", Value::Long(5)),
            ("perms", full_perms()),
            ("ns", ns),
            ("childCount", Value::Long(children)),
        ])
    }

    #[tokio::test]
    async fn set_flag_requires_exact_namespace() {
        let (svc, browser) = setup();
        svc.enqueue(vec![
            tag_row(1, "grouping", Value::from(NS_TAGSET), 3),
            tag_row(2, "plain", Value::Null, 0),
            tag_row(3, "other-ns", Value::from("cellarium.org/ns/other"), 0),
        ]);

        let tags = browser
            .marshal_tags(None, false, &Scope::default())
            .await
            .unwrap();

        assert!(tags[0].set);
        assert_eq!(tags[0].child_count, 3);
        assert!(!tags[1].set);
        assert!(!tags[2].set);
    }

    #[tokio::test]
    async fn all_mode_orders_by_id() {
        let (svc, browser) = setup();

        browser
            .marshal_tags(None, false, &Scope::default())
            .await
            .unwrap();

        let call = svc.only_call();
        assert!(call.query.contains("from TagAnnotation tag"));
        assert!(call.query.contains("order by tag.id"));
        assert!(!call.query.contains(":tid"));
    }

    #[tokio::test]
    async fn child_mode_traverses_links() {
        let (svc, browser) = setup();
        svc.enqueue(vec![tag_row(10, "child", Value::Null, 0)]);

        let tags = browser
            .marshal_tags(Some(4), false, &Scope::default())
            .await
            .unwrap();
        assert_eq!(tags[0].id, 10);

        let call = svc.only_call();
        assert!(call.query.contains("from TagAnnotationLink link"));
        assert!(call.query.contains("link.parent.id = :tid"));
        assert!(call.query.contains("order by link.child.id"));
        assert_eq!(call.params.get("tid"), Some(&Param::Long(4)));
    }

    #[tokio::test]
    async fn child_mode_owner_filter() {
        let (svc, browser) = setup();

        browser
            .marshal_tags(Some(4), false, &Scope::default().owned_by(7))
            .await
            .unwrap();

        let call = svc.only_call();
        assert!(call.query.contains("link.child.details.owner.id = :id"));
        assert_eq!(call.params.get("id"), Some(&Param::Long(7)));
    }

    #[tokio::test]
    async fn orphan_mode_binds_tagset_namespace() {
        let (svc, browser) = setup();

        browser
            .marshal_tags(None, true, &Scope::default())
            .await
            .unwrap();

        let call = svc.only_call();
        assert!(call.query.contains("link.parent.ns = :tagns"));
        assert_eq!(
            call.params.get("tagns"),
            Some(&Param::Text(NS_TAGSET.into()))
        );
    }

    #[tokio::test]
    async fn empty_description_is_omitted() {
        let (svc, browser) = setup();
        svc.enqueue(vec![map_row(&[
            ("id", Value::Long(1)),
            ("textValue", Value::from("sample")),
            ("description", Value::from("")),
            ("ownerId", Value::Long(5)),
            ("perms", full_perms()),
            ("ns", Value::Null),
            ("childCount", Value::Long(0)),
        ])]);

        let tags = browser
            .marshal_tags(None, false, &Scope::default())
            .await
            .unwrap();
        assert_eq!(tags[0].description, None);
    }

    #[tokio::test]
    async fn description_kept_when_present() {
        let (svc, browser) = setup();
        svc.enqueue(vec![map_row(&[
            ("id", Value::Long(1)),
            ("textValue", Value::from("sample")),
            ("description", Value::from("batch 12 controls")),
            ("ownerId", Value::Long(5)),
            ("perms", full_perms()),
            ("ns", Value::Null),
            ("childCount", Value::Long(0)),
        ])]);

        let tags = browser
            .marshal_tags(None, false, &Scope::default())
            .await
            .unwrap();
        assert_eq!(tags[0].description.as_deref(), Some("batch 12 controls"));
    }
}
