//! Cross-marshaller scenarios driving a browse session end to end against
//! the scripted query service.

use std::sync::Arc;

use cellarium_core::{
    CallContext, Error, GroupScope, Page, Permissions, Scope, Value, Window,
};

use crate::test_fixtures::{
    full_perms, map_row, FailingQueryService, ScriptedQueryService, StaticShares,
};
use crate::{Browser, ImageFilter};

fn setup() -> (Arc<ScriptedQueryService>, Browser) {
    let svc = Arc::new(ScriptedQueryService::new());
    let browser = Browser::new(
        svc.clone(),
        Arc::new(StaticShares::new()),
        CallContext::new(5),
    );
    (svc, browser)
}

fn project_row(id: i64, name: &str, children: i64) -> Vec<Value> {
    map_row(&[
        ("id", Value::Long(id)),
        ("name", Value::from(name)),
        ("ownerId", Value::Long(5)),
        ("perms", full_perms()),
        ("childCount", Value::Long(children)),
    ])
}

#[tokio::test]
async fn walks_group_to_images_with_per_entity_scoping() {
    let (svc, browser) = setup();

    svc.enqueue(vec![vec![
        Value::Long(3),
        Value::from("lab-a"),
        Value::Perms(Permissions::full().with_perm("rwra--")),
    ]]);
    svc.enqueue(vec![project_row(10, "atlas", 1)]);
    svc.enqueue(vec![map_row(&[
        ("id", Value::Long(20)),
        ("name", Value::from("wk12")),
        ("ownerId", Value::Long(5)),
        ("perms", full_perms()),
        ("childCount", Value::Long(1)),
    ])]);
    svc.enqueue(vec![map_row(&[
        ("id", Value::Long(30)),
        ("name", Value::from("a.tiff")),
        ("ownerId", Value::Long(5)),
        ("perms", full_perms()),
        ("filesetId", Value::Null),
    ])]);

    let groups = browser.marshal_groups(Some(5), &Page::first()).await.unwrap();
    let scope = Scope::for_group(groups[0].id);
    let projects = browser.marshal_projects(&scope).await.unwrap();
    let datasets = browser
        .marshal_datasets(Some(projects[0].id), false, &scope)
        .await
        .unwrap();
    let images = browser
        .marshal_images(&ImageFilter::in_dataset(datasets[0].id), &scope)
        .await
        .unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id(), 30);

    let calls = svc.calls();
    assert_eq!(calls.len(), 4);
    // The group directory crosses groups; the container walk stays in the
    // group picked from it.
    assert_eq!(calls[0].options.group, GroupScope::All);
    for call in &calls[1..] {
        assert_eq!(call.options.group, GroupScope::Only(3));
    }
}

#[tokio::test]
async fn child_counts_are_independent_of_paging() {
    let (svc, browser) = setup();
    svc.enqueue(vec![project_row(1, "atlas", 42)]);
    svc.enqueue(vec![project_row(1, "atlas", 42)]);

    let page1 = browser
        .marshal_projects(&Scope::default().paged(Page::at(1).with_limit(1)))
        .await
        .unwrap();
    let unpaged = browser
        .marshal_projects(&Scope::default().paged(Page::all()))
        .await
        .unwrap();

    assert_eq!(page1[0].child_count, 42);
    assert_eq!(unpaged[0].child_count, 42);

    let calls = svc.calls();
    assert_eq!(
        calls[0].params.window(),
        Some(Window { offset: 0, limit: 1 })
    );
    assert_eq!(calls[1].params.window(), None);
}

#[tokio::test]
async fn binder_state_does_not_leak_between_calls() {
    let (svc, browser) = setup();

    browser
        .marshal_projects(&Scope::default().owned_by(7))
        .await
        .unwrap();
    browser.marshal_projects(&Scope::default()).await.unwrap();

    let calls = svc.calls();
    assert_eq!(calls[0].params.get("id"), Some(&cellarium_core::Param::Long(7)));
    assert_eq!(calls[1].params.get("id"), None);
}

#[tokio::test]
async fn query_service_failures_propagate_unchanged() {
    let browser = Browser::new(
        Arc::new(FailingQueryService),
        Arc::new(StaticShares::new()),
        CallContext::new(5),
    );

    let err = browser.marshal_projects(&Scope::default()).await.unwrap_err();
    match err {
        Error::Query(message) => assert_eq!(message, "backend unavailable"),
        other => panic!("expected query error, got {other:?}"),
    }
}

#[tokio::test]
async fn default_page_limit_is_configurable() {
    let svc = Arc::new(ScriptedQueryService::new());
    let browser = Browser::new(
        svc.clone(),
        Arc::new(StaticShares::new()),
        CallContext::new(5),
    )
    .with_page_limit(25);

    browser
        .marshal_projects(&Scope::default().paged(Page::at(2)))
        .await
        .unwrap();

    assert_eq!(
        svc.only_call().params.window(),
        Some(Window {
            offset: 25,
            limit: 25
        })
    );
}
