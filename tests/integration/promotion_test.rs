//! Distribution channel promotion and sibling demotion.

use nova_core::error::ErrorKind;
use nova_database::store::NotificationStore;
use nova_entity::event::ReleaseEventKind;
use nova_entity::notification::NotificationKind;
use nova_core::types::id::ReleaseId;
use nova_entity::release::{Release, ReleaseStatus};

use crate::helpers::TestApp;

fn assert_single_latest(releases: &[Release], expected: ReleaseId) {
    let latest: Vec<_> = releases
        .iter()
        .filter(|r| r.status == ReleaseStatus::Latest)
        .collect();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, expected);
}

#[tokio::test]
async fn test_promoting_latest_demotes_sibling_without_event() {
    let app = TestApp::new().await;
    let older = app.approved("1.0").await;
    let newer = app.approved("1.1").await;
    let newer = app
        .releases
        .promote(&app.vendor, newer.id, ReleaseStatus::Latest)
        .await
        .unwrap();
    let newer_log = newer.events.clone();

    let older_before = older.events.len();
    let promoted = app
        .releases
        .promote(&app.vendor, older.id, ReleaseStatus::Latest)
        .await
        .unwrap();

    assert_eq!(promoted.status, ReleaseStatus::Latest);
    assert_eq!(promoted.events.len(), older_before + 1);
    assert!(matches!(
        promoted.last_event().unwrap().kind,
        ReleaseEventKind::Standard {
            status: ReleaseStatus::Latest
        }
    ));

    let demoted = app.releases.get_release(&app.vendor, newer.id).await.unwrap();
    assert_eq!(demoted.status, ReleaseStatus::Finished);
    assert_eq!(demoted.events, newer_log);
    assert_eq!(demoted.last_event().unwrap().status(), ReleaseStatus::Latest);

    for user in [app.author.user_id, app.customer.user_id, app.tester.user_id] {
        let inbox = app.stores.notifications.find_by_user(user, 1).await.unwrap();
        let latest = &inbox[0];
        assert_eq!(latest.kind, NotificationKind::StatusChanged);
        assert_eq!(latest.release_id, Some(older.id));
        assert_eq!(latest.status, Some(ReleaseStatus::Latest));
        assert_eq!(latest.release_version.as_deref(), Some("v. 1.0"));
    }
    let vendor_inbox = app
        .stores
        .notifications
        .find_by_user(app.vendor.user_id, 100)
        .await
        .unwrap();
    assert!(
        !vendor_inbox
            .iter()
            .any(|n| n.status == Some(ReleaseStatus::Latest)),
        "the actor is never notified of its own promotion"
    );
}

#[tokio::test]
async fn test_at_most_one_latest_per_project() {
    let app = TestApp::new().await;
    let first = app.approved("1.0").await.id;
    let second = app.approved("1.1").await.id;
    let third = app.approved("1.2").await.id;
    app.releases
        .promote(&app.vendor, second, ReleaseStatus::Beta)
        .await
        .unwrap();

    // Each step promotes a release that is still Approved or on a channel,
    // including re-promoting the current Latest.
    for id in [first, second, second, third] {
        app.releases
            .promote(&app.vendor, id, ReleaseStatus::Latest)
            .await
            .unwrap();
        let releases = app.releases.list_releases(&app.vendor).await.unwrap();
        assert_single_latest(&releases, id);
    }

    let releases = app.releases.list_releases(&app.vendor).await.unwrap();
    for id in [first, second] {
        let release = releases.iter().find(|r| r.id == id).unwrap();
        assert_eq!(release.status, ReleaseStatus::Finished);
    }

    let err = app
        .releases
        .promote(&app.vendor, first, ReleaseStatus::Latest)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalTransition);
    let releases = app.releases.list_releases(&app.vendor).await.unwrap();
    assert_single_latest(&releases, third);
}

#[tokio::test]
async fn test_channels_are_not_ordered() {
    let app = TestApp::new().await;
    let release = app.approved("1.0").await;
    for target in [ReleaseStatus::Beta, ReleaseStatus::Alpha, ReleaseStatus::Latest, ReleaseStatus::Beta] {
        let release = app
            .releases
            .promote(&app.author, release.id, target)
            .await
            .unwrap();
        assert_eq!(release.status, target);
    }
}

#[tokio::test]
async fn test_promotion_requires_reviewed_release() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let err = app
        .releases
        .promote(&app.vendor, release.id, ReleaseStatus::Alpha)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalTransition);

    let release = app.approved("2.0").await;
    let err = app
        .releases
        .promote(&app.vendor, release.id, ReleaseStatus::Finished)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let unchanged = app.releases.get_release(&app.vendor, release.id).await.unwrap();
    assert_eq!(unchanged.status, ReleaseStatus::Approved);
    assert_eq!(unchanged.events.len(), release.events.len());
}
