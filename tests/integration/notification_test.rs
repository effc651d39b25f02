//! Notification fan-out and inbox behavior.

use std::sync::Arc;

use nova_entity::notification::NotificationKind;
use nova_entity::release::ReleaseStatus;

use crate::helpers::{FailingNotificationStore, TestApp};

#[tokio::test]
async fn test_every_other_participant_is_notified() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;

    for ctx in [&app.author, &app.customer, &app.tester] {
        assert_eq!(app.notifications.unread_count(ctx.user_id).await.unwrap(), 1);
        let inbox = app.notifications.list(ctx.user_id, None).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::StatusChanged);
        assert_eq!(inbox[0].status, Some(ReleaseStatus::New));
        assert_eq!(inbox[0].release_id, Some(release.id));
        assert_eq!(inbox[0].project_logo, app.project.logo_url);
    }
    assert_eq!(app.notifications.unread_count(app.vendor.user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deletion_notice_carries_version_only() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    app.releases.delete_release(&app.vendor, release.id).await.unwrap();

    let inbox = app.notifications.list(app.customer.user_id, Some(1)).await.unwrap();
    let notice = &inbox[0];
    assert_eq!(notice.kind, NotificationKind::ReleaseDeleted);
    assert!(notice.release_id.is_none());
    assert_eq!(notice.release_version.as_deref(), Some("v. 1.0"));
    assert_eq!(notice.status, None);
}

#[tokio::test]
async fn test_project_purge_notice_carries_logo_only() {
    let app = TestApp::new().await;
    app.add("1.0").await;
    app.releases.purge_project(&app.author).await.unwrap();

    let inbox = app.notifications.list(app.vendor.user_id, Some(1)).await.unwrap();
    let notice = &inbox[0];
    assert_eq!(notice.kind, NotificationKind::ProjectDeleted);
    assert_eq!(notice.project_logo, app.project.logo_url);
    assert!(notice.release_id.is_none());
    assert!(notice.release_version.is_none());
}

#[tokio::test]
async fn test_mark_release_read() {
    let app = TestApp::new().await;
    let first = app.add("1.0").await;
    let first = app.upload(first.id).await;
    app.add("1.1").await;

    let customer = app.customer.user_id;
    assert_eq!(app.notifications.unread_count(customer).await.unwrap(), 3);
    let updated = app.notifications.mark_release_read(customer, first.id).await.unwrap();
    assert_eq!(updated, 2);
    assert_eq!(app.notifications.unread_count(customer).await.unwrap(), 1);
}

#[tokio::test]
async fn test_failing_notifications_do_not_fail_transitions() {
    let app = TestApp::with_notifications(Some(Arc::new(FailingNotificationStore))).await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    assert_eq!(release.status, ReleaseStatus::Verifying);

    app.releases.delete_release(&app.vendor, release.id).await.unwrap();
}
