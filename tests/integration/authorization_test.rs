//! Role gates on every operation.

use nova_core::error::ErrorKind;
use nova_core::types::id::{ReleaseEventId, UserId};
use nova_database::store::ProjectDirectory;
use nova_entity::project::ProjectRole;
use nova_entity::release::ReleaseStatus;
use nova_service::RequestContext;
use nova_service::release::{AddReleaseRequest, ApproveAssetsRequest};

use crate::helpers::{TestApp, batch};

#[tokio::test]
async fn test_reviewers_cannot_act_on_vendor_side() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;

    for ctx in [&app.customer, &app.tester] {
        let err = app
            .releases
            .add_release(
                ctx,
                AddReleaseRequest {
                    version: "2.0".into(),
                    notes: "n".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = app
            .releases
            .upload_assets(ctx, release.id, batch(&["a.apk"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = app.releases.delete_release(ctx, release.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    let unchanged = app.releases.get_release(&app.customer, release.id).await.unwrap();
    assert_eq!(unchanged.status, ReleaseStatus::New);
}

#[tokio::test]
async fn test_vendor_side_cannot_review() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;

    for ctx in [&app.author, &app.vendor] {
        let err = app
            .releases
            .approve_assets(
                ctx,
                release.id,
                ApproveAssetsRequest {
                    event_id: release.events[0].id,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}

#[tokio::test]
async fn test_authorization_is_checked_before_lookup() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let err = app
        .releases
        .approve_assets(
            &app.vendor,
            release.id,
            ApproveAssetsRequest {
                event_id: ReleaseEventId::new(),
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_context_resolution() {
    let app = TestApp::new().await;
    let directory = app.stores.projects.as_ref();

    let ctx = RequestContext::resolve(directory, app.project.author_id, app.project.id)
        .await
        .unwrap();
    assert_eq!(ctx.role, ProjectRole::Author);

    let ctx = RequestContext::resolve(directory, app.tester.user_id, app.project.id)
        .await
        .unwrap();
    assert_eq!(ctx.role, ProjectRole::Tester);

    let err = RequestContext::resolve(directory, UserId::new(), app.project.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    assert!(directory.find_project(app.project.id).await.unwrap().is_some());
}
