//! Racing requests on the same release.

use nova_core::error::ErrorKind;
use nova_entity::release::ReleaseStatus;
use nova_service::release::{ApproveAssetsRequest, RejectAssetsRequest};

use crate::helpers::{TestApp, batch};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_uploads_admit_one() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;

    let (a, b) = tokio::join!(
        app.releases.upload_assets(&app.vendor, release.id, batch(&["a.apk"])),
        app.releases.upload_assets(&app.author, release.id, batch(&["b.apk"])),
    );
    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(err.kind, ErrorKind::IllegalTransition);

    let after = app.releases.get_release(&app.vendor, release.id).await.unwrap();
    assert_eq!(after.events.len(), 1);
    assert_eq!(after.assets().count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_reviews_admit_one() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let (release_id, event_id) = (release.id, release.events[0].id);

    let approve = {
        let service = app.releases.clone();
        let ctx = app.customer.clone();
        tokio::spawn(async move {
            service
                .approve_assets(&ctx, release_id, ApproveAssetsRequest { event_id, comment: None })
                .await
        })
    };
    let reject = {
        let service = app.releases.clone();
        let ctx = app.tester.clone();
        tokio::spawn(async move {
            service
                .reject_assets(
                    &ctx,
                    release_id,
                    RejectAssetsRequest {
                        event_id,
                        reasons: "crash".into(),
                        tags: vec![],
                    },
                )
                .await
        })
    };

    let results = [approve.await.unwrap(), reject.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(err.kind, ErrorKind::AlreadyCommented);

    let after = app.releases.get_release(&app.customer, release_id).await.unwrap();
    assert_eq!(after.events.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_latest_promotions_leave_one_latest() {
    let app = TestApp::new().await;
    let mut ids = Vec::new();
    for version in ["1.0", "1.1", "1.2", "1.3"] {
        ids.push(app.approved(version).await.id);
    }

    let tasks: Vec<_> = ids
        .iter()
        .map(|id| {
            let service = app.releases.clone();
            let ctx = app.vendor.clone();
            let id = *id;
            tokio::spawn(async move { service.promote(&ctx, id, ReleaseStatus::Latest).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let releases = app.releases.list_releases(&app.vendor).await.unwrap();
    let latest = releases
        .iter()
        .filter(|r| r.status == ReleaseStatus::Latest)
        .count();
    let finished = releases
        .iter()
        .filter(|r| r.status == ReleaseStatus::Finished)
        .count();
    assert_eq!(latest, 1);
    assert_eq!(finished, ids.len() - 1);
}
