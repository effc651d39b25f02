//! Upload, review, edit, and delete workflows.

use bytes::Bytes;

use nova_core::error::ErrorKind;
use nova_core::types::id::{ReleaseEventId, ReleaseId};
use nova_entity::event::{ReleaseEventKind, ReleaseTag};
use nova_entity::release::{Release, ReleaseStatus};
use nova_service::release::{
    AnnotateTagRequest, ApproveAssetsRequest, EditReleaseRequest, RejectAssetsRequest,
    UploadAssetsRequest, UploadFile,
};

use crate::helpers::{TestApp, batch};

/// Status equals the last event's status, or New with an empty log.
fn assert_status_matches_log(release: &Release) {
    match release.last_event() {
        Some(event) => assert_eq!(release.status, event.status()),
        None => assert_eq!(release.status, ReleaseStatus::New),
    }
}

fn approve(event_id: ReleaseEventId) -> ApproveAssetsRequest {
    ApproveAssetsRequest {
        event_id,
        comment: Some("Looks good".into()),
    }
}

fn reject(event_id: ReleaseEventId, tags: &[ReleaseTag]) -> RejectAssetsRequest {
    RejectAssetsRequest {
        event_id,
        reasons: "not good".into(),
        tags: tags.to_vec(),
    }
}

#[tokio::test]
async fn test_full_review_cycle_keeps_status_and_log_in_step() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    assert_status_matches_log(&release);

    let release = app.upload(release.id).await;
    assert_eq!(release.status, ReleaseStatus::Verifying);
    assert_status_matches_log(&release);

    let first_upload = release.events[0].id;
    let release = app
        .releases
        .reject_assets(&app.customer, release.id, reject(first_upload, &[ReleaseTag::Bug]))
        .await
        .unwrap();
    assert_eq!(release.status, ReleaseStatus::Rejected);
    assert_status_matches_log(&release);

    let release = app.upload(release.id).await;
    let second_upload = release.last_event().unwrap().id;
    let release = app
        .releases
        .approve_assets(&app.tester, release.id, approve(second_upload))
        .await
        .unwrap();
    assert_eq!(release.status, ReleaseStatus::Approved);
    assert_status_matches_log(&release);
    assert!(release.approved_at.is_some());
    assert_eq!(release.events.len(), 4);

    let kinds: Vec<&str> = release.events.iter().map(|e| e.kind_name()).collect();
    assert_eq!(kinds, ["asset_uploading", "rejected", "asset_uploading", "standard"]);
    for pair in release.events.windows(2) {
        assert!(pair[0].occurred_at <= pair[1].occurred_at);
    }

    let upload = release.find_upload(second_upload).unwrap();
    assert!(upload.commented);
    assert_eq!(upload.comment.as_deref(), Some("Looks good"));
}

#[tokio::test]
async fn test_upload_outside_new_or_rejected_is_illegal() {
    let app = TestApp::new().await;
    let release = app.approved("1.0").await;
    let verifying = app.add("2.0").await;
    let verifying = app.upload(verifying.id).await;

    for release in [release, verifying] {
        let before = release.events.len();
        let err = app
            .releases
            .upload_assets(&app.vendor, release.id, batch(&["again.apk"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalTransition);

        let after = app.releases.get_release(&app.vendor, release.id).await.unwrap();
        assert_eq!(after.events.len(), before);
        assert_eq!(after.status, release.status);
    }
}

#[tokio::test]
async fn test_second_review_of_same_batch_is_already_commented() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let before = release.events.len();
    let event_id = release.events[0].id;

    app.releases
        .approve_assets(&app.customer, release.id, approve(event_id))
        .await
        .unwrap();
    let err = app
        .releases
        .approve_assets(&app.customer, release.id, approve(event_id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyCommented);

    let err = app
        .releases
        .reject_assets(&app.customer, release.id, reject(event_id, &[]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyCommented);

    let after = app.releases.get_release(&app.customer, release.id).await.unwrap();
    assert_eq!(after.events.len(), before + 1);
    assert_eq!(after.status, ReleaseStatus::Approved);
}

#[tokio::test]
async fn test_review_of_unknown_event_is_not_found() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let err = app
        .releases
        .approve_assets(&app.customer, release.id, approve(ReleaseEventId::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_empty_file_aborts_whole_upload() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let request = UploadAssetsRequest {
        files: vec![
            UploadFile::new("a.apk", Bytes::from(vec![7u8; 10])),
            UploadFile::new("b.apk", Bytes::new()),
        ],
        comment: Some(String::new()),
    };

    let err = app
        .releases
        .upload_assets(&app.vendor, release.id, request)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyAsset);

    let after = app.releases.get_release(&app.vendor, release.id).await.unwrap();
    assert_eq!(after.status, ReleaseStatus::New);
    assert!(after.events.is_empty());
    assert!(
        !app.stored_path(&format!("assets/{}", release.id)).exists(),
        "no asset may be written for a rejected batch"
    );
}

#[tokio::test]
async fn test_upload_without_files_is_validation() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let err = app
        .releases
        .upload_assets(&app.vendor, release.id, batch(&[]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_reject_with_tags() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let event_id = release.events[0].id;

    let release = app
        .releases
        .reject_assets(
            &app.customer,
            release.id,
            reject(event_id, &[ReleaseTag::Bug, ReleaseTag::Tip]),
        )
        .await
        .unwrap();

    assert_eq!(release.status, ReleaseStatus::Rejected);
    assert!(release.find_upload(event_id).unwrap().commented);
    assert_eq!(release.events.len(), 2);

    let ReleaseEventKind::Rejected(rejection) = &release.events[1].kind else {
        panic!("expected a rejection event");
    };
    assert_eq!(rejection.reasons, "not good");
    let tags: Vec<ReleaseTag> = rejection.tags.iter().map(|t| t.tag).collect();
    assert_eq!(tags, [ReleaseTag::Bug, ReleaseTag::Tip]);
    assert!(rejection.tags.iter().all(|t| t.comment.is_none()));
}

#[tokio::test]
async fn test_annotate_current_rejection_only() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let release = app
        .releases
        .reject_assets(
            &app.customer,
            release.id,
            reject(release.events[0].id, &[ReleaseTag::LayoutChange]),
        )
        .await
        .unwrap();
    let tag_id = release.events[1].as_rejection().unwrap().tags[0].id;

    let annotate = AnnotateTagRequest {
        comment: "  Button overlaps the logo  ".into(),
    };
    let release = app
        .releases
        .annotate_rejected_tag(&app.customer, release.id, tag_id, annotate.clone())
        .await
        .unwrap();
    let (_, _, tag) = release.find_rejected_tag(tag_id).unwrap();
    assert_eq!(tag.comment.as_deref(), Some("Button overlaps the logo"));
    assert_eq!(release.events.len(), 2);
    assert_eq!(release.status, ReleaseStatus::Rejected);

    let release = app.upload(release.id).await;
    let err = app
        .releases
        .annotate_rejected_tag(&app.customer, release.id, tag_id, annotate)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalTransition);
}

#[tokio::test]
async fn test_edit_renames_and_checks_duplicates() {
    let app = TestApp::new().await;
    let first = app.add("1.0").await;
    app.add("1.1").await;

    let err = app
        .releases
        .edit_release(
            &app.vendor,
            first.id,
            EditReleaseRequest {
                version: Some("v.1.1".into()),
                notes: "n".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateVersion);

    let edited = app
        .releases
        .edit_release(
            &app.author,
            first.id,
            EditReleaseRequest {
                version: Some("1.0.1".into()),
                notes: "hotfix".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.version, "v. 1.0.1");
    assert_eq!(edited.notes, "hotfix");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;
    let asset_paths: Vec<_> = release
        .assets()
        .map(|a| app.stored_path(&a.storage_path))
        .collect();
    assert!(asset_paths.iter().all(|p| p.exists()));
    app.reports.generate(&app.vendor, release.id, None).await.unwrap();

    app.releases.delete_release(&app.vendor, release.id).await.unwrap();

    let err = app.releases.get_release(&app.vendor, release.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(asset_paths.iter().all(|p| !p.exists()));
    let reports = app.storage.reports().list_names(app.project.id).await.unwrap();
    assert!(reports.is_empty());

    let err = app
        .releases
        .delete_release(&app.vendor, release.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_purge_removes_every_release() {
    let app = TestApp::new().await;
    app.approved("1.0").await;
    app.add("1.1").await;

    let removed = app.releases.purge_project(&app.author).await.unwrap();
    assert_eq!(removed, 2);
    assert!(app.releases.list_releases(&app.author).await.unwrap().is_empty());

    let err = app.releases.purge_project(&app.vendor).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_unknown_release_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .releases
        .upload_assets(&app.vendor, ReleaseId::new(), batch(&["a.apk"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
