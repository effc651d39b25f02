//! Report caching, staleness, and rendering.

use nova_core::error::ErrorKind;
use nova_core::types::id::ProjectId;
use nova_entity::project::ProjectRole;
use nova_entity::release::ReleaseStatus;
use nova_service::RequestContext;
use nova_service::release::EditReleaseRequest;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_report_is_reused_until_status_changes() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;

    let first = app.reports.generate(&app.vendor, release.id, None).await.unwrap();
    assert!(first.rendered);
    let again = app.reports.generate(&app.customer, release.id, None).await.unwrap();
    assert_eq!(again.path, first.path);
    assert!(!again.rendered);

    app.upload(release.id).await;
    let fresh = app.reports.generate(&app.vendor, release.id, None).await.unwrap();
    assert!(fresh.rendered);
    assert_ne!(fresh.path, first.path);
    assert!(!app.stored_path(&first.path).exists());
    assert!(app.stored_path(&fresh.path).exists());
}

#[tokio::test]
async fn test_demotion_makes_report_stale() {
    let app = TestApp::new().await;
    let older = app.approved("1.0").await;
    app.releases
        .promote(&app.vendor, older.id, ReleaseStatus::Latest)
        .await
        .unwrap();
    let before = app.reports.generate(&app.vendor, older.id, None).await.unwrap();

    let newer = app.approved("1.1").await;
    app.releases
        .promote(&app.vendor, newer.id, ReleaseStatus::Latest)
        .await
        .unwrap();

    let after = app.reports.generate(&app.vendor, older.id, None).await.unwrap();
    assert_ne!(after.name, before.name);
    assert!(after.name.contains("_Finished_"));
    assert!(!app.stored_path(&before.path).exists());
}

#[tokio::test]
async fn test_report_content_and_locale() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let release = app.upload(release.id).await;

    let handle = app
        .reports
        .generate(&app.vendor, release.id, Some("it-IT"))
        .await
        .unwrap();
    let html = String::from_utf8(
        app.storage
            .reports()
            .read(app.project.id, &handle.name)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    assert!(html.contains("Atlas Mobile"));
    assert!(html.contains("v. 1.0"));
    assert!(html.contains("lang=\"it\""));
    assert!(html.contains("- Asset #1 0.00 MB"));
    assert!(html.contains(ReleaseStatus::Verifying.color()));
}

#[tokio::test]
async fn test_reports_of_other_versions_survive() {
    let app = TestApp::new().await;
    let kept = app.add("1.0").await;
    let renamed = app.add("1.1").await;
    let kept_report = app.reports.generate(&app.vendor, kept.id, None).await.unwrap();
    let old_report = app.reports.generate(&app.vendor, renamed.id, None).await.unwrap();

    app.releases
        .edit_release(
            &app.vendor,
            renamed.id,
            EditReleaseRequest {
                version: Some("2.0".into()),
                notes: "renamed".into(),
            },
        )
        .await
        .unwrap();

    assert!(app.stored_path(&kept_report.path).exists());
    assert!(!app.stored_path(&old_report.path).exists());
}

#[tokio::test]
async fn test_report_of_foreign_release_is_not_found() {
    let app = TestApp::new().await;
    let release = app.add("1.0").await;
    let outsider = RequestContext::new(app.vendor.user_id, ProjectId::new(), ProjectRole::Vendor);
    let err = app
        .reports
        .generate(&outsider, release.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_versions_sanitized_alike_keep_separate_reports() {
    let app = TestApp::new().await;
    let spaced = app.add("1.0 a").await;
    let underscored = app.add("1.0_a").await;

    let spaced_report = app.reports.generate(&app.vendor, spaced.id, None).await.unwrap();
    let underscored_report = app
        .reports
        .generate(&app.vendor, underscored.id, None)
        .await
        .unwrap();
    assert!(underscored_report.rendered);
    assert_ne!(underscored_report.path, spaced_report.path);
    assert!(app.stored_path(&spaced_report.path).exists());

    app.releases.delete_release(&app.vendor, spaced.id).await.unwrap();
    assert!(!app.stored_path(&spaced_report.path).exists());
    assert!(app.stored_path(&underscored_report.path).exists());

    let again = app
        .reports
        .generate(&app.vendor, underscored.id, None)
        .await
        .unwrap();
    assert_eq!(again.path, underscored_report.path);
    assert!(!again.rendered);
}
