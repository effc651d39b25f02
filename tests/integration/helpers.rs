//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;

use nova_core::config::{ReleaseConfig, StorageConfig};
use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, ReleaseId, UserId};
use nova_database::Stores;
use nova_database::store::{NotificationStore, ProjectDirectory};
use nova_entity::notification::Notification;
use nova_entity::project::{MemberRole, Project, ProjectMember, ProjectRole};
use nova_entity::release::Release;
use nova_service::release::{AddReleaseRequest, UploadAssetsRequest, UploadFile};
use nova_service::{
    LockRegistry, NotificationFanout, NotificationService, ReleaseService, ReportService,
    RequestContext,
};
use nova_storage::StorageManager;

/// Test application context
pub struct TestApp {
    /// Keeps the storage root alive for the test's duration
    pub dir: TempDir,
    pub stores: Stores,
    pub storage: StorageManager,
    pub releases: ReleaseService,
    pub reports: ReportService,
    pub notifications: NotificationService,
    pub project: Project,
    pub author: RequestContext,
    pub vendor: RequestContext,
    pub customer: RequestContext,
    pub tester: RequestContext,
}

impl TestApp {
    /// Services over fresh in-memory stores and a temp-dir storage root.
    pub async fn new() -> Self {
        Self::with_notifications(None).await
    }

    /// Same as [`TestApp::new`], with a replacement notification store.
    pub async fn with_notifications(notifications: Option<Arc<dyn NotificationStore>>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage_config = StorageConfig {
            data_root: dir.path().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        let storage = StorageManager::from_config(&storage_config)
            .await
            .expect("Failed to init storage");

        let mut stores = Stores::memory();
        if let Some(store) = notifications {
            stores.notifications = store;
        }

        let (author, vendor, customer, tester) =
            (UserId::new(), UserId::new(), UserId::new(), UserId::new());
        let project = Project {
            id: ProjectId::new(),
            name: "Atlas Mobile".into(),
            logo_url: "https://cdn.example.com/atlas.png".into(),
            author_id: author,
            members: vec![
                member(vendor, MemberRole::Vendor),
                member(customer, MemberRole::Customer),
                member(tester, MemberRole::Tester),
            ],
        };
        stores
            .projects
            .save_project(&project)
            .await
            .expect("Failed to save project");

        let releases = ReleaseService::new(
            Arc::clone(&stores.releases),
            Arc::clone(&stores.projects),
            storage.assets().clone(),
            storage.reports().clone(),
            NotificationFanout::new(Arc::clone(&stores.notifications)),
            Arc::new(LockRegistry::new()),
            ReleaseConfig::default(),
            storage_config,
        );
        let reports = ReportService::new(
            Arc::clone(&stores.releases),
            Arc::clone(&stores.projects),
            storage.assets().clone(),
            storage.reports().clone(),
            "en",
        );
        let notifications = NotificationService::new(Arc::clone(&stores.notifications));

        Self {
            dir,
            releases,
            reports,
            notifications,
            author: RequestContext::new(author, project.id, ProjectRole::Author),
            vendor: RequestContext::new(vendor, project.id, ProjectRole::Vendor),
            customer: RequestContext::new(customer, project.id, ProjectRole::Customer),
            tester: RequestContext::new(tester, project.id, ProjectRole::Tester),
            project,
            stores,
            storage,
        }
    }

    /// Create a release as the vendor.
    pub async fn add(&self, version: &str) -> Release {
        self.releases
            .add_release(
                &self.vendor,
                AddReleaseRequest {
                    version: version.into(),
                    notes: format!("Notes for {version}"),
                },
            )
            .await
            .expect("Failed to add release")
    }

    /// Upload one small asset as the vendor.
    pub async fn upload(&self, release_id: ReleaseId) -> Release {
        self.releases
            .upload_assets(&self.vendor, release_id, batch(&["app.apk"]))
            .await
            .expect("Failed to upload assets")
    }

    /// Create, upload and approve a release.
    pub async fn approved(&self, version: &str) -> Release {
        let release = self.add(version).await;
        let release = self.upload(release.id).await;
        let event_id = release.events[0].id;
        self.releases
            .approve_assets(
                &self.customer,
                release.id,
                nova_service::release::ApproveAssetsRequest {
                    event_id,
                    comment: None,
                },
            )
            .await
            .expect("Failed to approve assets")
    }

    /// Path of a stored object under the storage root.
    pub fn stored_path(&self, reference: &str) -> std::path::PathBuf {
        self.dir.path().join(reference)
    }
}

fn member(user_id: UserId, role: MemberRole) -> ProjectMember {
    ProjectMember { user_id, role }
}

/// An upload request with one non-empty file per name.
pub fn batch(names: &[&str]) -> UploadAssetsRequest {
    UploadAssetsRequest {
        files: names
            .iter()
            .map(|name| UploadFile::new(*name, Bytes::from(format!("content of {name}"))))
            .collect(),
        comment: None,
    }
}

/// A notification store that fails every call.
#[derive(Debug, Default)]
pub struct FailingNotificationStore;

#[async_trait]
impl NotificationStore for FailingNotificationStore {
    async fn insert_batch(&self, _notifications: &[Notification]) -> AppResult<()> {
        Err(AppError::database("notification store unavailable"))
    }

    async fn find_by_user(&self, _user_id: UserId, _limit: i64) -> AppResult<Vec<Notification>> {
        Err(AppError::database("notification store unavailable"))
    }

    async fn count_unread(&self, _user_id: UserId) -> AppResult<i64> {
        Err(AppError::database("notification store unavailable"))
    }

    async fn mark_release_read(&self, _user_id: UserId, _release_id: ReleaseId) -> AppResult<u64> {
        Err(AppError::database("notification store unavailable"))
    }
}
