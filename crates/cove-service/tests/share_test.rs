//! Share lifecycle and public validation tests.

mod support;

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use cove_core::error::ErrorKind;
use cove_database::ShareStore;
use cove_entity::share::{SharePermission, ShareType};
use cove_service::share::CreateShareRequest;
use cove_service::{NamespaceService, RequestContext, ShareAccessService, ShareService};
use support::TestHarness;

const BASE_URL: &str = "https://cove.example.com";

struct Services {
    namespace: NamespaceService,
    shares: ShareService,
    access: ShareAccessService,
}

fn services(harness: &TestHarness) -> Services {
    Services {
        namespace: NamespaceService::new(
            harness.folders.clone(),
            harness.files.clone(),
            harness.objects.clone(),
            1024 * 1024,
            Duration::from_secs(5),
        ),
        shares: ShareService::new(
            harness.shares.clone(),
            harness.files.clone(),
            harness.folders.clone(),
            BASE_URL.to_string(),
        ),
        access: ShareAccessService::new(
            harness.shares.clone(),
            harness.files.clone(),
            harness.folders.clone(),
        ),
    }
}

fn ctx_for(user_id: Uuid) -> RequestContext {
    RequestContext::new(user_id, "127.0.0.1".to_string(), Some("tests".to_string()))
}

fn file_share_request(file_id: Uuid) -> CreateShareRequest {
    CreateShareRequest {
        file_id: Some(file_id),
        folder_id: None,
        share_type: ShareType::Unlisted,
        permissions: SharePermission::Download,
        expires_at: None,
    }
}

async fn upload_fixture(svc: &Services, ctx: &RequestContext) -> cove_entity::file::File {
    svc.namespace
        .upload_file(
            ctx,
            "shared.txt".to_string(),
            "text/plain".to_string(),
            Bytes::from_static(b"shared content"),
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn created_share_has_url_and_opaque_token() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;

    let created = svc
        .shares
        .create_share(&ctx, file_share_request(file.id))
        .await
        .unwrap();

    assert_eq!(created.share.token.len(), 64);
    assert_eq!(
        created.url,
        format!("{BASE_URL}/share/{}", created.share.token)
    );
    assert!(created.share.is_active);
    assert_eq!(created.share.view_count, 0);
}

#[tokio::test]
async fn share_must_target_exactly_one_entry() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;
    let folder = svc
        .namespace
        .create_folder(&ctx, "F".to_string(), None)
        .await
        .unwrap();

    let both = CreateShareRequest {
        file_id: Some(file.id),
        folder_id: Some(folder.id),
        share_type: ShareType::Unlisted,
        permissions: SharePermission::View,
        expires_at: None,
    };
    let neither = CreateShareRequest {
        file_id: None,
        folder_id: None,
        share_type: ShareType::Unlisted,
        permissions: SharePermission::View,
        expires_at: None,
    };

    assert_eq!(
        svc.shares.create_share(&ctx, both).await.unwrap_err().kind,
        ErrorKind::Validation
    );
    assert_eq!(
        svc.shares.create_share(&ctx, neither).await.unwrap_err().kind,
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn sharing_a_foreign_file_reads_as_not_found() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let owner = ctx_for(Uuid::new_v4());
    let stranger = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &owner).await;

    let err = svc
        .shares
        .create_share(&stranger, file_share_request(file.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn validation_increments_view_count_and_returns_file_projection() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;

    let created = svc
        .shares
        .create_share(&ctx, file_share_request(file.id))
        .await
        .unwrap();

    let first = svc.access.validate(&created.share.token).await.unwrap();
    assert_eq!(first.share.view_count, 1);
    let second = svc.access.validate(&created.share.token).await.unwrap();
    assert_eq!(second.share.view_count, 2);

    let shared_file = second.file.unwrap();
    assert_eq!(shared_file.id, file.id);
    assert_eq!(shared_file.filename, "shared.txt");
    assert_eq!(shared_file.storage_path, file.storage_path);
    assert!(second.folder.is_none());
}

#[tokio::test]
async fn expired_share_answers_expired_without_counting_views() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;

    let created = svc
        .shares
        .create_share(&ctx, file_share_request(file.id))
        .await
        .unwrap();
    harness
        .shares
        .set_expires_at(created.share.id, Some(Utc::now() - chrono::Duration::hours(1)));

    for _ in 0..3 {
        let err = svc
            .access
            .validate(&created.share.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expired);
    }

    let stored = harness
        .shares
        .find_by_token(&created.share.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 0);
}

#[tokio::test]
async fn deactivated_share_is_indistinguishable_from_unknown() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;

    let created = svc
        .shares
        .create_share(&ctx, file_share_request(file.id))
        .await
        .unwrap();
    svc.shares
        .deactivate_share(&ctx, created.share.id)
        .await
        .unwrap();

    let deactivated = svc
        .access
        .validate(&created.share.token)
        .await
        .unwrap_err();
    let unknown = svc.access.validate("feedfacedeadbeef").await.unwrap_err();

    assert_eq!(deactivated.kind, ErrorKind::NotFound);
    assert_eq!(unknown.kind, ErrorKind::NotFound);

    // Deactivating again is idempotent.
    svc.shares
        .deactivate_share(&ctx, created.share.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn stranger_cannot_deactivate_a_share() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let owner = ctx_for(Uuid::new_v4());
    let stranger = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &owner).await;

    let created = svc
        .shares
        .create_share(&owner, file_share_request(file.id))
        .await
        .unwrap();

    let err = svc
        .shares
        .deactivate_share(&stranger, created.share.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Token still validates.
    assert!(svc.access.validate(&created.share.token).await.is_ok());
}

#[tokio::test]
async fn view_only_share_does_not_grant_download() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&svc, &ctx).await;

    let created = svc
        .shares
        .create_share(
            &ctx,
            CreateShareRequest {
                file_id: Some(file.id),
                folder_id: None,
                share_type: ShareType::Public,
                permissions: SharePermission::View,
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let err = svc
        .access
        .check_download_permission(&created.share.token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn folder_share_validates_to_folder_projection() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let folder = svc
        .namespace
        .create_folder(&ctx, "Album".to_string(), None)
        .await
        .unwrap();

    let created = svc
        .shares
        .create_share(
            &ctx,
            CreateShareRequest {
                file_id: None,
                folder_id: Some(folder.id),
                share_type: ShareType::Public,
                permissions: SharePermission::View,
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let view = svc.access.validate(&created.share.token).await.unwrap();
    assert!(view.file.is_none());
    assert_eq!(view.folder.unwrap().name, "Album");
}

#[tokio::test]
async fn owner_listing_is_newest_first_and_scoped() {
    let harness = TestHarness::new();
    let svc = services(&harness);
    let owner = ctx_for(Uuid::new_v4());
    let other = ctx_for(Uuid::new_v4());

    let file_a = upload_fixture(&svc, &owner).await;
    let file_b = upload_fixture(&svc, &other).await;

    svc.shares
        .create_share(&owner, file_share_request(file_a.id))
        .await
        .unwrap();
    svc.shares
        .create_share(&other, file_share_request(file_b.id))
        .await
        .unwrap();

    let listed = svc.shares.list_shares(&owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].share.owner_id, owner.user_id);
    assert!(listed[0].url.contains("/share/"));
}
