//! Signed-URL issuance and audit behavior tests.

mod support;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use cove_core::error::ErrorKind;
use cove_database::ShareStore;
use cove_entity::share::{SharePermission, ShareType};
use cove_service::share::CreateShareRequest;
use cove_service::{
    NamespaceService, RequestContext, ShareAccessService, ShareService, SignedUrlService,
};
use support::{FailingDownloadLogStore, TestHarness};

const URL_TTL: Duration = Duration::from_secs(3600);

fn signed_url_service(harness: &TestHarness) -> SignedUrlService {
    SignedUrlService::new(
        harness.files.clone(),
        harness.shares.clone(),
        harness.download_logs.clone(),
        harness.objects.clone(),
        ShareAccessService::new(
            harness.shares.clone(),
            harness.files.clone(),
            harness.folders.clone(),
        ),
        URL_TTL,
        Duration::from_secs(5),
    )
}

fn namespace_service(harness: &TestHarness) -> NamespaceService {
    NamespaceService::new(
        harness.folders.clone(),
        harness.files.clone(),
        harness.objects.clone(),
        1024 * 1024,
        Duration::from_secs(5),
    )
}

fn share_service(harness: &TestHarness) -> ShareService {
    ShareService::new(
        harness.shares.clone(),
        harness.files.clone(),
        harness.folders.clone(),
        "https://cove.example.com".to_string(),
    )
}

fn ctx_for(user_id: Uuid) -> RequestContext {
    RequestContext::new(
        user_id,
        "203.0.113.7".to_string(),
        Some("signed-url-tests".to_string()),
    )
}

async fn upload_fixture(
    harness: &TestHarness,
    ctx: &RequestContext,
) -> cove_entity::file::File {
    namespace_service(harness)
        .upload_file(
            ctx,
            "doc.pdf".to_string(),
            "application/pdf".to_string(),
            Bytes::from_static(b"%PDF-"),
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn owner_issuance_returns_metadata_and_audits() {
    let harness = TestHarness::new();
    let svc = signed_url_service(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &ctx).await;

    let issued = svc.issue_for_owner(&ctx, file.id).await.unwrap();

    assert_eq!(issued.filename, "doc.pdf");
    assert_eq!(issued.content_type, "application/pdf");
    assert_eq!(issued.size_bytes, 5);
    assert!(issued.expires_at > Utc::now());
    assert!(issued.signed_url.contains(&file.storage_path));

    let entries = harness.download_logs.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file_id, file.id);
    assert_eq!(entries[0].user_id, Some(ctx.user_id));
    assert_eq!(entries[0].client_ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn owner_issuance_for_foreign_file_reads_as_not_found() {
    let harness = TestHarness::new();
    let svc = signed_url_service(&harness);
    let owner = ctx_for(Uuid::new_v4());
    let stranger = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &owner).await;

    let err = svc.issue_for_owner(&stranger, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(harness.download_logs.entries().is_empty());
}

#[tokio::test]
async fn audit_failure_never_blocks_issuance() {
    let harness = TestHarness::new();
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &ctx).await;

    let svc = SignedUrlService::new(
        harness.files.clone(),
        harness.shares.clone(),
        Arc::new(FailingDownloadLogStore),
        harness.objects.clone(),
        ShareAccessService::new(
            harness.shares.clone(),
            harness.files.clone(),
            harness.folders.clone(),
        ),
        URL_TTL,
        Duration::from_secs(5),
    );

    let issued = svc.issue_for_owner(&ctx, file.id).await.unwrap();
    assert_eq!(issued.filename, "doc.pdf");
}

#[tokio::test]
async fn share_issuance_bumps_download_count() {
    let harness = TestHarness::new();
    let signed = signed_url_service(&harness);
    let shares = share_service(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &ctx).await;

    let created = shares
        .create_share(
            &ctx,
            CreateShareRequest {
                file_id: Some(file.id),
                folder_id: None,
                share_type: ShareType::Unlisted,
                permissions: SharePermission::Download,
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let anon = ctx_for(Uuid::new_v4());
    let issued = signed
        .issue_for_share(&anon, &created.share.token, Some(&file.storage_path))
        .await
        .unwrap();
    assert_eq!(issued.filename, "doc.pdf");

    let stored = harness
        .shares
        .find_by_token(&created.share.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.download_count, 1);

    // Share-mode audit entries carry no user id.
    let entries = harness.download_logs.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, None);
}

#[tokio::test]
async fn share_issuance_rejects_mismatched_path() {
    let harness = TestHarness::new();
    let signed = signed_url_service(&harness);
    let shares = share_service(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &ctx).await;

    let created = shares
        .create_share(
            &ctx,
            CreateShareRequest {
                file_id: Some(file.id),
                folder_id: None,
                share_type: ShareType::Unlisted,
                permissions: SharePermission::Download,
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let err = signed
        .issue_for_share(&ctx, &created.share.token, Some("someone-else/other.bin"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn expired_share_cannot_issue_urls() {
    let harness = TestHarness::new();
    let signed = signed_url_service(&harness);
    let shares = share_service(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    let file = upload_fixture(&harness, &ctx).await;

    let created = shares
        .create_share(
            &ctx,
            CreateShareRequest {
                file_id: Some(file.id),
                folder_id: None,
                share_type: ShareType::Unlisted,
                permissions: SharePermission::Download,
                expires_at: None,
            },
        )
        .await
        .unwrap();
    harness
        .shares
        .set_expires_at(created.share.id, Some(Utc::now() - chrono::Duration::minutes(1)));

    let err = signed
        .issue_for_share(&ctx, &created.share.token, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Expired);

    let stored = harness
        .shares
        .find_by_token(&created.share.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.download_count, 0);
}

#[tokio::test]
async fn issuance_fails_before_touching_store_when_token_unknown() {
    let harness = TestHarness::new();
    let signed = signed_url_service(&harness);
    let ctx = ctx_for(Uuid::new_v4());
    upload_fixture(&harness, &ctx).await;

    let err = signed
        .issue_for_share(&ctx, "completely-unknown-token", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(harness.download_logs.entries().is_empty());
}
