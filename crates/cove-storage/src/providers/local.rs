//! Local filesystem object store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use cove_core::config::LocalStorageConfig;
use cove_core::error::{AppError, ErrorKind};
use cove_core::result::AppResult;
use cove_core::traits::{ObjectStore, SignedDownload};

/// Claims embedded in a locally minted download URL.
///
/// The `/download` route verifies this token with
/// [`decode_download_token`] before streaming the object, which gives
/// the local provider the same bearer-URL semantics as an S3 presigned
/// GET.
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadClaims {
    /// Object key being authorized.
    pub sub: String,
    /// Filename for the Content-Disposition header.
    pub filename: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Verify a download token minted by `presign_download` and return the
/// authorized claims.
///
/// An expired token maps to `Expired`; any other failure reads as an
/// authentication error so forged tokens give nothing away.
pub fn decode_download_token(secret: &str, token: &str) -> AppResult<DownloadClaims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<DownloadClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::expired("Download link has expired")
        }
        _ => AppError::authentication("Invalid download token"),
    })
}

/// Local filesystem object store.
#[derive(Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Base URL under which objects are served.
    base_url: String,
    /// Key for signing download URL tokens.
    signing_key: EncodingKey,
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("root", &self.root)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LocalObjectStore {
    /// Create a new local object store rooted at the configured path.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        if config.url_signing_secret.is_empty() {
            return Err(AppError::configuration(
                "storage.local.url_signing_secret must be set for the local provider",
            ));
        }

        Ok(Self {
            root,
            base_url: config.object_base_url.trim_end_matches('/').to_string(),
            signing_key: EncodingKey::from_secret(config.url_signing_secret.as_bytes()),
        })
    }

    /// Resolve an object key to an absolute path within the root,
    /// refusing keys that escape it.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let clean = key.trim_start_matches('/');
        if clean.split('/').any(|seg| seg == "..") {
            return Err(AppError::validation(format!("Invalid object key: {key}")));
        }
        Ok(self.root.join(clean))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        let path = self.resolve(key)?;
        self.ensure_parent(&path).await?;

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone counts as deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {key}"),
                e,
            )),
        }
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        self.ensure_parent(&to_path).await?;

        fs::copy(&from_path, &to_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {from}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to copy object: {from} -> {to}"),
                    e,
                )
            }
        })?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn presign_download(
        &self,
        key: &str,
        filename: &str,
        ttl: Duration,
    ) -> AppResult<SignedDownload> {
        let path = self.resolve(key)?;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AppError::not_found(format!("Object not found: {key}")));
        }

        let expires_at = Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64);
        let claims = DownloadClaims {
            sub: key.to_string(),
            filename: filename.to_string(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.signing_key)
            .map_err(|e| AppError::internal(format!("Failed to sign download URL: {e}")))?;

        Ok(SignedDownload {
            url: format!("{}/download?token={token}", self.base_url),
            expires_at,
        })
    }
}
