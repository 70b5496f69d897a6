//! Filesystem-backed object store
//!
//! Objects are flat files under one directory. Links point at the API's
//! image route and carry an HS256 signature over the object name with an
//! expiry, so the route can serve a file without a session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use event_common::StorageConfig;

use super::ObjectStore;
use crate::error::StorageError;

#[derive(Debug, Serialize, Deserialize)]
struct LinkClaims {
    name: String,
    exp: i64,
}

/// Object store keeping files under `upload_dir`
#[derive(Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl LocalObjectStore {
    /// `base_url` is the public origin of the API, without a trailing slash
    pub fn new(root: impl Into<PathBuf>, base_url: &str, secret: &str, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &StorageConfig, public_base_url: &str) -> Self {
        Self::new(
            &config.upload_dir,
            public_base_url,
            &config.url_secret,
            Duration::from_secs(config.url_ttl_secs),
        )
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a name to a path, refusing anything that could escape the root
    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        let valid = !name.is_empty()
            && name.len() <= 255
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn sign(&self, name: &str) -> Result<String, StorageError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| StorageError::Sign(e.to_string()))?;
        let claims = LinkClaims {
            name: name.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| StorageError::Sign(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), "object stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_url(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(name.to_string()));
        }
        let signature = self.sign(name)?;
        Ok(format!(
            "{}/api/v1/images/{name}?sig={signature}",
            self.base_url
        ))
    }

    fn verify(&self, name: &str, signature: &str) -> Result<(), StorageError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<LinkClaims>(signature, &self.decoding_key, &validation)
            .map_err(|_| StorageError::BadSignature)?
            .claims;

        if claims.name != name {
            return Err(StorageError::BadSignature);
        }
        Ok(())
    }
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("root", &self.root)
            .field("base_url", &self.base_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
