//! Image storage with signed, expiring links

mod local;

pub use local::LocalObjectStore;

use async_trait::async_trait;

use crate::error::StorageError;

/// Where event images live
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, replacing any previous content
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read an object back
    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove an object; removing a missing object is not an error
    async fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// A fetchable URL for the object that stops working after a while
    async fn resolve_url(&self, name: &str) -> Result<String, StorageError>;

    /// Check a signature previously embedded in a resolved URL
    fn verify(&self, name: &str, signature: &str) -> Result<(), StorageError>;
}
