//! Object storage seam: a flat key → bytes namespace (one bucket).

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

/// Blob store abstraction.
pub trait BlobStore {
    fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Location string handed to downstream consumers (manifests, logs).
    fn uri_for(&self, key: &str) -> String;
}

/// Reject keys that are empty, absolute, or escape the bucket.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let escapes = key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if key.is_empty() || key.starts_with('/') || key.contains('\\') || escapes {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
