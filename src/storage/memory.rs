use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{validate_key, BlobStore, StorageError};

/// In-memory blob store. Keeps the content type alongside each object.
pub struct InMemoryBlobStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
}

impl InMemoryBlobStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// Object keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(|o| o.content_type.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // A poisoned map still holds consistent objects; writes are single inserts.
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        self.lock()
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn uri_for(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_previous_object() {
        let store = InMemoryBlobStore::new("bucket");
        store.put_object("k.json", b"1", "application/json").unwrap();
        store.put_object("k.json", b"2", "application/json").unwrap();

        assert_eq!(store.get_object("k.json").unwrap(), b"2");
        assert_eq!(store.keys(), vec!["k.json"]);
        assert_eq!(store.content_type("k.json").as_deref(), Some("application/json"));
    }

    #[test]
    fn uri_uses_bucket_scheme() {
        let store = InMemoryBlobStore::new("bucket");
        assert_eq!(store.uri_for("a/b.csv"), "s3://bucket/a/b.csv");
    }

    #[test]
    fn missing_key_not_found() {
        let store = InMemoryBlobStore::new("bucket");
        assert!(matches!(store.get_object("x"), Err(StorageError::NotFound(_))));
    }
}
