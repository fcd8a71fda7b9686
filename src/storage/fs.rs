use std::path::{Path, PathBuf};

use super::{validate_key, BlobStore, StorageError};

/// Directory-backed blob store: `<root>/<bucket>/<key>`.
pub struct FsBlobStore {
    bucket_dir: PathBuf,
    bucket: String,
}

impl FsBlobStore {
    pub fn new(root: &Path, bucket: &str) -> Self {
        Self {
            bucket_dir: root.join(bucket),
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.bucket_dir.join(key))
    }
}

impl BlobStore for FsBlobStore {
    fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(e),
        })
    }

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;
        tracing::debug!(key, bytes = body.len(), content_type, "Object written");
        Ok(())
    }

    fn uri_for(&self, key: &str) -> String {
        format!("file://{}", self.bucket_dir.join(key).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "reviews");

        store.put_object("a/b/c.csv", b"x,y\n", "text/csv").unwrap();

        assert_eq!(store.get_object("a/b/c.csv").unwrap(), b"x,y\n");
        assert!(dir.path().join("reviews/a/b/c.csv").exists());
    }

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "reviews");
        assert!(matches!(
            store.get_object("nope.csv"),
            Err(StorageError::NotFound(key)) if key == "nope.csv"
        ));
    }

    #[test]
    fn traversal_key_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "reviews");
        assert!(matches!(
            store.put_object("../escape.txt", b"", "text/plain"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn uri_points_inside_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "reviews");
        let uri = store.uri_for("out/file.csv");
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("reviews/out/file.csv"));
        assert_eq!(store.bucket(), "reviews");
    }
}
