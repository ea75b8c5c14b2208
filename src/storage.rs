use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;

const FALLBACK_FILE_NAME: &str = "upload.bin";

/// Destination for uploaded document bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` for `org_id` and return the path relative to the store root.
    async fn put(&self, org_id: Uuid, file_name: &str, bytes: &[u8]) -> AppResult<String>;

    /// Remove a previously stored blob by its relative path.
    async fn delete(&self, relative_path: &str) -> AppResult<()>;
}

/// Blob store on the local filesystem: `<root>/org_<org_id>/<unique>_<name>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, org_id: Uuid, file_name: &str, bytes: &[u8]) -> AppResult<String> {
        let org_dir = format!("org_{}", org_id);
        let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(file_name));

        tokio::fs::create_dir_all(self.root.join(&org_dir)).await?;
        tokio::fs::write(self.root.join(&org_dir).join(&stored_name), bytes).await?;

        Ok(format!("{}/{}", org_dir, stored_name))
    }

    async fn delete(&self, relative_path: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.root.join(relative_path)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reduce a client-supplied file name to a single safe path component.
pub fn sanitize_file_name(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string();

    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_and_dot_segments() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\temp\\scan.pdf"), "scan.pdf");
        assert_eq!(sanitize_file_name(".."), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[tokio::test]
    async fn writes_under_org_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        let org_id = Uuid::new_v4();

        let rel = store.put(org_id, "vaccines.pdf", b"%PDF").await.unwrap();

        assert!(rel.starts_with(&format!("org_{}/", org_id)));
        assert!(rel.ends_with("_vaccines.pdf"));
        let written = tokio::fs::read(store.root().join(&rel)).await.unwrap();
        assert_eq!(written, b"%PDF");

        store.delete(&rel).await.unwrap();
        assert!(!store.root().join(&rel).exists());
        store.delete(&rel).await.unwrap();
    }
}
