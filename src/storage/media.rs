//! Media file storage

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use super::uploads::{Upload, UploadRule};
use crate::utils::errors::{CmsError, Result};
use crate::utils::logging::log_media_operation;

/// Storage for uploaded files, addressed by relative paths
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Remove a stored file; removing a missing file is not an error
    async fn delete(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;

    /// Public URL of a stored file
    fn url(&self, path: &str) -> String;
}

/// Check an upload against its rule and store it, returning the stored path
pub async fn store_upload(
    media: &dyn MediaStore,
    rule: &UploadRule,
    upload: &Upload,
) -> Result<String> {
    rule.check(upload)?;
    let path = rule.storage_path(upload, Utc::now());
    media.save(&path, &upload.data).await?;
    Ok(path)
}

/// Media store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(CmsError::Storage(format!("Refusing media path {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let result = tokio::fs::write(&target, data).await;
        log_media_operation("save", path, result.is_ok());
        Ok(result?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                log_media_operation("delete", path, true);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                log_media_operation("delete", path, false);
                Err(e.into())
            }
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&target).await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::uploads::{MEMBER_IMAGE, PROJECT_IMAGE};

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/media/");

        store.save("member_images/a.png", b"png").await.unwrap();
        assert!(store.exists("member_images/a.png").await.unwrap());
        assert_eq!(store.url("member_images/a.png"), "/media/member_images/a.png");

        store.delete("member_images/a.png").await.unwrap();
        assert!(!store.exists("member_images/a.png").await.unwrap());
        // deleting twice is fine
        store.delete("member_images/a.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/media/");

        assert!(matches!(
            store.save("../outside.png", b"x").await,
            Err(CmsError::Storage(_))
        ));
        assert!(store.save("/etc/passwd", b"x").await.is_err());
        assert!(store.delete("").await.is_err());
    }

    #[tokio::test]
    async fn test_store_upload_checks_rule_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/media/");

        let big = Upload::new("me.png", vec![0u8; 2 * 1024 * 1024]);
        assert!(matches!(
            store_upload(&store, &MEMBER_IMAGE, &big).await,
            Err(CmsError::Validation(_))
        ));
        assert!(!dir.path().join("member_images").exists());

        let small = Upload::new("logo.png", vec![0u8; 900 * 1024]);
        let path = store_upload(&store, &PROJECT_IMAGE, &small).await.unwrap();
        assert!(path.starts_with("project_images/"));
        assert!(store.exists(&path).await.unwrap());
    }
}
