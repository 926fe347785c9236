//! Filesystem-backed object store. Objects are served by the HTTP layer from
//! `root` under `public_base_url`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::domain::{ObjectStore, StorageError};

pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::WriteFailed(format!(
                "invalid object key '{}'",
                key
            )));
        }

        // Each key segment is percent-encoded into the public URL
        let mut url = Url::parse(&self.public_base_url)
            .map_err(|e| StorageError::WriteFailed(format!("bad public base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::WriteFailed("public base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(key.split('/'));

        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        tracing::debug!(
            key,
            content_type,
            size = bytes.len(),
            "Stored object at {}",
            path.display()
        );
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "hatoba-store-{}",
            ConnectionIdFactory::generate().as_str()
        ))
    }

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        // テスト項目: オブジェクトを保存すると公開 URL が返る
        // given (前提条件):
        let root = temp_root();
        let store = LocalObjectStore::new(&root, "http://localhost:3000/files/");

        // when (操作):
        let url = store
            .put("chat-app/1_a.png", b"png".to_vec(), "image/png")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(url, "http://localhost:3000/files/chat-app/1_a.png");
        let stored = tokio::fs::read(root.join("chat-app/1_a.png")).await.unwrap();
        assert_eq!(stored, b"png");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_rejects_path_traversal() {
        // テスト項目: ルート外を指すキーは拒否される
        // given (前提条件):
        let root = temp_root();
        let store = LocalObjectStore::new(&root, "http://localhost:3000/files");

        // when (操作):
        let result = store.put("../escape.txt", b"x".to_vec(), "text/plain").await;

        // then (期待する結果):
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
    }

    #[tokio::test]
    async fn test_put_percent_encodes_url_segments() {
        // テスト項目: URL で特別な意味を持つ文字はエンコードされ、ファイル名はそのまま保存される
        // given (前提条件):
        let root = temp_root();
        let store = LocalObjectStore::new(&root, "http://localhost:3000/files");

        // when (操作):
        let url = store
            .put("chat-app/1_ab12cd34_notes#1?.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            url,
            "http://localhost:3000/files/chat-app/1_ab12cd34_notes%231%3F.txt"
        );
        assert!(root.join("chat-app/1_ab12cd34_notes#1?.txt").exists());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
