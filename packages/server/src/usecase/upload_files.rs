//! UseCase: ファイルアップロード
//!
//! ファイルごとにベストエフォートで保存します。失敗したファイルは空の
//! `UploadedFile` になり、バッチ全体は中断しません。

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ObjectStore, UploadedFile};
use hatoba_shared::time::Clock;

const KEY_PREFIX: &str = "chat-app";
const MEDIA_KINDS: [&str; 4] = ["image", "video", "audio", "file"];

/// multipart の 1 パート
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct UploadFilesUseCase {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
}

impl UploadFilesUseCase {
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 入力と同じ順序・同じ件数の結果を返す
    pub async fn execute(&self, items: Vec<UploadItem>) -> Vec<UploadedFile> {
        let uploads = items.into_iter().map(|item| self.upload_one(item));
        futures_util::future::join_all(uploads).await
    }

    async fn upload_one(&self, item: UploadItem) -> UploadedFile {
        let discriminator = Uuid::new_v4().simple().to_string();
        let key = object_key(self.clock.now_millis(), &discriminator[..8], &item.name);
        let size = item.bytes.len() as u64;
        match self.store.put(&key, item.bytes, &item.content_type).await {
            Ok(url) => UploadedFile {
                url,
                name: item.name,
                kind: file_kind(&item.content_type).to_string(),
                size,
            },
            Err(e) => {
                tracing::warn!("Failed to store '{}': {}", item.name, e);
                UploadedFile::default()
            }
        }
    }
}

/// `chat-app/<unix-millis>_<discriminator>_<name>`（空白は `_` に置換）
///
/// 同じミリ秒に同名のファイルが来ても discriminator でキーが分かれる。
fn object_key(now_millis: i64, discriminator: &str, name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}/{}_{}_{}", KEY_PREFIX, now_millis, discriminator, name)
}

/// MIME のメジャータイプ。対象外は `file`
fn file_kind(content_type: &str) -> &str {
    let major = content_type.split('/').next().unwrap_or_default();
    MEDIA_KINDS
        .iter()
        .find(|kind| **kind == major)
        .copied()
        .unwrap_or("file")
}
