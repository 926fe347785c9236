//! InMemory Audit Log Repository 実装（追記のみ）

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AuditLogEntry, AuditLogRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entry: AuditLogEntry) -> Result<(), RepositoryError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        Ok(self.entries.read().await.clone())
    }
}
