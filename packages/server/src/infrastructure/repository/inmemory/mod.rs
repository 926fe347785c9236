//! インメモリ Repository 実装

mod audit_log;
mod lobby;
mod message;
mod subscription;

pub use audit_log::InMemoryAuditLogRepository;
pub use lobby::InMemoryLobbyRepository;
pub use message::InMemoryMessageRepository;
pub use subscription::InMemorySubscriptionRepository;
