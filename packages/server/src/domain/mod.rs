//! Domain layer: entities, value objects, pure relay rules and the interfaces
//! the outer layers implement.

pub mod admission;
pub mod entity;
pub mod error;
pub mod event;
pub mod lobby;
pub mod message_pusher;
pub mod repository;
pub mod service;
pub mod value_object;

pub use admission::{ANONYMOUS_OCCUPANCY_LIMIT, Admission, DenyReason, admit};
pub use entity::{
    AuditKind, AuditLogEntry, ChatMessage, Claim, MessageDraft, PushKeys, PushSubscription,
    Session, SessionProfile, UploadedFile,
};
pub use error::{
    AuthError, MessagePushError, NotificationError, RepositoryError, StorageError,
    ValueObjectError,
};
pub use event::{PushFrame, RelayEvent};
pub use lobby::{GlobalMode, Lobby, ModeState, PUBLIC_BUSY_THRESHOLD, PublicStatus};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{
    AuditLogRepository, LobbyRepository, MessageRepository, SubscriptionRepository,
};
pub use service::{
    EmailMessage, EmailTemplate, Mailer, ObjectStore, PasscodeVerifier, PushNotifier,
    PushPayload, TokenService,
};
pub use value_object::{
    ClaimType, ConnectionId, ConnectionIdFactory, MessageContent, MessageId, MessageIdFactory,
    MessageKind, Timestamp, UserId,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockMessageRepository, MockSubscriptionRepository};
#[cfg(test)]
pub use service::{MockMailer, MockObjectStore, MockPasscodeVerifier, MockPushNotifier};
