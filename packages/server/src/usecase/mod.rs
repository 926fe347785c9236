//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体。Domain 層の trait にのみ依存します。

pub mod connect_participant;
pub mod delete_message;
pub mod disconnect_participant;
pub mod emergency_exit;
pub mod error;
pub mod get_status;
pub mod join_session;
pub mod list_messages;
pub mod login;
pub mod notify_fanout;
pub mod push_subscription;
pub mod relay_typing;
pub mod reset_messages;
pub mod send_message;
pub mod subscribe;
pub mod toggle_mode;
pub mod upload_files;

pub use connect_participant::ConnectParticipantUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use emergency_exit::EmergencyExitUseCase;
pub use error::{
    AdmissionError, JoinError, LoginError, PushSubscriptionError, SubmitMessageError,
    SubscribeError,
};
pub use get_status::GetStatusUseCase;
pub use join_session::JoinSessionUseCase;
pub use list_messages::{ListMessagesUseCase, RECENT_MESSAGE_LIMIT};
pub use login::{ADMIN_TOKEN_TTL, LoginUseCase};
pub use notify_fanout::{NotifyEmailConfig, NotifyFanoutUseCase};
pub use push_subscription::PushSubscriptionUseCase;
pub use relay_typing::RelayTypingUseCase;
pub use reset_messages::ResetMessagesUseCase;
pub use send_message::SendMessageUseCase;
pub use subscribe::{ANONYMOUS_TOKEN_TTL, SubscribeOutcome, SubscribeUseCase};
pub use toggle_mode::ToggleModeUseCase;
pub use upload_files::{UploadFilesUseCase, UploadItem};
