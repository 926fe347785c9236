//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::TokenService,
    usecase::{
        ConnectParticipantUseCase, DeleteMessageUseCase, DisconnectParticipantUseCase,
        EmergencyExitUseCase, GetStatusUseCase, JoinSessionUseCase, ListMessagesUseCase,
        LoginUseCase, PushSubscriptionUseCase, RelayTypingUseCase, ResetMessagesUseCase,
        SendMessageUseCase, SubscribeUseCase, ToggleModeUseCase, UploadFilesUseCase,
    },
};

/// ハンドラーから参照される UseCase 群
pub struct AppState {
    /// 管理 API の認証に使う
    pub token_service: Arc<dyn TokenService>,

    // WebSocket セッション
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
    pub relay_typing_usecase: Arc<RelayTypingUseCase>,
    pub emergency_exit_usecase: Arc<EmergencyExitUseCase>,

    // 管理 API
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub reset_messages_usecase: Arc<ResetMessagesUseCase>,
    pub toggle_mode_usecase: Arc<ToggleModeUseCase>,

    // 公開 API
    pub get_status_usecase: Arc<GetStatusUseCase>,
    pub login_usecase: Arc<LoginUseCase>,
    pub subscribe_usecase: Arc<SubscribeUseCase>,
    pub upload_files_usecase: Arc<UploadFilesUseCase>,
    pub push_subscription_usecase: Arc<PushSubscriptionUseCase>,
}
