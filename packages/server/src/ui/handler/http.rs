//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{PublicStatus, PushSubscription, UploadedFile},
    infrastructure::dto::{
        http::{
            AnonymousTokenResponse, ChangeSubscriptionRequest, LoginRequest, LoginResponse,
            MessageResponse, SubscribeQuery, SuccessResponse,
        },
        websocket::ChatMessageInfo,
    },
    ui::{error::ApiError, state::AppState},
    usecase::{
        LoginError, PushSubscriptionError, RECENT_MESSAGE_LIMIT, SubscribeError,
        SubscribeOutcome, UploadItem,
    },
};

use super::auth::AuthorizedClaim;

const ANNOUNCEMENT_MESSAGE: &str = "Exciting news! We are working on something big and we can't wait to share it with you. Stay tuned for our upcoming announcement and be the first to know about our latest project.";
const HIGH_VOLUME_MESSAGE: &str = "We are currently experiencing a high volume of inquiries. We are working hard to get back to you as soon as possible. Thank you for your patience.";
const ANONYMOUS_ID: &str = "Anonymous";

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Last messages, oldest first.
pub async fn list_messages(
    _claim: AuthorizedClaim,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChatMessageInfo>>, ApiError> {
    let messages = state
        .list_messages_usecase
        .execute(RECENT_MESSAGE_LIMIT)
        .await?;

    // Domain Model から DTO への変換
    Ok(Json(messages.iter().map(ChatMessageInfo::from).collect()))
}

pub async fn reset_messages(
    _claim: AuthorizedClaim,
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    state.reset_messages_usecase.execute().await?;
    Ok("Reset")
}

pub async fn toggle_mode(
    AuthorizedClaim(claim): AuthorizedClaim,
    State(state): State<Arc<AppState>>,
) -> &'static str {
    let mode = state.toggle_mode_usecase.execute().await;
    tracing::info!("Mode toggled to {:?} by '{}'", mode, claim.subject);
    "Toggled"
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.login_usecase.execute(request.code.as_deref()).await {
        Ok(token) => Ok(Json(LoginResponse { token })),
        Err(LoginError::MissingCode) => Err(ApiError::Validation("Code is required".to_string())),
        Err(LoginError::InvalidCode) => Err(ApiError::Validation("Invalid code".to_string())),
        Err(e @ LoginError::IssueFailed(_)) => {
            tracing::error!("Admin login failed: {}", e);
            Err(ApiError::Validation("Invalid code".to_string()))
        }
    }
}

/// Stores every file part. Parts without a file name are ignored.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadedFile>>, ApiError> {
    let mut items = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        items.push(UploadItem {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if items.is_empty() {
        return Err(ApiError::Validation("No files were uploaded".to_string()));
    }
    Ok(Json(state.upload_files_usecase.execute(items).await))
}

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscribeQuery>,
) -> Response {
    match state.subscribe_usecase.execute(query.email.as_deref()).await {
        Ok(SubscribeOutcome::EmailSent) => {
            Json(MessageResponse::new("Email sent successfully")).into_response()
        }
        Ok(SubscribeOutcome::Authenticated { access_token }) => Json(AnonymousTokenResponse {
            message: "Authenticated Successfully".to_string(),
            access_token,
            id: ANONYMOUS_ID.to_string(),
        })
        .into_response(),
        Err(SubscribeError::MissingEmail) => {
            ApiError::Validation("Email is required".to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!("Subscribe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Something went wrong")),
            )
                .into_response()
        }
    }
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<MessageResponse>) {
    match state.get_status_usecase.execute().await {
        PublicStatus::Announcement => (
            StatusCode::OK,
            Json(MessageResponse::new(ANNOUNCEMENT_MESSAGE)),
        ),
        PublicStatus::HighVolume => (
            StatusCode::ACCEPTED,
            Json(MessageResponse::new(HIGH_VOLUME_MESSAGE)),
        ),
    }
}

pub async fn register_push_subscription(
    State(state): State<Arc<AppState>>,
    Json(subscription): Json<PushSubscription>,
) -> (StatusCode, Json<SuccessResponse>) {
    match state.push_subscription_usecase.register(subscription).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })),
        Err(e) => {
            tracing::warn!("Push subscription rejected: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SuccessResponse { success: false }),
            )
        }
    }
}

pub async fn change_push_subscription(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChangeSubscriptionRequest>,
) -> (StatusCode, Json<SuccessResponse>) {
    match state
        .push_subscription_usecase
        .change(request.old_endpoint.as_deref(), request.subscription)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })),
        Err(PushSubscriptionError::MissingOldEndpoint) => (
            StatusCode::BAD_REQUEST,
            Json(SuccessResponse { success: false }),
        ),
        Err(e) => {
            tracing::warn!("Push subscription change failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SuccessResponse { success: false }),
            )
        }
    }
}
