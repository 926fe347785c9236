//! Hatoba real-time chat relay.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... ADMIN_SECRET=... cargo run --bin hatoba-server
//! cargo run --bin hatoba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use hatoba_server::{
    domain::{Mailer, PushNotifier},
    infrastructure::{
        auth::{JwtTokenService, TotpVerifier},
        message_pusher::WebSocketMessagePusher,
        notification::{LoggingMailer, LoggingPushNotifier, SendGridMailer, WebPushNotifier},
        repository::{
            InMemoryAuditLogRepository, InMemoryLobbyRepository, InMemoryMessageRepository,
            InMemorySubscriptionRepository,
        },
        storage::LocalObjectStore,
    },
    ui::{AppState, Server},
    usecase::{
        ConnectParticipantUseCase, DeleteMessageUseCase, DisconnectParticipantUseCase,
        EmergencyExitUseCase, GetStatusUseCase, JoinSessionUseCase, ListMessagesUseCase,
        LoginUseCase, NotifyEmailConfig, NotifyFanoutUseCase, PushSubscriptionUseCase,
        RelayTypingUseCase, ResetMessagesUseCase, SendMessageUseCase, SubscribeUseCase,
        ToggleModeUseCase, UploadFilesUseCase,
    },
};
use hatoba_shared::{
    logger::setup_logger,
    time::{MonotonicClock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "hatoba-server")]
#[command(about = "Real-time chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HATOBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// HMAC secret for access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Base32 TOTP secret for admin login
    #[arg(long, env = "ADMIN_SECRET", hide_env_values = true)]
    admin_otp_secret: String,

    /// Base32 TOTP secret for anonymous onboarding codes
    #[arg(
        long,
        env = "SUBSCRIBE_OTP_SECRET",
        default_value = "OFPBCYLMENPBI2TE",
        hide_env_values = true
    )]
    subscribe_otp_secret: String,

    /// SendGrid API key; email is only logged when absent
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    sendgrid_api_key: Option<String>,

    /// Sender address for outbound email
    #[arg(long, env = "MAIL_FROM", default_value = "no-reply@hatoba.local")]
    mail_from: String,

    /// Recipient of new-session notification emails
    #[arg(long, env = "NOTIFY_EMAIL_TO")]
    notify_email_to: Option<String>,

    #[arg(long, env = "NOTIFY_EMAIL_CC")]
    notify_email_cc: Option<String>,

    /// Path to the VAPID private key (PEM); push is only logged when absent
    #[arg(long, env = "VAPID_PRIVATE_KEY_PEM")]
    vapid_private_key_pem: Option<PathBuf>,

    #[arg(long, env = "VAPID_PUBLIC_KEY", default_value = "")]
    vapid_public_key: String,

    /// VAPID contact, `mailto:` or `https:`
    #[arg(long, env = "VAPID_EMAIL", default_value = "mailto:admin@hatoba.local")]
    vapid_subject: String,

    /// Directory uploaded files are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Public URL prefix of uploaded files (defaults to this server's `/files`)
    #[arg(long, env = "PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Write the login audit and notify subscribers when an anonymous session is admitted
    #[arg(
        long,
        env = "ADMISSION_SIDE_EFFECTS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    admission_side_effects: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. Auth / notification / storage collaborators
    // 4. UseCases
    // 5. AppState and Server

    // 1. Create Repositories (in-memory)
    let lobby = Arc::new(InMemoryLobbyRepository::default());
    let messages = Arc::new(InMemoryMessageRepository::new());
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let audit_log = Arc::new(InMemoryAuditLogRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create collaborators
    let clock = Arc::new(MonotonicClock::new(SystemClock));
    let token_service = Arc::new(JwtTokenService::new(args.jwt_secret.as_bytes()));
    let admin_verifier = match TotpVerifier::from_base32(&args.admin_otp_secret) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => exit_with("Invalid admin OTP secret", e),
    };
    let subscribe_verifier = match TotpVerifier::from_base32(&args.subscribe_otp_secret) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => exit_with("Invalid subscribe OTP secret", e),
    };

    let mailer: Arc<dyn Mailer> = match args.sendgrid_api_key {
        Some(api_key) => Arc::new(SendGridMailer::new(api_key, args.mail_from)),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set, emails will only be logged");
            Arc::new(LoggingMailer)
        }
    };

    let push_notifier: Arc<dyn PushNotifier> = match args.vapid_private_key_pem {
        Some(path) => {
            let pem = match tokio::fs::read(&path).await {
                Ok(pem) => pem,
                Err(e) => exit_with("Failed to read VAPID private key", e),
            };
            match WebPushNotifier::new(&pem, args.vapid_public_key, args.vapid_subject) {
                Ok(notifier) => Arc::new(notifier),
                Err(e) => exit_with("Invalid VAPID private key", e),
            }
        }
        None => {
            tracing::warn!("VAPID_PRIVATE_KEY_PEM not set, push notifications will only be logged");
            Arc::new(LoggingPushNotifier)
        }
    };

    let public_base_url = args
        .public_base_url
        .unwrap_or_else(|| format!("http://{}:{}/files", args.host, args.port));
    let object_store = Arc::new(LocalObjectStore::new(
        args.upload_dir.clone(),
        &public_base_url,
    ));

    let notify_email = args.notify_email_to.map(|to| NotifyEmailConfig {
        to,
        cc: args.notify_email_cc,
    });

    // 4. Create UseCases
    let notify_fanout_usecase = Arc::new(NotifyFanoutUseCase::new(
        subscriptions.clone(),
        push_notifier.clone(),
        mailer.clone(),
        notify_email,
    ));
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
        token_service.clone(),
        audit_log.clone(),
        notify_fanout_usecase,
        args.admission_side_effects,
    ));
    let join_session_usecase = Arc::new(JoinSessionUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
        audit_log.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        lobby.clone(),
        messages.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let delete_message_usecase = Arc::new(DeleteMessageUseCase::new(
        lobby.clone(),
        messages.clone(),
        message_pusher.clone(),
    ));
    let relay_typing_usecase = Arc::new(RelayTypingUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let emergency_exit_usecase = Arc::new(EmergencyExitUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let list_messages_usecase = Arc::new(ListMessagesUseCase::new(messages.clone()));
    let reset_messages_usecase = Arc::new(ResetMessagesUseCase::new(messages.clone()));
    let toggle_mode_usecase = Arc::new(ToggleModeUseCase::new(lobby.clone()));
    let get_status_usecase = Arc::new(GetStatusUseCase::new(lobby.clone()));
    let login_usecase = Arc::new(LoginUseCase::new(admin_verifier, token_service.clone()));
    let subscribe_usecase = Arc::new(SubscribeUseCase::new(
        lobby.clone(),
        subscribe_verifier,
        token_service.clone(),
        mailer,
        clock.clone(),
    ));
    let upload_files_usecase = Arc::new(UploadFilesUseCase::new(object_store, clock));
    let push_subscription_usecase = Arc::new(PushSubscriptionUseCase::new(
        subscriptions,
        push_notifier,
    ));

    // 5. Create and run the server
    let app_state = Arc::new(AppState {
        token_service,
        connect_participant_usecase,
        join_session_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        delete_message_usecase,
        relay_typing_usecase,
        emergency_exit_usecase,
        list_messages_usecase,
        reset_messages_usecase,
        toggle_mode_usecase,
        get_status_usecase,
        login_usecase,
        subscribe_usecase,
        upload_files_usecase,
        push_subscription_usecase,
    });
    let server = Server::new(app_state, args.upload_dir);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn exit_with(context: &str, error: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", context, error);
    std::process::exit(1);
}
