//! Request handlers.

mod auth;
mod http;
mod websocket;

pub use http::{
    change_push_subscription, get_status, health_check, list_messages, login,
    register_push_subscription, reset_messages, subscribe, toggle_mode, upload_files,
};
pub use websocket::websocket_handler;
