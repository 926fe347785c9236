//! UI 層: axum のルーター・ハンドラー・共有状態

pub mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::Server;
pub use state::AppState;
