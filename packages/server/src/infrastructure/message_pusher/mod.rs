//! MessagePusher 実装
//!
//! 接続ごとの writer タスクへ `PushFrame` を渡すチャンネルを管理します。
//! ソケットへの書き込み自体は UI 層が担当します。

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
