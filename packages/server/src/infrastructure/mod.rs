//! Infrastructure layer: adapters behind the domain traits.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod storage;
