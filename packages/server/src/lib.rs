//! Hatoba real-time chat relay.
//!
//! A single shared presence list, a message log, and a small HTTP surface for
//! administration, anonymous onboarding, uploads and push subscriptions.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
