//! Shared utilities for Hatoba packages.

pub mod logger;
pub mod time;
