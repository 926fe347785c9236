//! Object storage for uploaded files.

pub mod local;

pub use local::LocalObjectStore;
