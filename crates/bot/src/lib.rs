//! `rounds-bot` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod navigation;
pub mod outbound;
pub mod registration;
pub mod report;
pub mod sessions;
pub mod state;
