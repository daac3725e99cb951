//! Domain logic for guided inspection rounds.
//!
//! Everything in this crate is pure: the department/room hierarchy, the
//! registration state machine, callback payload grammar, menu rendering
//! and the remark history fold. No I/O happens here beyond reading the
//! hierarchy file once at startup; persistence and chat transport live
//! in the `rounds-db` and `rounds-telegram` crates.

pub mod error;
pub mod hierarchy;
pub mod history;
pub mod menu;
pub mod navigation;
pub mod registration;
pub mod types;

pub use error::CoreError;
pub use hierarchy::{Department, Hierarchy, Room};
