//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod remark_repo;
pub mod user_repo;

pub use remark_repo::RemarkRepo;
pub use user_repo::UserRepo;
