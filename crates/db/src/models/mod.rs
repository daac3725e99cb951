//! Row structs and insert DTOs.

pub mod remark;
pub mod user;

pub use remark::{NewRemark, Remark};
pub use user::Profile;
