//! 值对象

pub mod email;
pub mod hashed_password;
pub mod ip_address;
pub mod user_agent;

pub use email::*;
pub use hashed_password::*;
pub use ip_address::*;
pub use user_agent::*;
