//! 认证领域实体

pub mod access_token;
pub mod refresh_token;
pub mod session;
pub mod token;

pub use access_token::*;
pub use refresh_token::*;
pub use session::*;
pub use token::*;
