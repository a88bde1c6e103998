//! 认证命令

pub mod login_command;
pub mod logout_command;
pub mod refresh_command;

pub use login_command::*;
pub use logout_command::*;
pub use refresh_command::*;
