//! 命令与查询处理器

pub mod auth_query_handlers;
pub mod login_handler;
pub mod logout_handler;
pub mod refresh_handler;

pub use auth_query_handlers::*;
pub use login_handler::*;
pub use logout_handler::*;
pub use refresh_handler::*;
