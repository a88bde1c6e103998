//! 认证查询

pub mod auth_queries;

pub use auth_queries::*;
