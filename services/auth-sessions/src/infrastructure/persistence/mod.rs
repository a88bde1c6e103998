//! PostgreSQL 仓储实现

pub mod postgres_auth_repository;
pub mod postgres_user_auth_repository;

pub use postgres_auth_repository::*;
pub use postgres_user_auth_repository::*;
