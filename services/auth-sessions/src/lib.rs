//! Auth Sessions Service Library
//!
//! 模块化架构：
//! - `domain`: 令牌/会话实体、值对象、仓储契约
//! - `application`: 登录/刷新/登出命令与会话查询
//! - `infrastructure`: PostgreSQL 仓储实现

pub mod application;
pub mod domain;
pub mod infrastructure;
