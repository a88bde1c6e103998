//! 会话查询定义

use quill_common::UserId;
use quill_cqrs_core::Query;

use crate::application::dto::SessionDto;

/// 统计用户活跃会话数
#[derive(Debug, Clone)]
pub struct CountActiveSessionsQuery {
    pub user_id: UserId,
}

impl Query for CountActiveSessionsQuery {
    type Result = u64;
}

/// 获取用户的所有会话
#[derive(Debug, Clone)]
pub struct ListSessionsForUserQuery {
    pub user_id: UserId,
}

impl Query for ListSessionsForUserQuery {
    type Result = Vec<SessionDto>;
}

/// 获取已过期的会话（外部清扫用）
#[derive(Debug, Clone)]
pub struct ListExpiredSessionsQuery;

impl Query for ListExpiredSessionsQuery {
    type Result = Vec<SessionDto>;
}

/// 获取已撤销的会话
#[derive(Debug, Clone)]
pub struct ListInactiveSessionsQuery;

impl Query for ListInactiveSessionsQuery {
    type Result = Vec<SessionDto>;
}
