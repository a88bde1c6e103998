//! 会话仓储契约
//!
//! 具体实现（数据库、内存）都必须遵守这里定义的行为

use async_trait::async_trait;
use quill_common::{SessionId, UserId};
use quill_errors::AppResult;

use crate::domain::auth::{RefreshToken, Session};
use crate::domain::value_objects::{IpAddress, UserAgent};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// 持久化会话
    ///
    /// 以会话 ID 为键；同一 ID 重复写入覆盖旧行（过期会话复用路径），
    /// ID 唯一约束是并发 create 的兜底
    async fn create_session(&self, session: &Session) -> AppResult<()>;

    /// 根据 ID 查找会话
    async fn find_session_by_id(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// 查找同一设备上未撤销的既有会话
    ///
    /// (userAgent, ipAddress, userId) 三者精确匹配，已撤销的行不参与
    async fn find_existing_session(
        &self,
        user_agent: &UserAgent,
        ip_address: &IpAddress,
        user_id: &UserId,
    ) -> AppResult<Option<Session>>;

    /// 撤销会话，目标不存在返回 NotFound
    async fn revoke_session(&self, id: &SessionId) -> AppResult<()>;

    /// 撤销用户的所有未撤销会话，返回受影响行数
    async fn revoke_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64>;

    /// 统计用户的活跃会话（未撤销且未过期）
    async fn count_active_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64>;

    /// 获取用户的所有会话
    async fn find_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<Vec<Session>>;

    /// 获取已过期的会话（外部清扫用）
    async fn find_expired_sessions(&self) -> AppResult<Vec<Session>>;

    /// 获取已撤销的会话
    async fn find_inactive_sessions(&self) -> AppResult<Vec<Session>>;

    /// 轮换会话的刷新令牌
    ///
    /// 单次写入原子地更新令牌值与过期时刻；目标不存在返回 NotFound
    async fn rotate_refresh_token(
        &self,
        session_id: &SessionId,
        new_token: &RefreshToken,
    ) -> AppResult<()>;
}
