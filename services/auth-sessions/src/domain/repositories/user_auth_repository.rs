//! 用户认证记录仓储契约

use async_trait::async_trait;
use quill_common::{Role, UserId};
use quill_errors::AppResult;

use crate::domain::value_objects::{Email, HashedPassword};

/// 用户认证记录
///
/// 登录校验所需的最小投影，用户档案 CRUD 在别的服务
#[derive(Debug, Clone)]
pub struct UserAuthRecord {
    pub user_id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub failed_login_attempts: i32,
}

#[async_trait]
pub trait UserAuthRepository: Send + Sync {
    /// 根据邮箱查找认证记录
    async fn find_auth_by_email(&self, email: &Email) -> AppResult<Option<UserAuthRecord>>;

    /// 失败登录计数 +1，返回新值
    async fn increment_failed_login_attempts(&self, user_id: &UserId) -> AppResult<i32>;

    /// 清零失败登录计数
    async fn reset_failed_login_attempts(&self, user_id: &UserId) -> AppResult<()>;
}
