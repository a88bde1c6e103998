//! 认证 DTO

use chrono::{DateTime, Utc};
use quill_common::{SessionId, UserId};
use quill_domain_core::{AggregateRoot, Entity};
use serde::Serialize;

use crate::domain::auth::Session;

/// 登录签发的凭证
///
/// HTTP 边界把 accessToken 放进响应体，refreshToken 与 sessionId
/// 下发为 HttpOnly Cookie
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: SessionId,
    pub expires_in: i64,
}

/// 刷新轮换后的凭证
#[derive(Debug, Clone)]
pub struct RotatedCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// 会话查询投影
///
/// 不携带令牌原文，令牌对客户端是只写的
#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub id: SessionId,
    pub user_id: UserId,
    pub user_agent: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl From<&Session> for SessionDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().clone(),
            user_id: session.user_id().clone(),
            user_agent: session.user_agent().to_string(),
            ip_address: session.ip_address().to_string(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
            expires_at: session.expires_at(),
            revoked_at: session.revoked_at(),
            active: session.active(),
        }
    }
}
