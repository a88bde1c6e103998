//! 会话仓储的 PostgreSQL 实现
//!
//! sessions 表以会话 ID 为主键，主键唯一约束是并发创建的兜底。
//! 刷新令牌原文与过期时刻落在会话行内（1:1，生命周期一致）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_common::{SessionId, UserId};
use quill_domain_core::{AggregateRoot, Entity};
use quill_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::auth::{JwtToken, RefreshToken, RestoreSessionProps, Session, TokenValidity};
use crate::domain::repositories::AuthRepository;
use crate::domain::value_objects::{IpAddress, UserAgent};

/// sessions 行
#[derive(Debug, sqlx::FromRow)]
pub struct SessionRow {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub refresh_token: String,
    pub user_agent: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// 重建领域聚合
    ///
    /// 过期时刻必须取自存储的 expires_at，不能重新派生
    pub fn into_session(self) -> AppResult<Session> {
        let session_id = SessionId::from_uuid(self.id);

        let token = JwtToken::parse(&self.refresh_token, TokenValidity::At(self.expires_at))
            .map_err(|e| AppError::database(format!("Corrupt session row {}: {}", self.id, e)))?;

        let refresh_token =
            RefreshToken::restore(session_id.clone(), token, self.created_at, self.revoked_at);

        let user_agent = UserAgent::new(self.user_agent)
            .map_err(|e| AppError::database(format!("Corrupt session row {}: {}", self.id, e)))?;
        let ip_address = IpAddress::new(&self.ip_address)
            .map_err(|e| AppError::database(format!("Corrupt session row {}: {}", self.id, e)))?;

        Ok(Session::restore(RestoreSessionProps {
            id: session_id,
            user_id: UserId::from_uuid(self.user_id),
            refresh_token,
            user_agent,
            ip_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revoked_at: self.revoked_at,
        }))
    }
}

pub struct PostgresAuthRepository {
    pool: PgPool,
}

impl PostgresAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PostgresAuthRepository {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        // 同一 ID 覆盖写：登录复用过期会话的 ID 时替换陈旧行
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, refresh_token, user_agent, ip_address,
                                  created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                refresh_token = EXCLUDED.refresh_token,
                user_agent = EXCLUDED.user_agent,
                ip_address = EXCLUDED.ip_address,
                updated_at = EXCLUDED.updated_at,
                expires_at = EXCLUDED.expires_at,
                revoked_at = EXCLUDED.revoked_at
            "#,
        )
        .bind(session.id().0)
        .bind(session.user_id().0)
        .bind(session.refresh_token().token().value())
        .bind(session.user_agent().as_str())
        .bind(session.ip_address().to_string())
        .bind(session.created_at())
        .bind(session.updated_at())
        .bind(session.expires_at())
        .bind(session.revoked_at())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create session: {}", e)))?;

        Ok(())
    }

    async fn find_session_by_id(&self, id: &SessionId) -> AppResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, ip_address,
                   created_at, updated_at, expires_at, revoked_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find session: {}", e)))?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn find_existing_session(
        &self,
        user_agent: &UserAgent,
        ip_address: &IpAddress,
        user_id: &UserId,
    ) -> AppResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, ip_address,
                   created_at, updated_at, expires_at, revoked_at
            FROM sessions
            WHERE user_id = $1 AND user_agent = $2 AND ip_address = $3
              AND revoked_at IS NULL
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.0)
        .bind(user_agent.as_str())
        .bind(ip_address.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find existing session: {}", e)))?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn revoke_session(&self, id: &SessionId) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE sessions SET revoked_at = NOW(), updated_at = NOW() WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to revoke session: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Session not found: {}", id)));
        }

        Ok(())
    }

    async fn revoke_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET revoked_at = NOW(), updated_at = NOW()
            WHERE user_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke sessions: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn count_active_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sessions
            WHERE user_id = $1 AND revoked_at IS NULL AND expires_at > NOW()
            "#,
        )
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count sessions: {}", e)))?;

        Ok(count as u64)
    }

    async fn find_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, ip_address,
                   created_at, updated_at, expires_at, revoked_at
            FROM sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find sessions: {}", e)))?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }

    async fn find_expired_sessions(&self) -> AppResult<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, ip_address,
                   created_at, updated_at, expires_at, revoked_at
            FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find expired sessions: {}", e)))?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }

    async fn find_inactive_sessions(&self) -> AppResult<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, ip_address,
                   created_at, updated_at, expires_at, revoked_at
            FROM sessions
            WHERE revoked_at IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find inactive sessions: {}", e)))?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }

    async fn rotate_refresh_token(
        &self,
        session_id: &SessionId,
        new_token: &RefreshToken,
    ) -> AppResult<()> {
        // 单次写入原子更新令牌与过期时刻，旧令牌的有效性在此终结
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET refresh_token = $2, expires_at = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(session_id.0)
        .bind(new_token.token().value())
        .bind(new_token.expires_at())
        .bind(new_token.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to rotate refresh token: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Session not found: {}",
                session_id
            )));
        }

        Ok(())
    }
}
