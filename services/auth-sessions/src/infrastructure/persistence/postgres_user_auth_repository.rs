//! 用户认证记录仓储的 PostgreSQL 实现

use async_trait::async_trait;
use quill_common::{Role, UserId};
use quill_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::repositories::{UserAuthRecord, UserAuthRepository};
use crate::domain::value_objects::{Email, HashedPassword};

/// user_auths 行
#[derive(Debug, sqlx::FromRow)]
pub struct UserAuthRow {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub failed_login_attempts: i32,
}

impl UserAuthRow {
    pub fn into_record(self) -> AppResult<UserAuthRecord> {
        let email = Email::new(self.email)
            .map_err(|e| AppError::database(format!("Corrupt auth row {}: {}", self.user_id, e)))?;

        let password_hash = HashedPassword::from_hash(self.password_hash)
            .map_err(|e| AppError::database(format!("Corrupt auth row {}: {}", self.user_id, e)))?;

        let role: Role = self
            .role
            .parse()
            .map_err(|e| AppError::database(format!("Corrupt auth row {}: {}", self.user_id, e)))?;

        Ok(UserAuthRecord {
            user_id: UserId::from_uuid(self.user_id),
            email,
            password_hash,
            role,
            failed_login_attempts: self.failed_login_attempts,
        })
    }
}

pub struct PostgresUserAuthRepository {
    pool: PgPool,
}

impl PostgresUserAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserAuthRepository for PostgresUserAuthRepository {
    async fn find_auth_by_email(&self, email: &Email) -> AppResult<Option<UserAuthRecord>> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            r#"
            SELECT user_id, email, password_hash, role, failed_login_attempts
            FROM user_auths
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find auth record: {}", e)))?;

        row.map(UserAuthRow::into_record).transpose()
    }

    async fn increment_failed_login_attempts(&self, user_id: &UserId) -> AppResult<i32> {
        let attempts: i32 = sqlx::query_scalar(
            r#"
            UPDATE user_auths
            SET failed_login_attempts = failed_login_attempts + 1
            WHERE user_id = $1
            RETURNING failed_login_attempts
            "#,
        )
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to increment login attempts: {}", e)))?;

        Ok(attempts)
    }

    async fn reset_failed_login_attempts(&self, user_id: &UserId) -> AppResult<()> {
        sqlx::query("UPDATE user_auths SET failed_login_attempts = 0 WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to reset login attempts: {}", e)))?;

        Ok(())
    }
}
