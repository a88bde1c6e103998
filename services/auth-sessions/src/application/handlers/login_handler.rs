//! 登录处理器

use std::sync::Arc;

use async_trait::async_trait;
use quill_auth_core::TokenService;
use quill_common::SessionId;
use quill_cqrs_core::CommandHandler;
use quill_domain_core::Entity;
use quill_errors::{AppError, AppResult};

use crate::application::commands::LoginCommand;
use crate::application::dto::IssuedCredentials;
use crate::domain::auth::{
    AccessToken, CreateSessionProps, JwtToken, RefreshToken, Session, TokenValidity,
};
use crate::domain::repositories::{AuthRepository, UserAuthRepository};
use crate::domain::services::PasswordService;

pub struct LoginHandler {
    user_auth_repo: Arc<dyn UserAuthRepository>,
    auth_repo: Arc<dyn AuthRepository>,
    token_service: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(
        user_auth_repo: Arc<dyn UserAuthRepository>,
        auth_repo: Arc<dyn AuthRepository>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_auth_repo,
            auth_repo,
            token_service,
        }
    }
}

#[async_trait]
impl CommandHandler<LoginCommand> for LoginHandler {
    async fn handle(&self, command: LoginCommand) -> AppResult<IssuedCredentials> {
        // 查找认证记录。邮箱不存在与密码错误必须返回同一个错误
        let record = match self.user_auth_repo.find_auth_by_email(&command.email).await? {
            Some(record) => record,
            None => {
                metrics::counter!("auth_logins_total", "outcome" => "invalid_credentials")
                    .increment(1);
                return Err(AppError::invalid_credentials());
            }
        };

        // 验证密码
        let valid = PasswordService::verify_password(&command.password, &record.password_hash)?;
        if !valid {
            if let Err(err) = self
                .user_auth_repo
                .increment_failed_login_attempts(&record.user_id)
                .await
            {
                tracing::warn!(user_id = %record.user_id, error = %err,
                    "Failed to record failed login attempt");
            }
            metrics::counter!("auth_logins_total", "outcome" => "invalid_credentials")
                .increment(1);
            return Err(AppError::invalid_credentials());
        }

        // 查找同一设备上未撤销的既有会话
        let existing_session = self
            .auth_repo
            .find_existing_session(&command.user_agent, &command.ip_address, &record.user_id)
            .await?;

        // 复用既有会话的 ID，否则铸造新 ID（刷新令牌也要绑定同一 ID）
        let session_id = existing_session
            .as_ref()
            .map(|s| s.id().clone())
            .unwrap_or_else(SessionId::new);

        // 无论是否复用，访问令牌每次都重新签发
        let raw_access = self
            .token_service
            .generate_access_token(&record.user_id, record.role)?;
        let access_token =
            AccessToken::create(JwtToken::parse(&raw_access, TokenValidity::OneHour)?);

        let raw_refresh = self
            .token_service
            .generate_refresh_token(&record.user_id, record.role)?;
        let refresh_token = RefreshToken::create(
            session_id.clone(),
            JwtToken::parse(&raw_refresh, TokenValidity::SevenDays)?,
        );

        let session = Session::create(CreateSessionProps {
            id: Some(session_id.clone()),
            user_id: record.user_id.clone(),
            refresh_token,
            user_agent: command.user_agent,
            ip_address: command.ip_address,
        })?;

        // 既有会话未过期时，客户端继续使用它已持有的刷新令牌；
        // 只有没有可复用会话（或其已过期）时才落库新会话
        let reusable = existing_session.as_ref().is_some_and(|s| !s.expired());

        let session_token = match (&existing_session, reusable) {
            (Some(existing), true) => existing.refresh_token().clone(),
            _ => session.refresh_token().clone(),
        };

        if !reusable {
            self.auth_repo.create_session(&session).await?;
        }

        if record.failed_login_attempts > 0 {
            if let Err(err) = self
                .user_auth_repo
                .reset_failed_login_attempts(&record.user_id)
                .await
            {
                tracing::warn!(user_id = %record.user_id, error = %err,
                    "Failed to reset login attempt counter");
            }
        }

        tracing::info!(user_id = %record.user_id, session_id = %session_id,
            reused = reusable, "Login successful");
        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);

        Ok(IssuedCredentials {
            access_token: access_token.token().value().to_string(),
            refresh_token: session_token.token().value().to_string(),
            session_id,
            expires_in: self.token_service.access_token_expires_in(),
        })
    }
}
