//! 刷新处理器

use std::sync::Arc;

use async_trait::async_trait;
use quill_auth_core::TokenService;
use quill_cqrs_core::CommandHandler;
use quill_errors::{AppError, AppResult};

use crate::application::commands::RefreshCommand;
use crate::application::dto::RotatedCredentials;
use crate::domain::auth::{AccessToken, JwtToken, RefreshToken, TokenValidity};
use crate::domain::repositories::AuthRepository;

pub struct RefreshHandler {
    auth_repo: Arc<dyn AuthRepository>,
    token_service: Arc<TokenService>,
}

impl RefreshHandler {
    pub fn new(auth_repo: Arc<dyn AuthRepository>, token_service: Arc<TokenService>) -> Self {
        Self {
            auth_repo,
            token_service,
        }
    }
}

#[async_trait]
impl CommandHandler<RefreshCommand> for RefreshHandler {
    async fn handle(&self, command: RefreshCommand) -> AppResult<RotatedCredentials> {
        // 缺失、过期或已撤销的会话一律拒绝
        let session = match self.auth_repo.find_session_by_id(&command.session_id).await? {
            Some(session) if session.active() => session,
            _ => {
                metrics::counter!("auth_refreshes_total", "outcome" => "unauthorized")
                    .increment(1);
                return Err(AppError::unauthorized("Session missing, expired or revoked"));
            }
        };

        // 验签并要求与会话当前持有的刷新令牌一致，载荷才可信
        let claims = self.token_service.verify_and_extract_claims(
            &command.refresh_token,
            session.refresh_token().token().value(),
        )?;

        let user_id = claims.user_id()?;

        // 轮换：签发新的 7 天刷新令牌并落库，旧令牌的有效性在存储层终结
        let raw_refresh = self
            .token_service
            .generate_refresh_token(&user_id, claims.role)?;
        let refresh_token = RefreshToken::create(
            command.session_id.clone(),
            JwtToken::parse(&raw_refresh, TokenValidity::SevenDays)?,
        );

        self.auth_repo
            .rotate_refresh_token(&command.session_id, &refresh_token)
            .await?;

        let raw_access = self
            .token_service
            .generate_access_token(&user_id, claims.role)?;
        let access_token =
            AccessToken::create(JwtToken::parse(&raw_access, TokenValidity::OneHour)?);

        tracing::info!(user_id = %user_id, session_id = %command.session_id, "Token refreshed");
        metrics::counter!("auth_refreshes_total", "outcome" => "success").increment(1);

        Ok(RotatedCredentials {
            access_token: access_token.token().value().to_string(),
            refresh_token: refresh_token.token().value().to_string(),
            expires_in: self.token_service.access_token_expires_in(),
        })
    }
}
