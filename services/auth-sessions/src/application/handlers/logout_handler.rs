//! 登出处理器

use std::sync::Arc;

use async_trait::async_trait;
use quill_cqrs_core::CommandHandler;
use quill_errors::AppResult;

use crate::application::commands::LogoutCommand;
use crate::domain::repositories::AuthRepository;

pub struct LogoutHandler {
    auth_repo: Arc<dyn AuthRepository>,
}

impl LogoutHandler {
    pub fn new(auth_repo: Arc<dyn AuthRepository>) -> Self {
        Self { auth_repo }
    }
}

#[async_trait]
impl CommandHandler<LogoutCommand> for LogoutHandler {
    async fn handle(&self, command: LogoutCommand) -> AppResult<()> {
        // 登出对客户端永远成功，仓储失败只记日志。
        // 会话记录已不存在时客户端同样无感；Cookie 由 HTTP 边界无条件清除
        if let Err(err) = self.auth_repo.revoke_session(&command.session_id).await {
            tracing::warn!(session_id = %command.session_id, error = %err,
                "Failed to revoke session on logout");
        }

        metrics::counter!("auth_logouts_total").increment(1);

        Ok(())
    }
}
