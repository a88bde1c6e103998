//! 会话查询处理器
//!
//! 仓储之上的薄投影层

use std::sync::Arc;

use async_trait::async_trait;
use quill_cqrs_core::QueryHandler;
use quill_errors::AppResult;

use crate::application::dto::SessionDto;
use crate::application::queries::{
    CountActiveSessionsQuery, ListExpiredSessionsQuery, ListInactiveSessionsQuery,
    ListSessionsForUserQuery,
};
use crate::domain::repositories::AuthRepository;

pub struct AuthQueryHandler {
    auth_repo: Arc<dyn AuthRepository>,
}

impl AuthQueryHandler {
    pub fn new(auth_repo: Arc<dyn AuthRepository>) -> Self {
        Self { auth_repo }
    }
}

#[async_trait]
impl QueryHandler<CountActiveSessionsQuery> for AuthQueryHandler {
    async fn handle(&self, query: CountActiveSessionsQuery) -> AppResult<u64> {
        self.auth_repo
            .count_active_sessions_for_user(&query.user_id)
            .await
    }
}

#[async_trait]
impl QueryHandler<ListSessionsForUserQuery> for AuthQueryHandler {
    async fn handle(&self, query: ListSessionsForUserQuery) -> AppResult<Vec<SessionDto>> {
        let sessions = self
            .auth_repo
            .find_all_sessions_for_user(&query.user_id)
            .await?;

        Ok(sessions.iter().map(SessionDto::from).collect())
    }
}

#[async_trait]
impl QueryHandler<ListExpiredSessionsQuery> for AuthQueryHandler {
    async fn handle(&self, _query: ListExpiredSessionsQuery) -> AppResult<Vec<SessionDto>> {
        let sessions = self.auth_repo.find_expired_sessions().await?;

        Ok(sessions.iter().map(SessionDto::from).collect())
    }
}

#[async_trait]
impl QueryHandler<ListInactiveSessionsQuery> for AuthQueryHandler {
    async fn handle(&self, _query: ListInactiveSessionsQuery) -> AppResult<Vec<SessionDto>> {
        let sessions = self.auth_repo.find_inactive_sessions().await?;

        Ok(sessions.iter().map(SessionDto::from).collect())
    }
}
