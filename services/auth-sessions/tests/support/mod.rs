//! 测试支撑：内存仓储与种子数据
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quill_auth_core::TokenService;
use quill_common::{Role, SessionId, UserId};
use quill_domain_core::{AggregateRoot, Entity};
use quill_errors::{AppError, AppResult};

use auth_sessions::application::commands::LoginCommand;
use auth_sessions::domain::auth::{
    JwtToken, RefreshToken, RestoreSessionProps, Session, TokenValidity,
};
use auth_sessions::domain::repositories::{
    AuthRepository, UserAuthRecord, UserAuthRepository,
};
use auth_sessions::domain::services::PasswordService;
use auth_sessions::domain::value_objects::{Email, IpAddress, UserAgent};

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        "test-secret-key-at-least-32-chars-long",
        3600,
        604800,
    ))
}

/// 内存会话仓储
///
/// 行为对齐 PostgresAuthRepository：create 以 ID 为键覆盖写，
/// rotate/revoke 直接改写存储行
#[derive(Default)]
pub struct InMemoryAuthRepository {
    sessions: Mutex<HashMap<SessionId, Session>>,
    create_calls: AtomicUsize,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// createSession 被调用的次数
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// 直接塞入一行，绕过领域校验（构造过期/撤销的历史状态）
    pub fn seed_session(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id().clone(), session);
    }

    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn find_session_by_id(&self, id: &SessionId) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn find_existing_session(
        &self,
        user_agent: &UserAgent,
        ip_address: &IpAddress,
        user_id: &UserId,
    ) -> AppResult<Option<Session>> {
        let sessions = self.sessions.lock().unwrap();

        let mut matches: Vec<&Session> = sessions
            .values()
            .filter(|s| {
                !s.revoked()
                    && s.user_id() == user_id
                    && s.user_agent() == user_agent
                    && s.ip_address() == ip_address
            })
            .collect();

        matches.sort_by_key(|s| s.updated_at());

        Ok(matches.last().map(|s| (*s).clone()))
    }

    async fn revoke_session(&self, id: &SessionId) -> AppResult<()> {
        let mut sessions = self.sessions.lock().unwrap();

        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Session not found: {}", id)))?;

        session.revoke();
        Ok(())
    }

    async fn revoke_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();

        let mut count = 0;
        for session in sessions.values_mut() {
            if session.user_id() == user_id && !session.revoked() {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn count_active_sessions_for_user(&self, user_id: &UserId) -> AppResult<u64> {
        let sessions = self.sessions.lock().unwrap();

        Ok(sessions
            .values()
            .filter(|s| s.user_id() == user_id && s.active())
            .count() as u64)
    }

    async fn find_all_sessions_for_user(&self, user_id: &UserId) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.lock().unwrap();

        let mut result: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();

        result.sort_by_key(|s| std::cmp::Reverse(s.created_at()));

        Ok(result)
    }

    async fn find_expired_sessions(&self) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.values().filter(|s| s.expired()).cloned().collect())
    }

    async fn find_inactive_sessions(&self) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.values().filter(|s| s.revoked()).cloned().collect())
    }

    async fn rotate_refresh_token(
        &self,
        session_id: &SessionId,
        new_token: &RefreshToken,
    ) -> AppResult<()> {
        let mut sessions = self.sessions.lock().unwrap();

        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::not_found(format!("Session not found: {}", session_id)))?;

        // 与 SQL UPDATE 等价：替换令牌、前移 updated_at，其余列不动
        *session = Session::restore(RestoreSessionProps {
            id: session.id().clone(),
            user_id: session.user_id().clone(),
            refresh_token: new_token.clone(),
            user_agent: session.user_agent().clone(),
            ip_address: session.ip_address().clone(),
            created_at: session.created_at(),
            updated_at: new_token.created_at(),
            revoked_at: session.revoked_at(),
        });

        Ok(())
    }
}

/// 内存用户认证仓储
#[derive(Default)]
pub struct InMemoryUserAuthRepository {
    records: Mutex<HashMap<String, UserAuthRecord>>,
}

impl InMemoryUserAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 植入一条认证记录，返回用户 ID
    pub fn seed_user(&self, email: &str, password: &str, role: Role) -> UserId {
        let user_id = UserId::new();
        let record = UserAuthRecord {
            user_id: user_id.clone(),
            email: Email::new(email).unwrap(),
            password_hash: PasswordService::hash_password(password).unwrap(),
            role,
            failed_login_attempts: 0,
        };

        self.records
            .lock()
            .unwrap()
            .insert(record.email.as_str().to_string(), record);

        user_id
    }

    pub fn failed_attempts(&self, user_id: &UserId) -> i32 {
        self.records
            .lock()
            .unwrap()
            .values()
            .find(|r| &r.user_id == user_id)
            .map(|r| r.failed_login_attempts)
            .unwrap_or(0)
    }
}

#[async_trait]
impl UserAuthRepository for InMemoryUserAuthRepository {
    async fn find_auth_by_email(&self, email: &Email) -> AppResult<Option<UserAuthRecord>> {
        Ok(self.records.lock().unwrap().get(email.as_str()).cloned())
    }

    async fn increment_failed_login_attempts(&self, user_id: &UserId) -> AppResult<i32> {
        let mut records = self.records.lock().unwrap();

        let record = records
            .values_mut()
            .find(|r| &r.user_id == user_id)
            .ok_or_else(|| AppError::not_found(format!("Auth record not found: {}", user_id)))?;

        record.failed_login_attempts += 1;
        Ok(record.failed_login_attempts)
    }

    async fn reset_failed_login_attempts(&self, user_id: &UserId) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();

        if let Some(record) = records.values_mut().find(|r| &r.user_id == user_id) {
            record.failed_login_attempts = 0;
        }

        Ok(())
    }
}

/// 构造一条已过期（但未撤销）的会话，模拟 7 天窗口流逝后的存量行
pub fn expired_session(
    token_service: &TokenService,
    user_id: &UserId,
    user_agent: &str,
    ip: &str,
) -> Session {
    let session_id = SessionId::new();
    let issued_at = chrono::Utc::now() - chrono::Duration::days(8);
    let expired_at = issued_at + chrono::Duration::days(7);

    let raw = token_service
        .generate_refresh_token(user_id, Role::User)
        .unwrap();
    let token = JwtToken::parse(&raw, TokenValidity::At(expired_at)).unwrap();
    let refresh_token = RefreshToken::restore(session_id.clone(), token, issued_at, None);

    Session::restore(RestoreSessionProps {
        id: session_id,
        user_id: user_id.clone(),
        refresh_token,
        user_agent: UserAgent::new(user_agent).unwrap(),
        ip_address: IpAddress::new(ip).unwrap(),
        created_at: issued_at,
        updated_at: issued_at,
        revoked_at: None,
    })
}

pub fn login_command(email: &str, password: &str, user_agent: &str, ip: &str) -> LoginCommand {
    LoginCommand {
        email: Email::new(email).unwrap(),
        password: password.to_string(),
        user_agent: UserAgent::new(user_agent).unwrap(),
        ip_address: IpAddress::new(ip).unwrap(),
    }
}
