//! 登录流程测试：会话复用、凭证错误一致性

mod support;

use std::sync::Arc;

use quill_common::Role;
use quill_cqrs_core::CommandHandler;
use quill_domain_core::Entity;
use quill_errors::AppError;

use auth_sessions::application::handlers::LoginHandler;
use auth_sessions::domain::repositories::AuthRepository;

use support::{
    InMemoryAuthRepository, InMemoryUserAuthRepository, expired_session, login_command,
    token_service,
};

fn setup() -> (
    Arc<InMemoryUserAuthRepository>,
    Arc<InMemoryAuthRepository>,
    LoginHandler,
) {
    let user_auth_repo = Arc::new(InMemoryUserAuthRepository::new());
    let auth_repo = Arc::new(InMemoryAuthRepository::new());
    let handler = LoginHandler::new(
        user_auth_repo.clone(),
        auth_repo.clone(),
        token_service(),
    );

    (user_auth_repo, auth_repo, handler)
}

#[tokio::test]
async fn test_login_issues_credentials_and_persists_session() {
    let (user_auth_repo, auth_repo, handler) = setup();
    let user_id = user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let result = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    assert!(!result.access_token.is_empty());
    assert!(!result.refresh_token.is_empty());
    assert_eq!(result.expires_in, 3600);

    let stored = auth_repo.get(&result.session_id).expect("session persisted");
    assert_eq!(stored.user_id(), &user_id);
    assert_eq!(stored.user_agent().as_str(), "chrome");
    assert_eq!(stored.ip_address().to_string(), "1.1.1.1");
    assert!(stored.active());
}

#[tokio::test]
async fn test_repeat_login_from_same_device_reuses_refresh_token() {
    let (user_auth_repo, auth_repo, handler) = setup();
    user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let first = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    let second = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    // 刷新令牌与会话 ID 原样复用，访问令牌每次新签
    assert_eq!(second.refresh_token, first.refresh_token);
    assert_eq!(second.session_id, first.session_id);
    assert_ne!(second.access_token, first.access_token);

    // 同一设备不落第二行
    assert_eq!(auth_repo.create_calls(), 1);
}

#[tokio::test]
async fn test_login_from_another_device_creates_second_session() {
    let (user_auth_repo, auth_repo, handler) = setup();
    let user_id = user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let first = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    let second = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "firefox", "2.2.2.2"))
        .await
        .unwrap();

    assert_ne!(second.session_id, first.session_id);
    assert_ne!(second.refresh_token, first.refresh_token);
    assert_eq!(auth_repo.create_calls(), 2);

    assert_eq!(
        auth_repo
            .count_active_sessions_for_user(&user_id)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_login_over_expired_session_mints_fresh_token() {
    let (user_auth_repo, auth_repo, handler) = setup();
    let user_id = user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let stale = expired_session(&token_service(), &user_id, "chrome", "1.1.1.1");
    let stale_id = stale.id().clone();
    let stale_token = stale.refresh_token().token().value().to_string();
    auth_repo.seed_session(stale);

    let result = handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    // 过期的存量会话不可复用：ID 沿用，但令牌重新铸造、行被替换
    assert_eq!(result.session_id, stale_id);
    assert_ne!(result.refresh_token, stale_token);
    assert_eq!(auth_repo.create_calls(), 1);

    let stored = auth_repo.get(&result.session_id).unwrap();
    assert_eq!(stored.refresh_token().token().value(), result.refresh_token);
    assert!(stored.active());
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let (user_auth_repo, _auth_repo, handler) = setup();
    user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let unknown_email = handler
        .handle(login_command("ghost@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap_err();

    let wrong_password = handler
        .handle(login_command("a@x.com", "wrong-password", "chrome", "1.1.1.1"))
        .await
        .unwrap_err();

    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    assert_eq!(unknown_email.code(), wrong_password.code());
}

#[tokio::test]
async fn test_failed_attempt_counter() {
    let (user_auth_repo, _auth_repo, handler) = setup();
    let user_id = user_auth_repo.seed_user("a@x.com", "Str0ng!Pass", Role::User);

    let _ = handler
        .handle(login_command("a@x.com", "wrong", "chrome", "1.1.1.1"))
        .await;
    let _ = handler
        .handle(login_command("a@x.com", "still-wrong", "chrome", "1.1.1.1"))
        .await;

    assert_eq!(user_auth_repo.failed_attempts(&user_id), 2);

    handler
        .handle(login_command("a@x.com", "Str0ng!Pass", "chrome", "1.1.1.1"))
        .await
        .unwrap();

    assert_eq!(user_auth_repo.failed_attempts(&user_id), 0);
}
