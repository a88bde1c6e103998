//! quill-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    ArgumentInvalid(String),

    /// 邮箱不存在与密码错误统一返回该错误，避免泄露差异
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn argument_invalid(msg: impl Into<String>) -> Self {
        Self::ArgumentInvalid(msg.into())
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// 稳定错误码，供 API 边界使用
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "GENERIC.NOT_FOUND",
            Self::Validation(_) => "GENERIC.VALIDATION",
            Self::ArgumentInvalid(_) => "GENERIC.ARGUMENT_INVALID",
            Self::InvalidCredentials => "AUTH.INVALID_CREDENTIALS",
            Self::Unauthorized(_) => "AUTH.UNAUTHORIZED",
            Self::Conflict(_) => "GENERIC.CONFLICT",
            Self::Internal(_) => "GENERIC.INTERNAL",
            Self::Database(_) => "GENERIC.DATABASE",
            Self::Signing(_) => "AUTH.SIGNING",
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::ArgumentInvalid(_) => 400,
            Self::InvalidCredentials => 400,
            Self::Unauthorized(_) => 401,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
            Self::Signing(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            code: self.code().to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::ArgumentInvalid(_) => "argument-invalid",
            Self::InvalidCredentials => "invalid-credentials",
            Self::Unauthorized(_) => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
            Self::Signing(_) => "signing",
        };
        format!("https://api.quill.cc/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::ArgumentInvalid(_) => "Invalid Argument",
            Self::InvalidCredentials => "Invalid Credentials",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Conflict(_) => "Conflict",
            Self::Internal(_) => "Internal Server Error",
            Self::Database(_) => "Database Error",
            Self::Signing(_) => "Token Signing Error",
        }
        .to_string()
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_uniform() {
        // 邮箱不存在与密码错误必须产生完全相同的错误表示
        let a = AppError::invalid_credentials();
        let b = AppError::invalid_credentials();
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.code(), b.code());
        assert_eq!(a.code(), "AUTH.INVALID_CREDENTIALS");
        assert_eq!(a.status_code(), 400);
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem = AppError::unauthorized("Session expired").to_problem_details();
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["code"], "AUTH.UNAUTHORIZED");
        assert!(json.get("instance").is_none());
    }

    #[test]
    fn test_argument_invalid_status() {
        let err = AppError::argument_invalid("Cannot rotate a revoked session");
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Cannot rotate a revoked session"));
    }
}
