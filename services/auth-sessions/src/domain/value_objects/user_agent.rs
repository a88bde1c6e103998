//! User-Agent 值对象

use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_LENGTH: usize = 512;

/// User-Agent 值对象
///
/// 设备指纹的一半（另一半是 IP），会话按 (userId, userAgent, ipAddress)
/// 精确匹配做复用判定
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserAgent(String);

impl UserAgent {
    pub fn new(value: impl Into<String>) -> Result<Self, UserAgentError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(UserAgentError::Empty);
        }

        if trimmed.len() > MAX_LENGTH {
            return Err(UserAgentError::TooLong(trimmed.len()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-Agent 错误
#[derive(Debug, thiserror::Error)]
pub enum UserAgentError {
    #[error("User agent must not be empty")]
    Empty,
    #[error("User agent too long: {0} bytes")]
    TooLong(usize),
}
