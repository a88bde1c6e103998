//! 密码哈希值对象
//!
//! Argon2id PHC 字符串。verify 内部是恒定时间比较

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use quill_errors::AppError;

/// 密码哈希值对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 从明文哈希
    pub fn from_plain(password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;

        Ok(Self(hash.to_string()))
    }

    /// 从存储的 PHC 字符串恢复
    pub fn from_hash(hash: impl Into<String>) -> Result<Self, PasswordError> {
        let hash = hash.into();
        PasswordHash::new(&hash).map_err(|e| PasswordError::Malformed(e.to_string()))?;
        Ok(Self(hash))
    }

    /// 验证明文是否匹配
    pub fn verify(&self, password: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::Malformed(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 密码哈希错误
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Malformed password hash: {0}")]
    Malformed(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::internal(err.to_string())
    }
}
