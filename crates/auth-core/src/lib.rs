//! quill-auth-core - 认证核心库
//!
//! JWT Claims 与签名/验签逻辑

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use quill_common::{Role, UserId};
use quill_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
///
/// 业务载荷只有 sub + role，其余为标准声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// 用户角色，透传给授权层
    pub role: Role,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    pub fn new(user_id: &UserId, role: Role, expires_in_secs: i64, token_type: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.0.to_string(),
            role,
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            token_type: token_type.to_string(),
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == "refresh"
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_token_expires_in: i64, refresh_token_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            refresh_token_expires_in,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, user_id: &UserId, role: Role) -> AppResult<String> {
        let claims = Claims::new(user_id, role, self.access_token_expires_in, "access");

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::signing(format!("Failed to generate token: {}", e)))
    }

    /// 生成刷新令牌
    pub fn generate_refresh_token(&self, user_id: &UserId, role: Role) -> AppResult<String> {
        let claims = Claims::new(user_id, role, self.refresh_token_expires_in, "refresh");

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::signing(format!("Failed to generate refresh token: {}", e)))
    }

    /// 验证令牌
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0; // 不允许时间偏差

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.token_type.is_empty() {
            return Err(AppError::unauthorized("Token type not specified"));
        }

        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// 验证访问令牌（确保是 access token）
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::unauthorized("Not an access token"));
        }

        Ok(claims)
    }

    /// 验证刷新令牌（确保是 refresh token）
    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_refresh_token() {
            return Err(AppError::unauthorized("Not a refresh token"));
        }

        Ok(claims)
    }

    /// 验签并提取刷新令牌载荷
    ///
    /// 调用方提交的裸令牌必须与会话当前持有的刷新令牌逐字节一致，
    /// 再通过完整验签；任一不满足即拒绝。裸 decode 不可信。
    pub fn verify_and_extract_claims(
        &self,
        raw_token: &str,
        expected_token_value: &str,
    ) -> AppResult<Claims> {
        let raw_token = raw_token.trim();

        if raw_token != expected_token_value {
            return Err(AppError::unauthorized(
                "Refresh token does not match session",
            ));
        }

        self.validate_refresh_token(raw_token)
    }

    /// 获取访问令牌过期时间（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }

    /// 获取刷新令牌过期时间（秒）
    pub fn refresh_token_expires_in(&self) -> i64 {
        self.refresh_token_expires_in
    }
}
