//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::Role;
use thiserror::Error;

use crate::auth::{Capability, role_allows};
use shared::AppError;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 服务令牌过期时间 (天)，签发给远程剂量服务
    pub service_expiration_days: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using generated dev key", e);
                    generate_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            service_expiration_days: std::env::var("JWT_SERVICE_EXPIRATION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(365),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "compound-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "galen-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色: user | moderator | remote_service
    pub role: String,
    /// 令牌类型: access | service
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的 JWT 密钥 (用于开发环境)
fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // 随机数生成失败时回退到固定开发密钥
            return "GalenCompoundServerDevelopmentKey2025!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable is not set".to_string(),
        )),
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成访问令牌
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        self.generate_with_expiry(
            user_id,
            username,
            role,
            "access",
            Duration::minutes(self.config.expiration_minutes),
        )
    }

    /// 为远程剂量服务生成长期服务令牌
    ///
    /// 角色固定为 remote_service，在部署时下发给剂量服务。
    pub fn generate_service_token(&self, service_name: &str) -> Result<String, JwtError> {
        self.generate_with_expiry(
            &format!("service:{}", service_name),
            service_name,
            Role::RemoteService,
            "service",
            Duration::days(self.config.service_expiration_days),
        )
    }

    fn generate_with_expiry(
        &self,
        user_id: &str,
        username: &str,
        role: Role,
        token_type: &str,
        lifetime: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + lifetime;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数。引擎只消费这里解析出的
/// (id, role) 对，不接触任何会话机制。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("account:key" 形式)
    pub id: String,
    /// 用户名
    pub username: String,
    /// 解析后的角色
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = shared::models::InvalidRole;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse()?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role,
        })
    }
}

impl CurrentUser {
    /// 是否审核员
    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }

    /// 要求指定能力，否则返回 403
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if role_allows(self.role, capability) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role {} lacks capability {:?}",
                self.role, capability
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long!!".to_string(),
            expiration_minutes: 60,
            service_expiration_days: 365,
            issuer: "compound-server".to_string(),
            audience: "galen-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token("account:u1", "maria", Role::User)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "account:u1");
        assert_eq!(claims.username, "maria");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_service_token_role() {
        let service = test_service();

        let token = service
            .generate_service_token("dose-service")
            .expect("Failed to generate service token");
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.role, "remote_service");
        assert_eq!(claims.token_type, "service");

        let user = CurrentUser::try_from(claims).unwrap();
        assert!(user.require(Capability::WriteDose).is_ok());
        assert!(user.require(Capability::DecideOrder).is_err());
    }

    #[test]
    fn test_invalid_role_in_claims_rejected() {
        let claims = Claims {
            sub: "account:u1".to_string(),
            username: "maria".to_string(),
            role: "superuser".to_string(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
            iss: "x".to_string(),
            aud: "y".to_string(),
        };

        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token("account:u1", "maria", Role::User)
            .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }
}
