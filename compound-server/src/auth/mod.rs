//! 认证授权模块
//!
//! 提供 JWT 认证、能力检查和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`Capability`] - 能力定义（统一授权检查）
//! - [`require_auth`] - 认证中间件

pub mod capability;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use capability::{Capability, role_allows};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
