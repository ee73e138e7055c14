//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`substances`] - 物质目录接口
//! - [`medicines`] - 药单（订单）接口

pub mod auth;
pub mod health;
pub mod medicines;
pub mod substances;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
