//! Galen Compound Server - 配药订单服务后端
//!
//! # 架构概述
//!
//! 本模块是配药服务的主入口，提供以下核心功能：
//!
//! - **订单生命周期引擎** (`orders`): 药单状态机、草稿唯一性、组方台账
//! - **剂量计算编排** (`services/dose`): 外部剂量服务的异步握手
//! - **物质目录** (`api/substances`): 物质的增删改查（软删除）
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证，按能力授权
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! compound-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、能力检查
//! ├── orders/        # 订单生命周期引擎
//! ├── services/      # 剂量计算编排
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层（模型 + 仓储）
//! ├── routes.rs      # 应用组装（中间件栈）
//! └── utils/         # 日志、错误映射、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{Capability, CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderEngine;
pub use services::DoseService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file, setup_environment};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ______      __
  / ____/___ _/ /__  ____
 / / __/ __ `/ / _ \/ __ \
/ /_/ / /_/ / /  __/ / / /
\____/\__,_/_/\___/_/ /_/
    "#
    );
}
