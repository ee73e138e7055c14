//! 服务模块
//!
//! - [`DoseService`] - 剂量计算编排（外部服务出站握手）

pub mod dose;

pub use dose::DoseService;
