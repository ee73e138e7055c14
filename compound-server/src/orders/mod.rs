//! 订单生命周期引擎
//!
//! 药单聚合根的全部变更都经过 [`OrderEngine`]：
//! 状态机迁移、草稿唯一性、组方台账操作、剂量回调写入。
//! HTTP 处理器保持薄层，仓储不做任何迁移判断。

pub mod engine;

pub use engine::{DecideOutcome, MedicineSearch, OrderEngine};
