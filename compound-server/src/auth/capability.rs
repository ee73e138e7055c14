//! Capability Definitions
//!
//! 统一的授权检查：每个引擎操作声明所需能力，由单一函数判定
//! (角色, 能力) 是否放行。
//!
//! ## 设计原则
//! - 普通用户：组方、提交、撤回自己的订单，浏览目录
//! - 审核员：目录管理 + 订单裁决，并可读取所有非草稿订单
//! - 远程服务：只允许写入计算出的剂量

use shared::Role;

/// 引擎操作所需的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// 浏览目录、查看自己的订单
    BrowseCatalog,
    /// 组方：创建草稿、增删物质、改权重、提交、撤回
    ComposeOrder,
    /// 目录管理：创建/修改/归档物质
    ManageCatalog,
    /// 裁决：批准/驳回已提交订单，读取所有订单
    DecideOrder,
    /// 写入计算出的剂量（回调）
    WriteDose,
}

/// 判定角色是否具备指定能力
///
/// 这是整个服务唯一的授权判定点；所有权（owner）检查仍由
/// 引擎按聚合根另行执行。
pub fn role_allows(role: Role, capability: Capability) -> bool {
    match role {
        Role::User => matches!(
            capability,
            Capability::BrowseCatalog | Capability::ComposeOrder
        ),
        Role::Moderator => matches!(
            capability,
            Capability::BrowseCatalog | Capability::ManageCatalog | Capability::DecideOrder
        ),
        Role::RemoteService => matches!(capability, Capability::WriteDose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_capabilities() {
        assert!(role_allows(Role::User, Capability::BrowseCatalog));
        assert!(role_allows(Role::User, Capability::ComposeOrder));
        assert!(!role_allows(Role::User, Capability::ManageCatalog));
        assert!(!role_allows(Role::User, Capability::DecideOrder));
        assert!(!role_allows(Role::User, Capability::WriteDose));
    }

    #[test]
    fn test_moderator_capabilities() {
        assert!(role_allows(Role::Moderator, Capability::ManageCatalog));
        assert!(role_allows(Role::Moderator, Capability::DecideOrder));
        assert!(role_allows(Role::Moderator, Capability::BrowseCatalog));
        // 审核员不替用户组方，也不伪造剂量
        assert!(!role_allows(Role::Moderator, Capability::ComposeOrder));
        assert!(!role_allows(Role::Moderator, Capability::WriteDose));
    }

    #[test]
    fn test_remote_service_is_write_dose_only() {
        assert!(role_allows(Role::RemoteService, Capability::WriteDose));
        assert!(!role_allows(Role::RemoteService, Capability::BrowseCatalog));
        assert!(!role_allows(Role::RemoteService, Capability::ComposeOrder));
        assert!(!role_allows(Role::RemoteService, Capability::ManageCatalog));
        assert!(!role_allows(Role::RemoteService, Capability::DecideOrder));
    }
}
