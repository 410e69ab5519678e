//! 测试工具模块
//!
//! 为测试生成带随机 ID 的快照，字段内容与 [`crate::fixtures`] 一致。

use uuid::Uuid;

use crate::fixtures;
use crate::models::{
    CommunitySnapshot, CommunityType, DepositSnapshot, InvitationSnapshot, ReviewSnapshot,
    SubscriptionPlan, UserSnapshot,
};

// ==================== ID 生成 ====================

/// 生成唯一的测试 ID
pub fn test_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

// ==================== 快照生成器 ====================

/// 创建测试用户
pub fn test_user(first_name: &str, last_name: &str) -> UserSnapshot {
    fixtures::user(&test_id("user"), first_name, last_name)
}

/// 创建测试社区（所有可选字段均已填充）
pub fn test_community(name: &str, subscription: SubscriptionPlan) -> CommunitySnapshot {
    fixtures::community(&test_id("community"), name, subscription)
}

/// 创建只有必填字段的社区，用于验证可选占位符被省略
pub fn test_minimal_community(name: &str) -> CommunitySnapshot {
    CommunitySnapshot {
        id: test_id("community"),
        name: name.to_string(),
        community_type: CommunityType::Community,
        subscription: SubscriptionPlan::Free,
        codename: None,
        logo_url: None,
        twitter_url: None,
        facebook_url: None,
        website: None,
    }
}

/// 创建测试出版物
pub fn test_deposit(title: &str, community: &CommunitySnapshot) -> DepositSnapshot {
    fixtures::deposit(&test_id("deposit"), title, community)
}

/// 创建测试评审
pub fn test_review(deposit: &DepositSnapshot, creator: &UserSnapshot) -> ReviewSnapshot {
    fixtures::review(&test_id("review"), deposit, creator)
}

/// 创建测试评审邀请
pub fn test_invitation(addressee: &str, deposit: &DepositSnapshot) -> InvitationSnapshot {
    fixtures::invitation(&test_id("invitation"), addressee, deposit)
}
