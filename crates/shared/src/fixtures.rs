//! 快照构造器
//!
//! 按给定 ID 构造字段完整的快照（包含所有可选字段），
//! 模板预览与严格模式校验的示例数据由此生成，测试工具也复用这里的构造逻辑。

use chrono::{TimeZone, Utc};

use crate::models::{
    Author, CommunitySnapshot, CommunityType, DepositSnapshot, InvitationSnapshot, ReviewDecision,
    ReviewKind, ReviewSnapshot, SubscriptionPlan, UserSnapshot,
};

pub fn user(id: &str, first_name: &str, last_name: &str) -> UserSnapshot {
    UserSnapshot {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        nickname: format!("{}-{}", first_name, last_name).to_lowercase(),
        email: Some(format!(
            "{}.{}@example.org",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        )),
        avatar: Some("https://assets.orvium.io/avatars/default.png".to_string()),
    }
}

pub fn community(id: &str, name: &str, subscription: SubscriptionPlan) -> CommunitySnapshot {
    CommunitySnapshot {
        id: id.to_string(),
        name: name.to_string(),
        community_type: CommunityType::Journal,
        subscription,
        codename: Some(name.to_lowercase().replace(' ', "-")),
        logo_url: Some("https://assets.orvium.io/logos/community.png".to_string()),
        twitter_url: Some("https://twitter.com/orvium".to_string()),
        facebook_url: Some("https://facebook.com/orvium".to_string()),
        website: Some("https://orvium.io".to_string()),
    }
}

pub fn deposit(id: &str, title: &str, community: &CommunitySnapshot) -> DepositSnapshot {
    DepositSnapshot {
        id: id.to_string(),
        title: title.to_string(),
        community_id: community.id.clone(),
        version: 1,
        authors: vec![Author {
            first_name: "Charles".to_string(),
            last_name: "Darwin".to_string(),
        }],
        abstract_text: Some("On the origin of species by means of natural selection.".to_string()),
        doi: Some("10.1234/orvium.0001".to_string()),
    }
}

pub fn review(id: &str, deposit: &DepositSnapshot, creator: &UserSnapshot) -> ReviewSnapshot {
    ReviewSnapshot {
        id: id.to_string(),
        deposit_id: deposit.id.clone(),
        creator_id: creator.id.clone(),
        kind: ReviewKind::PeerReview,
        decision: Some(ReviewDecision::MinorRevision),
    }
}

pub fn invitation(id: &str, addressee: &str, deposit: &DepositSnapshot) -> InvitationSnapshot {
    InvitationSnapshot {
        id: id.to_string(),
        addressee: addressee.to_string(),
        deposit_id: deposit.id.clone(),
        message: Some("We would be glad to have your review.".to_string()),
        deadline: Utc.with_ymd_and_hms(2030, 1, 31, 0, 0, 0).single(),
    }
}
