use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PHONE_REGEX;
use crate::services::referral::tree::{ReferralNode, ReferralTree};

/// level / commission 的取值范围由服务层校验
#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct CreateReferralDto {
    #[validate(regex(path = "PHONE_REGEX", message = "invalid phone number"))]
    pub referred_phone: String,
    pub level: i32,
    #[schema(value_type = f64)]
    pub commission: Decimal,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ReferralNodeResponse {
    pub id: String,
    pub referred_phone: String,
    pub referred_name: String,
    pub level: u8,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub commission: Decimal,
    pub created_at: DateTime<Utc>,
    pub depth: u8,
}

impl From<ReferralNode> for ReferralNodeResponse {
    fn from(node: ReferralNode) -> Self {
        Self {
            id: node.edge.id.to_hex(),
            referred_phone: node.referred_phone,
            referred_name: node.referred_name.unwrap_or_default(),
            level: node.edge.level,
            commission: node.edge.commission,
            created_at: node.edge.created_at,
            depth: node.depth,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ReferralTreeResponse {
    pub referrals: Vec<ReferralNodeResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_commission: Decimal,
}

impl From<ReferralTree> for ReferralTreeResponse {
    fn from(tree: ReferralTree) -> Self {
        Self {
            referrals: tree.nodes.into_iter().map(ReferralNodeResponse::from).collect(),
            total_commission: tree.total_commission,
        }
    }
}
