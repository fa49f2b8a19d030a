use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 推荐层级上限(含)
pub const MAX_REFERRAL_LEVEL: u8 = 3;

/// 推荐关系(有向边: referrer -> referred)，创建后不可修改
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Referral {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 推荐人
    pub referrer_id: ObjectId,
    /// 被推荐人
    pub referred_id: ObjectId,
    /// 佣金层级 1..=3
    pub level: u8,
    /// 佣金，以十进制字符串存储
    pub commission: Decimal,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(referrer_id: ObjectId, referred_id: ObjectId, level: u8, commission: Decimal) -> Self {
        Self {
            id: ObjectId::new(),
            referrer_id,
            referred_id,
            level,
            commission,
            created_at: Utc::now(),
        }
    }
}
