use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Closed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Closed => "closed",
        }
    }
}

/// 投资项目：锁仓天数 + 收益率
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub lock_days: u32,
    pub profit_percent: Decimal,
    pub min_investment: Decimal,
    /// 0 表示不设上限
    pub max_investment: Decimal,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn accepts_amount(&self, amount: Decimal) -> bool {
        if amount < self.min_investment {
            return false;
        }
        self.max_investment.is_zero() || amount <= self.max_investment
    }
}

/// 用户投资记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Investment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub project_id: ObjectId,
    pub amount: Decimal,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub invested_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub lock_end_date: DateTime<Utc>,
    /// 投资时项目的收益率快照
    pub profit_percent: Decimal,
    pub reinvest: bool,
}

impl Investment {
    pub fn new(user_id: ObjectId, project: &Project, amount: Decimal, reinvest: bool) -> Self {
        let invested_at = Utc::now();

        Self {
            id: ObjectId::new(),
            user_id,
            project_id: project.id,
            amount,
            invested_at,
            lock_end_date: invested_at + Duration::days(i64::from(project.lock_days)),
            profit_percent: project.profit_percent,
            reinvest,
        }
    }
}
