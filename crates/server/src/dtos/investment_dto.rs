use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_positive_decimal;

#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct CreateInvestmentDto {
    #[validate(length(min = 1))]
    pub project_id: String,
    #[validate(custom = "validate_positive_decimal")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[serde(default)]
    pub reinvest: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct InvestmentResponse {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub invested_at: DateTime<Utc>,
    pub lock_end_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub profit_percent: Decimal,
    pub reinvest: bool,
    /// 项目已不存在时为空串
    pub project_name: String,
}
