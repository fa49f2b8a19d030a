use chrono::{DateTime, Utc};
use database::{
    product::model::Product,
    project::model::Project,
    user::model::{KycStatus, User},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{validate_non_negative_decimal, validate_positive_decimal};

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct DashboardStatsResponse {
    pub total_users: u64,
    pub pending_kyc: u64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_investments: Decimal,
    pub total_products: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct AdminUserResponse {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub kyc_status: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_invested: Decimal,
    pub total_referrals: u64,
}

impl AdminUserResponse {
    pub fn new(user: User, total_invested: Decimal, total_referrals: u64) -> Self {
        Self {
            id: user.id.to_hex(),
            phone: user.phone,
            name: user.name,
            email: user.email,
            kyc_status: user.kyc_status.to_string(),
            total_invested,
            total_referrals,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct UpdateKycStatusDto {
    #[validate(length(min = 1))]
    pub user_id: String,
    /// approved | rejected
    #[schema(value_type = String)]
    pub status: KycStatus,
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub product_type: String,
    #[validate(custom = "validate_positive_decimal")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            product_type: product.product_type,
            price: product.price,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, max = 3650))]
    pub lock_days: u32,
    #[validate(custom = "validate_non_negative_decimal")]
    #[schema(value_type = f64)]
    pub profit_percent: Decimal,
    #[validate(custom = "validate_non_negative_decimal")]
    #[schema(value_type = f64)]
    pub min_investment: Decimal,
    /// 0 表示不设上限
    #[validate(custom = "validate_non_negative_decimal")]
    #[schema(value_type = f64)]
    pub max_investment: Decimal,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub lock_days: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub profit_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub min_investment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub max_investment: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_hex(),
            name: project.name,
            description: project.description,
            lock_days: project.lock_days,
            profit_percent: project.profit_percent,
            min_investment: project.min_investment,
            max_investment: project.max_investment,
            status: project.status.as_str().to_string(),
            created_at: project.created_at,
        }
    }
}
