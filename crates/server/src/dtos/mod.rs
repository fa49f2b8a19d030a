pub mod admin_dto;
pub mod investment_dto;
pub mod kyc_dto;
pub mod referral_dto;
pub mod transaction_dto;
pub mod user_dto;

use lazy_static::lazy_static;
use mongodb::bson::oid::ObjectId;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utils::{AppError, AppResult};
use utoipa::ToSchema;
use validator::ValidationError;

lazy_static! {
    /// E.164 风格手机号，可带前导 +
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{6,15}$").unwrap();
}

/// 解析十六进制 ObjectId，非法输入视为参数错误
pub fn parse_object_id(value: &str, field: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", field, value)))
}

pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_positive"))
    }
}

pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(ValidationError::new("must_not_be_negative"))
    } else {
        Ok(())
    }
}

/// 仅包含提示信息的响应
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// 创建成功响应
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
    pub message: String,
}

impl CreatedResponse {
    pub fn new(id: &ObjectId, message: &str) -> Self {
        Self {
            id: id.to_hex(),
            message: message.to_string(),
        }
    }
}
