use chrono::{DateTime, Utc};
use database::product::model::{Product, Transaction, TransactionKind, Unit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_positive_decimal;

#[derive(Clone, Serialize, Deserialize, Debug, Validate, ToSchema)]
pub struct CreateTransactionDto {
    #[validate(length(min = 1))]
    pub product_id: String,
    /// buy | sell
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    #[validate(custom = "validate_positive_decimal")]
    #[schema(value_type = f64)]
    pub quantity: Decimal,
    /// kg | litre
    #[schema(value_type = String)]
    pub unit: Unit,
    #[validate(custom = "validate_positive_decimal")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct TransactionResponse {
    pub id: String,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub quantity: Decimal,
    #[schema(value_type = String)]
    pub unit: Unit,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub product_name: String,
    pub product_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

impl TransactionResponse {
    pub fn new(transaction: &Transaction, product: Option<&Product>) -> Self {
        Self {
            id: transaction.id.to_hex(),
            kind: transaction.kind,
            quantity: transaction.quantity,
            unit: transaction.unit,
            price: transaction.price,
            transaction_date: transaction.transaction_date,
            product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
            product_type: product.map(|p| p.product_type.clone()).unwrap_or_default(),
            total_amount: transaction.total_amount(),
        }
    }
}
