use crate::dtos::transaction_dto::TransactionResponse;
use async_trait::async_trait;
use chrono::Utc;
use database::product::{
    model::{Transaction, TransactionKind, Unit},
    repository::DynProductRepository,
};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use utils::{AppError, AppResult};

pub type DynTransactionService = Arc<dyn TransactionServiceTrait + Send + Sync>;

/// 新交易的输入
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub product_id: ObjectId,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub unit: Unit,
    pub price: Decimal,
}

#[async_trait]
pub trait TransactionServiceTrait {
    async fn create_transaction(&self, user_id: &ObjectId, input: NewTransaction) -> AppResult<ObjectId>;

    async fn list_transactions(&self, user_id: &ObjectId) -> AppResult<Vec<TransactionResponse>>;
}

#[derive(Clone)]
pub struct TransactionService {
    repository: DynProductRepository,
}

impl TransactionService {
    pub fn new(repository: DynProductRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(&self, user_id: &ObjectId, input: NewTransaction) -> AppResult<ObjectId> {
        if input.quantity <= Decimal::ZERO || input.price <= Decimal::ZERO {
            return Err(AppError::BadRequest("Quantity and price must be positive".to_string()));
        }

        if self.repository.get_product(&input.product_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Invalid product: {}", input.product_id)));
        }

        let transaction = Transaction {
            id: ObjectId::new(),
            user_id: *user_id,
            product_id: input.product_id,
            kind: input.kind,
            quantity: input.quantity,
            unit: input.unit,
            price: input.price,
            transaction_date: Utc::now(),
        };
        let id = self.repository.create_transaction(transaction).await?;
        info!("🥛 新交易: user={} {:?} {} {:?}", user_id, input.kind, input.quantity, input.unit);

        Ok(id)
    }

    async fn list_transactions(&self, user_id: &ObjectId) -> AppResult<Vec<TransactionResponse>> {
        let transactions = self.repository.list_transactions(user_id).await?;
        if transactions.is_empty() {
            return Ok(vec![]);
        }

        let products: HashMap<_, _> = self
            .repository
            .list_products()
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(transactions
            .iter()
            .map(|tx| TransactionResponse::new(tx, products.get(&tx.product_id)))
            .collect())
    }
}
