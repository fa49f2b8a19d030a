use crate::{
    product::model::{Product, Transaction},
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};
use std::sync::Arc;
use utils::AppResult;

pub type DynProductRepository = Arc<dyn ProductRepositoryTrait + Send + Sync>;

// 商品 & 买卖记录
#[async_trait]
pub trait ProductRepositoryTrait {
    async fn create_product(&self, product: Product) -> AppResult<ObjectId>;

    async fn get_product(&self, id: &ObjectId) -> AppResult<Option<Product>>;

    // 按类型、名称排序
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn count_products(&self) -> AppResult<u64>;

    async fn create_transaction(&self, transaction: Transaction) -> AppResult<ObjectId>;

    // 按交易时间倒序
    async fn list_transactions(&self, user_id: &ObjectId) -> AppResult<Vec<Transaction>>;
}

#[async_trait]
impl ProductRepositoryTrait for Database {
    async fn create_product(&self, product: Product) -> AppResult<ObjectId> {
        self.products.insert_one(&product, None).await?;

        Ok(product.id)
    }

    async fn get_product(&self, id: &ObjectId) -> AppResult<Option<Product>> {
        let product = self.products.find_one(doc! { "_id": *id }, None).await?;

        Ok(product)
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "type": 1, "name": 1 }).build();
        let products: Vec<Product> = self.products.find(doc! {}, options).await?.try_collect().await?;

        Ok(products)
    }

    async fn count_products(&self) -> AppResult<u64> {
        let count = self.products.count_documents(doc! {}, None).await?;

        Ok(count)
    }

    async fn create_transaction(&self, transaction: Transaction) -> AppResult<ObjectId> {
        self.transactions.insert_one(&transaction, None).await?;

        Ok(transaction.id)
    }

    async fn list_transactions(&self, user_id: &ObjectId) -> AppResult<Vec<Transaction>> {
        let options = FindOptions::builder().sort(doc! { "transaction_date": -1 }).build();
        let transactions: Vec<Transaction> = self
            .transactions
            .find(doc! { "user_id": *user_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(transactions)
    }
}
