use crate::{kyc::model::KycDocument, Database};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};
use std::sync::Arc;
use utils::AppResult;

pub type DynKycRepository = Arc<dyn KycRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait KycRepositoryTrait {
    async fn create_document(&self, document: KycDocument) -> AppResult<ObjectId>;

    async fn list_documents(&self, user_id: &ObjectId) -> AppResult<Vec<KycDocument>>;
}

#[async_trait]
impl KycRepositoryTrait for Database {
    async fn create_document(&self, document: KycDocument) -> AppResult<ObjectId> {
        self.kyc_documents.insert_one(&document, None).await?;

        Ok(document.id)
    }

    async fn list_documents(&self, user_id: &ObjectId) -> AppResult<Vec<KycDocument>> {
        let options = FindOptions::builder().sort(doc! { "uploaded_at": 1 }).build();
        let documents: Vec<KycDocument> = self
            .kyc_documents
            .find(doc! { "user_id": *user_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(documents)
    }
}
