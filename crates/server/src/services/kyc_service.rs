use async_trait::async_trait;
use database::kyc::{model::KycDocument, repository::DynKycRepository};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynKycService = Arc<dyn KycServiceTrait + Send + Sync>;

#[async_trait]
pub trait KycServiceTrait {
    async fn upload_document(&self, user_id: &ObjectId, document_url: &str) -> AppResult<ObjectId>;

    async fn list_documents(&self, user_id: &ObjectId) -> AppResult<Vec<KycDocument>>;
}

#[derive(Clone)]
pub struct KycService {
    repository: DynKycRepository,
}

impl KycService {
    pub fn new(repository: DynKycRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl KycServiceTrait for KycService {
    async fn upload_document(&self, user_id: &ObjectId, document_url: &str) -> AppResult<ObjectId> {
        let document_url = document_url.trim();
        if document_url.is_empty() {
            return Err(AppError::BadRequest("document_url is required".to_string()));
        }

        let id = self
            .repository
            .create_document(KycDocument::pending(*user_id, document_url))
            .await?;
        info!("📄 KYC 文档已提交: user={} doc={}", user_id, id);

        Ok(id)
    }

    async fn list_documents(&self, user_id: &ObjectId) -> AppResult<Vec<KycDocument>> {
        self.repository.list_documents(user_id).await
    }
}
