use chrono::{DateTime, Utc};
use database::kyc::model::KycDocument;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
pub struct UploadKycDocumentDto {
    #[validate(length(min = 1, max = 2048))]
    pub document_url: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct KycDocumentResponse {
    pub id: String,
    pub document_url: String,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<KycDocument> for KycDocumentResponse {
    fn from(document: KycDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            document_url: document.document_url,
            status: document.status.to_string(),
            uploaded_at: document.uploaded_at,
        }
    }
}
