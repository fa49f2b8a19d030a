use crate::user::model::KycStatus;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 用户上传的 KYC 证件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub document_url: String,
    pub status: KycStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub uploaded_at: DateTime<Utc>,
}

impl KycDocument {
    pub fn pending(user_id: ObjectId, document_url: &str) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            document_url: document_url.trim().to_string(),
            status: KycStatus::Pending,
            uploaded_at: Utc::now(),
        }
    }
}
