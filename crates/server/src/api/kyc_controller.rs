use crate::{
    dtos::{
        kyc_dto::{KycDocumentResponse, UploadKycDocumentDto},
        MessageResponse,
    },
    extractors::{auth_extractor::CurrentUser, validation_extractor::ValidationExtractor},
    services::Services,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use utils::AppResult;

/// 上传 KYC 文档(状态为 pending)
#[utoipa::path(
    post,
    path = "/api/v1/kyc/documents",
    tag = "kyc",
    security(("bearer" = [])),
    request_body = UploadKycDocumentDto,
    responses(
        (status = 201, description = "文档已提交", body = MessageResponse),
        (status = 400, description = "document_url 为空"),
        (status = 404, description = "用户未注册")
    )
)]
pub async fn upload_document(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
    ValidationExtractor(req): ValidationExtractor<UploadKycDocumentDto>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services.kyc.upload_document(&user.id, &req.document_url).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("KYC document uploaded successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/kyc/documents",
    tag = "kyc",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "当前用户的 KYC 文档", body = Vec<KycDocumentResponse>)
    )
)]
pub async fn list_documents(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<KycDocumentResponse>>> {
    let documents = services.kyc.list_documents(&user.id).await?;

    Ok(Json(documents.into_iter().map(KycDocumentResponse::from).collect()))
}

pub struct KycController;
impl KycController {
    pub fn app() -> Router {
        Router::new().route("/documents", get(list_documents).post(upload_document))
    }
}
