use crate::{
    dtos::{
        parse_object_id,
        transaction_dto::{CreateTransactionDto, TransactionResponse},
        CreatedResponse,
    },
    extractors::{auth_extractor::CurrentUser, validation_extractor::ValidationExtractor},
    services::{transaction_service::NewTransaction, Services},
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use utils::AppResult;

/// 记录一笔商品买卖
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    security(("bearer" = [])),
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "交易创建成功", body = CreatedResponse),
        (status = 400, description = "商品无效或参数错误")
    )
)]
pub async fn create_transaction(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
    ValidationExtractor(req): ValidationExtractor<CreateTransactionDto>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let input = NewTransaction {
        product_id: parse_object_id(&req.product_id, "product_id")?,
        kind: req.kind,
        quantity: req.quantity,
        unit: req.unit,
        price: req.price,
    };
    let id = services.transaction.create_transaction(&user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(&id, "Transaction created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "当前用户的交易，最新的在前", body = Vec<TransactionResponse>)
    )
)]
pub async fn list_transactions(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<TransactionResponse>>> {
    Ok(Json(services.transaction.list_transactions(&user.id).await?))
}

pub struct TransactionController;
impl TransactionController {
    pub fn app() -> Router {
        Router::new().route("/", get(list_transactions).post(create_transaction))
    }
}
