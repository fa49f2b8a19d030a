use crate::{
    dtos::{
        investment_dto::{CreateInvestmentDto, InvestmentResponse},
        parse_object_id, CreatedResponse,
    },
    extractors::{auth_extractor::CurrentUser, validation_extractor::ValidationExtractor},
    services::Services,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use utils::AppResult;

/// 创建投资
///
/// 项目必须存在且处于 active 状态，金额需在项目的上下限之内(上限为 0 表示不限)。
#[utoipa::path(
    post,
    path = "/api/v1/investments",
    tag = "investments",
    security(("bearer" = [])),
    request_body = CreateInvestmentDto,
    responses(
        (status = 201, description = "投资创建成功", body = CreatedResponse),
        (status = 400, description = "项目无效或金额超出范围")
    )
)]
pub async fn create_investment(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
    ValidationExtractor(req): ValidationExtractor<CreateInvestmentDto>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let project_id = parse_object_id(&req.project_id, "project_id")?;
    let id = services
        .investment
        .create_investment(&user.id, &project_id, req.amount, req.reinvest)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(&id, "Investment created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/investments",
    tag = "investments",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "当前用户的投资，最新的在前", body = Vec<InvestmentResponse>)
    )
)]
pub async fn list_investments(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<InvestmentResponse>>> {
    Ok(Json(services.investment.list_investments(&user.id).await?))
}

pub struct InvestmentController;
impl InvestmentController {
    pub fn app() -> Router {
        Router::new().route("/", get(list_investments).post(create_investment))
    }
}
