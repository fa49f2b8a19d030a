use crate::{
    dtos::{
        referral_dto::{CreateReferralDto, ReferralTreeResponse},
        CreatedResponse,
    },
    extractors::{auth_extractor::CurrentUser, validation_extractor::ValidationExtractor},
    services::Services,
};
use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use utils::AppResult;

/// 创建推荐关系，调用者为推荐人
#[utoipa::path(
    post,
    path = "/api/v1/referrals",
    tag = "referrals",
    security(("bearer" = [])),
    request_body = CreateReferralDto,
    responses(
        (status = 201, description = "推荐关系创建成功", body = CreatedResponse),
        (status = 400, description = "level 不在 1..=3、佣金为负或推荐自己"),
        (status = 404, description = "被推荐手机号未注册"),
        (status = 409, description = "推荐关系已存在")
    )
)]
pub async fn create_referral(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
    ValidationExtractor(req): ValidationExtractor<CreateReferralDto>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = services
        .referral
        .create_referral(&user.id, &req.referred_phone, req.level, req.commission)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(&id, "Referral created successfully")),
    ))
}

/// 当前用户的三级推荐树
#[utoipa::path(
    get,
    path = "/api/v1/referrals",
    tag = "referrals",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "按层级、创建时间排序的推荐关系及佣金合计", body = ReferralTreeResponse),
        (status = 503, description = "存储不可用")
    )
)]
pub async fn list_referrals(
    Extension(services): Extension<Services>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ReferralTreeResponse>> {
    let tree = services.referral.list_referral_tree(&user.id).await?;

    Ok(Json(ReferralTreeResponse::from(tree)))
}

pub struct ReferralController;
impl ReferralController {
    pub fn app() -> Router {
        Router::new().route("/", get(list_referrals).post(create_referral))
    }
}
