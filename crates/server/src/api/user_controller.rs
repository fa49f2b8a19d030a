use crate::{
    auth::IdentityVerifier,
    dtos::user_dto::{RegisterUserDto, RegisterUserResponse, UserProfileResponse},
    extractors::{auth_extractor::CurrentUser, validation_extractor::ValidationExtractor},
    services::Services,
};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utils::AppResult;

/// 注册用户
///
/// 校验身份令牌并以其中的手机号注册；手机号已注册时返回已有用户。
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = RegisterUserDto,
    responses(
        (status = 200, description = "注册成功或已注册", body = RegisterUserResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "身份令牌无效")
    )
)]
pub async fn register(
    Extension(services): Extension<Services>,
    Extension(verifier): Extension<Arc<IdentityVerifier>>,
    ValidationExtractor(req): ValidationExtractor<RegisterUserDto>,
) -> AppResult<Json<RegisterUserResponse>> {
    let identity = verifier.verify(&req.firebase_token)?;
    let user = services.user.register(&identity.phone, req.name, req.email).await?;

    Ok(Json(RegisterUserResponse::from(&user)))
}

/// 当前用户资料
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "用户资料", body = UserProfileResponse),
        (status = 401, description = "未认证"),
        (status = 404, description = "用户未注册")
    )
)]
pub async fn profile(CurrentUser(user): CurrentUser) -> AppResult<Json<UserProfileResponse>> {
    Ok(Json(UserProfileResponse::from(user)))
}

pub struct UserController;
impl UserController {
    pub fn app() -> Router {
        Router::new()
            .route("/register", post(register))
            .route("/profile", get(profile))
    }
}
