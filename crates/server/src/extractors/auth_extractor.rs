use crate::{
    auth::{AuthUser, IdentityVerifier, TokenExtractor},
    services::Services,
};
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use database::user::model::User;
use std::sync::Arc;
use tracing::debug;
use utils::AppError;

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let verifier = parts
            .extensions
            .get::<Arc<IdentityVerifier>>()
            .cloned()
            .ok_or_else(|| AppError::InternalServerErrorWithContext("identity verifier not configured".to_string()))?;

        let header = parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
        let token = TokenExtractor::extract_bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        verifier.verify(&token)
    }
}

fn services_from(parts: &Parts) -> Result<Services, AppError> {
    parts
        .extensions
        .get::<Services>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerErrorWithContext("services not configured".to_string()))
}

/// 已注册的当前用户
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let services = services_from(parts)?;

        match services.user.get_user_by_phone(&auth.phone).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::NotFound(format!("User with phone {} not registered", auth.phone))),
        }
    }
}

/// 管理员：令牌中的手机号必须对应 is_admin 用户
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let services = services_from(parts)?;

        match services.user.get_user_by_phone(&auth.phone).await? {
            Some(user) if user.is_admin => Ok(AdminUser(user)),
            _ => {
                debug!("⛔ 非管理员访问: {}", auth.phone);
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        }
    }
}
