use database::user::model::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 注册请求：手机号取自身份令牌
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
pub struct RegisterUserDto {
    #[validate(length(min = 1))]
    pub firebase_token: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct RegisterUserResponse {
    pub user_id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&User> for RegisterUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_hex(),
            phone: user.phone.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct UserProfileResponse {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
    /// none | pending | approved | rejected
    pub kyc_status: String,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            phone: user.phone,
            name: user.name,
            email: user.email,
            profile_image_url: user.profile_image_url,
            kyc_status: user.kyc_status.to_string(),
        }
    }
}
