use serde::{Deserialize, Serialize};

/// 身份令牌 Claims (Firebase ID token 兼容)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// 身份提供方的用户UID
    pub sub: String,
    /// 已验证的手机号
    #[serde(default)]
    pub phone_number: Option<String>,
    /// 过期时间
    pub exp: u64,
    /// 签发时间
    #[serde(default)]
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// 通过令牌认证的调用者(尚未确认是否已注册)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub phone: String,
}
