use crate::auth::models::{AuthUser, IdentityClaims};
use anyhow::{anyhow, Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::warn;
use utils::{AppConfig, AppError, AppResult};

/// 身份令牌校验器
///
/// 支持 HS256 共享密钥(开发/测试)与 RS256 公钥(身份提供方签发)两种模式，
/// 可选校验 iss / aud。
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem).map_err(|e| anyhow!("Invalid RSA public key: {}", e))?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// 按配置构建：RS256 公钥优先，其次 HS256 密钥
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let verifier = match (&config.identity_public_key_pem, &config.identity_jwt_secret) {
            (Some(path), _) => {
                let pem = std::fs::read(path).with_context(|| format!("Failed to read identity public key {}", path))?;
                Self::from_rsa_pem(&pem)?
            }
            (None, Some(secret)) => Self::from_secret(secret),
            (None, None) => {
                return Err(anyhow!(
                    "Either IDENTITY_PUBLIC_KEY_PEM or IDENTITY_JWT_SECRET must be configured"
                ))
            }
        };

        let verifier = match &config.identity_issuer {
            Some(issuer) => verifier.with_issuer(issuer),
            None => verifier,
        };

        Ok(match &config.identity_audience {
            Some(audience) => verifier.with_audience(audience),
            None => verifier,
        })
    }

    /// 验证令牌，要求携带手机号
    pub fn verify(&self, token: &str) -> AppResult<AuthUser> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token verification failed: {}", e);
            AppError::Unauthorized("Invalid identity token".to_string())
        })?;

        let claims = token_data.claims;
        match claims.phone_number {
            Some(phone) if !phone.trim().is_empty() => Ok(AuthUser {
                uid: claims.sub,
                phone: phone.trim().to_string(),
            }),
            _ => Err(AppError::Unauthorized(
                "Identity token has no phone_number claim".to_string(),
            )),
        }
    }
}

pub struct TokenExtractor;

impl TokenExtractor {
    /// 从Authorization头部提取Bearer令牌
    pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<String> {
        auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}
