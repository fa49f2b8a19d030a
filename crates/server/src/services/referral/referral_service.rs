use super::tree::{ReferralTree, ReferralTreeResolver};
use async_trait::async_trait;
use database::{
    referral::{
        model::{Referral, MAX_REFERRAL_LEVEL},
        repository::DynReferralRepository,
    },
    user::repository::DynUserRepository,
};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynReferralService = Arc<dyn ReferralServiceTrait + Send + Sync>;

#[async_trait]
pub trait ReferralServiceTrait {
    async fn create_referral(
        &self,
        referrer_id: &ObjectId,
        referred_phone: &str,
        level: i32,
        commission: Decimal,
    ) -> AppResult<ObjectId>;

    async fn list_referral_tree(&self, root_id: &ObjectId) -> AppResult<ReferralTree>;
}

#[derive(Clone)]
pub struct ReferralService {
    users: DynUserRepository,
    referrals: DynReferralRepository,
    resolver: ReferralTreeResolver,
}

impl ReferralService {
    pub fn new(users: DynUserRepository, referrals: DynReferralRepository) -> Self {
        let resolver = ReferralTreeResolver::new(users.clone(), referrals.clone());
        Self {
            users,
            referrals,
            resolver,
        }
    }
}

fn checked_level(level: i32) -> AppResult<u8> {
    u8::try_from(level)
        .ok()
        .filter(|level| (1..=MAX_REFERRAL_LEVEL).contains(level))
        .ok_or_else(|| AppError::BadRequest(format!("Referral level must be 1..={}, got {}", MAX_REFERRAL_LEVEL, level)))
}

#[async_trait]
impl ReferralServiceTrait for ReferralService {
    async fn create_referral(
        &self,
        referrer_id: &ObjectId,
        referred_phone: &str,
        level: i32,
        commission: Decimal,
    ) -> AppResult<ObjectId> {
        let level = checked_level(level)?;
        if commission.is_sign_negative() && !commission.is_zero() {
            return Err(AppError::BadRequest("Commission must not be negative".to_string()));
        }

        let referred_phone = referred_phone.trim();
        let referred_id = self
            .users
            .resolve_phone(referred_phone)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Referred user {} not found", referred_phone)))?;

        if referred_id == *referrer_id {
            return Err(AppError::BadRequest("Cannot refer yourself".to_string()));
        }

        if self.referrals.find_referral(referrer_id, &referred_id).await?.is_some() {
            return Err(AppError::Conflict("Referral already exists".to_string()));
        }

        let referral = Referral::new(*referrer_id, referred_id, level, commission);
        let id = match self.referrals.insert_referral(referral).await {
            Ok(id) => id,
            // 并发创建同一对关系，由唯一索引兜底
            Err(AppError::Conflict(_)) => return Err(AppError::Conflict("Referral already exists".to_string())),
            Err(err) => return Err(err),
        };

        info!(
            "🤝 新推荐关系: {} -> {} (level {}, commission {})",
            referrer_id, referred_id, level, commission
        );
        Ok(id)
    }

    async fn list_referral_tree(&self, root_id: &ObjectId) -> AppResult<ReferralTree> {
        self.resolver.resolve(root_id).await
    }
}
