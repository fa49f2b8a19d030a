use crate::{referral::model::Referral, Database};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};
use std::sync::Arc;
use utils::AppResult;

pub type DynReferralRepository = Arc<dyn ReferralRepositoryTrait + Send + Sync>;

// 推荐关系存储，唯一性由 (referrer_id, referred_id) 唯一索引保证
#[async_trait]
pub trait ReferralRepositoryTrait {
    // 唯一索引冲突时返回 AppError::Conflict
    async fn insert_referral(&self, referral: Referral) -> AppResult<ObjectId>;

    async fn find_referral(&self, referrer_id: &ObjectId, referred_id: &ObjectId) -> AppResult<Option<Referral>>;

    // 某个用户直接推荐的所有关系，按创建时间升序
    async fn edges_from(&self, referrer_id: &ObjectId) -> AppResult<Vec<Referral>>;

    async fn count_referrals_from(&self, referrer_id: &ObjectId) -> AppResult<u64>;
}

#[async_trait]
impl ReferralRepositoryTrait for Database {
    async fn insert_referral(&self, referral: Referral) -> AppResult<ObjectId> {
        self.referrals.insert_one(&referral, None).await?;

        Ok(referral.id)
    }

    async fn find_referral(&self, referrer_id: &ObjectId, referred_id: &ObjectId) -> AppResult<Option<Referral>> {
        let filter = doc! { "referrer_id": *referrer_id, "referred_id": *referred_id };
        let referral = self.referrals.find_one(filter, None).await?;

        Ok(referral)
    }

    async fn edges_from(&self, referrer_id: &ObjectId) -> AppResult<Vec<Referral>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1, "_id": 1 })
            .build();
        let edges: Vec<Referral> = self
            .referrals
            .find(doc! { "referrer_id": *referrer_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(edges)
    }

    async fn count_referrals_from(&self, referrer_id: &ObjectId) -> AppResult<u64> {
        let count = self
            .referrals
            .count_documents(doc! { "referrer_id": *referrer_id }, None)
            .await?;

        Ok(count)
    }
}
