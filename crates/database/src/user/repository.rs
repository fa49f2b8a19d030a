use crate::{
    user::model::{KycStatus, User},
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};
use std::sync::Arc;
use utils::{AppError, AppResult};

pub type DynUserRepository = Arc<dyn UserRepositoryTrait + Send + Sync>;

// 用户目录：手机号 <-> 用户ID
#[async_trait]
pub trait UserRepositoryTrait {
    // 注册新用户(手机号唯一)
    async fn create_user(&self, user: User) -> AppResult<User>;

    async fn get_user_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    // 手机号解析为用户ID
    async fn resolve_phone(&self, phone: &str) -> AppResult<Option<ObjectId>> {
        Ok(self.get_user_by_phone(phone).await?.map(|u| u.id))
    }

    async fn exists(&self, id: &ObjectId) -> AppResult<bool> {
        Ok(self.get_user_by_id(id).await?.is_some())
    }

    // 返回是否命中了用户
    async fn update_kyc_status(&self, id: &ObjectId, status: KycStatus) -> AppResult<bool>;

    // 按注册时间倒序
    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn count_users(&self, kyc_status: Option<KycStatus>) -> AppResult<u64>;
}

#[async_trait]
impl UserRepositoryTrait for Database {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let existing_user = self.users.find_one(doc! { "phone": user.phone.as_str() }, None).await?;

        if existing_user.is_some() {
            return Err(AppError::Conflict(format!(
                "User with phone: {} already exists.",
                user.phone
            )));
        }

        self.users.insert_one(&user, None).await?;

        Ok(user)
    }

    async fn get_user_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        let user = self.users.find_one(doc! { "phone": phone.trim() }, None).await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.users.find_one(doc! { "_id": *id }, None).await?;

        Ok(user)
    }

    async fn exists(&self, id: &ObjectId) -> AppResult<bool> {
        let count = self.users.count_documents(doc! { "_id": *id }, None).await?;

        Ok(count > 0)
    }

    async fn update_kyc_status(&self, id: &ObjectId, status: KycStatus) -> AppResult<bool> {
        let result = self
            .users
            .update_one(doc! { "_id": *id }, doc! { "$set": { "kyc_status": status.as_str() } }, None)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let users: Vec<User> = self.users.find(doc! {}, options).await?.try_collect().await?;

        Ok(users)
    }

    async fn count_users(&self, kyc_status: Option<KycStatus>) -> AppResult<u64> {
        let filter = match kyc_status {
            Some(status) => doc! { "kyc_status": status.as_str() },
            None => doc! {},
        };
        let count = self.users.count_documents(filter, None).await?;

        Ok(count)
    }
}
