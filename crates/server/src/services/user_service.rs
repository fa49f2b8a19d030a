use async_trait::async_trait;
use database::user::{model::User, repository::DynUserRepository};
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

#[async_trait]
pub trait UserServiceTrait {
    /// 按手机号注册；已存在则直接返回已有用户
    async fn register(&self, phone: &str, name: Option<String>, email: Option<String>) -> AppResult<User>;

    async fn get_user_by_phone(&self, phone: &str) -> AppResult<Option<User>>;
}

#[derive(Clone)]
pub struct UserService {
    repository: DynUserRepository,
}

impl UserService {
    pub fn new(repository: DynUserRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, phone: &str, name: Option<String>, email: Option<String>) -> AppResult<User> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AppError::BadRequest("Phone number is required".to_string()));
        }

        if let Some(user) = self.repository.get_user_by_phone(phone).await? {
            return Ok(user);
        }

        match self.repository.create_user(User::new(phone, name, email)).await {
            Ok(user) => {
                info!("✅ 新用户注册: {}", user.phone);
                Ok(user)
            }
            // 并发注册同一手机号：以先写入者为准
            Err(AppError::Conflict(_)) => self
                .repository
                .get_user_by_phone(phone)
                .await?
                .ok_or_else(|| AppError::InternalServerErrorWithContext(format!("user {} vanished after conflict", phone))),
            Err(err) => Err(err),
        }
    }

    async fn get_user_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        self.repository.get_user_by_phone(phone.trim()).await
    }
}
