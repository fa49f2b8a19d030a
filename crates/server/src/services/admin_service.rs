use crate::dtos::admin_dto::{
    AdminUserResponse, CreateProductDto, CreateProjectDto, DashboardStatsResponse, ProductResponse, ProjectResponse,
};
use async_trait::async_trait;
use chrono::Utc;
use database::{
    product::{model::Product, repository::DynProductRepository},
    project::{
        model::{Project, ProjectStatus},
        repository::DynProjectRepository,
    },
    referral::repository::DynReferralRepository,
    user::{model::KycStatus, repository::DynUserRepository},
};
use futures::{stream, StreamExt, TryStreamExt};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

/// 用户列表聚合时同时在途的用户数
const USER_STATS_CONCURRENCY: usize = 8;

pub type DynAdminService = Arc<dyn AdminServiceTrait + Send + Sync>;

#[async_trait]
pub trait AdminServiceTrait {
    async fn dashboard(&self) -> AppResult<DashboardStatsResponse>;

    async fn list_users(&self) -> AppResult<Vec<AdminUserResponse>>;

    /// 仅允许 approved / rejected
    async fn update_kyc_status(&self, user_id: &ObjectId, status: KycStatus) -> AppResult<()>;

    async fn create_product(&self, request: CreateProductDto) -> AppResult<ObjectId>;

    async fn list_products(&self) -> AppResult<Vec<ProductResponse>>;

    async fn create_project(&self, request: CreateProjectDto) -> AppResult<ObjectId>;

    async fn list_projects(&self) -> AppResult<Vec<ProjectResponse>>;
}

#[derive(Clone)]
pub struct AdminService {
    users: DynUserRepository,
    referrals: DynReferralRepository,
    projects: DynProjectRepository,
    products: DynProductRepository,
}

impl AdminService {
    pub fn new(
        users: DynUserRepository,
        referrals: DynReferralRepository,
        projects: DynProjectRepository,
        products: DynProductRepository,
    ) -> Self {
        Self {
            users,
            referrals,
            projects,
            products,
        }
    }
}

#[async_trait]
impl AdminServiceTrait for AdminService {
    async fn dashboard(&self) -> AppResult<DashboardStatsResponse> {
        let (total_users, pending_kyc, total_investments, total_products) = tokio::try_join!(
            self.users.count_users(None),
            self.users.count_users(Some(KycStatus::Pending)),
            self.projects.sum_investments(None),
            self.products.count_products(),
        )?;

        Ok(DashboardStatsResponse {
            total_users,
            pending_kyc,
            total_investments,
            total_products,
        })
    }

    async fn list_users(&self) -> AppResult<Vec<AdminUserResponse>> {
        let users = self.users.list_users().await?;

        stream::iter(users)
            .map(|user| async move {
                let (total_invested, total_referrals) = tokio::try_join!(
                    self.projects.sum_investments(Some(&user.id)),
                    self.referrals.count_referrals_from(&user.id),
                )?;
                Ok::<_, AppError>(AdminUserResponse::new(user, total_invested, total_referrals))
            })
            .buffered(USER_STATS_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn update_kyc_status(&self, user_id: &ObjectId, status: KycStatus) -> AppResult<()> {
        if !matches!(status, KycStatus::Approved | KycStatus::Rejected) {
            return Err(AppError::BadRequest(format!(
                "KYC status must be approved or rejected, got {}",
                status
            )));
        }

        if !self.users.update_kyc_status(user_id, status).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        info!("🪪 KYC 状态更新: user={} status={}", user_id, status);
        Ok(())
    }

    async fn create_product(&self, request: CreateProductDto) -> AppResult<ObjectId> {
        let product = Product {
            id: ObjectId::new(),
            name: request.name.trim().to_string(),
            product_type: request.product_type.trim().to_string(),
            price: request.price,
        };

        self.products.create_product(product).await
    }

    async fn list_products(&self) -> AppResult<Vec<ProductResponse>> {
        let products = self.products.list_products().await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    async fn create_project(&self, request: CreateProjectDto) -> AppResult<ObjectId> {
        if !request.max_investment.is_zero() && request.max_investment < request.min_investment {
            return Err(AppError::BadRequest(
                "max_investment must be zero or not less than min_investment".to_string(),
            ));
        }

        let project = Project {
            id: ObjectId::new(),
            name: request.name.trim().to_string(),
            description: request.description,
            lock_days: request.lock_days,
            profit_percent: request.profit_percent,
            min_investment: request.min_investment,
            max_investment: request.max_investment,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };

        let id = self.projects.create_project(project).await?;
        info!("📈 新项目创建: {}", id);
        Ok(id)
    }

    async fn list_projects(&self) -> AppResult<Vec<ProjectResponse>> {
        let projects = self.projects.list_projects().await?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }
}
