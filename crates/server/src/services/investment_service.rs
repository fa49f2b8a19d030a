use crate::dtos::investment_dto::InvestmentResponse;
use async_trait::async_trait;
use database::project::{
    model::{Investment, ProjectStatus},
    repository::DynProjectRepository,
};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use utils::{AppError, AppResult};

pub type DynInvestmentService = Arc<dyn InvestmentServiceTrait + Send + Sync>;

#[async_trait]
pub trait InvestmentServiceTrait {
    async fn create_investment(
        &self,
        user_id: &ObjectId,
        project_id: &ObjectId,
        amount: Decimal,
        reinvest: bool,
    ) -> AppResult<ObjectId>;

    /// 最新的在前
    async fn list_investments(&self, user_id: &ObjectId) -> AppResult<Vec<InvestmentResponse>>;
}

#[derive(Clone)]
pub struct InvestmentService {
    repository: DynProjectRepository,
}

impl InvestmentService {
    pub fn new(repository: DynProjectRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_investment(
        &self,
        user_id: &ObjectId,
        project_id: &ObjectId,
        amount: Decimal,
        reinvest: bool,
    ) -> AppResult<ObjectId> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BadRequest("Investment amount must be positive".to_string()));
        }

        let project = self
            .repository
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Invalid project: {}", project_id)))?;

        if project.status != ProjectStatus::Active {
            return Err(AppError::BadRequest(format!("Project {} is not open for investment", project.name)));
        }

        if !project.accepts_amount(amount) {
            let message = if project.max_investment.is_zero() {
                format!("Amount must be at least {}", project.min_investment)
            } else {
                format!(
                    "Amount must be between {} and {}",
                    project.min_investment, project.max_investment
                )
            };
            return Err(AppError::BadRequest(message));
        }

        let investment = Investment::new(*user_id, &project, amount, reinvest);
        let id = self.repository.create_investment(investment).await?;
        info!("💰 新投资: user={} project={} amount={}", user_id, project.name, amount);

        Ok(id)
    }

    async fn list_investments(&self, user_id: &ObjectId) -> AppResult<Vec<InvestmentResponse>> {
        let investments = self.repository.list_investments(user_id).await?;
        if investments.is_empty() {
            return Ok(vec![]);
        }

        let project_names: HashMap<ObjectId, String> = self
            .repository
            .list_projects()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(investments
            .into_iter()
            .map(|investment| InvestmentResponse {
                id: investment.id.to_hex(),
                amount: investment.amount,
                invested_at: investment.invested_at,
                lock_end_date: investment.lock_end_date,
                profit_percent: investment.profit_percent,
                reinvest: investment.reinvest,
                project_name: project_names.get(&investment.project_id).cloned().unwrap_or_default(),
            })
            .collect())
    }
}
