use crate::{
    project::model::{Investment, Project},
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use utils::AppResult;

pub type DynProjectRepository = Arc<dyn ProjectRepositoryTrait + Send + Sync>;

// 项目 & 投资
#[async_trait]
pub trait ProjectRepositoryTrait {
    async fn create_project(&self, project: Project) -> AppResult<ObjectId>;

    async fn get_project(&self, id: &ObjectId) -> AppResult<Option<Project>>;

    // 按创建时间倒序
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    async fn create_investment(&self, investment: Investment) -> AppResult<ObjectId>;

    // 按投资时间倒序
    async fn list_investments(&self, user_id: &ObjectId) -> AppResult<Vec<Investment>>;

    // user_id 为空时统计全部
    async fn sum_investments(&self, user_id: Option<&ObjectId>) -> AppResult<Decimal>;
}

#[async_trait]
impl ProjectRepositoryTrait for Database {
    async fn create_project(&self, project: Project) -> AppResult<ObjectId> {
        self.projects.insert_one(&project, None).await?;

        Ok(project.id)
    }

    async fn get_project(&self, id: &ObjectId) -> AppResult<Option<Project>> {
        let project = self.projects.find_one(doc! { "_id": *id }, None).await?;

        Ok(project)
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let projects: Vec<Project> = self.projects.find(doc! {}, options).await?.try_collect().await?;

        Ok(projects)
    }

    async fn create_investment(&self, investment: Investment) -> AppResult<ObjectId> {
        self.investments.insert_one(&investment, None).await?;

        Ok(investment.id)
    }

    async fn list_investments(&self, user_id: &ObjectId) -> AppResult<Vec<Investment>> {
        let options = FindOptions::builder().sort(doc! { "invested_at": -1 }).build();
        let investments: Vec<Investment> = self
            .investments
            .find(doc! { "user_id": *user_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(investments)
    }

    async fn sum_investments(&self, user_id: Option<&ObjectId>) -> AppResult<Decimal> {
        // 金额以十进制字符串存储，无法在库内 $sum，取回后精确求和
        let filter = match user_id {
            Some(id) => doc! { "user_id": *id },
            None => doc! {},
        };
        let investments: Vec<Investment> = self.investments.find(filter, None).await?.try_collect().await?;

        Ok(investments.iter().map(|i| i.amount).sum())
    }
}
