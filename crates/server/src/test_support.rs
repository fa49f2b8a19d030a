//! 测试用内存存储 + 令牌/服务器构造
//!
//! `MemoryStore` 实现全部 repository trait，不需要运行 MongoDB。

use crate::{
    auth::{IdentityClaims, IdentityVerifier},
    router::AppRouter,
    services::Services,
};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use database::{
    kyc::{model::KycDocument, repository::KycRepositoryTrait},
    product::{
        model::{Product, Transaction},
        repository::ProductRepositoryTrait,
    },
    project::{
        model::{Investment, Project, ProjectStatus},
        repository::ProjectRepositoryTrait,
    },
    referral::{model::Referral, repository::ReferralRepositoryTrait},
    user::{
        model::{KycStatus, User},
        repository::UserRepositoryTrait,
    },
};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use utils::{AppError, AppResult};

pub const TEST_IDENTITY_SECRET: &str = "test_identity_secret_for_unit_tests_only";

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    referrals: Mutex<Vec<Referral>>,
    kyc_documents: Mutex<Vec<KycDocument>>,
    projects: Mutex<Vec<Project>>,
    investments: Mutex<Vec<Investment>>,
    products: Mutex<Vec<Product>>,
    transactions: Mutex<Vec<Transaction>>,
    /// 每次 edges_from 调用的 referrer
    edge_queries: Mutex<Vec<ObjectId>>,
    /// edges_from 调用超过该次数后失败
    fail_edges_after: Mutex<Option<usize>>,
    unavailable: AtomicBool,
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// 固定基准时间，便于控制 created_at 顺序
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fail_edges_after(&self, calls: usize) {
        *self.fail_edges_after.lock().unwrap() = Some(calls);
    }

    pub fn edge_queries(&self) -> Vec<ObjectId> {
        self.edge_queries.lock().unwrap().clone()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn referral_count(&self) -> usize {
        self.referrals.lock().unwrap().len()
    }

    pub fn referrals(&self) -> Vec<Referral> {
        self.referrals.lock().unwrap().clone()
    }

    pub fn user(&self, id: &ObjectId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned()
    }

    pub fn add_user(&self, phone: &str, name: Option<&str>) -> ObjectId {
        let user = User::new(phone, name.map(str::to_string), None);
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    pub fn add_admin(&self, phone: &str) -> ObjectId {
        let mut user = User::new(phone, Some("Admin".to_string()), None);
        user.is_admin = true;
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    pub fn set_kyc_status(&self, id: &ObjectId, status: KycStatus) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == *id) {
            user.kyc_status = status;
        }
    }

    /// 直接写入一条推荐关系，created_at = base_time + offset 秒
    pub fn add_edge(&self, from: &ObjectId, to: &ObjectId, level: u8, commission: &str, offset_secs: i64) -> ObjectId {
        let mut edge = Referral::new(*from, *to, level, dec(commission));
        edge.created_at = base_time() + Duration::seconds(offset_secs);
        let id = edge.id;
        self.referrals.lock().unwrap().push(edge);
        id
    }

    pub fn add_project(
        &self,
        name: &str,
        lock_days: u32,
        profit_percent: &str,
        min_investment: &str,
        max_investment: &str,
        status: ProjectStatus,
    ) -> ObjectId {
        let project = Project {
            id: ObjectId::new(),
            name: name.to_string(),
            description: String::new(),
            lock_days,
            profit_percent: dec(profit_percent),
            min_investment: dec(min_investment),
            max_investment: dec(max_investment),
            status,
            created_at: Utc::now(),
        };
        let id = project.id;
        self.projects.lock().unwrap().push(project);
        id
    }

    pub fn add_investment(&self, user_id: &ObjectId, project_id: &ObjectId, amount: &str) {
        let project = self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *project_id)
            .cloned()
            .unwrap();
        let investment = Investment::new(*user_id, &project, dec(amount), false);
        self.investments.lock().unwrap().push(investment);
    }

    pub fn add_product(&self, name: &str, product_type: &str, price: &str) -> ObjectId {
        let product = Product {
            id: ObjectId::new(),
            name: name.to_string(),
            product_type: product_type.to_string(),
            price: dec(price),
        };
        let id = product.id;
        self.products.lock().unwrap().push(product);
        id
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryStore {
    async fn create_user(&self, user: User) -> AppResult<User> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.phone == user.phone) {
            return Err(AppError::Conflict(format!("duplicate key: phone {}", user.phone)));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.phone == phone).cloned())
    }

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.check()?;
        Ok(self.user(id))
    }

    async fn update_kyc_status(&self, id: &ObjectId, status: KycStatus) -> AppResult<bool> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                user.kyc_status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.check()?;
        let mut users = self.users.lock().unwrap().clone();
        users.reverse();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_users(&self, kyc_status: Option<KycStatus>) -> AppResult<u64> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| kyc_status.map_or(true, |status| u.kyc_status == status))
            .count() as u64)
    }
}

#[async_trait]
impl ReferralRepositoryTrait for MemoryStore {
    async fn insert_referral(&self, referral: Referral) -> AppResult<ObjectId> {
        self.check()?;
        let mut referrals = self.referrals.lock().unwrap();
        if referrals
            .iter()
            .any(|r| r.referrer_id == referral.referrer_id && r.referred_id == referral.referred_id)
        {
            return Err(AppError::Conflict("duplicate key: referrer_id_1_referred_id_1".to_string()));
        }
        let id = referral.id;
        referrals.push(referral);
        Ok(id)
    }

    async fn find_referral(&self, referrer_id: &ObjectId, referred_id: &ObjectId) -> AppResult<Option<Referral>> {
        self.check()?;
        Ok(self
            .referrals
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.referrer_id == *referrer_id && r.referred_id == *referred_id)
            .cloned())
    }

    async fn edges_from(&self, referrer_id: &ObjectId) -> AppResult<Vec<Referral>> {
        self.check()?;
        let calls = {
            let mut queries = self.edge_queries.lock().unwrap();
            queries.push(*referrer_id);
            queries.len()
        };
        if let Some(limit) = *self.fail_edges_after.lock().unwrap() {
            if calls > limit {
                return Err(AppError::Unavailable("edge store timed out".to_string()));
            }
        }

        let mut edges: Vec<Referral> = self
            .referrals
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.referrer_id == *referrer_id)
            .cloned()
            .collect();
        edges.sort_by_key(|r| r.created_at);
        Ok(edges)
    }

    async fn count_referrals_from(&self, referrer_id: &ObjectId) -> AppResult<u64> {
        self.check()?;
        Ok(self
            .referrals
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.referrer_id == *referrer_id)
            .count() as u64)
    }
}

#[async_trait]
impl KycRepositoryTrait for MemoryStore {
    async fn create_document(&self, document: KycDocument) -> AppResult<ObjectId> {
        self.check()?;
        let id = document.id;
        self.kyc_documents.lock().unwrap().push(document);
        Ok(id)
    }

    async fn list_documents(&self, user_id: &ObjectId) -> AppResult<Vec<KycDocument>> {
        self.check()?;
        Ok(self
            .kyc_documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == *user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectRepositoryTrait for MemoryStore {
    async fn create_project(&self, project: Project) -> AppResult<ObjectId> {
        self.check()?;
        let id = project.id;
        self.projects.lock().unwrap().push(project);
        Ok(id)
    }

    async fn get_project(&self, id: &ObjectId) -> AppResult<Option<Project>> {
        self.check()?;
        Ok(self.projects.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.check()?;
        let mut projects = self.projects.lock().unwrap().clone();
        projects.reverse();
        Ok(projects)
    }

    async fn create_investment(&self, investment: Investment) -> AppResult<ObjectId> {
        self.check()?;
        let id = investment.id;
        self.investments.lock().unwrap().push(investment);
        Ok(id)
    }

    async fn list_investments(&self, user_id: &ObjectId) -> AppResult<Vec<Investment>> {
        self.check()?;
        Ok(self
            .investments
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|i| i.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn sum_investments(&self, user_id: Option<&ObjectId>) -> AppResult<Decimal> {
        self.check()?;
        Ok(self
            .investments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| user_id.map_or(true, |id| i.user_id == *id))
            .map(|i| i.amount)
            .sum())
    }
}

#[async_trait]
impl ProductRepositoryTrait for MemoryStore {
    async fn create_product(&self, product: Product) -> AppResult<ObjectId> {
        self.check()?;
        let id = product.id;
        self.products.lock().unwrap().push(product);
        Ok(id)
    }

    async fn get_product(&self, id: &ObjectId) -> AppResult<Option<Product>> {
        self.check()?;
        Ok(self.products.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.check()?;
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| (&a.product_type, &a.name).cmp(&(&b.product_type, &b.name)));
        Ok(products)
    }

    async fn count_products(&self) -> AppResult<u64> {
        self.check()?;
        Ok(self.products.lock().unwrap().len() as u64)
    }

    async fn create_transaction(&self, transaction: Transaction) -> AppResult<ObjectId> {
        self.check()?;
        let id = transaction.id;
        self.transactions.lock().unwrap().push(transaction);
        Ok(id)
    }

    async fn list_transactions(&self, user_id: &ObjectId) -> AppResult<Vec<Transaction>> {
        self.check()?;
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect())
    }
}

pub fn services(store: &Arc<MemoryStore>) -> Services {
    Services::with_repositories(store.clone(), store.clone(), store.clone(), store.clone(), store.clone())
}

pub fn issue_token(phone: &str) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = IdentityClaims {
        sub: format!("uid-{}", phone.trim_start_matches('+')),
        phone_number: Some(phone.to_string()),
        exp: now + 3600,
        iat: now,
        iss: None,
        aud: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_IDENTITY_SECRET.as_bytes())).unwrap()
}

pub fn test_server(store: &Arc<MemoryStore>) -> TestServer {
    let verifier = Arc::new(IdentityVerifier::from_secret(TEST_IDENTITY_SECRET));
    let app = AppRouter::new(services(store), verifier, 5);
    TestServer::new(app).unwrap()
}
