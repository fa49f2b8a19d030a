////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain单独一个Service
// 2. Service 只依赖 repository trait(Dyn*Repository)，不直接依赖 Database
//    - 生产环境注入 Database
//    - 测试注入内存实现
//
//////////////////////////////////////////////////////////////////////

pub mod admin_service;
pub mod investment_service;
pub mod kyc_service;
pub mod referral;
pub mod transaction_service;
pub mod user_service;

use admin_service::{AdminService, DynAdminService};
use database::{
    kyc::repository::DynKycRepository, product::repository::DynProductRepository,
    project::repository::DynProjectRepository, referral::repository::DynReferralRepository,
    user::repository::DynUserRepository, Database,
};
use investment_service::{DynInvestmentService, InvestmentService};
use kyc_service::{DynKycService, KycService};
use referral::referral_service::{DynReferralService, ReferralService};
use std::sync::Arc;
use tracing::info;
use transaction_service::{DynTransactionService, TransactionService};
use user_service::{DynUserService, UserService};

#[derive(Clone)]
pub struct Services {
    pub user: DynUserService,
    pub kyc: DynKycService,
    pub investment: DynInvestmentService,
    pub transaction: DynTransactionService,
    pub referral: DynReferralService,
    pub admin: DynAdminService,
}

impl Services {
    pub fn new(db: Database) -> Self {
        let database = Arc::new(db);

        let services = Self::with_repositories(
            database.clone(),
            database.clone(),
            database.clone(),
            database.clone(),
            database,
        );

        info!("🧠 Services initialized");
        services
    }

    pub fn with_repositories(
        users: DynUserRepository,
        referrals: DynReferralRepository,
        kyc: DynKycRepository,
        projects: DynProjectRepository,
        products: DynProductRepository,
    ) -> Self {
        let user = Arc::new(UserService::new(users.clone())) as DynUserService;
        let kyc_service = Arc::new(KycService::new(kyc)) as DynKycService;
        let investment = Arc::new(InvestmentService::new(projects.clone())) as DynInvestmentService;
        let transaction = Arc::new(TransactionService::new(products.clone())) as DynTransactionService;
        let referral = Arc::new(ReferralService::new(users.clone(), referrals.clone())) as DynReferralService;
        let admin = Arc::new(AdminService::new(users, referrals, projects, products)) as DynAdminService;

        Self {
            user,
            kyc: kyc_service,
            investment,
            transaction,
            referral,
            admin,
        }
    }
}
