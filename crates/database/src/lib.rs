////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的数据库底层操作(trait + Database实现)
//
//////////////////////////////////////////////////////////////////////

use mongodb::{
    bson::doc,
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

pub mod kyc;
pub mod product;
pub mod project;
pub mod referral;
pub mod user;

#[derive(Clone, Debug)]
pub struct Database {
    pub users: Collection<user::model::User>,
    pub referrals: Collection<referral::model::Referral>,
    pub kyc_documents: Collection<kyc::model::KycDocument>,
    pub projects: Collection<project::model::Project>,
    pub investments: Collection<project::model::Investment>,
    pub products: Collection<product::model::Product>,
    pub transactions: Collection<product::model::Transaction>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let database = Database {
            users: db.collection("User"),
            referrals: db.collection("Referral"),
            kyc_documents: db.collection("KycDocument"),
            projects: db.collection("Project"),
            investments: db.collection("Investment"),
            products: db.collection("Product"),
            transactions: db.collection("Transaction"),
        };

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        Ok(database)
    }

    /// 初始化索引；唯一索引是并发写入下去重的最终保障
    pub async fn init_indexes(&self) -> AppResult<()> {
        info!("🔧 初始化数据库索引...");

        // 手机号唯一
        self.users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "phone": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                None,
            )
            .await?;

        let referral_indexes = vec![
            // 同一对 (推荐人, 被推荐人) 只允许一条关系
            IndexModel::builder()
                .keys(doc! { "referrer_id": 1, "referred_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            // edges_from 查询
            IndexModel::builder()
                .keys(doc! { "referrer_id": 1, "created_at": 1 })
                .build(),
        ];
        self.referrals.create_indexes(referral_indexes, None).await?;

        self.kyc_documents
            .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build(), None)
            .await?;
        self.investments
            .create_index(
                IndexModel::builder().keys(doc! { "user_id": 1, "invested_at": -1 }).build(),
                None,
            )
            .await?;
        self.transactions
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "transaction_date": -1 })
                    .build(),
                None,
            )
            .await?;

        info!("✅ 数据库索引初始化完成");
        Ok(())
    }
}
