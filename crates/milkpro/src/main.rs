use anyhow::{Context, Result};
use clap::Parser;
use server::app::ApplicationServer;
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<()> {
    let config = with_config();

    // guard 需存活到进程退出，否则文件日志会丢失
    let _guard = Logger::init(&config);
    info!("🔧 milkpro starting (env={:?}, db={})", config.cargo_env, config.mongo_db);

    ApplicationServer::serve(config)
        .await
        .context("🔴 Failed to start server")?;

    info!("👋 milkpro stopped");
    Ok(())
}

fn with_config() -> Arc<AppConfig> {
    // 根据 CARGO_ENV 加载对应的环境配置文件
    utils::EnvLoader::load_env_file().ok();
    Arc::new(AppConfig::parse())
}
