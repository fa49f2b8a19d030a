use crate::{auth::IdentityVerifier, router::AppRouter, services::Services};
use anyhow::Context;
use axum::serve;
use database::Database;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use utils::AppConfig;

pub struct ApplicationServer;

impl ApplicationServer {
    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        // 日志已在 milkpro/src/main.rs 中初始化

        let address = format!("{}:{}", config.app_host, config.app_port);
        let tcp_listener = tokio::net::TcpListener::bind(address)
            .await
            .context("🔴 Failed to bind TCP listener")?;

        let local_addr = tcp_listener.local_addr().context("🔴 Failed to get local address")?;

        let verifier = IdentityVerifier::from_config(&config).context("🔴 Failed to configure identity verifier")?;

        let db = Self::connect_database(config.clone()).await?;
        let services = Services::new(db);
        let router = AppRouter::new(services, Arc::new(verifier), config.http_timeout_secs);

        info!("🟢 server:milkpro has launched on {local_addr} 🚀");

        serve(tcp_listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("🔴 Failed to start server")?;

        Ok(())
    }

    /// 连接并建索引；推荐关系的唯一索引缺失时并发去重失效，因此建索引失败即启动失败
    pub async fn connect_database(config: Arc<AppConfig>) -> anyhow::Result<Database> {
        let db = Database::new(config).await?;
        db.init_indexes()
            .await
            .context("🔴 Failed to create database indexes")?;
        Ok(db)
    }

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c().await.expect("🔴 Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("🔴 Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        warn!("❌ Signal received, starting graceful shutdown...");
    }
}
