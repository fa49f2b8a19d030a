use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{AppConfig, CargoEnv};

const FALLBACK_DIRECTIVES: &str = "info";
const LOG_FILE_PREFIX: &str = "milkpro.log";

pub struct Logger;

impl Logger {
    /// 安装全局 subscriber；返回的 guard 必须存活到进程退出
    pub fn init(config: &AppConfig) -> WorkerGuard {
        let (writer, guard) = Self::writer(config.cargo_env, &config.log_dir);

        tracing_subscriber::registry()
            .with(Self::filter(&config.rust_log))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(config.cargo_env == CargoEnv::Development)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false),
            )
            .init();

        guard
    }

    /// RUST_LOG 经 clap 读入 `rust_log`；写错的指令回退到 info
    pub fn filter(directives: &str) -> EnvFilter {
        EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("⚠️ 无效的日志过滤指令 {:?}: {}，使用 {}", directives, e, FALLBACK_DIRECTIVES);
            EnvFilter::new(FALLBACK_DIRECTIVES)
        })
    }

    fn writer(cargo_env: CargoEnv, log_dir: &Path) -> (NonBlocking, WorkerGuard) {
        match cargo_env {
            CargoEnv::Development => tracing_appender::non_blocking(std::io::stdout()),
            CargoEnv::Production => match std::fs::create_dir_all(log_dir) {
                Ok(()) => tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX)),
                Err(e) => {
                    eprintln!("⚠️ 无法创建日志目录 {:?}: {}，改为输出到 stdout", log_dir, e);
                    tracing_appender::non_blocking(std::io::stdout())
                }
            },
        }
    }
}
