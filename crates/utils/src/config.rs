use clap::Parser;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

/// 环境配置加载器
pub struct EnvLoader;

impl EnvLoader {
    /// 根据 CARGO_ENV 加载对应的环境配置文件
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        // 1. 获取环境变量 CARGO_ENV development
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());

        // 2. 构建配置文件路径
        let env_file = Self::env_file_for(&cargo_env);

        // 3. 检查文件是否存在
        if !std::path::Path::new(env_file).exists() {
            eprintln!("⚠️  配置文件 {} 不存在，尝试加载默认的 .env 文件", env_file);
            // 回退到默认的 .env 文件
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ 已加载默认配置文件: .env");
            } else {
                eprintln!("❌ 未找到任何配置文件，使用默认配置");
            }
            return Ok(());
        }

        // 4. 加载指定的环境配置文件
        dotenvy::from_filename(env_file)?;
        println!("✅ 已加载环境配置文件: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }

    pub fn env_file_for(cargo_env: &str) -> &'static str {
        match cargo_env {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  未知的 CARGO_ENV: {}，使用默认的 .env.development", cargo_env);
                ".env.development"
            }
        }
    }
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "0.0.0.0")]
    pub app_host: String,

    #[clap(long, env, default_value = "8000")]
    pub app_port: u16,

    #[clap(long, env, default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[clap(long, env, default_value = "milkpro_mlm")]
    pub mongo_db: String,

    /// tracing EnvFilter 指令，读取 RUST_LOG
    #[clap(long, env, default_value = "info,server=debug,database=debug,tower_http=debug")]
    pub rust_log: String,

    /// production 下滚动日志文件所在目录
    #[clap(long, env, default_value = "logs")]
    pub log_dir: PathBuf,

    /// 单个请求的超时时间(秒)
    #[clap(long, env, default_value = "30")]
    pub http_timeout_secs: u64,

    /// 身份令牌 HS256 密钥
    #[clap(long, env)]
    pub identity_jwt_secret: Option<String>,

    /// 身份令牌 RS256 公钥(PEM 文件路径)，优先于 HS256 密钥
    #[clap(long, env)]
    pub identity_public_key_pem: Option<String>,

    /// 期望的签发者，例如 https://securetoken.google.com/<project-id>
    #[clap(long, env)]
    pub identity_issuer: Option<String>,

    /// 期望的受众(project id)
    #[clap(long, env)]
    pub identity_audience: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        EnvLoader::load_env_file().ok();
        AppConfig::parse()
    }
}

impl AppConfig {
    /// 手动创建配置实例（用于测试）
    pub fn new_for_test() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            app_host: "127.0.0.1".to_string(),
            app_port: 8765,
            mongo_uri: std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db: std::env::var("MONGO_DB").unwrap_or_else(|_| "milkpro_test".to_string()),
            rust_log: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            http_timeout_secs: 30,
            identity_jwt_secret: Some("test_identity_secret_for_unit_tests_only".to_string()),
            identity_public_key_pem: None,
            identity_issuer: None,
            identity_audience: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.cargo_env == CargoEnv::Production
    }
}
