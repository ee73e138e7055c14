use crate::auth::JwtConfig;

/// 服务器配置 - 配药服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/galen | 工作目录（数据库、日志） |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | DOSE_SERVICE_URL | http://localhost:8080 | 剂量计算服务地址 |
/// | DOSE_REQUEST_TIMEOUT_SECS | 3 | 剂量请求超时（秒） |
/// | ENVIRONMENT | development | 运行环境 |
/// | MODERATOR_PASSWORD | moderator | 初始审核员账号密码（仅首次启动生效） |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/galen HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 剂量计算服务地址（出站）
    pub dose_service_url: String,
    /// 剂量请求超时（秒）
    pub dose_request_timeout_secs: u64,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 初始审核员账号密码
    pub moderator_password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/galen".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            dose_service_url: std::env::var("DOSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            dose_request_timeout_secs: std::env::var("DOSE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            moderator_password: std::env::var("MODERATOR_PASSWORD")
                .unwrap_or_else(|_| "moderator".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库目录
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("database")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
