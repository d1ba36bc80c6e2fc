//! Application configuration module / 应用配置模块
//!
//! Manages configuration loaded from config.json.
//! Creates default config file on first run / 首次运行时创建默认配置文件
//!
//! The loaded config is passed explicitly to the gateway; there is no
//! process-wide instance.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::client::{parse_endpoint, validate_index_name};

/// Environment variable overriding the config file path / 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "SEARCH_GATEWAY_CONFIG";
/// Environment variable overriding the engine endpoint / 引擎地址环境变量
pub const ENDPOINT_ENV: &str = "SEARCH_ENGINE_ENDPOINT";
/// Environment variable overriding the index name / 索引名环境变量
pub const INDEX_ENV: &str = "SEARCH_ENGINE_INDEX";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Search engine configuration / 搜索引擎配置
    #[serde(default)]
    pub engine: EngineConfig,
    /// Caller-side retry policy / 重试策略
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Search engine configuration / 搜索引擎配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine base URL / 搜索引擎地址
    pub endpoint: String,
    /// Target index / 目标索引
    pub index: String,
    /// Page size for title searches / 标题搜索每页数量
    pub default_page_size: usize,
    /// Whole-request timeout in milliseconds / 请求超时（毫秒）
    pub request_timeout_ms: u64,
    /// Connect timeout in milliseconds / 连接超时（毫秒）
    pub connect_timeout_ms: u64,
}

/// Retry policy configuration / 重试策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one / 总尝试次数（含首次）
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9200".to_string(),
            index: "product-index".to_string(),
            default_page_size: 50,
            request_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply environment overrides / 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.engine.endpoint = endpoint;
        }
        if let Some(index) = lookup(INDEX_ENV).filter(|v| !v.trim().is_empty()) {
            self.engine.index = index;
        }
    }

    /// Reject configurations the gateway cannot run with / 校验配置
    pub fn validate(&self) -> anyhow::Result<()> {
        parse_endpoint(&self.engine.endpoint).context("engine.endpoint")?;
        validate_index_name(&self.engine.index).context("engine.index")?;
        if self.engine.default_page_size == 0 {
            bail!("engine.default_page_size must be greater than 0");
        }
        if self.engine.request_timeout_ms == 0 {
            bail!("engine.request_timeout_ms must be greater than 0");
        }
        if self.engine.connect_timeout_ms == 0 {
            bail!("engine.connect_timeout_ms must be greater than 0");
        }
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            bail!("retry.initial_backoff_ms must not exceed retry.max_backoff_ms");
        }
        Ok(())
    }
}

/// Get the config file path / 获取配置文件路径
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration, apply env overrides and validate / 加载并校验配置
pub fn load_config() -> anyhow::Result<AppConfig> {
    let mut config = load_config_from(&get_config_path())?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config_from(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config, path)?;
        tracing::info!("Created default configuration at {:?}", path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("search-gateway-{}-{}", name, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("config.json")
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.index, "product-index");
        assert_eq!(config.engine.default_page_size, 50);
        assert_eq!(config.get_bind_address(), "0.0.0.0:8180");
    }

    #[test]
    fn test_missing_file_creates_default() {
        let path = temp_config_path("create");
        assert!(!path.exists());

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.engine.endpoint, EngineConfig::default().endpoint);

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.server.port, config.server.port);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_config_path("partial");
        std::fs::write(&path, r#"{ "engine": { "endpoint": "https://search.example.com", "default_page_size": 20 } }"#)
            .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.engine.endpoint, "https://search.example.com");
        assert_eq!(config.engine.default_page_size, 20);
        assert_eq!(config.engine.index, "product-index");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.server.port, 8180);
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let path = temp_config_path("broken");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.engine.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.index = "../admin".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.default_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_replace_endpoint_and_index() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            ENDPOINT_ENV => Some("https://search.internal:9243".to_string()),
            INDEX_ENV => Some("catalog".to_string()),
            _ => None,
        });
        assert_eq!(config.engine.endpoint, "https://search.internal:9243");
        assert_eq!(config.engine.index, "catalog");

        let mut config = AppConfig::default();
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.engine.index, "product-index");
    }
}
