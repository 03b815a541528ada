use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件名（位于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "phishing_guard.toml";

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 分析服务地址
    pub api_base_url: String,
    /// 分析接口路径
    pub analyze_path: String,
    /// multipart 中邮件文件的字段名
    pub upload_field: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否使用系统代理（HTTP_PROXY 等环境变量）
    pub use_system_proxy: bool,
    /// 出错后自动续跑的次数
    pub max_resumes: u32,
    /// 两次续跑之间的等待（秒）
    pub resume_delay_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            analyze_path: "/api/analysis/analyze_email/".to_string(),
            upload_field: "email_file".to_string(),
            request_timeout_secs: 120,
            use_system_proxy: true,
            max_resumes: 0,
            resume_delay_secs: 3,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 按 默认值 < TOML 文件 < 环境变量 的顺序加载配置
    ///
    /// 未指定 `path` 时，仅当当前目录存在 `phishing_guard.toml` 才读取。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_toml_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 负责取值，便于测试时不依赖进程环境。
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PHISHING_GUARD_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("PHISHING_GUARD_ANALYZE_PATH") {
            self.analyze_path = v;
        }
        if let Some(v) = lookup("PHISHING_GUARD_UPLOAD_FIELD") {
            self.upload_field = v;
        }
        if let Some(v) = parse_env(&lookup, "PHISHING_GUARD_TIMEOUT_SECS", "u64")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "PHISHING_GUARD_USE_SYSTEM_PROXY", "bool")? {
            self.use_system_proxy = v;
        }
        if let Some(v) = parse_env(&lookup, "PHISHING_GUARD_MAX_RESUMES", "u32")? {
            self.max_resumes = v;
        }
        if let Some(v) = parse_env(&lookup, "PHISHING_GUARD_RESUME_DELAY_SECS", "u64")? {
            self.resume_delay_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    /// 完整的分析接口地址
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.analyze_path.trim_start_matches('/')
        )
    }
}

fn parse_env<F, T>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
