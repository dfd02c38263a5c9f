use crate::adapters::csrf::{DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER};
use crate::core::extractor::TokenPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::{AssistError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub submit: SubmitConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// 表單的 action URL
    pub endpoint: Option<String>,
    /// 取得 CSRF cookie 的頁面，預設為 endpoint
    pub csrf_page: Option<String>,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            csrf_page: None,
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub token_policy: TokenPolicy,
}

impl AssistConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AssistError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPLOAD_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 送出前必須有 endpoint
    pub fn require_endpoint(&self) -> Result<&str> {
        self.submit
            .endpoint
            .as_deref()
            .ok_or_else(|| AssistError::ConfigError {
                message: "No upload endpoint configured (use --endpoint or [submit].endpoint)"
                    .to_string(),
            })
    }

    /// 取得 CSRF 頁面，未設定時使用 endpoint
    pub fn csrf_page(&self) -> Option<&str> {
        self.submit
            .csrf_page
            .as_deref()
            .or(self.submit.endpoint.as_deref())
    }
}

impl Validate for AssistConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.submit.endpoint {
            validate_url("submit.endpoint", endpoint)?;
        }
        if let Some(page) = &self.submit.csrf_page {
            validate_url("submit.csrf_page", page)?;
        }
        validate_non_empty_string("submit.csrf_cookie_name", &self.submit.csrf_cookie_name)?;
        validate_non_empty_string("submit.csrf_header_name", &self.submit.csrf_header_name)?;
        if let Some(timeout) = self.submit.timeout_seconds {
            validate_range("submit.timeout_seconds", timeout, 1, 600)?;
        }
        Ok(())
    }
}

impl ConfigProvider for AssistConfig {
    fn endpoint(&self) -> &str {
        self.submit.endpoint.as_deref().unwrap_or_default()
    }

    fn csrf_cookie_name(&self) -> &str {
        &self.submit.csrf_cookie_name
    }

    fn csrf_header_name(&self) -> &str {
        &self.submit.csrf_header_name
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.submit.timeout_seconds
    }
}
