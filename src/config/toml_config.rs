use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub ratings: Option<RatingsConfig>,
    pub filters: Option<FiltersConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub courses_path: Option<String>,
    /// Must contain `{id}`.
    pub rating_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsConfig {
    pub enabled: Option<bool>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub search: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<f64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExplorerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COURSE_API_TOKEN})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExplorerError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn ratings_enabled(&self) -> Option<bool> {
        self.ratings.as_ref().and_then(|r| r.enabled)
    }

    pub fn concurrent_requests(&self) -> Option<usize> {
        self.ratings.as_ref().and_then(|r| r.concurrent_requests)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(path) = &self.api.courses_path {
            validation::validate_route_path("api.courses_path", path)?;
        }
        if let Some(template) = &self.api.rating_path {
            validation::validate_id_placeholder("api.rating_path", template)?;
        }
        if let Some(concurrent) = self.concurrent_requests() {
            validation::validate_positive_number("ratings.concurrent_requests", concurrent, 1)?;
        }

        if let Some(filters) = &self.filters {
            if let Some(category) = &filters.category {
                validation::validate_category("filters.category", category)?;
            }
            if let Some(max_price) = filters.max_price {
                validation::validate_range(
                    "filters.max_price",
                    max_price,
                    0.0,
                    crate::domain::model::PRICE_RANGE_MAX,
                )?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
