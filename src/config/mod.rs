#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{DEFAULT_COURSES_PATH, DEFAULT_RATING_PATH};
use crate::core::explorer::ExplorerOptions;
use crate::domain::model::{CategoryFilter, FilterCriteria, PriceCap, PRICE_RANGE_MAX};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use self::toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// Fully resolved settings: defaults, then the TOML file, then flags.
#[derive(Clone, PartialEq)]
pub struct ExplorerSettings {
    pub api_base_url: String,
    pub courses_path: String,
    pub rating_path: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub concurrent_requests: usize,
    pub ratings_enabled: bool,
    pub criteria: FilterCriteria,
}

/// Header values usually carry credentials, so only their names are printed.
impl fmt::Debug for ExplorerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        let headers: Vec<String> = header_names
            .into_iter()
            .map(|name| format!("{name}: <redacted>"))
            .collect();

        f.debug_struct("ExplorerSettings")
            .field("api_base_url", &self.api_base_url)
            .field("courses_path", &self.courses_path)
            .field("rating_path", &self.rating_path)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("headers", &headers)
            .field("concurrent_requests", &self.concurrent_requests)
            .field("ratings_enabled", &self.ratings_enabled)
            .field("criteria", &self.criteria)
            .finish()
    }
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            courses_path: DEFAULT_COURSES_PATH.to_string(),
            rating_path: DEFAULT_RATING_PATH.to_string(),
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            headers: HashMap::new(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            ratings_enabled: true,
            criteria: FilterCriteria::default(),
        }
    }
}

impl ExplorerSettings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;

        let defaults = Self::default();
        let api = &config.api;
        let mut criteria = FilterCriteria::default();
        if let Some(filters) = &config.filters {
            if let Some(search) = &filters.search {
                criteria.search_term = search.clone();
            }
            if let Some(category) = &filters.category {
                criteria.category = category.parse::<CategoryFilter>()?;
            }
            if let Some(max_price) = filters.max_price {
                criteria.max_price = PriceCap::from_max_price(max_price);
            }
        }

        Ok(Self {
            api_base_url: api.base_url.clone(),
            courses_path: api.courses_path.clone().unwrap_or(defaults.courses_path),
            rating_path: api.rating_path.clone().unwrap_or(defaults.rating_path),
            timeout_seconds: api.timeout_seconds.or(defaults.timeout_seconds),
            headers: api.headers.clone().unwrap_or_default(),
            concurrent_requests: config
                .concurrent_requests()
                .unwrap_or(defaults.concurrent_requests),
            ratings_enabled: config.ratings_enabled().unwrap_or(defaults.ratings_enabled),
            criteria,
        })
    }

    pub fn explorer_options(&self) -> ExplorerOptions {
        ExplorerOptions::from_config(self)
    }
}

impl ConfigProvider for ExplorerSettings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn courses_path(&self) -> &str {
        &self.courses_path
    }

    fn rating_path(&self) -> &str {
        &self.rating_path
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn headers(&self) -> HashMap<String, String> {
        self.headers.clone()
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn ratings_enabled(&self) -> bool {
        self.ratings_enabled
    }
}

impl Validate for ExplorerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_route_path("courses_path", &self.courses_path)?;
        validation::validate_id_placeholder("rating_path", &self.rating_path)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        if let PriceCap::AtMost(cap) = self.criteria.max_price {
            validation::validate_range("max_price", cap, 0.0, PRICE_RANGE_MAX)?;
        }
        Ok(())
    }
}
