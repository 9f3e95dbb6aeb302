use crate::app::render::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::config::ExplorerSettings;
use crate::domain::model::{CategoryFilter, PriceCap};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "course-explorer")]
#[command(about = "Search and filter marketplace courses with their ratings")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the course API (overrides the config file)
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Case-insensitive text matched against course names and descriptions
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category name, or "All Categories"
    #[arg(long)]
    pub category: Option<String>,

    /// Inclusive price cap; 10000 or more means any price
    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Cards)]
    pub format: OutputFormat,

    /// Maximum rating lookups in flight
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Skip rating lookups
    #[arg(long)]
    pub no_ratings: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<ExplorerSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                ExplorerSettings::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => ExplorerSettings::default(),
        };

        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(search) = &self.search {
            settings.criteria.search_term = search.clone();
        }
        if let Some(category) = &self.category {
            settings.criteria.category = category.parse::<CategoryFilter>()?;
        }
        if let Some(max_price) = self.max_price {
            settings.criteria.max_price = PriceCap::from_max_price(max_price);
        }
        if let Some(concurrent) = self.concurrent_requests {
            settings.concurrent_requests = concurrent;
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = Some(timeout);
        }
        if self.no_ratings {
            settings.ratings_enabled = false;
        }

        settings.validate()?;
        Ok(settings)
    }
}
