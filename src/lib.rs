pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::HttpCourseStore;
pub use app::render::{render, OutputFormat};
pub use config::{toml_config::TomlConfig, ExplorerSettings};
pub use self::core::{
    explorer::{CourseCard, CourseExplorer, ExplorerOptions, ExplorerView, LoadOutcome},
    filter::filter_courses,
    rating_cache::{PopulateReport, RatingCache},
};
pub use domain::model::{
    Category, CategoryFilter, Course, CourseId, FilterCriteria, PriceCap, RatingSummary,
};
pub use domain::ports::CourseStore;
pub use utils::error::{ExplorerError, Result};
