use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown category: {name}")]
    UnknownCategoryError { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ExplorerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplorerError::ApiError(_) | ExplorerError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            ExplorerError::ConfigError { .. }
            | ExplorerError::ConfigValidationError { .. }
            | ExplorerError::InvalidConfigValueError { .. }
            | ExplorerError::UnknownCategoryError { .. } => ErrorCategory::Configuration,
            ExplorerError::SerializationError(_) => ErrorCategory::Data,
            ExplorerError::CsvError(_) | ExplorerError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤在控制器內部會被降級處理
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ExplorerError::ApiError(_) => {
                "Check that the course API is reachable and the base URL is correct".to_string()
            }
            ExplorerError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check the authorization headers configured under [api.headers]".to_string()
            }
            ExplorerError::HttpStatusError { .. } => {
                "Verify the courses_path and rating_path settings match the backend routes"
                    .to_string()
            }
            ExplorerError::SerializationError(_) => {
                "The API response did not match the expected course format".to_string()
            }
            ExplorerError::CsvError(_) | ExplorerError::IoError(_) => {
                "Make sure stdout is writable".to_string()
            }
            ExplorerError::UnknownCategoryError { .. } => format!(
                "Use one of: {}",
                crate::domain::model::Category::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ExplorerError::ConfigError { .. }
            | ExplorerError::ConfigValidationError { .. }
            | ExplorerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the course service: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Unexpected data from the course service: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
