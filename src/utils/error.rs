use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Failed to load inventory from {path}: {message}")]
    SourceLoadError { path: String, message: String },

    #[error("No valid inventory loaded from {path}")]
    EmptyInventoryError { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlertError::ConfigValidationError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AlertError::SourceLoadError { .. } | AlertError::EmptyInventoryError { .. } => {
                ErrorCategory::Source
            }
            AlertError::HttpError(_) => ErrorCategory::Network,
            AlertError::CsvError(_) | AlertError::SerializationError(_) => ErrorCategory::Data,
            AlertError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AlertError::EmptyInventoryError { .. } => ErrorSeverity::Low,
            AlertError::HttpError(_) => ErrorSeverity::Medium,
            AlertError::ConfigValidationError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::MissingConfigError { .. }
            | AlertError::SourceLoadError { .. }
            | AlertError::CsvError(_)
            | AlertError::SerializationError(_) => ErrorSeverity::High,
            AlertError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration file and the OMNI_API_KEY environment variable"
            }
            ErrorCategory::Source => {
                "Run the `ingest` command to regenerate the inventory JSONL file"
            }
            ErrorCategory::Network => "Check network connectivity and retry later",
            ErrorCategory::Data => "Inspect the input file for malformed rows",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AlertError::SourceLoadError { path, .. } => {
                format!("Could not read inventory file '{}'", path)
            }
            AlertError::EmptyInventoryError { .. } => "No valid inventory loaded.".to_string(),
            AlertError::MissingConfigError { field } => {
                format!("Missing configuration value: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
