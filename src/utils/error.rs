use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected API response from {endpoint}: {message}")]
    UnexpectedResponseError { endpoint: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid time format: {value}. Use HH:MM (24-hour format)")]
    InvalidTimeFormatError { value: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，對應輸入、網路、檔案系統、資料處理四種失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Filesystem,
    Processing,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::ApiError(_) | ExportError::UnexpectedResponseError { .. } => {
                ErrorCategory::Network
            }
            ExportError::IoError(_) => ErrorCategory::Filesystem,
            ExportError::CsvError(e) => match e.kind() {
                csv::ErrorKind::Io(_) => ErrorCategory::Filesystem,
                _ => ErrorCategory::Processing,
            },
            ExportError::TomlError(_)
            | ExportError::InvalidTimeFormatError { .. }
            | ExportError::InvalidConfigValueError { .. }
            | ExportError::MissingConfigError { .. } => ErrorCategory::Input,
            ExportError::SerializationError(_) => ErrorCategory::Processing,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Network => format!("Error fetching data: {}", self),
            ErrorCategory::Filesystem => format!("Error writing to file: {}", self),
            ErrorCategory::Processing => format!("Error processing data: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExportError::InvalidTimeFormatError { .. } => {
                "Pass the schedule as HH:MM in 24-hour format, e.g. --time 14:30"
            }
            ExportError::TomlError(_) => "Check that the config file is valid TOML",
            ExportError::InvalidConfigValueError { .. } | ExportError::MissingConfigError { .. } => {
                "Check the command-line arguments with --help"
            }
            ExportError::ApiError(e) if e.is_timeout() => {
                "The API did not answer within the timeout; try again later"
            }
            ExportError::ApiError(e) if e.is_status() => {
                "The API rejected the request; check --api-url"
            }
            ExportError::ApiError(_) | ExportError::UnexpectedResponseError { .. } => {
                "Check network connectivity and that --api-url points at the PostgREST service"
            }
            _ => match self.category() {
                ErrorCategory::Filesystem => {
                    "Check that the output directory exists and is writable"
                }
                _ => "Re-run with --verbose for more details",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
