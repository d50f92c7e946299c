use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Fetch timed out after {seconds}s: {url}")]
    TimeoutError { url: String, seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Unexpected document shape at '{path}': {message}")]
    ExtractionShapeError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ResultsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Extraction,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ResultsError {
    pub fn shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionShapeError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } | Self::TimeoutError { .. } => {
                ErrorCategory::Network
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::SelectorError { .. } => ErrorCategory::Configuration,
            Self::ExtractionShapeError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Extraction
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一來源失敗不影響其他遊戲
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Extraction => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) | Self::TimeoutError { .. } => {
                "Check network connectivity or raise the fetch timeout"
            }
            Self::HttpStatusError { .. } => "Verify the source URL is still served by the operator",
            Self::ExtractionShapeError { .. } => {
                "The source page structure may have changed; review the JSON path or script id"
            }
            Self::SelectorError { .. } => "Fix the CSS selector in the [layout.html] section",
            Self::SerializationError(_) => "The source returned malformed JSON",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and flags",
            Self::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the results page: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Extraction => format!("Could not read the results page: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}
