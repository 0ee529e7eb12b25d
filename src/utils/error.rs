use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Range table line {line}: {reason} ('{content}')")]
    MalformedRangeRow {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Range table line {line}: '{value}' is not a valid day.month")]
    InvalidRangeEndpoint { line: usize, value: String },

    #[error("Range table line {line}: '{label}' wraps around the year end, but '{existing}' already does")]
    ConflictingWraparound {
        line: usize,
        label: String,
        existing: String,
    },

    #[error("Invalid date '{input}': {reason}")]
    DateFormat { input: String, reason: String },

    #[error("No date given")]
    MissingInput,

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    RangeTable,
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

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::Http(_) | EtlError::HttpStatus { .. } | EtlError::UrlParse(_) => {
                ErrorCategory::Network
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::MalformedRangeRow { .. }
            | EtlError::InvalidRangeEndpoint { .. }
            | EtlError::ConflictingWraparound { .. } => ErrorCategory::RangeTable,
            EtlError::DateFormat { .. }
            | EtlError::MissingInput
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::Io(_) | EtlError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單筆資料錯誤只會讓該筆不被分類
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::RangeTable => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 錯誤是否只影響單一實體（可以略過而不中止整個流程）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EtlError::DateFormat { .. } | EtlError::MissingInput)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::Http(_) | EtlError::HttpStatus { .. } => {
                "Check the network connection and that the listing URL is reachable"
            }
            EtlError::UrlParse(_) => "Check the configured URLs",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            EtlError::MalformedRangeRow { .. } => {
                "Use '<label> | DD.MM - DD.MM' rows, or run with --row-policy skip"
            }
            EtlError::InvalidRangeEndpoint { .. } => {
                "Range endpoints must be valid day.month values such as 21.03"
            }
            EtlError::ConflictingWraparound { .. } => {
                "Only one range may cross the year end"
            }
            EtlError::DateFormat { .. } | EtlError::MissingInput => {
                "The entity is left unclassified"
            }
            EtlError::ProcessingError { .. } => "Run with --verbose to see details",
            EtlError::Io(_) => "Check that the range table file exists and is readable",
            EtlError::Serialization(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::Http(_) | EtlError::HttpStatus { .. } => {
                format!("Could not download the listing: {}", self)
            }
            EtlError::Io(e) => format!("Could not read input file: {}", e),
            EtlError::MalformedRangeRow { .. }
            | EtlError::InvalidRangeEndpoint { .. }
            | EtlError::ConflictingWraparound { .. } => {
                format!("Could not load the range table: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
