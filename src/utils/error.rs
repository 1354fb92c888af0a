use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned {status} for {path}: {body}")]
    ApiError {
        status: u16,
        path: String,
        body: String,
    },

    #[error("Not found: {path}")]
    NotFoundError { path: String },

    #[error("Conflict: {path}")]
    ConflictError { path: String },

    #[error("Bad request: {path}: {body}")]
    BadRequestError { path: String, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {}", format_field_errors(.errors))]
    ValidationError { errors: Vec<FieldError> },

    #[error("Operation cancelled: {action}")]
    CancelledError { action: String },
}

/// A single form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Input,
    Configuration,
    Output,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConsoleError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::ValidationError {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConsoleError::HttpError(_) => ErrorCategory::Network,
            ConsoleError::ApiError { .. }
            | ConsoleError::NotFoundError { .. }
            | ConsoleError::ConflictError { .. }
            | ConsoleError::BadRequestError { .. } => ErrorCategory::Backend,
            ConsoleError::ValidationError { .. } => ErrorCategory::Input,
            ConsoleError::ConfigError { .. }
            | ConsoleError::MissingConfigError { .. }
            | ConsoleError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ConsoleError::IoError(_)
            | ConsoleError::SerializationError(_)
            | ConsoleError::CsvError(_) => ErrorCategory::Output,
            ConsoleError::CancelledError { .. } => ErrorCategory::User,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConsoleError::CancelledError { .. } => ErrorSeverity::Low,
            ConsoleError::HttpError(_) | ConsoleError::ApiError { .. } => ErrorSeverity::Medium,
            ConsoleError::NotFoundError { .. }
            | ConsoleError::ConflictError { .. }
            | ConsoleError::BadRequestError { .. }
            | ConsoleError::ValidationError { .. }
            | ConsoleError::SerializationError(_)
            | ConsoleError::CsvError(_) => ErrorSeverity::High,
            ConsoleError::IoError(_)
            | ConsoleError::ConfigError { .. }
            | ConsoleError::MissingConfigError { .. }
            | ConsoleError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConsoleError::ApiError { status, .. } => Some(*status),
            ConsoleError::NotFoundError { .. } => Some(404),
            ConsoleError::ConflictError { .. } => Some(409),
            ConsoleError::BadRequestError { .. } => Some(400),
            ConsoleError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConsoleError::HttpError(e) if e.is_timeout() => {
                "The backend did not answer in time".to_string()
            }
            ConsoleError::HttpError(e) if e.is_connect() => {
                "Could not connect to the backend".to_string()
            }
            ConsoleError::HttpError(_) => "Request to the backend failed".to_string(),
            ConsoleError::ApiError { status, .. } => {
                format!("The backend rejected the request (HTTP {})", status)
            }
            ConsoleError::NotFoundError { path } => format!("Nothing found at {}", path),
            ConsoleError::ConflictError { .. } => {
                "A resource with the same identifier already exists".to_string()
            }
            ConsoleError::BadRequestError { .. } => {
                "The backend considered the request malformed".to_string()
            }
            ConsoleError::ValidationError { errors } => {
                format!("{} field(s) are invalid: {}", errors.len(), format_field_errors(errors))
            }
            ConsoleError::CancelledError { action } => format!("{} was not confirmed", action),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the base URL and that the backend is reachable",
            ErrorCategory::Backend => match self {
                ConsoleError::NotFoundError { .. } => "Check the system id with `providers list`",
                ConsoleError::ConflictError { .. } => "Use `providers update` to change it instead",
                ConsoleError::ApiError { status: 401, .. }
                | ConsoleError::ApiError { status: 403, .. } => {
                    "Provide a valid bearer token with --token or [auth].bearer_token"
                }
                _ => "Inspect the backend logs for details",
            },
            ErrorCategory::Input => "Fix the listed fields and try again",
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
            ErrorCategory::Output => "Check the output path and format",
            ErrorCategory::User => "Re-run with --yes to skip the confirmation",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
