use miette::Diagnostic;
use thiserror::Error;

/// Structured classification of completion-provider failures.
///
/// The provider client only hands back an opaque message, so the summarizer
/// classifies it once at the adapter boundary and callers branch on the kind
/// instead of sniffing error strings themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// API key missing, invalid or rejected
    Auth,
    /// The provider did not answer in time
    Timeout,
    /// The provider throttled the request
    RateLimited,
    /// Anything we could not classify
    Unknown,
}

impl CompletionErrorKind {
    /// User-facing hint for this failure class
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Auth => "Check the OpenAI API key configuration.",
            Self::Timeout => "The summarization service took too long to respond.",
            Self::RateLimited => "The summarization service is rate limiting requests.",
            Self::Unknown => "An unknown error occurred while summarizing.",
        }
    }
}

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(daybook::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(daybook::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(daybook::google_calendar))]
    CalendarApi(String),

    #[error("Malformed timestamp: {0}")]
    #[diagnostic(code(daybook::malformed_timestamp))]
    MalformedTimestamp(String),

    #[error("Input text is empty")]
    #[diagnostic(code(daybook::empty_input))]
    EmptyInput,

    #[error("Not found: {0}")]
    #[diagnostic(code(daybook::not_found))]
    NotFound(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(daybook::validation))]
    Validation(String),

    #[error("Completion provider error: {message}")]
    #[diagnostic(code(daybook::completion))]
    Completion {
        kind: CompletionErrorKind,
        message: String,
    },

    #[error("Meeting store error: {0}")]
    #[diagnostic(code(daybook::store))]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    #[diagnostic(code(daybook::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(daybook::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(daybook::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn calendar_error(message: &str) -> Error {
    Error::CalendarApi(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
