use thiserror::Error;

/// Error types that can abort a grading run.
///
/// Malformed grader output is deliberately absent: it never surfaces as an error,
/// see [`crate::interpret::interpret_response`].
#[derive(Debug, Error)]
pub enum GraderError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Errors returned by the grader model provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// The provider answered but the envelope could not be read
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// The model call did not finish in time
    #[error("Grader call timed out after {0} seconds")]
    Timeout(u64),
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded { attempts: usize, last_error: String },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// File system errors while reading or writing documents and configs
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be read or is inconsistent
    #[error("Config error: {0}")]
    ConfigError(String),
    /// No server entry matches the requested model shortname
    #[error("Unknown model '{0}' in model configuration")]
    UnknownModel(String),
    /// The document has no `results` array
    #[error("Input document has no `results` array")]
    MissingResults,
    /// A record lacks one of the fields the grading prompt needs
    #[error("Result #{index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },
    /// Mean requested over zero scores
    #[error("Cannot compute an average over an empty batch")]
    EmptyBatch,
}

/// Converts reqwest HTTP errors into GraderErrors
impl From<reqwest::Error> for GraderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GraderError::HttpError(format!("request timed out: {err}"));
        }
        GraderError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for GraderError {
    fn from(err: serde_json::Error) -> Self {
        GraderError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<serde_yaml::Error> for GraderError {
    fn from(err: serde_yaml::Error) -> Self {
        GraderError::ConfigError(format!("YAML: {err}"))
    }
}

impl From<toml::de::Error> for GraderError {
    fn from(err: toml::de::Error) -> Self {
        GraderError::ConfigError(format!("TOML: {err}"))
    }
}
