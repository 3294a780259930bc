use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::GraderError;

/// Number of leading results graded when no limit is configured.
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CONCURRENCY: usize = 1;
const DEFAULT_MAX_ATTEMPTS: usize = 3;
const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub grading: GradingConfig,
    pub logging: LoggingConfig,
    pub servers: Vec<ServerConfig>,
}

impl AppConfig {
    /// Resolves a model shortname to its server entry.
    pub fn model(&self, shortname: &str) -> Result<&ServerConfig, GraderError> {
        self.servers
            .iter()
            .find(|s| s.shortname == shortname)
            .ok_or_else(|| GraderError::UnknownModel(shortname.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GradingConfig {
    /// How many leading results to grade. `None` grades the whole batch.
    pub sample_limit: Option<usize>,
    /// Upper bound on a single grader call, retries excluded.
    pub timeout_secs: u64,
    /// Grader calls allowed in flight at once.
    pub concurrency: usize,
    /// Attempts per grader call, including the first.
    pub max_attempts: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            sample_limit: Some(DEFAULT_SAMPLE_LIMIT),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file. Logs go to stderr when unset.
    pub path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
        }
    }
}

/// One model server entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name used on the command line to select this model.
    pub shortname: String,
    /// Free-form description of the host.
    pub server: Option<String>,
    pub openai_api_base: Option<String>,
    /// Literal key, or `${VAR}` to read it from the environment.
    pub openai_api_key: Option<String>,
    /// Environment variable holding the key.
    pub openai_api_key_env: Option<String>,
    pub openai_model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system: Option<String>,
}

impl ServerConfig {
    /// Looks up the API key, falling back to `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> Result<SecretString, GraderError> {
        if let Some(raw) = &self.openai_api_key {
            return match env_reference(raw) {
                Some(var) => self.read_env(var),
                None => Ok(SecretString::new(raw.clone())),
            };
        }
        if let Some(var) = &self.openai_api_key_env {
            return self.read_env(var);
        }
        self.read_env(FALLBACK_API_KEY_ENV)
    }

    fn read_env(&self, var: &str) -> Result<SecretString, GraderError> {
        std::env::var(var).map(SecretString::new).map_err(|_| {
            GraderError::ConfigError(format!(
                "API key for model '{}' expected in environment variable {var}",
                self.shortname
            ))
        })
    }
}

fn env_reference(raw: &str) -> Option<&str> {
    raw.trim()
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
}
