use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{error::GraderError, provider::GradingProvider};

use super::config::ResilienceConfig;

/// Grader wrapper that retries transient transport failures using exponential backoff.
///
/// Decoding the grader's verdict is not its concern: a reply that arrives is returned
/// as-is, however malformed.
pub struct ResilientProvider {
    inner: Box<dyn GradingProvider>,
    cfg: ResilienceConfig,
}

impl ResilientProvider {
    /// Creates a new resilient wrapper around an existing provider.
    pub fn new(inner: Box<dyn GradingProvider>, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    fn is_retryable(err: &GraderError) -> bool {
        match err {
            GraderError::HttpError(_) => true,
            GraderError::ProviderError(_) => true,
            GraderError::ResponseFormatError { .. } => true,
            GraderError::Timeout(_) => true,
            GraderError::AuthError(_) => false,
            GraderError::RetryExceeded { .. } => false,
            GraderError::JsonError(_)
            | GraderError::Io(_)
            | GraderError::ConfigError(_)
            | GraderError::UnknownModel(_)
            | GraderError::MissingResults
            | GraderError::MissingField { .. }
            | GraderError::EmptyBatch => false,
        }
    }
}

#[async_trait]
impl GradingProvider for ResilientProvider {
    async fn complete(&self, prompt: &str) -> Result<String, GraderError> {
        let mut idx = 0usize;
        loop {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if !Self::is_retryable(&err) => return Err(err),
                Err(err) if idx + 1 >= self.cfg.max_attempts => {
                    return Err(GraderError::RetryExceeded {
                        attempts: self.cfg.max_attempts,
                        last_error: err.to_string(),
                    });
                }
                Err(err) => {
                    let delay = self.cfg.delay_ms(idx);
                    log::warn!(
                        "grader call failed (attempt {}/{}), retrying in {delay}ms: {err}",
                        idx + 1,
                        self.cfg.max_attempts
                    );
                    sleep(Duration::from_millis(delay)).await;
                    idx += 1;
                }
            }
        }
    }
}
