use async_trait::async_trait;

use crate::error::GraderError;

/// A grader model: given a prompt, returns the model's raw reply text.
///
/// Model selection and sampling settings are bound into the implementation when it is
/// built, so the grading core only ever passes text in and gets text back. Transport
/// failures are returned as errors and abort the batch.
#[async_trait]
pub trait GradingProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GraderError>;
}

#[async_trait]
impl<P: GradingProvider + ?Sized> GradingProvider for Box<P> {
    async fn complete(&self, prompt: &str) -> Result<String, GraderError> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<P: GradingProvider + ?Sized> GradingProvider for std::sync::Arc<P> {
    async fn complete(&self, prompt: &str) -> Result<String, GraderError> {
        (**self).complete(prompt).await
    }
}
