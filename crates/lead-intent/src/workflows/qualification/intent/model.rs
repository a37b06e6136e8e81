use std::time::Duration;

use async_trait::async_trait;

/// Text-generation backend consulted for intent classification.
#[async_trait]
pub trait IntentModel: Send + Sync {
    /// Send a prompt and return the raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl<M> IntentModel for std::sync::Arc<M>
where
    M: IntentModel + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).generate(prompt).await
    }
}

/// Failure to obtain any reply from the model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("intent model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("intent model returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("intent model API key is not configured")]
    MissingApiKey,
    #[error("intent model returned no text")]
    EmptyResponse,
    #[error("intent model did not answer within {0:?}")]
    Timeout(Duration),
}
