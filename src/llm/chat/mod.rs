pub mod perplexity;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use std::sync::Arc;

use self::perplexity::PerplexityChatClient;
use super::LlmConfig;
use crate::error::{ CompletionError, ConfigurationError };
use crate::models::{ CompletionRequest, CompletionResponse };

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one completion request. Implementations must not retry.
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ConfigurationError> {
    let client = PerplexityChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
