use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use std::time::Duration;

use super::ChatClient;
use crate::error::{ CompletionError, ConfigurationError };
use crate::llm::{ LlmConfig, DEFAULT_BASE_URL };
use crate::config::prompt::DEFAULT_MODEL;
use crate::models::{ CompletionRequest, CompletionResponse };

const COMPLETIONS_ROUTE: &str = "/chat/completions";

#[derive(Debug)]
pub struct PerplexityChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

impl PerplexityChatClient {
    pub fn new(
        api_key: &str,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ConfigurationError::InvalidApiKey(e.to_string()))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, model, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigurationError> {
        let api_key = config.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        Self::new(api_key, config.completion_model.clone(), config.base_url.clone(), config.timeout)
    }

    fn completions_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETIONS_ROUTE)
    }
}

#[async_trait]
impl ChatClient for PerplexityChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError> {
        let url = self.completions_url();
        info!("Sending completion request to {} (model {})", url, request.model);

        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status: status.as_u16(), body });
        }

        let body = resp.text().await?;
        debug!("Completion response body: {}", body);

        let data: CompletionResponse = serde_json
            ::from_str(&body)
            .map_err(|e| CompletionError::Decode(e.to_string()))?;
        if data.choices.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        if let Some(usage) = &data.usage {
            debug!(
                "Completion usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        let citations = data.citation_list();
        if !citations.is_empty() {
            debug!("Completion citations ({}): {}", citations.len(), citations.join(", "));
        }
        Ok(data)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = PerplexityChatClient::from_config(&LlmConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingApiKey));

        let blank = LlmConfig { api_key: Some("  ".into()), ..LlmConfig::default() };
        assert!(matches!(
            PerplexityChatClient::from_config(&blank).unwrap_err(),
            ConfigurationError::MissingApiKey
        ));
    }

    #[test]
    fn key_with_control_characters_is_rejected() {
        let config = LlmConfig { api_key: Some("abc\ndef".into()), ..LlmConfig::default() };
        assert!(matches!(
            PerplexityChatClient::from_config(&config).unwrap_err(),
            ConfigurationError::InvalidApiKey(_)
        ));
    }

    #[test]
    fn defaults_and_url_joining() {
        let client = PerplexityChatClient::new(
            "key",
            None,
            Some("http://localhost:9999/".into()),
            Duration::from_secs(5)
        ).unwrap();

        assert_eq!(client.get_model(), DEFAULT_MODEL);
        assert_eq!(client.completions_url(), "http://localhost:9999/chat/completions");
    }
}
