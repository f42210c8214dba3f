use async_trait::async_trait;
use std::sync::{ Arc, Mutex };

use super::ChatClient;
use crate::error::CompletionError;
use crate::models::completion::Choice;
use crate::models::{ ChatMessage, CompletionRequest, CompletionResponse, Role };

/// In-memory client for tests: replies with fixed content or a fixed upstream status.
pub struct StubClient {
    reply: Result<String, u16>,
    pub seen: Mutex<Vec<CompletionRequest>>,
}

impl StubClient {
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(content.to_string()), seen: Mutex::new(Vec::new()) })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self { reply: Err(status), seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl ChatClient for StubClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(content) =>
                Ok(CompletionResponse {
                    id: "cmpl-1".into(),
                    object: "chat.completion".into(),
                    created: 0,
                    model: "stub".into(),
                    choices: vec![Choice {
                        message: ChatMessage { role: Role::Assistant, content: content.clone() },
                        finish_reason: Some("stop".into()),
                        index: Some(0),
                    }],
                    usage: None,
                    citations: None,
                }),
            Err(status) =>
                Err(CompletionError::Status { status: *status, body: "upstream down".into() }),
        }
    }

    fn get_model(&self) -> String {
        "stub".into()
    }

    fn get_base_url(&self) -> String {
        "http://stub".into()
    }
}
