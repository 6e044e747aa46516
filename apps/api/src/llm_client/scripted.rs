//! Scripted `ModelClient` for tests: replays queued replies in order and
//! records every message list it was sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatMessage, ModelCallError, ModelClient};

pub struct ScriptedModel {
    enabled: bool,
    replies: Mutex<VecDeque<Result<String, ModelCallError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = Result<String, ModelCallError>>) -> Self {
        Self {
            enabled: true,
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Enabled client that answers every call with the same text.
    pub fn replying(text: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(text.to_string())))
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new([])
        }
    }

    pub fn failure(message: &str) -> Result<String, ModelCallError> {
        Err(ModelCallError::Api {
            status: 503,
            message: message.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ModelCallError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::failure("no scripted reply left"))
    }
}
