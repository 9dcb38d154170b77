//! Scripted chat model for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{RagError, Result};
use crate::model::ChatModel;

/// A [`ChatModel`] that replays scripted replies and records every prompt.
///
/// Replies are consumed in order; once exhausted, the fallback reply is
/// returned. A `None` reply in the script makes that call fail.
#[derive(Debug)]
pub struct MockChatModel {
    name: String,
    script: Mutex<VecDeque<Option<String>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockChatModel {
    /// A model answering every prompt with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: Some(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every call fails.
    pub fn failing() -> Self {
        Self { fallback: None, ..Self::new("") }
    }

    /// Queue a reply (or a failure, with `None`) ahead of the fallback.
    pub fn then(self, reply: Option<&str>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply.map(str::to_string));
        }
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let reply = match scripted {
            Some(reply) => reply,
            None => self.fallback.clone(),
        };
        reply.ok_or_else(|| RagError::ModelError {
            model: self.name.clone(),
            message: "scripted failure".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let model = MockChatModel::new("default").then(Some("first")).then(None);
        assert_eq!(model.invoke("a").await.unwrap(), "first");
        assert!(model.invoke("b").await.is_err());
        assert_eq!(model.invoke("c").await.unwrap(), "default");
        assert_eq!(model.prompts(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failing_model_always_errors() {
        let model = MockChatModel::failing();
        assert!(matches!(model.invoke("x").await, Err(RagError::ModelError { .. })));
    }
}
