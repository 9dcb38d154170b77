//! Answer generation and the per-turn log record.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::messages;
use crate::model::ChatModel;

/// Everything recorded about one generated answer.
#[derive(Debug, Clone, Copy)]
pub struct TurnRecord<'a> {
    pub session: Uuid,
    pub document: &'a str,
    pub query: &'a str,
    pub context: &'a str,
    pub prompt: &'a str,
}

/// Calls the chat model once per turn and never surfaces its errors.
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// The wrapped model.
    pub fn model(&self) -> &Arc<dyn ChatModel> {
        &self.model
    }

    /// Send the prompt and return the reply.
    ///
    /// A model error or a blank completion yields
    /// [`messages::GENERATION_FAILED`]. Every call emits one `info` event on
    /// the `scholar::turn` target.
    pub async fn generate(&self, turn: TurnRecord<'_>) -> String {
        let outcome = self.model.invoke(turn.prompt).await;
        let (response, failure) = match outcome {
            Ok(text) if !text.trim().is_empty() => (text, None),
            Ok(_) => {
                (messages::GENERATION_FAILED.to_string(), Some("empty completion".to_string()))
            }
            Err(e) => (messages::GENERATION_FAILED.to_string(), Some(e.to_string())),
        };

        if let Some(reason) = &failure {
            warn!(
                model = self.model.name(),
                session = %turn.session,
                error = %reason,
                "generation failed"
            );
        }

        info!(
            target: "scholar::turn",
            session = %turn.session,
            model = self.model.name(),
            document = turn.document,
            query = turn.query,
            context = turn.context,
            prompt = turn.prompt,
            response = %response,
            failure = failure.as_deref().unwrap_or(""),
            "turn completed"
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockChatModel;

    fn turn(prompt: &str) -> TurnRecord<'_> {
        TurnRecord {
            session: Uuid::nil(),
            document: "paper1.pdf",
            query: "q",
            context: "ctx",
            prompt,
        }
    }

    #[tokio::test]
    async fn returns_model_reply_and_sends_prompt_once() {
        let model = Arc::new(MockChatModel::new("the answer"));
        let generator = AnswerGenerator::new(model.clone());
        assert_eq!(generator.generate(turn("P")).await, "the answer");
        assert_eq!(model.prompts(), ["P"]);
    }

    #[tokio::test]
    async fn failure_and_blank_reply_become_fixed_message() {
        let generator = AnswerGenerator::new(Arc::new(MockChatModel::failing()));
        assert_eq!(generator.generate(turn("P")).await, messages::GENERATION_FAILED);

        let generator = AnswerGenerator::new(Arc::new(MockChatModel::new("  \n")));
        assert_eq!(generator.generate(turn("P")).await, messages::GENERATION_FAILED);
    }
}
