//! Chat-completion model abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A hosted chat model taking one user prompt and returning its completion.
///
/// Implementations must be `Send + Sync` so they can be shared across tasks.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model name, used in log records.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the completion text.
    async fn invoke(&self, prompt: &str) -> Result<String>;
}
