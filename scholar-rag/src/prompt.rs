//! Prompt construction.

use crate::followup::{FollowUpDetector, SubstringFollowUp};
use crate::retriever::RetrievedChunk;

const INSTRUCTIONS: &str = "\
You are an expert AI assistant trained on the given document excerpts. Your goal is to provide \
a well-structured, clear, and informative response that is easy to understand for everyone. \
Please follow the instructions below:

Instructions:
- First-time interaction: Greet the user warmly, introduce yourself, and kindly request them to select a document from the list.
- If the user greets: Respond with a friendly greeting, provide a brief introduction about yourself, and again ask them to select a document from the list.
- Think step-by-step to fully understand the query.
- Break the query down into sub-questions if needed.
- Focus on expanding the information related to the selected document.
- Retrieve context from the user's query for a better response.
- Use only the provided document excerpts for your response.
- If information is missing, state that clearly instead of guessing.
- For follow-up queries, check if the question relates to previous context. If yes, build on it; otherwise, answer independently based on the provided excerpts.
- Provide a detailed answer or elaboration when asked.
- If the user requests a summary, provide a concise and clear summary of the document excerpts, highlighting the key takeaways.
- If the user asks for more details, elaborate on the content already provided, offering deeper insights, examples, and clarifications.
- Use bullet points, analogies, or examples to make the information easy to follow.";

/// Render retrieved chunks as the context block shown to the model.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("📄 **{}** (Page {}):\n{}", c.title, c.page, c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Which template a prompt was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// The full instruction template over the fresh context.
    Fresh,
    /// The short elaboration template over the previous context.
    FollowUp,
}

/// A prompt ready to send to the chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub kind: PromptKind,
    pub text: String,
}

/// Chooses between the fresh and follow-up templates.
pub struct PromptComposer {
    follow_up: Box<dyn FollowUpDetector>,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(Box::new(SubstringFollowUp))
    }
}

impl PromptComposer {
    pub fn new(follow_up: Box<dyn FollowUpDetector>) -> Self {
        Self { follow_up }
    }

    /// Build the prompt for `query`.
    ///
    /// With a previous context that the detector accepts, the prompt asks to
    /// elaborate on that previous context and the fresh `context` is not sent.
    pub fn compose(&self, context: &str, query: &str, previous: Option<&str>) -> ComposedPrompt {
        match previous {
            Some(prior) if !prior.is_empty() && self.follow_up.is_follow_up(query, prior) => {
                ComposedPrompt {
                    kind: PromptKind::FollowUp,
                    text: format!("Elaborate on the previous answer:\n\n{prior}\n\n{query}"),
                }
            }
            _ => ComposedPrompt { kind: PromptKind::Fresh, text: fresh_prompt(context, query) },
        }
    }
}

fn fresh_prompt(context: &str, query: &str) -> String {
    format!(
        "{INSTRUCTIONS}\n\n\n### **Document Excerpts:**\n{context}\n\n---\n\n\
         ### **User Query:**\n{query}\n\n### **Final Answer:**\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::followup::ElaborationFollowUp;
    use crate::router::IntentRouter;

    fn chunk(title: &str, page: usize, text: &str) -> RetrievedChunk {
        RetrievedChunk { title: title.to_string(), page, text: text.to_string(), score: 1.0 }
    }

    #[test]
    fn context_blocks_are_separated_by_blank_lines() {
        let context = format_context(&[chunk("Attention", 1, "alpha"), chunk("Attention", 3, "beta")]);
        assert_eq!(context, "📄 **Attention** (Page 1):\nalpha\n\n📄 **Attention** (Page 3):\nbeta");
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn fresh_prompt_contains_excerpts_and_query() {
        let prompt = PromptComposer::default().compose("CTX", "what is it?", None);
        assert_eq!(prompt.kind, PromptKind::Fresh);
        assert!(prompt.text.starts_with("You are an expert AI assistant"));
        assert!(prompt.text.contains("### **Document Excerpts:**\nCTX"));
        assert!(prompt.text.contains("### **User Query:**\nwhat is it?"));
        assert!(prompt.text.trim_end().ends_with("### **Final Answer:**"));
    }

    #[test]
    fn substring_of_previous_context_is_a_follow_up() {
        let prompt = PromptComposer::default().compose("NEW", "y", Some("X Y Z"));
        assert_eq!(prompt.kind, PromptKind::FollowUp);
        assert_eq!(prompt.text, "Elaborate on the previous answer:\n\nX Y Z\n\ny");
    }

    #[test]
    fn unrelated_query_gets_fresh_prompt() {
        let prompt = PromptComposer::default().compose("NEW", "transformers", Some("X Y Z"));
        assert_eq!(prompt.kind, PromptKind::Fresh);
        assert!(prompt.text.contains("NEW"));
        assert!(!prompt.text.contains("X Y Z"));
    }

    #[test]
    fn empty_previous_context_never_triggers_follow_up() {
        let composer = PromptComposer::new(Box::new(ElaborationFollowUp::new(
            IntentRouter::new().unwrap(),
        )));
        assert_eq!(composer.compose("NEW", "explain more", Some("")).kind, PromptKind::Fresh);
        assert_eq!(composer.compose("NEW", "explain more", Some("abc")).kind, PromptKind::FollowUp);
    }
}
