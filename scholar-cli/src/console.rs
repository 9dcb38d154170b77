//! Interactive console loop.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scholar_rag::{Session, StudyAssistant};
use tracing::{debug, warn};

pub const WELCOME: &str = "\n👋 **Welcome to AI Research Assistant!**";
pub const GOODBYE: &str = "👋 Goodbye! Have a great day!";
pub const PROMPT: &str = "\nSelect a document (number) or ask a query: ";
pub const CONVERSATION_CLOSED: &str = "Conversation closed. Start a new query!";
pub const EMPTY_HISTORY: &str = "No conversation yet.";

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Empty,
    /// `exit`, any case.
    Exit,
    /// `close`: clear the conversation history.
    Close,
    /// `history`: print the conversation so far.
    History,
    /// All-digit input: select by 1-based number, carried here 0-based.
    Select(i64),
    /// Anything else.
    Query(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if line.bytes().all(|b| b.is_ascii_digit()) {
            // Numbers beyond i64 still select nothing.
            let number = line.parse::<i64>().unwrap_or(i64::MAX);
            return Self::Select(number - 1);
        }
        match line.to_ascii_lowercase().as_str() {
            "exit" => Self::Exit,
            "close" => Self::Close,
            "history" => Self::History,
            _ => Self::Query(line.to_string()),
        }
    }
}

/// Format a model answer for display.
pub fn format_answer(answer: &str) -> String {
    format!("\n📝 **AI Response:**\n{answer}")
}

/// Render the session history, oldest first.
pub fn format_history(session: &Session) -> String {
    if session.history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    session
        .history
        .iter()
        .map(|e| format!("[{}]\nYou: {}\nAI: {}", e.at.format("%H:%M:%S"), e.query, e.response))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Handle one input. Returns `None` when the session should end.
pub async fn handle(
    assistant: &StudyAssistant,
    session: &mut Session,
    input: Input,
) -> Option<String> {
    match input {
        Input::Exit => None,
        Input::Empty => Some(String::new()),
        Input::Close => {
            session.close_conversation();
            Some(CONVERSATION_CLOSED.to_string())
        }
        Input::History => Some(format_history(session)),
        Input::Select(index) => Some(assistant.select_document(session, index).await),
        Input::Query(query) => Some(format_answer(&assistant.answer(session, &query).await)),
    }
}

/// Read lines until `exit`, end of input, or Ctrl-C.
pub async fn run(assistant: &StudyAssistant) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut session = Session::new();
    debug!(session = %session.id, "console session started");

    println!("{WELCOME}");
    println!("{}", assistant.list_papers().await);

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                return Err(e.into());
            }
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match handle(assistant, &mut session, Input::parse(&line)).await {
            Some(reply) if reply.is_empty() => {}
            Some(reply) => println!("{reply}"),
            None => break,
        }
    }

    println!("{GOODBYE}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use scholar_rag::{HashingEmbeddingProvider, InMemoryVectorStore, MockChatModel, messages};

    #[test]
    fn numbers_select_zero_based() {
        assert_eq!(Input::parse("1"), Input::Select(0));
        assert_eq!(Input::parse(" 12 "), Input::Select(11));
        assert_eq!(Input::parse("0"), Input::Select(-1));
        assert_eq!(Input::parse("99999999999999999999"), Input::Select(i64::MAX - 1));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(Input::parse("EXIT"), Input::Exit);
        assert_eq!(Input::parse("close"), Input::Close);
        assert_eq!(Input::parse("History"), Input::History);
        assert_eq!(Input::parse("   "), Input::Empty);
        assert_eq!(Input::parse("-1"), Input::Query("-1".to_string()));
        assert_eq!(Input::parse("exit now"), Input::Query("exit now".to_string()));
    }

    async fn assistant() -> StudyAssistant {
        let assistant = StudyAssistant::builder()
            .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .chat_model(Arc::new(MockChatModel::new("A grounded answer.")))
            .build()
            .unwrap();
        assistant.create_collection().await.unwrap();
        assistant
            .index_text("paper1.pdf", "Deep Learning Basics\nAlice, Bob\nLorem ipsum")
            .await
            .unwrap();
        assistant
    }

    #[tokio::test]
    async fn console_turns_select_answer_and_close() {
        let assistant = assistant().await;
        let mut session = Session::new();

        let reply = handle(&assistant, &mut session, Input::parse("2")).await.unwrap();
        assert_eq!(reply, messages::INVALID_SELECTION);

        let reply = handle(&assistant, &mut session, Input::parse("1")).await.unwrap();
        assert!(reply.contains("Deep Learning Basics"));

        let reply = handle(&assistant, &mut session, Input::parse("what is it?")).await.unwrap();
        assert_eq!(reply, format_answer("A grounded answer."));
        assert!(format_history(&session).contains("You: what is it?"));

        let reply = handle(&assistant, &mut session, Input::Close).await.unwrap();
        assert_eq!(reply, CONVERSATION_CLOSED);
        assert_eq!(format_history(&session), EMPTY_HISTORY);
        assert_eq!(session.selected_document.as_deref(), Some("paper1.pdf"));

        assert!(handle(&assistant, &mut session, Input::Exit).await.is_none());
    }
}
