//! Per-session conversational state.
//!
//! Nothing here is shared between sessions: the selected paper, the cached
//! context of the previous answer and the display history all belong to one
//! [`Session`], which callers pass by `&mut` into every turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question and the reply shown for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    /// What the user typed.
    pub query: String,
    /// What the assistant replied.
    pub response: String,
    /// When the reply was produced.
    pub at: DateTime<Utc>,
}

/// State of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Identifier attached to every log record of this session.
    pub id: Uuid,
    /// File name of the paper queries are scoped to.
    pub selected_document: Option<String>,
    /// Context block of the previous answer, used for follow-up prompts.
    pub last_context: Option<String>,
    /// Display-only history. Never fed back into prompts.
    pub history: Vec<Exchange>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a fresh session with a random id.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(), selected_document: None, last_context: None, history: Vec::new() }
    }

    /// Append an exchange to the display history.
    pub fn record(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.history.push(Exchange {
            query: query.into(),
            response: response.into(),
            at: Utc::now(),
        });
    }

    /// Clear the display history.
    ///
    /// The selected paper and the follow-up context are kept.
    pub fn close_conversation(&mut self) {
        self.history.clear();
    }
}
