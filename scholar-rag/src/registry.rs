//! The ordered list of processed papers.

use serde::{Deserialize, Serialize};

use crate::messages;
use crate::session::Session;

/// One processed paper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaperRecord {
    /// Best-effort title.
    pub title: String,
    /// File name; unique within the registry.
    pub filename: String,
    /// Best-effort author line.
    pub authors: String,
    /// Number of chunks written to the vector store for this paper.
    pub chunk_count: usize,
}

/// Papers in processing order; the order is also the display order.
#[derive(Debug, Clone, Default)]
pub struct PaperRegistry {
    papers: Vec<PaperRecord>,
}

impl PaperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paper, or replace the record with the same filename in place.
    ///
    /// Returns the record it replaced, if any.
    pub fn register(&mut self, record: PaperRecord) -> Option<PaperRecord> {
        match self.papers.iter_mut().find(|p| p.filename == record.filename) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.papers.push(record);
                None
            }
        }
    }

    /// All papers in display order.
    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    /// The paper at a 0-based position.
    pub fn get(&self, index: usize) -> Option<&PaperRecord> {
        self.papers.get(index)
    }

    /// The paper registered under `filename`.
    pub fn find(&self, filename: &str) -> Option<&PaperRecord> {
        self.papers.iter().find(|p| p.filename == filename)
    }

    /// Number of registered papers.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether no paper has been registered.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Human-readable numbered listing, `"<n>. <title> (<filename>)"` per line.
    pub fn list_papers(&self) -> String {
        if self.papers.is_empty() {
            return messages::NO_PAPERS.to_string();
        }
        let lines: Vec<String> = self
            .papers
            .iter()
            .enumerate()
            .map(|(i, paper)| format!("{}. {} ({})", i + 1, paper.title, paper.filename))
            .collect();
        format!(
            "{}\n{}\n\n{}",
            messages::PAPER_LIST_HEADER,
            lines.join("\n"),
            messages::PAPER_LIST_FOOTER
        )
    }

    /// Select the paper at a 0-based `index` for `session`.
    ///
    /// Negative or out-of-range indexes leave the session untouched and
    /// return [`messages::INVALID_SELECTION`].
    pub fn select_document(&self, session: &mut Session, index: i64) -> String {
        let paper = usize::try_from(index).ok().and_then(|i| self.papers.get(i));
        match paper {
            Some(paper) => {
                session.selected_document = Some(paper.filename.clone());
                messages::selected(&paper.title)
            }
            None => messages::INVALID_SELECTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, filename: &str) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            filename: filename.to_string(),
            authors: "Alice, Bob".to_string(),
            chunk_count: 1,
        }
    }

    fn registry() -> PaperRegistry {
        let mut registry = PaperRegistry::new();
        registry.register(record("Deep Learning Basics", "paper1.pdf"));
        registry.register(record("Graph Networks", "paper2.pdf"));
        registry
    }

    #[test]
    fn empty_registry_lists_no_papers() {
        assert_eq!(PaperRegistry::new().list_papers(), messages::NO_PAPERS);
    }

    #[test]
    fn listing_is_numbered_from_one_in_insertion_order() {
        let listing = registry().list_papers();
        assert!(listing.starts_with(messages::PAPER_LIST_HEADER));
        assert!(
            listing.contains("1. Deep Learning Basics (paper1.pdf)\n2. Graph Networks (paper2.pdf)")
        );
        assert!(listing.ends_with(messages::PAPER_LIST_FOOTER));
    }

    #[test]
    fn valid_selection_sets_the_session_document() {
        let registry = registry();
        let mut session = Session::new();
        let reply = registry.select_document(&mut session, 1);
        assert_eq!(session.selected_document.as_deref(), Some("paper2.pdf"));
        assert!(reply.contains("**Graph Networks**"));
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let registry = registry();
        let mut session = Session::new();
        registry.select_document(&mut session, 0);

        for index in [-1, 2, 99, i64::MIN] {
            let reply = registry.select_document(&mut session, index);
            assert_eq!(reply, messages::INVALID_SELECTION);
            assert_eq!(session.selected_document.as_deref(), Some("paper1.pdf"));
            assert_eq!(registry.len(), 2);
        }
    }

    #[test]
    fn reregistering_a_filename_replaces_in_place() {
        let mut registry = registry();
        let old = registry.register(record("Deep Learning, Revised", "paper1.pdf"));
        assert_eq!(old.map(|r| r.title), Some("Deep Learning Basics".to_string()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().title, "Deep Learning, Revised");
        assert!(registry.find("paper2.pdf").is_some());
    }
}
