//! Title and author guessing.
//!
//! Papers rarely carry reliable embedded metadata, so the assistant guesses
//! from the first lines of the extracted text. The guess sits behind
//! [`MetadataExtractor`] so a real document parser can replace it without
//! touching the indexer.

use crate::document::PaperMetadata;

/// Title used when the text has no lines at all.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author line used when the text has fewer than two lines.
pub const UNKNOWN_AUTHORS: &str = "Unknown Authors";

/// Derives [`PaperMetadata`] from extracted text. Must never fail.
pub trait MetadataExtractor: Send + Sync {
    /// Guess the title and authors of a paper from its text.
    fn extract(&self, text: &str) -> PaperMetadata;
}

/// Takes the first non-blank line as the title and the second as the authors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLinesExtractor;

impl MetadataExtractor for FirstLinesExtractor {
    fn extract(&self, text: &str) -> PaperMetadata {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        let title = lines.next().unwrap_or(UNKNOWN_TITLE).to_string();
        let authors = lines.next().unwrap_or(UNKNOWN_AUTHORS).to_string();
        PaperMetadata { title, authors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_falls_back_to_both_defaults() {
        let meta = FirstLinesExtractor.extract("");
        assert_eq!(meta.title, UNKNOWN_TITLE);
        assert_eq!(meta.authors, UNKNOWN_AUTHORS);

        let meta = FirstLinesExtractor.extract("\n  \n\t\n");
        assert_eq!(meta.title, UNKNOWN_TITLE);
        assert_eq!(meta.authors, UNKNOWN_AUTHORS);
    }

    #[test]
    fn single_line_has_unknown_authors() {
        let meta = FirstLinesExtractor.extract("  Attention Is All You Need  ");
        assert_eq!(meta.title, "Attention Is All You Need");
        assert_eq!(meta.authors, UNKNOWN_AUTHORS);
    }

    #[test]
    fn first_two_lines_are_title_and_authors() {
        let meta =
            FirstLinesExtractor.extract("Deep Learning Basics\nAlice, Bob\nLorem ipsum dolor");
        assert_eq!(meta.title, "Deep Learning Basics");
        assert_eq!(meta.authors, "Alice, Bob");
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let meta = FirstLinesExtractor.extract("\n\r\nGraph Networks\r\n\r\nCarol\n");
        assert_eq!(meta.title, "Graph Networks");
        assert_eq!(meta.authors, "Carol");
    }
}
