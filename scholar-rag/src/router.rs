//! Intent classification for incoming user text.
//!
//! The pattern tables are plain data so they can be inspected and tested on
//! their own. Matching is case-insensitive and unanchored: a pattern matches
//! anywhere in the query, so `"listing"` or `"menus"` count as menu requests.

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

use crate::error::{RagError, Result};

/// Requests to see the paper list or go back to it.
pub const MENU_PATTERNS: &[&str] = &[
    // "list all documents", "show papers"
    r"(list|show)\s*(all)?\s*(documents|papers)",
    // "go to main menu", "return to document list"
    r"(go|return)\s*to\s*(main\s*menu|document\s*list)",
    // "documents list", "papers menu"
    r"(documents|papers)\s*(list|menu)",
    // bare "list" / "menu"
    r"(list|menu)",
];

/// Requests to elaborate on the previous answer.
pub const ELABORATION_PATTERNS: &[&str] =
    &[r"(elaborate|explain|expand|more details?)\s*(on)?\s*(.*)"];

/// What a turn should do with the user's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Show the paper list; no retrieval and no model call.
    Menu,
    /// Refuse: no paper has been selected yet.
    NoSelection,
    /// Retrieve and answer.
    Content,
}

/// Compiled intent tables.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    menu: RegexSet,
    elaboration: Vec<Regex>,
}

impl IntentRouter {
    /// Compile the built-in [`MENU_PATTERNS`] and [`ELABORATION_PATTERNS`].
    pub fn new() -> Result<Self> {
        Self::with_patterns(MENU_PATTERNS, ELABORATION_PATTERNS)
    }

    /// Compile custom pattern tables (case-insensitive).
    pub fn with_patterns(menu: &[&str], elaboration: &[&str]) -> Result<Self> {
        let menu = RegexSetBuilder::new(menu)
            .case_insensitive(true)
            .build()
            .map_err(|e| RagError::ConfigError(format!("invalid menu pattern: {e}")))?;
        let elaboration = elaboration
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern).case_insensitive(true).build().map_err(|e| {
                    RagError::ConfigError(format!("invalid elaboration pattern: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { menu, elaboration })
    }

    /// Whether the text asks for the paper list.
    pub fn is_menu_request(&self, query: &str) -> bool {
        self.menu.is_match(query)
    }

    /// Whether the text asks to elaborate on something.
    pub fn is_elaboration_request(&self, query: &str) -> bool {
        self.elaboration.iter().any(|pattern| pattern.is_match(query))
    }

    /// Classify a query: menu intent first, then the no-selection guard.
    pub fn route(&self, query: &str, has_selection: bool) -> Route {
        if self.is_menu_request(query) {
            Route::Menu
        } else if !has_selection {
            Route::NoSelection
        } else {
            Route::Content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> IntentRouter {
        IntentRouter::new().unwrap()
    }

    #[test]
    fn menu_phrases_route_to_menu() {
        let router = router();
        for query in ["list", "menu", "show papers", "list all documents", "go to main menu"] {
            assert_eq!(router.route(query, true), Route::Menu, "{query}");
        }
        for query in ["Return to document list", "PAPERS MENU", "documents list"] {
            assert!(router.is_menu_request(query), "{query}");
        }
    }

    #[test]
    fn matching_is_unanchored() {
        let router = router();
        assert!(router.is_menu_request("listing"));
        assert!(router.is_menu_request("what does the menu of options look like"));
        assert!(!router.is_menu_request("what is backpropagation?"));
    }

    #[test]
    fn menu_wins_over_missing_selection() {
        assert_eq!(router().route("show papers", false), Route::Menu);
    }

    #[test]
    fn content_requires_a_selection() {
        let router = router();
        assert_eq!(router.route("summarise the method", false), Route::NoSelection);
        assert_eq!(router.route("summarise the method", true), Route::Content);
    }

    #[test]
    fn elaboration_is_recognised_but_does_not_change_routing() {
        let router = router();
        assert!(router.is_elaboration_request("Please elaborate on the results"));
        assert!(router.is_elaboration_request("more detail"));
        assert!(!router.is_elaboration_request("summarise"));
        assert_eq!(router.route("explain the results", true), Route::Content);
    }

    #[test]
    fn custom_tables_are_compiled_independently() {
        let router = IntentRouter::with_patterns(&[r"^index$"], &[]).unwrap();
        assert!(router.is_menu_request("INDEX"));
        assert!(!router.is_menu_request("list"));
        assert!(!router.is_elaboration_request("explain"));
        assert!(IntentRouter::with_patterns(&["("], &[]).is_err());
    }
}
