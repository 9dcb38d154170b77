//! Fixed user-facing replies.
//!
//! Every non-answer outcome of a turn is one of these strings, so front ends
//! can print replies verbatim and tests can compare them exactly.

/// The registry is empty.
pub const NO_PAPERS: &str =
    "❌ No research papers found. Please add PDFs to the input folder and index them.";

/// Selection index outside the registry.
pub const INVALID_SELECTION: &str = "❌ Invalid selection. Please choose a valid document number.";

/// A content query arrived before any document was selected.
pub const NO_DOCUMENT_SELECTED: &str =
    "❌ No document selected. Please choose a document before asking queries.";

/// The vector search returned nothing at all.
pub const NO_RELEVANT_INFORMATION: &str =
    "❌ No relevant information found in the selected document.";

/// The nearest chunks all belong to other documents.
pub const NO_MATCHING_CONTENT: &str = "❌ No matching content found in the selected document.";

/// The chat model errored or returned nothing usable.
pub const GENERATION_FAILED: &str = "❌ The language model failed to generate a response.";

/// Prefix of the reply shown when retrieval itself failed.
pub const RETRIEVAL_FAILED: &str = "❌ Could not search the paper index";

/// Header of the paper listing.
pub const PAPER_LIST_HEADER: &str = "📚 **Available Research Papers:**";

/// Footer of the paper listing.
pub const PAPER_LIST_FOOTER: &str = "Enter the document number to select.";

/// Confirmation of a successful selection.
pub fn selected(title: &str) -> String {
    format!("✅ You selected: **{title}**\nNow, ask your query related to this document!")
}
