//! AI text service
//!
//! External collaborator that turns page text into explanations and
//! summaries. The playback engine only ever talks to the [`TextService`]
//! trait, fire-and-forget through the enrichment hook; it never blocks on
//! a response.

pub mod client;
pub mod enrich;

use crate::extract::snapshot::{FullContent, PageSnapshot};
use crate::Result;

/// AI text generation roles consumed by the reader
pub trait TextService: Send + Sync {
    /// Briefly explain a piece of page text
    fn explain(&self, text: &str) -> Result<String>;

    /// Explain a code snippet; successful replies carry a
    /// "Code Analysis: " prefix applied at the service layer
    fn explain_code(&self, code: &str, language: Option<&str>) -> Result<String>;

    /// Summarize a user text selection from the named site
    fn summarize_selection(&self, text: &str, site: &str) -> Result<String>;

    /// Structured whole-page summary shaped by the site variant
    fn site_summary(&self, content: &FullContent) -> Result<String>;

    /// Short summary of a quick page snapshot
    fn summarize(&self, snapshot: &PageSnapshot) -> Result<String>;
}
