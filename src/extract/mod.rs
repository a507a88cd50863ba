//! Site-aware content extraction
//!
//! Turns a page document into the ordered queue of speakable units. The
//! site variant is chosen once per page load from the hostname and passed
//! explicitly; it also owns the item matchers used by structural
//! navigation, so navigation never re-inspects the hostname.

pub mod archive;
pub mod article;
pub mod generic;
pub mod snapshot;

use crate::dom::{Document, Node};
use crate::queue::{ItemKind, Queue, QueueItem};
use log::debug;
use serde::{Deserialize, Serialize};

/// Extraction/navigation policy for one supported site shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteVariant {
    /// Fan-fiction archive: chaptered works with title/author/summary front matter
    Archive,
    /// Developer-article site: tagged articles with headings, lists, and code
    Article,
    /// Anything else: title plus plain paragraphs
    Generic,
}

impl SiteVariant {
    /// Pick the variant for a hostname, once per page load
    pub fn detect(hostname: &str) -> Self {
        if hostname.contains("archiveofourown.org") {
            SiteVariant::Archive
        } else if hostname.contains("dev.to") {
            SiteVariant::Article
        } else {
            SiteVariant::Generic
        }
    }

    /// Does this item stop heading navigation on this site shape?
    ///
    /// The article variant only treats levels 2-4 as navigable headings.
    pub fn matches_heading(&self, item: &QueueItem) -> bool {
        match self {
            SiteVariant::Article => {
                item.kind == ItemKind::Heading
                    && matches!(item.heading_level, Some(level) if (2..=4).contains(&level))
            }
            _ => item.kind == ItemKind::Heading,
        }
    }

    /// Does this item stop section navigation on this site shape?
    pub fn matches_section(&self, item: &QueueItem) -> bool {
        match self {
            SiteVariant::Article => matches!(
                item.kind,
                ItemKind::SectionParagraph | ItemKind::SectionListItem
            ),
            _ => matches!(
                item.kind,
                ItemKind::ChapterContent | ItemKind::GenericParagraph
            ),
        }
    }
}

/// Build the speakable queue for a page
///
/// Pure function of the document: re-running against an unchanged document
/// yields an identical queue. Empty or near-empty text is filtered during
/// extraction, so every emitted item carries non-empty text.
pub fn build_queue(doc: &Document, variant: SiteVariant, generation: u64) -> Queue {
    let mut queue = Queue::new(generation);

    match variant {
        SiteVariant::Archive => archive::extract(doc, &mut queue),
        SiteVariant::Article => article::extract(doc, &mut queue),
        SiteVariant::Generic => generic::extract(doc, &mut queue),
    }

    debug!(
        "Built queue: {} items for {:?} variant (generation {})",
        queue.len(),
        variant,
        generation
    );
    queue
}

/// Languages recognized in code block class names
const CODE_LANGUAGES: &[&str] = &[
    "javascript",
    "python",
    "java",
    "css",
    "html",
    "json",
    "sql",
    "bash",
    "typescript",
    "react",
    "vue",
    "go",
    "rust",
    "php",
    "ruby",
];

/// Detect the language of a code block from its class list or
/// `data-language` attribute
pub fn detect_code_language(node: &Node) -> Option<String> {
    let classes = node.classes.join(" ").to_ascii_lowercase();
    for &lang in CODE_LANGUAGES {
        if classes.contains(lang) {
            return Some(lang.to_string());
        }
    }
    node.attr("data-language").map(|l| l.to_string())
}
