//! Speakable queue built from a page document
//!
//! The queue is built once per page load and is immutable in length and
//! order afterwards; only item text may be rewritten in place, and only by
//! the code-block enrichment hook. Each built queue carries a monotonic
//! generation id so a late enrichment write can detect that it targets a
//! queue that has since been rebuilt.

use crate::dom::NodeId;
use serde::{Deserialize, Serialize};

/// Kind of a speakable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Title,
    Author,
    Summary,
    TagList,
    ChapterMarker,
    ChapterContent,
    Heading,
    SectionParagraph,
    SectionListItem,
    Code,
    Image,
    Embed,
    Link,
    GenericParagraph,
}

/// One speakable unit extracted from the page
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub kind: ItemKind,

    /// Display/speakable text; non-empty at insertion time. Rewritten in
    /// place by enrichment for code items only.
    pub text: String,

    /// Originating element, used for highlighting and scrolling only
    pub source: NodeId,

    /// Heading level (headings only)
    pub heading_level: Option<u8>,

    /// Chapter number (chapter markers and chapter content only)
    pub chapter_number: Option<u32>,

    /// Chapter element id (chapter markers only)
    pub chapter_id: Option<String>,

    /// Original code text (code items only, consumed by enrichment)
    pub code: Option<String>,

    /// Detected code language (code items only)
    pub language: Option<String>,
}

impl QueueItem {
    pub fn new(kind: ItemKind, text: &str, source: NodeId) -> Self {
        Self {
            kind,
            text: text.to_string(),
            source,
            heading_level: None,
            chapter_number: None,
            chapter_id: None,
            code: None,
            language: None,
        }
    }

    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = Some(level);
        self
    }

    pub fn with_chapter(mut self, number: u32) -> Self {
        self.chapter_number = Some(number);
        self
    }

    pub fn with_chapter_id(mut self, id: &str) -> Self {
        self.chapter_id = Some(id.to_string());
        self
    }

    pub fn with_code(mut self, code: &str, language: Option<&str>) -> Self {
        self.code = Some(code.to_string());
        self.language = language.map(|l| l.to_string());
        self
    }
}

/// Chapter entry reported to the host for chapter listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub text: String,
    pub number: u32,
    pub id: String,
}

/// Ordered sequence of queue items plus its build generation
#[derive(Debug, Clone, Default)]
pub struct Queue {
    pub items: Vec<QueueItem>,

    /// Monotonic build counter; enrichment writes tagged with an older
    /// generation are dropped.
    pub generation: u64,
}

impl Queue {
    pub fn new(generation: u64) -> Self {
        Self {
            items: Vec::new(),
            generation,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: QueueItem) {
        debug_assert!(!item.text.trim().is_empty(), "queue items carry text");
        self.items.push(item);
    }

    pub fn get(&self, idx: usize) -> Option<&QueueItem> {
        self.items.get(idx)
    }

    /// All chapter markers as host-facing chapter entries
    pub fn chapters(&self) -> Vec<ChapterInfo> {
        self.items
            .iter()
            .filter(|item| item.kind == ItemKind::ChapterMarker)
            .map(|item| {
                let number = item.chapter_number.unwrap_or(1);
                ChapterInfo {
                    text: item.text.clone(),
                    number,
                    id: item
                        .chapter_id
                        .clone()
                        .unwrap_or_else(|| format!("chapter-{}", number)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapters_listing() {
        let mut queue = Queue::new(1);
        queue.push(QueueItem::new(ItemKind::Title, "Story: T", NodeId(0)));
        queue.push(
            QueueItem::new(ItemKind::ChapterMarker, "Chapter 1", NodeId(1))
                .with_chapter(1)
                .with_chapter_id("chapter-1"),
        );
        queue.push(
            QueueItem::new(ItemKind::ChapterContent, "text", NodeId(2)).with_chapter(1),
        );
        queue.push(
            QueueItem::new(ItemKind::ChapterMarker, "Chapter 2: End", NodeId(3)).with_chapter(2),
        );

        let chapters = queue.chapters();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].id, "chapter-1");
        // Marker without an explicit id falls back to a derived one
        assert_eq!(chapters[1].id, "chapter-2");
        assert_eq!(chapters[1].text, "Chapter 2: End");
    }
}
