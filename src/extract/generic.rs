//! Generic page extraction
//!
//! The fallback for unrecognized sites: the page title followed by every
//! paragraph with more than a few words' worth of text.

use crate::dom::Document;
use crate::queue::{ItemKind, Queue, QueueItem};

/// Paragraphs at or below this trimmed length are skipped
const MIN_PARAGRAPH_LEN: usize = 10;

pub fn extract(doc: &Document, queue: &mut Queue) {
    let body = doc.root();

    let title = doc.title.trim();
    if !title.is_empty() {
        queue.push(QueueItem::new(ItemKind::Title, title, body));
    }

    for p in doc.find_all(|n| n.tag == "p") {
        let text = doc.get(p).trimmed_text();
        if text.len() > MIN_PARAGRAPH_LEN {
            queue.push(QueueItem::new(ItemKind::GenericParagraph, text, p));
        }
    }
}
