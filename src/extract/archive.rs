//! Fan-fiction archive extraction
//!
//! Front matter first (title, author, summary), then per chapter a marker
//! item followed by one item per paragraph of the chapter body. Chapters
//! live under a `#chapters` container and are discovered by their stable
//! `chapter-` id prefix.

use crate::dom::{Document, NodeId};
use crate::queue::{ItemKind, Queue, QueueItem};

/// Minimum paragraph length; shorter chapter paragraphs are skipped
const MIN_PARAGRAPH_LEN: usize = 5;

pub fn extract(doc: &Document, queue: &mut Queue) {
    let body = doc.root();

    if let Some(title) = doc.find(|n| {
        (n.has_class("title") && n.has_class("heading")) || (n.tag == "h2" && n.has_class("title"))
    }) {
        let text = doc.get(title).trimmed_text();
        if !text.is_empty() {
            queue.push(QueueItem::new(
                ItemKind::Title,
                &format!("Story: {}", text),
                body,
            ));
        }
    }

    if let Some(byline) = doc.find(|n| n.has_class("byline")) {
        if let Some(author) = doc.find_in(byline, |n| n.tag == "a" && n.attr("rel") == Some("author"))
        {
            let text = doc.get(author).trimmed_text();
            if !text.is_empty() {
                queue.push(QueueItem::new(
                    ItemKind::Author,
                    &format!("By {}", text),
                    body,
                ));
            }
        }
    }

    if let Some(summary) = doc.find(|n| n.has_class("summary")) {
        if let Some(blurb) = doc.find_in(summary, |n| n.has_class("userstuff")) {
            let text = doc.get(blurb).trimmed_text();
            if !text.is_empty() {
                queue.push(QueueItem::new(
                    ItemKind::Summary,
                    &format!("Summary: {}", text),
                    body,
                ));
            }
        }
    }

    let Some(container) = doc.by_id("chapters") else {
        return;
    };

    let chapters: Vec<NodeId> = doc.find_all_in(container, |n| n.id.starts_with("chapter-"));
    for (index, &chapter) in chapters.iter().enumerate() {
        let number = (index + 1) as u32;
        queue.push(
            QueueItem::new(ItemKind::ChapterMarker, &marker_text(doc, chapter, number), chapter)
                .with_chapter(number)
                .with_chapter_id(&doc.get(chapter).id),
        );

        for userstuff in doc.find_all_in(chapter, |n| n.has_class("userstuff")) {
            for p in doc.find_all_in(userstuff, |n| n.tag == "p") {
                let text = doc.get(p).trimmed_text();
                if text.len() > MIN_PARAGRAPH_LEN {
                    queue.push(
                        QueueItem::new(ItemKind::ChapterContent, text, p).with_chapter(number),
                    );
                }
            }
        }
    }
}

/// Spoken text for a chapter marker: "Chapter N", plus the chapter's own
/// title unless it is the archive's placeholder "Chapter Text"
fn marker_text(doc: &Document, chapter: NodeId, number: u32) -> String {
    let title = doc
        .find_in(chapter, |n| {
            (n.tag == "h3" && n.has_class("title")) || n.has_class("title")
        })
        .map(|id| doc.get(id).trimmed_text().to_string())
        .unwrap_or_default();

    if !title.is_empty() && title != "Chapter Text" {
        format!("Chapter {}: {}", number, title)
    } else {
        format!("Chapter {}", number)
    }
}
