//! Site-shaped content snapshots
//!
//! Read-only views of the page handed back to the host, which forwards
//! them to the AI text service for summarization. The quick snapshot is
//! site-agnostic; the full snapshot follows the page's site shape.

use crate::dom::{Document, NodeId};
use crate::extract::{detect_code_language, SiteVariant};
use serde::{Deserialize, Serialize};

/// Quick site-agnostic snapshot: title, leading headings, main prose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub title: String,
    pub headings: Vec<String>,
    pub content: String,
}

/// One chapter of an archive work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterText {
    pub title: String,
    pub content: String,
}

/// One code block of an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

/// Full site-shaped content snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FullContent {
    #[serde(rename_all = "camelCase")]
    Archive {
        title: String,
        author: String,
        summary: String,
        tags: Vec<String>,
        rating: String,
        warnings: Vec<String>,
        chapters: Vec<ChapterText>,
        total_words: usize,
    },
    #[serde(rename_all = "camelCase")]
    Article {
        title: String,
        author: String,
        tags: Vec<String>,
        publish_date: String,
        sections: Vec<String>,
        code_blocks: Vec<CodeBlock>,
        total_words: usize,
    },
    #[serde(rename_all = "camelCase")]
    Generic {
        title: String,
        headings: Vec<String>,
        content: Vec<String>,
        total_words: usize,
    },
}

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Quick snapshot: first ten headings plus paragraphs of substance
pub fn page_content(doc: &Document) -> PageSnapshot {
    let headings: Vec<String> = doc
        .find_all(|n| HEADING_TAGS.contains(&n.tag.as_str()))
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| !t.is_empty())
        .take(10)
        .collect();

    let paragraphs: Vec<String> = doc
        .find_all(|n| n.tag == "p")
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| t.len() > 50)
        .take(20)
        .collect();

    PageSnapshot {
        title: doc.title.clone(),
        headings,
        content: paragraphs.join("\n\n"),
    }
}

/// Full snapshot shaped by the page's site variant
pub fn full_content(doc: &Document, variant: SiteVariant) -> FullContent {
    match variant {
        SiteVariant::Archive => archive_content(doc),
        SiteVariant::Article => article_content(doc),
        SiteVariant::Generic => generic_content(doc),
    }
}

fn text_of(doc: &Document, id: Option<NodeId>) -> String {
    id.map(|n| doc.get(n).trimmed_text().to_string())
        .unwrap_or_default()
}

fn word_count(parts: &[String]) -> usize {
    parts
        .iter()
        .map(|p| p.split_whitespace().count())
        .sum()
}

fn archive_content(doc: &Document) -> FullContent {
    let title = text_of(
        doc,
        doc.find(|n| {
            (n.has_class("title") && n.has_class("heading"))
                || (n.tag == "h2" && n.has_class("title"))
        }),
    );

    let author = doc
        .find(|n| n.has_class("byline"))
        .and_then(|byline| {
            doc.find_in(byline, |n| n.tag == "a" && n.attr("rel") == Some("author"))
        })
        .map(|id| doc.get(id).trimmed_text().to_string())
        .unwrap_or_default();

    let summary = doc
        .find(|n| n.has_class("summary"))
        .and_then(|s| doc.find_in(s, |n| n.has_class("userstuff")))
        .map(|id| doc.get(id).trimmed_text().to_string())
        .unwrap_or_default();

    let tags: Vec<String> = doc
        .find_all(|n| n.has_class("tag"))
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let rating = text_of(doc, doc.find(|n| n.has_class("rating")));

    let warnings: Vec<String> = doc
        .find(|n| n.has_class("warnings"))
        .map(|w| {
            doc.find_all_in(w, |n| n.has_class("tag"))
                .into_iter()
                .map(|id| doc.get(id).trimmed_text().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut chapters = Vec::new();
    if let Some(container) = doc.by_id("chapters") {
        let chapter_nodes = doc.find_all_in(container, |n| n.id.starts_with("chapter-"));
        for (index, &chapter) in chapter_nodes.iter().enumerate() {
            let chapter_title = doc
                .find_in(chapter, |n| {
                    (n.tag == "h3" && n.has_class("title")) || n.has_class("title")
                })
                .map(|id| doc.get(id).trimmed_text().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("Chapter {}", index + 1));

            let paragraphs: Vec<String> = doc
                .find_all_in(chapter, |n| n.has_class("userstuff"))
                .into_iter()
                .flat_map(|us| doc.find_all_in(us, |n| n.tag == "p"))
                .map(|id| doc.get(id).trimmed_text().to_string())
                .filter(|t| !t.is_empty())
                .collect();

            chapters.push(ChapterText {
                title: chapter_title,
                content: paragraphs.join("\n\n"),
            });
        }
    } else {
        // Single-chapter works have no chapters container; the body lives
        // in the workskin region or a userstuff module
        let paragraphs: Vec<String> = doc
            .find_all(|n| {
                n.id == "workskin" || (n.has_class("userstuff") && n.has_class("module"))
            })
            .into_iter()
            .flat_map(|scope| doc.find_all_in(scope, |n| n.tag == "p"))
            .map(|id| doc.get(id).trimmed_text().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        chapters.push(ChapterText {
            title: "Chapter 1".to_string(),
            content: paragraphs.join("\n\n"),
        });
    }

    let total_words = chapters
        .iter()
        .map(|ch| ch.content.split_whitespace().count())
        .sum();

    FullContent::Archive {
        title,
        author,
        summary,
        tags,
        rating,
        warnings,
        chapters,
        total_words,
    }
}

fn article_content(doc: &Document) -> FullContent {
    let title = text_of(doc, doc.find(|n| n.tag == "h1"));
    let author = text_of(doc, doc.find(|n| n.has_class("crayons-story__author")));

    let tags: Vec<String> = doc
        .find_all(|n| n.has_class("crayons-tag") || n.has_class("tag"))
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let publish_date = text_of(
        doc,
        doc.find(|n| n.tag == "time" && n.attr("datetime").is_some()),
    );

    let mut sections = Vec::new();
    let mut code_blocks = Vec::new();

    if let Some(main) = doc.find(|n| n.has_class("crayons-article__main")) {
        for id in doc.find_all_in(main, |n| matches!(n.tag.as_str(), "h2" | "h3" | "h4")) {
            let text = doc.get(id).trimmed_text();
            if !text.is_empty() {
                sections.push(text.to_string());
            }
        }
        for id in doc.find_all_in(main, |n| n.tag == "p") {
            let text = doc.get(id).trimmed_text();
            if !text.is_empty() {
                sections.push(text.to_string());
            }
        }
        for id in doc.find_all_in(main, |n| n.tag == "li") {
            let text = doc.get(id).trimmed_text();
            if !text.is_empty() {
                sections.push(text.to_string());
            }
        }
        for id in doc.find_all_in(main, |n| matches!(n.tag.as_str(), "pre" | "code")) {
            let node = doc.get(id);
            let code = node.trimmed_text();
            if code.len() > crate::extract::article::MIN_CODE_LEN {
                code_blocks.push(CodeBlock {
                    language: detect_code_language(node),
                    code: code.to_string(),
                });
            }
        }
    }

    let total_words = word_count(&sections);

    FullContent::Article {
        title,
        author,
        tags,
        publish_date,
        sections,
        code_blocks,
        total_words,
    }
}

fn generic_content(doc: &Document) -> FullContent {
    let headings: Vec<String> = doc
        .find_all(|n| HEADING_TAGS.contains(&n.tag.as_str()))
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let content: Vec<String> = doc
        .find_all(|n| n.tag == "p")
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| t.len() > 20)
        .collect();

    let total_words = word_count(&content);

    FullContent::Generic {
        title: doc.title.clone(),
        headings,
        content,
        total_words,
    }
}
