//! Developer-article extraction
//!
//! Front matter (title, tag list, author), then one depth-first pass over
//! the article body. Each visited element emits at most one item, chosen by
//! tag with a fixed precedence and per-category minimum text lengths.

use crate::dom::{Document, Node};
use crate::extract::detect_code_language;
use crate::queue::{ItemKind, Queue, QueueItem};

/// Minimum code block length before it is worth explaining
pub const MIN_CODE_LEN: usize = 10;

pub fn extract(doc: &Document, queue: &mut Queue) {
    let body = doc.root();

    if let Some(title) = doc.find(|n| n.tag == "h1") {
        let text = doc.get(title).trimmed_text();
        if !text.is_empty() {
            queue.push(QueueItem::new(ItemKind::Title, text, body));
        }
    }

    let tags: Vec<String> = doc
        .find_all(|n| n.has_class("crayons-tag") || n.has_class("tag"))
        .into_iter()
        .map(|id| doc.get(id).trimmed_text().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        queue.push(QueueItem::new(
            ItemKind::TagList,
            &format!("Tags: {}", tags.join(", ")),
            body,
        ));
    }

    if let Some(author) = doc.find(|n| n.has_class("crayons-story__author")) {
        let text = doc.get(author).trimmed_text();
        if !text.is_empty() {
            queue.push(QueueItem::new(
                ItemKind::Author,
                &format!("Author: {}", text),
                body,
            ));
        }
    }

    let Some(main) = doc.find(|n| n.has_class("crayons-article__main")) else {
        return;
    };

    for id in doc.descendants(main) {
        let node = doc.get(id);
        if let Some(item) = classify(node, id) {
            queue.push(item);
        }
    }
}

/// Classify one body element into at most one queue item
fn classify(node: &Node, id: crate::dom::NodeId) -> Option<QueueItem> {
    let text = node.trimmed_text();

    match node.tag.as_str() {
        "h2" | "h3" | "h4" => {
            if text.len() > 2 {
                let level = node.tag[1..].parse::<u8>().ok()?;
                Some(QueueItem::new(ItemKind::Heading, text, id).with_heading_level(level))
            } else {
                None
            }
        }
        "p" => {
            if text.len() > 5 {
                Some(QueueItem::new(ItemKind::SectionParagraph, text, id))
            } else {
                None
            }
        }
        "li" => {
            if text.len() > 3 {
                Some(QueueItem::new(
                    ItemKind::SectionListItem,
                    &format!("List item: {}", text),
                    id,
                ))
            } else {
                None
            }
        }
        "pre" | "code" => {
            if text.len() > MIN_CODE_LEN {
                let language = detect_code_language(node);
                Some(
                    QueueItem::new(ItemKind::Code, &code_placeholder(language.as_deref()), id)
                        .with_code(text, language.as_deref()),
                )
            } else {
                None
            }
        }
        "img" => Some(QueueItem::new(ItemKind::Image, &image_text(node), id)),
        "iframe" => Some(QueueItem::new(ItemKind::Embed, &embed_text(node), id)),
        "a" => {
            // Embed-styled anchors are announced as embeds, not links
            if node.has_class("embed") {
                Some(QueueItem::new(ItemKind::Embed, &embed_text(node), id))
            } else if node.attr("href").is_some() && text.len() > 1 {
                Some(QueueItem::new(
                    ItemKind::Link,
                    &format!("Link: {}", text),
                    id,
                ))
            } else {
                None
            }
        }
        _ => {
            if node.has_class("embed") {
                Some(QueueItem::new(ItemKind::Embed, &embed_text(node), id))
            } else {
                None
            }
        }
    }
}

/// Placeholder spoken until enrichment rewrites the item
pub fn code_placeholder(language: Option<&str>) -> String {
    match language {
        Some(lang) => format!("Code snippet in {} - getting AI explanation...", lang),
        None => "Code snippet - getting AI explanation...".to_string(),
    }
}

/// Spoken description of an image: alt text, else source filename, else
/// a bare "Image"
fn image_text(node: &Node) -> String {
    if let Some(alt) = node.attr("alt") {
        let alt = alt.trim();
        if !alt.is_empty() {
            return format!("Image: {}", alt);
        }
    }
    if let Some(src) = node.attr("src") {
        let filename = src
            .rsplit('/')
            .next()
            .unwrap_or(src)
            .split('?')
            .next()
            .unwrap_or("");
        if !filename.is_empty() {
            return format!("Image: {}", filename);
        }
    }
    "Image".to_string()
}

/// Spoken description of embedded content, classified by known hosts
fn embed_text(node: &Node) -> String {
    let src = node.attr("src").or_else(|| node.attr("data-src"));
    let Some(src) = src else {
        return "Embedded content".to_string();
    };

    if src.contains("youtube.com") || src.contains("youtu.be") {
        "YouTube video embed".to_string()
    } else if src.contains("codepen.io") {
        "CodePen embed".to_string()
    } else if src.contains("twitter.com") {
        "Twitter embed".to_string()
    } else if src.contains("github.com") {
        "GitHub embed".to_string()
    } else {
        format!("External content embed from {}", host_of(src))
    }
}

/// Hostname portion of a URL, best effort
fn host_of(url: &str) -> &str {
    let rest = url.split("//").nth(1).unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_text_prefers_alt() {
        let with_alt = Node::element("img")
            .with_attr("alt", "A diagram")
            .with_attr("src", "/img/diagram.png?v=2");
        assert_eq!(image_text(&with_alt), "Image: A diagram");

        let src_only = Node::element("img").with_attr("src", "/img/diagram.png?v=2");
        assert_eq!(image_text(&src_only), "Image: diagram.png");

        let bare = Node::element("img");
        assert_eq!(image_text(&bare), "Image");
    }

    #[test]
    fn test_embed_classification() {
        let yt = Node::element("iframe").with_attr("src", "https://www.youtube.com/embed/x");
        assert_eq!(embed_text(&yt), "YouTube video embed");

        let pen = Node::element("iframe").with_attr("data-src", "https://codepen.io/pen/x");
        assert_eq!(embed_text(&pen), "CodePen embed");

        let other = Node::element("iframe").with_attr("src", "https://player.example.net/v/9");
        assert_eq!(embed_text(&other), "External content embed from player.example.net");

        let bare = Node::element("iframe");
        assert_eq!(embed_text(&bare), "Embedded content");
    }

    #[test]
    fn test_embed_class_anchor_is_not_a_link() {
        let anchor = Node::element("a")
            .with_class("embed")
            .with_attr("href", "https://codepen.io/pen/x")
            .with_attr("data-src", "https://codepen.io/pen/x")
            .with_text("View this pen");
        let item = classify(&anchor, crate::dom::NodeId(1)).unwrap();
        assert_eq!(item.kind, ItemKind::Embed);
        assert_eq!(item.text, "CodePen embed");

        let plain = Node::element("a")
            .with_attr("href", "https://example.com")
            .with_text("Read more");
        let item = classify(&plain, crate::dom::NodeId(1)).unwrap();
        assert_eq!(item.kind, ItemKind::Link);
    }

    #[test]
    fn test_code_placeholder() {
        assert_eq!(
            code_placeholder(Some("python")),
            "Code snippet in python - getting AI explanation..."
        );
        assert_eq!(
            code_placeholder(None),
            "Code snippet - getting AI explanation..."
        );
    }
}
