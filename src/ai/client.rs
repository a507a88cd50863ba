//! Groq chat-completions client
//!
//! Blocking HTTP client for the AI text service, used from enrichment
//! worker threads and from the host's summary requests. A rate-limited
//! call (HTTP 429) is retried once after a short wait; any other failure
//! is returned to the caller, which degrades gracefully.

use crate::ai::TextService;
use crate::extract::snapshot::{FullContent, PageSnapshot};
use crate::{ReaderError, Result};
use log::debug;
use serde_json::{json, Value};
use std::thread;
use std::time::Duration;

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MODEL: &str = "llama-3.1-8b-instant";

/// Wait before the single retry after a 429
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);

/// Groq-backed text service
pub struct GroqClient {
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
        }
    }

    fn post(&self, body: &Value) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        ureq::post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(body)
    }

    /// Run one chat completion and return the trimmed reply text
    fn chat(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let body = json!({
            "model": MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let mut response = match self.post(&body) {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(429)) => {
                debug!("Rate limited, retrying once after {:?}", RATE_LIMIT_BACKOFF);
                thread::sleep(RATE_LIMIT_BACKOFF);
                self.post(&body)
                    .map_err(|e| ReaderError::Service(format!("API error: {}", e)))?
            }
            Err(e) => return Err(ReaderError::Service(format!("API error: {}", e))),
        };

        let data: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ReaderError::Service(format!("Malformed API response: {}", e)))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .ok_or_else(|| ReaderError::Service("No text generated".into()))
    }
}

/// First `limit` characters of text, for prompt size control
fn clip(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

impl TextService for GroqClient {
    fn explain(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ReaderError::Service("No text provided".into()));
        }
        self.chat(
            &format!("Explain briefly: \"{}\"", clip(text, 500)),
            100,
            0.3,
        )
    }

    fn explain_code(&self, code: &str, language: Option<&str>) -> Result<String> {
        if code.trim().is_empty() {
            return Err(ReaderError::Service("No code provided".into()));
        }

        let lang = language.unwrap_or("code");
        let prompt = format!(
            "Analyze this {lang} snippet in detail:\n\n\
             CODE:\n{code}\n\n\
             CONTEXT: Code from web article\n\n\
             Provide a comprehensive analysis including:\n\
             1. Programming Language: {lang_line}\n\
             2. Implementation Details: How the code works step by step\n\
             3. Use Cases: When and why you would use this code\n\
             4. Efficiency: Time/space complexity and performance considerations\n\
             5. Best Practices: Code quality and potential improvements\n\
             6. Key Concepts: Important programming concepts demonstrated\n\n\
             Make it accessible and educational for screen reader users.",
            lang = lang,
            code = code,
            lang_line = language.unwrap_or("Identify the language"),
        );

        let explanation = self.chat(&prompt, 600, 0.7)?;
        Ok(format!("Code Analysis: {}", explanation))
    }

    fn summarize_selection(&self, text: &str, site: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ReaderError::Service("No text provided".into()));
        }

        let prompt = format!(
            "Summarize this selected text from {site} for accessibility users:\n\n\
             SELECTED TEXT:\n{text}\n\n\
             Provide a clear, concise summary that captures the main points and key \
             information. Make it well-structured and easy to understand when read aloud.",
        );
        self.chat(&prompt, 400, 0.7)
    }

    fn site_summary(&self, content: &FullContent) -> Result<String> {
        let prompt = match content {
            FullContent::Archive {
                title,
                author,
                summary,
                tags,
                rating,
                chapters,
                total_words,
                ..
            } => {
                let preview: Vec<String> = chapters
                    .iter()
                    .take(2)
                    .map(|ch| format!("{}: {}...", ch.title, clip(&ch.content, 500)))
                    .collect();
                format!(
                    "Create a well-structured summary of this fanfiction. Format with clear \
                     sections and bullet points:\n\n\
                     TITLE: {title}\nAUTHOR: {author}\nSUMMARY: {summary}\n\
                     TAGS: {tags}\nRATING: {rating}\nCHAPTERS: {count}\n\
                     TOTAL WORDS: {total_words}\n\n\
                     CONTENT PREVIEW:\n{preview}\n\n\
                     Cover the story overview, main themes, content details, and what to \
                     expect. Use bullet points and clear section headers for accessibility.",
                    tags = tags.join(", "),
                    count = chapters.len(),
                    preview = preview.join("\n\n"),
                )
            }
            FullContent::Article {
                title,
                author,
                tags,
                publish_date,
                sections,
                code_blocks,
                total_words,
            } => {
                let languages: Vec<&str> = code_blocks
                    .iter()
                    .filter_map(|c| c.language.as_deref())
                    .collect();
                format!(
                    "Create a well-structured summary of this developer article. Format with \
                     clear sections and bullet points:\n\n\
                     TITLE: {title}\nAUTHOR: {author}\nTAGS: {tags}\n\
                     PUBLISHED: {publish_date}\nWORD COUNT: {total_words}\n\n\
                     CONTENT SECTIONS:\n{sections}\n\n\
                     CODE EXAMPLES: {count} snippets in: {languages}\n\n\
                     Cover the article overview, key technical concepts, learning outcomes, \
                     code examples, and target audience. Use bullet points and clear section \
                     headers for accessibility.",
                    tags = tags.join(", "),
                    sections = sections
                        .iter()
                        .take(10)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("\n"),
                    count = code_blocks.len(),
                    languages = languages.join(", "),
                )
            }
            FullContent::Generic {
                title,
                headings,
                content,
                total_words,
            } => {
                format!(
                    "Create a well-structured summary of this website. Format with clear \
                     sections and bullet points:\n\n\
                     TITLE: {title}\nHEADINGS: {headings}\nWORD COUNT: {total_words}\n\n\
                     CONTENT:\n{content}\n\n\
                     Cover the content overview, key information, content structure, and \
                     target audience. Use bullet points and clear section headers for \
                     accessibility.",
                    headings = headings.join(", "),
                    content = content
                        .iter()
                        .take(10)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                )
            }
        };

        self.chat(&prompt, 700, 0.7)
    }

    fn summarize(&self, snapshot: &PageSnapshot) -> Result<String> {
        if snapshot.content.trim().is_empty() {
            return Err(ReaderError::Service("No content provided".into()));
        }
        let prompt = format!(
            "Summarize this content for accessibility:\n\nTitle: {}\n\nContent: {}",
            snapshot.title,
            clip(&snapshot.content, 2000),
        );
        self.chat(&prompt, 300, 0.7)
    }
}
