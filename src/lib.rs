//! readaloud - Read-aloud navigation engine for web pages
//!
//! Converts a page document into an ordered, navigable queue of speakable
//! units, drives a text-to-speech session across that queue, and layers
//! optional AI-generated explanations on top of code blocks.

pub mod ai;
pub mod command;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod queue;
pub mod speech;

pub use error::{ReaderError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "readaloud";
