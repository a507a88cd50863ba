//! Async enrichment hook for code blocks
//!
//! Code items enter the queue with a placeholder. For each one a worker
//! requests an AI explanation concurrently with playback and delivers the
//! result over a channel; the engine patches the queue entry in place when
//! it drains the channel. Failure degrades to a deterministic description,
//! never to an error the listener sees.
//!
//! Every update carries the queue generation it was dispatched against.
//! If the queue has been rebuilt since, the write is dropped.

use crate::ai::TextService;
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// One resolved enrichment, addressed to a fixed queue slot
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentUpdate {
    /// Queue generation captured at dispatch time
    pub generation: u64,
    /// Queue index of the code item
    pub index: usize,
    /// Replacement text
    pub text: String,
}

/// Dispatches enrichment workers and collects their results
pub struct Enricher {
    service: Arc<dyn TextService>,
    tx: Sender<EnrichmentUpdate>,
    rx: Receiver<EnrichmentUpdate>,
}

impl Enricher {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        let (tx, rx) = channel();
        Self { service, tx, rx }
    }

    /// Request an explanation for one code item
    ///
    /// Returns immediately; the result (or fallback) arrives later via
    /// [`Enricher::try_recv`]. Multiple requests may be in flight at once,
    /// each addressing its own slot.
    pub fn dispatch(&self, generation: u64, index: usize, code: String, language: Option<String>) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let text = match service.explain_code(&code, language.as_deref()) {
                Ok(text) => text,
                Err(e) => {
                    debug!("Code explanation failed for queue slot {}: {}", index, e);
                    fallback_description(&code, language.as_deref())
                }
            };
            // Receiver may be gone if the engine was torn down
            let _ = tx.send(EnrichmentUpdate {
                generation,
                index,
                text,
            });
        });
    }

    /// Next resolved enrichment, if any
    pub fn try_recv(&self) -> Option<EnrichmentUpdate> {
        self.rx.try_recv().ok()
    }
}

/// Deterministic description used when the service cannot explain the code
pub fn fallback_description(code: &str, language: Option<&str>) -> String {
    let lines = code.lines().count().max(1);
    match language {
        Some(lang) => format!("Code snippet in {} with {} lines", lang, lines),
        None => format!("Code snippet with {} lines", lines),
    }
}
