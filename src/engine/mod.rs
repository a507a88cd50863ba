//! Playback engine
//!
//! Owns the speakable queue, the read cursor, and the speaking/paused
//! state, and drives exactly one utterance at a time through the speech
//! backend. The host calls transport and navigation methods, then pumps
//! the engine so utterance completions advance the queue and enrichment
//! results land in it.
//!
//! `speaking` and `paused` are never both true: pausing suspends the
//! utterance and parks the state, resuming does the reverse, and every
//! speak path clears `paused`. The cursor is `None` exactly in the idle
//! and stopped states.

use crate::ai::enrich::{Enricher, EnrichmentUpdate};
use crate::ai::TextService;
use crate::dom::{Document, NodeId};
use crate::extract::snapshot::{self, FullContent, PageSnapshot};
use crate::extract::{build_queue, SiteVariant};
use crate::highlight::{Highlighter, ScrollCommand, Viewport};
use crate::queue::{ChapterInfo, ItemKind, Queue, QueueItem};
use crate::speech::voice::{select_voice, VoiceAccent, VoiceGender};
use crate::speech::{text::strip_emoji, Synth, Utterance, UtteranceEvent};
use crate::Result;
use log::{debug, error, warn};
use std::sync::Arc;

/// Speech-facing playback settings and flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// An utterance is in flight
    pub speaking: bool,
    /// Playback is suspended mid-item
    pub paused: bool,
    /// Rate multiplier, 1.0 is normal
    pub speed: f32,
    /// Volume, 0.0 to 1.0
    pub volume: f32,
    pub voice_gender: VoiceGender,
    pub voice_accent: VoiceAccent,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            speaking: false,
            paused: false,
            speed: 1.0,
            volume: 1.0,
            voice_gender: VoiceGender::Any,
            voice_accent: VoiceAccent::Any,
        }
    }
}

/// The read-aloud playback engine for one page
pub struct PlaybackEngine {
    document: Document,
    variant: SiteVariant,
    queue: Queue,

    /// Current queue position; `None` in the idle/stopped state
    cursor: Option<usize>,

    state: PlaybackState,
    synth: Box<dyn Synth>,
    highlighter: Highlighter,
    viewport: Viewport,

    /// Present once an AI service has been attached
    enricher: Option<Enricher>,

    /// Monotonic queue build counter
    generation: u64,

    /// Whether the in-flight utterance advances the queue when it ends;
    /// false for one-shot text spoken outside the queue
    advance_on_end: bool,

    /// Scroll request computed by the latest highlight move, not yet
    /// collected by the host
    pending_scroll: Option<ScrollCommand>,

    /// Last non-empty text selection reported by the host
    selection: String,
}

impl PlaybackEngine {
    pub fn new(document: Document, synth: Box<dyn Synth>) -> Self {
        let variant = SiteVariant::detect(&document.hostname);
        debug!(
            "Playback engine for {} ({:?} variant)",
            document.hostname, variant
        );

        Self {
            document,
            variant,
            queue: Queue::default(),
            cursor: None,
            state: PlaybackState::default(),
            synth,
            highlighter: Highlighter::new(),
            viewport: Viewport::new(900.0, 0.0),
            enricher: None,
            generation: 0,
            advance_on_end: true,
            pending_scroll: None,
            selection: String::new(),
        }
    }

    /// Attach the AI service used for code-block enrichment
    pub fn set_service(&mut self, service: Arc<dyn TextService>) {
        self.enricher = Some(Enricher::new(service));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn variant(&self) -> SiteVariant {
        self.variant
    }

    /// Element currently carrying the highlight marker
    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighter.current()
    }

    /// Collect the scroll request from the latest highlight move
    pub fn take_scroll(&mut self) -> Option<ScrollCommand> {
        self.pending_scroll.take()
    }

    /// Build the queue if it has not been built for this page yet
    fn ensure_queue(&mut self) {
        if !self.queue.is_empty() {
            return;
        }

        self.generation += 1;
        self.queue = build_queue(&self.document, self.variant, self.generation);

        if let Some(ref enricher) = self.enricher {
            for (index, item) in self.queue.items.iter().enumerate() {
                if item.kind == ItemKind::Code {
                    if let Some(ref code) = item.code {
                        enricher.dispatch(
                            self.generation,
                            index,
                            code.clone(),
                            item.language.clone(),
                        );
                    }
                }
            }
        }
    }

    /// Start or restart reading at the current position
    ///
    /// Builds the queue on first use. An empty queue is valid; play is
    /// then a no-op beyond the build attempt.
    pub fn play(&mut self) -> Result<()> {
        self.ensure_queue();

        if self.queue.is_empty() {
            debug!("Nothing to read on this page");
            return Ok(());
        }

        if self.cursor.is_none() {
            self.cursor = Some(0);
        }
        self.speak_current();
        Ok(())
    }

    /// Suspend the active utterance, keeping the cursor
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.speaking {
            return Ok(());
        }
        self.synth.pause()?;
        self.state.paused = true;
        self.state.speaking = false;
        Ok(())
    }

    /// Un-suspend a paused utterance
    pub fn resume(&mut self) -> Result<()> {
        if !self.state.paused {
            return Ok(());
        }
        self.synth.resume()?;
        self.state.paused = false;
        self.state.speaking = true;
        Ok(())
    }

    /// Cancel playback and return to the idle state
    pub fn stop(&mut self) -> Result<()> {
        self.synth.cancel()?;
        self.drain_events();
        self.highlighter.clear(&mut self.document);
        self.state.speaking = false;
        self.state.paused = false;
        self.cursor = None;
        Ok(())
    }

    /// Advance to the next queue item, or go idle past the last one
    pub fn next(&mut self) -> Result<()> {
        let following = match self.cursor {
            Some(idx) => idx + 1,
            None => 0,
        };

        if following < self.queue.len() {
            self.cursor = Some(following);
            self.speak_current();
            Ok(())
        } else {
            self.stop()
        }
    }

    pub fn next_heading(&mut self) {
        let variant = self.variant;
        self.seek_forward(|item| variant.matches_heading(item));
    }

    pub fn prev_heading(&mut self) {
        let variant = self.variant;
        self.seek_backward(|item| variant.matches_heading(item));
    }

    pub fn next_section(&mut self) {
        let variant = self.variant;
        self.seek_forward(|item| variant.matches_section(item));
    }

    pub fn prev_section(&mut self) {
        let variant = self.variant;
        self.seek_backward(|item| variant.matches_section(item));
    }

    pub fn next_chapter(&mut self) {
        self.seek_forward(|item| item.kind == ItemKind::ChapterMarker);
    }

    pub fn prev_chapter(&mut self) {
        self.seek_backward(|item| item.kind == ItemKind::ChapterMarker);
    }

    /// Jump to the marker of chapter `number`
    ///
    /// A miss leaves cursor, speaking state, and highlight unchanged.
    pub fn jump_to_chapter(&mut self, number: u32) -> bool {
        self.ensure_queue();

        let target = self
            .queue
            .items
            .iter()
            .position(|item| {
                item.kind == ItemKind::ChapterMarker && item.chapter_number == Some(number)
            });

        match target {
            Some(idx) => {
                self.cursor = Some(idx);
                self.speak_current();
                true
            }
            None => {
                debug!("Chapter {} not found", number);
                false
            }
        }
    }

    /// Chapter listing for the host's chapter picker
    pub fn all_chapters(&mut self) -> Vec<ChapterInfo> {
        self.ensure_queue();
        self.queue.chapters()
    }

    /// Speak arbitrary text outside the queue
    ///
    /// One-shot: completion does not advance the queue, and the cursor and
    /// highlight stay where they were.
    pub fn speak_text(&mut self, text: &str) {
        self.speak_utterance(text, false);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.state.speed = if speed > 0.0 { speed } else { 1.0 };
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.state.volume = if volume > 0.0 { volume.min(1.0) } else { 1.0 };
    }

    /// Update voice preferences; absent fields keep their current value
    pub fn set_voice_settings(
        &mut self,
        gender: Option<VoiceGender>,
        accent: Option<VoiceAccent>,
    ) {
        if let Some(gender) = gender {
            self.state.voice_gender = gender;
        }
        if let Some(accent) = accent {
            self.state.voice_accent = accent;
        }
    }

    /// Record the host's current text selection; empty selections keep
    /// the previous one
    pub fn set_selection(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.selection = trimmed.to_string();
        }
    }

    /// Last non-empty selection, or empty when none was ever reported
    pub fn selection(&self) -> &str {
        &self.selection
    }

    pub fn page_content(&self) -> PageSnapshot {
        snapshot::page_content(&self.document)
    }

    pub fn full_content(&self) -> FullContent {
        snapshot::full_content(&self.document, self.variant)
    }

    /// Consume pending synth events and enrichment results
    ///
    /// The host calls this regularly; it is where natural utterance
    /// completion advances the queue.
    pub fn pump(&mut self) -> Result<()> {
        while let Some(event) = self.synth.poll_event() {
            self.handle_utterance_event(event)?;
        }

        let mut updates = Vec::new();
        if let Some(ref enricher) = self.enricher {
            while let Some(update) = enricher.try_recv() {
                updates.push(update);
            }
        }
        for update in updates {
            self.apply_enrichment(update);
        }

        Ok(())
    }

    /// Apply one utterance lifecycle transition
    pub fn handle_utterance_event(&mut self, event: UtteranceEvent) -> Result<()> {
        match event {
            UtteranceEvent::Ended => {
                let was_speaking = self.state.speaking;
                self.state.speaking = false;
                if was_speaking && !self.state.paused && self.advance_on_end {
                    self.next()?;
                }
            }
            UtteranceEvent::Interrupted => {
                // Expected when a new utterance or a stop cancelled the
                // old one; the initiating call already updated the state
                debug!("Utterance interrupted");
            }
            UtteranceEvent::Error(msg) => {
                // Playback halts at the current item; the next transport
                // command works normally
                error!("Speech error: {}", msg);
                self.state.speaking = false;
            }
        }
        Ok(())
    }

    /// Patch an enrichment result into its queue slot
    ///
    /// Dropped when the queue has been rebuilt since dispatch or the slot
    /// is not a code item.
    fn apply_enrichment(&mut self, update: EnrichmentUpdate) {
        if update.generation != self.queue.generation {
            debug!(
                "Dropping enrichment for stale generation {} (current {})",
                update.generation, self.queue.generation
            );
            return;
        }

        match self.queue.items.get_mut(update.index) {
            Some(item) if item.kind == ItemKind::Code => {
                debug!("Enriched code item at queue slot {}", update.index);
                item.text = update.text;
            }
            _ => warn!("Enrichment addressed a non-code slot {}", update.index),
        }
    }

    /// Highlight the cursor item and speak its text
    fn speak_current(&mut self) {
        let (text, source) = match self.cursor.and_then(|idx| self.queue.get(idx)) {
            Some(item) => (item.text.clone(), item.source),
            None => return,
        };

        self.pending_scroll =
            Some(self.highlighter.set_current(&mut self.document, source, self.viewport));
        self.speak_utterance(&text, true);
    }

    /// Dispatch one utterance, cancelling any in flight
    ///
    /// Synthesis failure is terminal for the item but never an error for
    /// the caller: it degrades to "stopped speaking, position retained".
    fn speak_utterance(&mut self, text: &str, advance: bool) {
        if text.trim().is_empty() {
            return;
        }

        // An item can be all emoji and still clear the extraction length
        // filters; with nothing left to say there is no utterance and no
        // completion event, so treat it as instantly finished
        let text = strip_emoji(text);
        if text.trim().is_empty() {
            debug!("Nothing speakable after emoji stripping");
            if advance {
                if let Err(e) = self.next() {
                    warn!("Advance past unspeakable item failed: {}", e);
                }
            }
            return;
        }

        if let Err(e) = self.synth.cancel() {
            warn!("Cancel before speak failed: {}", e);
        }
        self.drain_events();

        // The catalog may still be populating on the first call
        let mut catalog = self.synth.voices();
        if catalog.is_empty() {
            catalog = self.synth.voices();
        }
        let voice = select_voice(&catalog, self.state.voice_gender, self.state.voice_accent);

        let utterance = Utterance {
            text,
            voice,
            rate: self.state.speed,
            volume: self.state.volume,
        };

        match self.synth.speak(&utterance) {
            Ok(()) => {
                self.state.speaking = true;
                self.state.paused = false;
                self.advance_on_end = advance;
            }
            Err(e) => {
                error!("Speech failed: {}", e);
                self.state.speaking = false;
            }
        }
    }

    /// Throw away events belonging to a cancelled utterance so a stale
    /// completion cannot advance the queue twice
    fn drain_events(&mut self) {
        while self.synth.poll_event().is_some() {}
    }

    fn seek_forward<F>(&mut self, pred: F)
    where
        F: Fn(&QueueItem) -> bool,
    {
        let start = self.cursor.map(|idx| idx + 1).unwrap_or(0);
        let found = (start..self.queue.len()).find(|&i| pred(&self.queue.items[i]));

        if let Some(idx) = found {
            self.cursor = Some(idx);
            self.speak_current();
        }
    }

    fn seek_backward<F>(&mut self, pred: F)
    where
        F: Fn(&QueueItem) -> bool,
    {
        let end = match self.cursor {
            Some(idx) => idx,
            None => return,
        };
        let found = (0..end).rev().find(|&i| pred(&self.queue.items[i]));

        if let Some(idx) = found {
            self.cursor = Some(idx);
            self.speak_current();
        }
    }
}
