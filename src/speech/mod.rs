//! Speech synthesis abstraction
//!
//! Provides a unified interface for text-to-speech. The playback engine
//! drives exactly one utterance at a time through this trait and consumes
//! its lifecycle events to advance the queue.

pub mod backends;
pub mod text;
pub mod voice;

use crate::Result;
use log::info;
use serde::{Deserialize, Serialize};

/// One installed synthesis voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Human-readable voice name ("Microsoft Zira", "Daniel", ...)
    pub name: String,
    /// BCP 47 locale tag ("en-US", "fr-FR", ...)
    pub locale: String,
}

impl Voice {
    pub fn new(name: &str, locale: &str) -> Self {
        Self {
            name: name.to_string(),
            locale: locale.to_string(),
        }
    }
}

/// One utterance request
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Voice to use; `None` leaves the backend default
    pub voice: Option<Voice>,
    /// Rate multiplier, 1.0 is normal speed
    pub rate: f32,
    /// Volume, 0.0 to 1.0
    pub volume: f32,
}

/// Lifecycle event of the in-flight utterance
///
/// Completion and failure arrive as events, not return values: `speak`
/// returns as soon as the utterance is dispatched, and the engine's
/// transition function consumes the single-fire event later.
#[derive(Debug, Clone, PartialEq)]
pub enum UtteranceEvent {
    /// Finished naturally; the engine advances the queue
    Ended,
    /// Cancelled by a newer utterance or an explicit stop; expected, swallowed
    Interrupted,
    /// The synthesis engine failed; playback halts at the current item
    Error(String),
}

/// Speech synthesizer trait
///
/// All backends implement this to provide text-to-speech. Starting a new
/// utterance implicitly cancels the one in flight.
pub trait Synth: Send {
    /// Installed voices; may be empty while the host catalog populates
    fn voices(&mut self) -> Vec<Voice>;

    /// Start one utterance, cancelling any in flight
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Suspend the active utterance
    fn pause(&mut self) -> Result<()>;

    /// Un-suspend a paused utterance
    fn resume(&mut self) -> Result<()>;

    /// Cancel/silence current speech
    fn cancel(&mut self) -> Result<()>;

    /// Next pending lifecycle event, if any
    fn poll_event(&mut self) -> Option<UtteranceEvent>;
}

/// Create the platform speech synthesizer
pub fn create_synth() -> Result<Box<dyn Synth>> {
    info!(
        "Creating native speech synthesizer for platform: {}",
        std::env::consts::OS
    );
    Ok(Box::new(backends::native::NativeSynth::new()?))
}
