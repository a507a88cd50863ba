//! Native TTS backend using the tts crate
//!
//! Uses the `tts` crate which provides a unified interface to Speech
//! Dispatcher on Linux, AVFoundation on macOS, and SAPI on Windows.
//! Utterance completion and cancellation callbacks are forwarded through a
//! channel and surfaced via `poll_event`, matching the event-driven advance
//! model the playback engine expects.

use crate::speech::{Synth, Utterance, UtteranceEvent, Voice};
use crate::{ReaderError, Result};
use log::{debug, error, warn};
use std::sync::mpsc::{channel, Receiver};
use tts::Tts as TtsCrate;

/// Native TTS backend
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Lifecycle events forwarded from the tts crate's callbacks
    events: Receiver<UtteranceEvent>,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let mut tts = TtsCrate::default()
            .map_err(|e| ReaderError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        let (tx, events) = channel();

        let features = tts.supported_features();
        if features.utterance_callbacks {
            let tx_end = tx.clone();
            tts.on_utterance_end(Some(Box::new(move |_id| {
                let _ = tx_end.send(UtteranceEvent::Ended);
            })))
            .map_err(|e| ReaderError::Speech(format!("Failed to register end callback: {}", e)))?;

            let tx_stop = tx;
            tts.on_utterance_stop(Some(Box::new(move |_id| {
                let _ = tx_stop.send(UtteranceEvent::Interrupted);
            })))
            .map_err(|e| ReaderError::Speech(format!("Failed to register stop callback: {}", e)))?;
        } else {
            warn!("Utterance callbacks not supported; playback will not auto-advance");
        }

        debug!("Native TTS backend created successfully");
        Ok(Self { tts, events })
    }

    /// Apply rate/volume/voice from an utterance request, skipping anything
    /// the platform does not support
    fn configure(&mut self, utterance: &Utterance) -> Result<()> {
        let features = self.tts.supported_features();

        if features.rate {
            let normal = self.tts.normal_rate();
            let rate = (normal * utterance.rate).clamp(self.tts.min_rate(), self.tts.max_rate());
            self.tts
                .set_rate(rate)
                .map_err(|e| ReaderError::Speech(format!("Failed to set rate: {}", e)))?;
        } else {
            warn!("Rate control not supported on this platform");
        }

        if features.volume {
            let volume = self.tts.max_volume() * utterance.volume.clamp(0.0, 1.0);
            self.tts
                .set_volume(volume)
                .map_err(|e| ReaderError::Speech(format!("Failed to set volume: {}", e)))?;
        } else {
            warn!("Volume control not supported on this platform");
        }

        if let Some(ref wanted) = utterance.voice {
            if features.voice {
                let voices = self
                    .tts
                    .voices()
                    .map_err(|e| ReaderError::Speech(format!("Failed to get voices: {}", e)))?;
                if let Some(voice) = voices.iter().find(|v| v.name() == wanted.name) {
                    debug!("Selecting voice: {}", wanted.name);
                    self.tts
                        .set_voice(voice)
                        .map_err(|e| ReaderError::Speech(format!("Failed to set voice: {}", e)))?;
                } else {
                    warn!("Voice {} not found in platform catalog", wanted.name);
                }
            } else {
                warn!("Voice selection not supported on this platform");
            }
        }

        Ok(())
    }
}

impl Synth for NativeSynth {
    fn voices(&mut self) -> Vec<Voice> {
        match self.tts.voices() {
            Ok(voices) => voices
                .iter()
                .map(|v| Voice {
                    name: v.name(),
                    locale: v.language().to_string(),
                })
                .collect(),
            Err(e) => {
                warn!("Failed to query voices: {}", e);
                Vec::new()
            }
        }
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if utterance.text.is_empty() {
            return Ok(());
        }

        self.configure(utterance)?;

        debug!("Speaking: {}", utterance.text);
        self.tts.speak(&utterance.text, true).map_err(|e| {
            error!("Failed to speak: {}", e);
            ReaderError::Speech(format!("Speak failed: {}", e))
        })?;

        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        // The tts crate has no suspend operation; the engine still tracks
        // the paused state so resume re-dispatch works at the host level
        warn!("Pause not supported by the native backend");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        warn!("Resume not supported by the native backend");
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        debug!("Canceling speech");
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            ReaderError::Speech(format!("Cancel failed: {}", e))
        })?;

        Ok(())
    }

    fn poll_event(&mut self) -> Option<UtteranceEvent> {
        self.events.try_recv().ok()
    }
}
