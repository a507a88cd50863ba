//! Host command protocol
//!
//! Serde wire format for the transport and query commands the host sends
//! to the playback engine, plus the dispatcher that applies one command
//! and produces the response for the commands that have one.

use crate::engine::PlaybackEngine;
use crate::extract::snapshot::{FullContent, PageSnapshot};
use crate::queue::ChapterInfo;
use crate::speech::voice::{VoiceAccent, VoiceGender};
use crate::Result;
use log::debug;
use serde::{Deserialize, Serialize};

fn default_chapter() -> u32 {
    1
}

fn default_speed() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

/// One command from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum Command {
    #[serde(rename = "PLAY")]
    Play,
    #[serde(rename = "PAUSE")]
    Pause,
    #[serde(rename = "RESUME")]
    Resume,
    #[serde(rename = "STOP")]
    Stop,
    #[serde(rename = "NEXT_HEADING")]
    NextHeading,
    #[serde(rename = "PREV_HEADING")]
    PrevHeading,
    #[serde(rename = "NEXT_SECTION")]
    NextSection,
    #[serde(rename = "PREV_SECTION")]
    PrevSection,
    #[serde(rename = "NEXT_CHAPTER")]
    NextChapter,
    #[serde(rename = "PREV_CHAPTER")]
    PrevChapter,
    #[serde(rename = "JUMP_TO_CHAPTER")]
    JumpToChapter {
        #[serde(default = "default_chapter")]
        number: u32,
    },
    #[serde(rename = "GET_ALL_CHAPTERS")]
    GetAllChapters,
    #[serde(rename = "GET_SELECTION")]
    GetSelection,
    #[serde(rename = "GET_PAGE_CONTENT")]
    GetPageContent,
    #[serde(rename = "GET_FULL_CONTENT")]
    GetFullContent,
    #[serde(rename = "SPEAK_TEXT")]
    SpeakText {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "SET_SPEED")]
    SetSpeed {
        #[serde(default = "default_speed")]
        speed: f32,
    },
    #[serde(rename = "SET_VOLUME")]
    SetVolume {
        #[serde(default = "default_volume")]
        volume: f32,
    },
    #[serde(rename = "SET_VOICE_SETTINGS")]
    SetVoiceSettings {
        #[serde(rename = "voiceGender", default)]
        voice_gender: Option<VoiceGender>,
        #[serde(rename = "voiceAccent", default)]
        voice_accent: Option<VoiceAccent>,
    },
}

/// Response for the commands that produce one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Found { found: bool },
    Chapters { chapters: Vec<ChapterInfo> },
    Selection { text: String },
    Page(PageSnapshot),
    Full(FullContent),
}

/// Apply one command to the engine
///
/// Transport commands answer with `None`; query commands answer with the
/// matching [`Response`].
pub fn dispatch(engine: &mut PlaybackEngine, command: Command) -> Result<Option<Response>> {
    debug!("Dispatching {:?}", command);

    match command {
        Command::Play => {
            engine.play()?;
            Ok(None)
        }
        Command::Pause => {
            engine.pause()?;
            Ok(None)
        }
        Command::Resume => {
            engine.resume()?;
            Ok(None)
        }
        Command::Stop => {
            engine.stop()?;
            Ok(None)
        }
        Command::NextHeading => {
            engine.next_heading();
            Ok(None)
        }
        Command::PrevHeading => {
            engine.prev_heading();
            Ok(None)
        }
        Command::NextSection => {
            engine.next_section();
            Ok(None)
        }
        Command::PrevSection => {
            engine.prev_section();
            Ok(None)
        }
        Command::NextChapter => {
            engine.next_chapter();
            Ok(None)
        }
        Command::PrevChapter => {
            engine.prev_chapter();
            Ok(None)
        }
        Command::JumpToChapter { number } => Ok(Some(Response::Found {
            found: engine.jump_to_chapter(number),
        })),
        Command::GetAllChapters => Ok(Some(Response::Chapters {
            chapters: engine.all_chapters(),
        })),
        Command::GetSelection => Ok(Some(Response::Selection {
            text: engine.selection().to_string(),
        })),
        Command::GetPageContent => Ok(Some(Response::Page(engine.page_content()))),
        Command::GetFullContent => Ok(Some(Response::Full(engine.full_content()))),
        Command::SpeakText { text } => {
            engine.speak_text(&text);
            Ok(None)
        }
        Command::SetSpeed { speed } => {
            engine.set_speed(speed);
            Ok(None)
        }
        Command::SetVolume { volume } => {
            engine.set_volume(volume);
            Ok(None)
        }
        Command::SetVoiceSettings {
            voice_gender,
            voice_accent,
        } => {
            engine.set_voice_settings(voice_gender, voice_accent);
            Ok(None)
        }
    }
}
