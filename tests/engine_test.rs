//! Playback engine tests
//!
//! Transport, auto-advance, structural navigation, and code enrichment
//! against a recording speech backend.

mod common;

use common::{archive_doc, article_doc, RecordingSynth};
use readaloud::ai::TextService;
use readaloud::engine::PlaybackEngine;
use readaloud::extract::snapshot::{FullContent, PageSnapshot};
use readaloud::queue::ItemKind;
use readaloud::speech::UtteranceEvent;
use readaloud::Result;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_play_starts_with_front_matter() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);

    engine.play().expect("play failed");

    assert_eq!(engine.queue().len(), 8);
    assert_eq!(engine.cursor(), Some(0));
    assert!(engine.state().speaking);

    let log = log.lock().unwrap();
    assert_eq!(log.spoken.len(), 1);
    assert_eq!(log.spoken[0].text, "Story: The Long Voyage");
    // The default preferences land on an English voice
    assert_eq!(log.spoken[0].voice.as_ref().unwrap().locale, "en-US");
}

#[test]
fn test_completion_events_advance_through_queue() {
    let (synth, log, events) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    events.lock().unwrap().push_back(UtteranceEvent::Ended);
    engine.pump().expect("pump failed");

    assert_eq!(engine.cursor(), Some(1));
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "By storyteller");
}

#[test]
fn test_running_past_the_end_goes_idle() {
    let (synth, _, events) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    for _ in 0..20 {
        events.lock().unwrap().push_back(UtteranceEvent::Ended);
        engine.pump().expect("pump failed");
    }

    assert_eq!(engine.cursor(), None);
    assert!(!engine.state().speaking);
    assert!(!engine.state().paused);
    assert!(engine.highlighted().is_none());
}

#[test]
fn test_completion_while_paused_holds_position() {
    let (synth, log, events) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    engine.pause().expect("pause failed");
    events.lock().unwrap().push_back(UtteranceEvent::Ended);
    engine.pump().expect("pump failed");

    assert_eq!(engine.cursor(), Some(0));
    assert!(engine.state().paused);

    engine.resume().expect("resume failed");
    assert!(engine.state().speaking);
    assert_eq!(engine.cursor(), Some(0));

    let log = log.lock().unwrap();
    assert_eq!(log.pauses, 1);
    assert_eq!(log.resumes, 1);
    assert_eq!(log.spoken.len(), 1);
}

#[test]
fn test_chapter_navigation() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    engine.next_chapter();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Chapter 1: Departure");

    engine.next_chapter();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Chapter 2");

    engine.prev_chapter();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Chapter 1: Departure");

    // Highlight follows the chapter element
    let marker = engine.highlighted().expect("chapter should be highlighted");
    assert_eq!(engine.document().get(marker).id, "chapter-1");
}

#[test]
fn test_jump_to_missing_chapter_changes_nothing() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");
    let spoken_before = log.lock().unwrap().spoken.len();

    assert!(!engine.jump_to_chapter(9));

    assert_eq!(engine.cursor(), Some(0));
    assert!(engine.state().speaking);
    assert_eq!(log.lock().unwrap().spoken.len(), spoken_before);

    assert!(engine.jump_to_chapter(2));
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Chapter 2");
}

#[test]
fn test_heading_navigation_on_article() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(article_doc(), synth);
    engine.play().expect("play failed");

    engine.next_heading();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Introduction");

    engine.next_heading();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Going Deeper");

    // No further heading: position and speech are untouched
    let cursor = engine.cursor();
    let spoken = log.lock().unwrap().spoken.len();
    engine.next_heading();
    assert_eq!(engine.cursor(), cursor);
    assert_eq!(log.lock().unwrap().spoken.len(), spoken);

    engine.prev_heading();
    assert_eq!(log.lock().unwrap().spoken.last().unwrap().text, "Introduction");
}

#[test]
fn test_section_navigation_on_archive() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    engine.next_section();
    assert_eq!(
        log.lock().unwrap().spoken.last().unwrap().text,
        "The sea was calm that morning."
    );

    engine.next_section();
    assert_eq!(
        log.lock().unwrap().spoken.last().unwrap().text,
        "They left the harbor before dawn."
    );

    // Backward navigation from idle is a no-op
    engine.stop().expect("stop failed");
    let spoken = log.lock().unwrap().spoken.len();
    engine.prev_section();
    assert_eq!(log.lock().unwrap().spoken.len(), spoken);
    assert_eq!(engine.cursor(), None);
}

#[test]
fn test_navigation_speaks_with_current_settings() {
    let (synth, log, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.set_speed(1.75);
    engine.set_volume(0.5);

    engine.play().expect("play failed");

    let log = log.lock().unwrap();
    assert_eq!(log.spoken[0].rate, 1.75);
    assert_eq!(log.spoken[0].volume, 0.5);
}

struct CannedService;

impl TextService for CannedService {
    fn explain(&self, _text: &str) -> Result<String> {
        Ok("explained".to_string())
    }
    fn explain_code(&self, _code: &str, language: Option<&str>) -> Result<String> {
        Ok(format!(
            "Code Analysis: canned explanation of {}",
            language.unwrap_or("code")
        ))
    }
    fn summarize_selection(&self, _text: &str, _site: &str) -> Result<String> {
        Ok("summary".to_string())
    }
    fn site_summary(&self, _content: &FullContent) -> Result<String> {
        Ok("summary".to_string())
    }
    fn summarize(&self, _snapshot: &PageSnapshot) -> Result<String> {
        Ok("summary".to_string())
    }
}

#[test]
fn test_code_item_is_enriched_in_place() {
    let (synth, _, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(article_doc(), synth);
    engine.set_service(Arc::new(CannedService));

    engine.play().expect("play failed");

    let code_index = engine
        .queue()
        .items
        .iter()
        .position(|i| i.kind == ItemKind::Code)
        .expect("article queue should hold a code item");
    assert!(engine.queue().items[code_index]
        .text
        .contains("getting AI explanation"));

    let mut enriched = false;
    for _ in 0..200 {
        engine.pump().expect("pump failed");
        if !engine.queue().items[code_index]
            .text
            .contains("getting AI explanation")
        {
            enriched = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    assert!(enriched, "enrichment never arrived");
    assert_eq!(
        engine.queue().items[code_index].text,
        "Code Analysis: canned explanation of rust"
    );

    // Queue length and order are unchanged by enrichment
    assert_eq!(engine.queue().len(), 10);
}

#[test]
fn test_scroll_request_follows_navigation() {
    let (synth, _, _) = RecordingSynth::new();
    let mut engine = PlaybackEngine::new(archive_doc(), synth);
    engine.play().expect("play failed");

    assert!(engine.take_scroll().is_some());
    assert!(engine.take_scroll().is_none());

    engine.next_chapter();
    let scroll = engine.take_scroll().expect("navigation should scroll");
    assert!(scroll.smooth);
    assert!(scroll.top >= 0.0);
}
