//! Shared fixtures for integration tests
//!
//! A recording speech backend plus canned page documents for the three
//! supported site shapes.

#![allow(dead_code)]

use readaloud::dom::{Document, Node};
use readaloud::speech::{Synth, Utterance, UtteranceEvent, Voice};
use readaloud::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Everything the backend was asked to do, for assertions
#[derive(Default)]
pub struct SynthLog {
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub pauses: usize,
    pub resumes: usize,
}

/// Speech backend that records calls and replays scripted events
pub struct RecordingSynth {
    log: Arc<Mutex<SynthLog>>,
    events: Arc<Mutex<VecDeque<UtteranceEvent>>>,
}

impl RecordingSynth {
    /// Backend plus handles for inspecting calls and injecting events
    pub fn new() -> (
        Box<dyn Synth>,
        Arc<Mutex<SynthLog>>,
        Arc<Mutex<VecDeque<UtteranceEvent>>>,
    ) {
        let log = Arc::new(Mutex::new(SynthLog::default()));
        let events = Arc::new(Mutex::new(VecDeque::new()));
        let synth = Self {
            log: Arc::clone(&log),
            events: Arc::clone(&events),
        };
        (Box::new(synth), log, events)
    }
}

impl Synth for RecordingSynth {
    fn voices(&mut self) -> Vec<Voice> {
        vec![
            Voice::new("Microsoft David", "en-US"),
            Voice::new("Microsoft Zira", "en-US"),
            Voice::new("Google UK English Female", "en-GB"),
        ]
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.log.lock().unwrap().spoken.push(utterance.clone());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.log.lock().unwrap().pauses += 1;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.log.lock().unwrap().resumes += 1;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.log.lock().unwrap().cancels += 1;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<UtteranceEvent> {
        self.events.lock().unwrap().pop_front()
    }
}

/// Two-chapter archive work with front matter
///
/// Chapter 1 carries a real title; chapter 2 carries the archive's
/// "Chapter Text" placeholder, which the marker must drop.
pub fn archive_doc() -> Document {
    let mut doc = Document::new("archiveofourown.org", "The Long Voyage - Fandom");
    let root = doc.root();

    doc.add(
        root,
        Node::element("h2")
            .with_class("title")
            .with_class("heading")
            .with_text("The Long Voyage"),
    );

    let byline = doc.add(root, Node::element("div").with_class("byline"));
    doc.add(
        byline,
        Node::element("a")
            .with_attr("rel", "author")
            .with_text("storyteller"),
    );

    let summary = doc.add(root, Node::element("div").with_class("summary"));
    doc.add(
        summary,
        Node::element("blockquote")
            .with_class("userstuff")
            .with_text("A ship sails into the unknown."),
    );

    let chapters = doc.add(root, Node::element("div").with_id("chapters"));

    let ch1 = doc.add(
        chapters,
        Node::element("div").with_id("chapter-1").with_rect(200.0, 400.0),
    );
    doc.add(
        ch1,
        Node::element("h3").with_class("title").with_text("Departure"),
    );
    let body1 = doc.add(ch1, Node::element("div").with_class("userstuff"));
    doc.add(
        body1,
        Node::element("p")
            .with_text("The sea was calm that morning.")
            .with_rect(260.0, 40.0),
    );
    doc.add(body1, Node::element("p").with_text("Hi"));
    doc.add(
        body1,
        Node::element("p")
            .with_text("They left the harbor before dawn.")
            .with_rect(320.0, 40.0),
    );

    let ch2 = doc.add(
        chapters,
        Node::element("div").with_id("chapter-2").with_rect(900.0, 400.0),
    );
    doc.add(
        ch2,
        Node::element("h3").with_class("title").with_text("Chapter Text"),
    );
    let body2 = doc.add(ch2, Node::element("div").with_class("userstuff"));
    doc.add(
        body2,
        Node::element("p")
            .with_text("The storm arrived on the third day.")
            .with_rect(960.0, 40.0),
    );

    doc
}

/// Developer article with a heading, prose, code, a list, an image, and
/// a link
pub fn article_doc() -> Document {
    let mut doc = Document::new("dev.to", "Understanding Iterators - DEV");
    let root = doc.root();

    doc.add(root, Node::element("h1").with_text("Understanding Iterators"));
    doc.add(
        root,
        Node::element("span").with_class("crayons-tag").with_text("rust"),
    );
    doc.add(
        root,
        Node::element("span")
            .with_class("crayons-tag")
            .with_text("tutorial"),
    );
    doc.add(
        root,
        Node::element("div")
            .with_class("crayons-story__author")
            .with_text("jane"),
    );

    let main = doc.add(root, Node::element("div").with_class("crayons-article__main"));
    doc.add(
        main,
        Node::element("h2")
            .with_text("Introduction")
            .with_rect(100.0, 30.0),
    );
    doc.add(
        main,
        Node::element("p")
            .with_text("Iterators let you process sequences lazily.")
            .with_rect(140.0, 40.0),
    );
    doc.add(
        main,
        Node::element("pre")
            .with_class("language-rust")
            .with_text("let total: i32 = (1..=10).sum();")
            .with_rect(190.0, 60.0),
    );
    let list = doc.add(main, Node::element("ul"));
    doc.add(list, Node::element("li").with_text("First point here"));
    doc.add(
        main,
        Node::element("h3")
            .with_text("Going Deeper")
            .with_rect(300.0, 30.0),
    );
    doc.add(
        main,
        Node::element("img")
            .with_attr("alt", "Flow chart")
            .with_rect(340.0, 200.0),
    );
    doc.add(
        main,
        Node::element("a")
            .with_attr("href", "/more")
            .with_text("Read more"),
    );

    doc
}

/// Plain page with paragraphs of mixed length
pub fn generic_doc() -> Document {
    let mut doc = Document::new("example.com", "A Plain Page");
    let root = doc.root();

    doc.add(
        root,
        Node::element("h2").with_text("About This Page"),
    );
    doc.add(
        root,
        Node::element("p").with_text(
            "This paragraph is long enough to be both read aloud and included in snapshots.",
        ),
    );
    doc.add(root, Node::element("p").with_text("Too short"));
    doc.add(
        root,
        Node::element("p").with_text("Another readable paragraph."),
    );

    doc
}
