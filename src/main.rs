//! readaloud main entry point
//!
//! Line-driven host shim around the playback engine. The page document is
//! loaded from a JSON file given on the command line; commands arrive on
//! stdin, one per line, either as short words ("play", "chapter 3") or as
//! raw JSON command objects. Responses and scroll requests are printed as
//! JSON on stdout.

use anyhow::Context;
use log::{debug, error, info};
use readaloud::ai::client::GroqClient;
use readaloud::command::{dispatch, Command};
use readaloud::config::Config;
use readaloud::dom::Document;
use readaloud::engine::PlaybackEngine;
use readaloud::highlight::Viewport;
use readaloud::speech::create_synth;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // Initialize logger
    if debug_mode {
        // Debug mode: write to readaloud.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("readaloud.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to open readaloud.log for debug logging: {}",
                    e
                );
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "readaloud version {} starting (debug mode, logging to readaloud.log)",
            readaloud::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    // Run the application
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    debug!("Initializing readaloud");

    let document_path = std::env::args()
        .skip(1)
        .find(|arg| arg != "--debug" && arg != "-d");

    let document_path = match document_path {
        Some(path) => path,
        None => {
            eprintln!("Usage: readaloud [--debug] <document.json>");
            eprintln!("The document file holds the page model to read aloud.");
            process::exit(1);
        }
    };

    let json = std::fs::read_to_string(&document_path)
        .with_context(|| format!("Failed to read document file {}", document_path))?;
    let document = Document::from_json(&json)
        .with_context(|| format!("Invalid document snapshot in {}", document_path))?;
    info!(
        "Loaded document for {} ({} nodes)",
        document.hostname,
        document.len()
    );

    let config = Config::load()?;
    info!("Config loaded from {:?}", config.path());

    let synth = create_synth()?;
    let mut engine = PlaybackEngine::new(document, synth);
    info!("Reading as {:?} site variant", engine.variant());
    engine.set_viewport(Viewport::new(900.0, 0.0));
    engine.set_speed(config.speed());
    engine.set_volume(config.volume());
    engine.set_voice_settings(Some(config.voice_gender()), Some(config.voice_accent()));

    if let Some(api_key) = config.api_key() {
        info!("AI service configured");
        engine.set_service(Arc::new(GroqClient::new(&api_key)));
    } else {
        info!("No AI api_key in config; code blocks use fallback descriptions");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            engine.stop()?;
            break;
        }

        // Selection is pushed into the engine, not dispatched as a command
        if let Some(text) = selection_line(line) {
            engine.set_selection(text);
            continue;
        }

        let command = if line.starts_with('{') {
            match serde_json::from_str::<Command>(line) {
                Ok(command) => Some(command),
                Err(e) => {
                    eprintln!("Bad command: {}", e);
                    None
                }
            }
        } else {
            parse_command(line)
        };

        let Some(command) = command else {
            eprintln!("Unknown command: {}", line);
            continue;
        };

        match dispatch(&mut engine, command) {
            Ok(Some(response)) => {
                let mut out = stdout.lock();
                serde_json::to_writer(&mut out, &response)?;
                writeln!(out)?;
            }
            Ok(None) => {}
            Err(e) => error!("Command failed: {}", e),
        }

        engine.pump()?;

        if let Some(scroll) = engine.take_scroll() {
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, &scroll)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Parse a short-word command line into a protocol command
fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;

    match word {
        "play" => Some(Command::Play),
        "pause" => Some(Command::Pause),
        "resume" => Some(Command::Resume),
        "stop" => Some(Command::Stop),
        "next-heading" => Some(Command::NextHeading),
        "prev-heading" => Some(Command::PrevHeading),
        "next-section" => Some(Command::NextSection),
        "prev-section" => Some(Command::PrevSection),
        "next-chapter" => Some(Command::NextChapter),
        "prev-chapter" => Some(Command::PrevChapter),
        "chapter" => {
            let number = parts.next().and_then(|n| n.parse().ok()).unwrap_or(1);
            Some(Command::JumpToChapter { number })
        }
        "chapters" => Some(Command::GetAllChapters),
        "selection" => Some(Command::GetSelection),
        "page" => Some(Command::GetPageContent),
        "content" => Some(Command::GetFullContent),
        "say" => {
            let text = line.strip_prefix("say").map(str::trim)?;
            if text.is_empty() {
                None
            } else {
                Some(Command::SpeakText {
                    text: text.to_string(),
                })
            }
        }
        "speed" => parts
            .next()
            .and_then(|s| s.parse().ok())
            .map(|speed| Command::SetSpeed { speed }),
        "volume" => parts
            .next()
            .and_then(|v| v.parse().ok())
            .map(|volume| Command::SetVolume { volume }),
        _ => None,
    }
}

/// Text of a "select <text>" line, if this is one
///
/// Distinct from the "selection" query command, which reads the stored
/// text back.
fn selection_line(line: &str) -> Option<&str> {
    let text = line.strip_prefix("select ")?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_line_sets_selection_text() {
        assert_eq!(selection_line("select chosen words"), Some("chosen words"));
        assert_eq!(selection_line("select   "), None);
        assert_eq!(selection_line("select"), None);
        // The bare query word is a command, not a selection update
        assert_eq!(selection_line("selection"), None);
    }

    #[test]
    fn test_word_commands_parse() {
        assert_eq!(parse_command("play"), Some(Command::Play));
        assert_eq!(parse_command("next-heading"), Some(Command::NextHeading));
        assert_eq!(
            parse_command("chapter 4"),
            Some(Command::JumpToChapter { number: 4 })
        );
        assert_eq!(
            parse_command("chapter"),
            Some(Command::JumpToChapter { number: 1 })
        );
        assert_eq!(
            parse_command("say hello there"),
            Some(Command::SpeakText {
                text: "hello there".to_string()
            })
        );
        assert_eq!(
            parse_command("speed 1.5"),
            Some(Command::SetSpeed { speed: 1.5 })
        );
        assert_eq!(parse_command("rewind"), None);
        assert_eq!(parse_command("say   "), None);
    }
}
