use std::io::{self, BufRead};

use dashkit_core::{
    DocumentIndex, EnvelopeError, Line, ProviderId, Recognizer, Render, SpeechErrorKind,
    SpeechEvent, Tone, VoiceSearch,
};
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;

use super::CommandResult;

/// Lines starting with this prefix carry a recognizer error code (`!no-speech`).
const ERROR_PREFIX: char = '!';

/// Treats standard input as a speech engine: every line is the latest
/// interim transcript and end of input ends recognition.
#[derive(Debug, Default)]
struct StdinRecognizer {
    active: bool,
}

impl Recognizer for StdinRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), SpeechErrorKind> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Serialize)]
struct VoiceResponseData<'a> {
    transcript: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a dashkit_core::SearchResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a SpeechErrorKind>,
}

pub fn run() -> Result<CommandResult, CliError> {
    let mut session = VoiceSearch::new(StdinRecognizer::default(), DocumentIndex::sample());
    session.start()?;

    for line in io::stdin().lock().lines() {
        let event = parse_event(&line?);
        debug!(?event, "speech event");
        let stop = matches!(event, SpeechEvent::Error(_));
        session.handle(event);
        if stop {
            break;
        }
    }
    if session.is_listening() {
        session.stop();
        session.handle(SpeechEvent::End);
    }

    let mut lines = Vec::new();
    let mut errors = Vec::new();
    if let Some(error) = session.last_error() {
        lines.push(Line::toned(format!("{error}. {}", error.remedy()), Tone::Negative));
        errors.push(EnvelopeError::new("voice.recognition", error.to_string())?);
    } else if let Some(results) = session.results() {
        lines.push(Line::muted(format!("\"{}\"", session.transcript())));
        lines.extend(results.render());
    } else {
        lines.push(Line::muted("Nothing was heard."));
    }

    let data = serde_json::to_value(VoiceResponseData {
        transcript: session.transcript(),
        results: session.results(),
        error: session.last_error(),
    })?;

    let mut result = CommandResult::ok(data, lines, ProviderId::Local);
    result.errors = errors;
    Ok(result)
}

fn parse_event(line: &str) -> SpeechEvent {
    match line.trim().strip_prefix(ERROR_PREFIX) {
        Some(code) => SpeechEvent::Error(SpeechErrorKind::from_code(code)),
        None => SpeechEvent::Interim(line.to_owned()),
    }
}
