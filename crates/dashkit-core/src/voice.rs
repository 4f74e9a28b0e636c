//! Voice and typed search over the offline document index.
//!
//! Both input channels end in the same document search. Speech arrives as a
//! stream of [`SpeechEvent`]s from a [`Recognizer`]: interim transcripts replace
//! the working transcript and the end of recognition runs exactly one search.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fallback::sample_documents;
use crate::render::{Line, Render, Tone};
use crate::{Document, Query};

/// Tagged recognition failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum SpeechErrorKind {
    NotSupported,
    PermissionDenied,
    NoSpeechDetected,
    Aborted,
    Other(String),
}

impl SpeechErrorKind {
    /// Maps a recognizer's reason code.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            "no-speech" => Self::NoSpeechDetected,
            "aborted" => Self::Aborted,
            "language-not-supported" | "not-supported" => Self::NotSupported,
            other => Self::Other(other.to_owned()),
        }
    }

    /// What the user can do about it.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::NotSupported => "Voice input is not supported here; type your query instead.",
            Self::PermissionDenied => "Microphone access was denied; allow it and try again.",
            Self::NoSpeechDetected => "No speech was detected; try speaking closer to the microphone.",
            Self::Aborted => "Listening was cancelled.",
            Self::Other(_) => "Speech recognition failed; try again.",
        }
    }
}

impl Display for SpeechErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSupported => f.write_str("not supported"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::NoSpeechDetected => f.write_str("no speech detected"),
            Self::Aborted => f.write_str("aborted"),
            Self::Other(code) => write!(f, "recognition error '{code}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Latest partial transcript; replaces the previous one.
    Interim(String),
    End,
    Error(SpeechErrorKind),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("speech recognition is unavailable")]
    RecognitionUnavailable,
    #[error("speech recognition failed: {0}")]
    Recognition(SpeechErrorKind),
}

/// Speech engine boundary.
pub trait Recognizer: Send {
    fn is_supported(&self) -> bool;
    fn start(&mut self) -> Result<(), SpeechErrorKind>;
    fn stop(&mut self);
}

/// In-memory document collection searched by substring.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    documents: Vec<Document>,
}

impl DocumentIndex {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn sample() -> Self {
        Self::new(sample_documents())
    }

    /// Documents whose `"title body"` contains the query, ignoring case.
    pub fn search(&self, query: &Query) -> Vec<Document> {
        let needle = query.to_lowercase();
        self.documents
            .iter()
            .filter(|doc| {
                format!("{} {}", doc.title, doc.body)
                    .to_lowercase()
                    .contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result list for one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub documents: Vec<Document>,
}

impl Render for SearchResults {
    fn render(&self) -> Vec<Line> {
        if self.documents.is_empty() {
            return vec![Line::muted("No results found.")];
        }
        let noun = if self.documents.len() == 1 { "match" } else { "matches" };
        let mut lines = vec![Line::muted(format!("{} {noun}", self.documents.len()))];
        for doc in &self.documents {
            lines.push(Line::toned(doc.title.clone(), Tone::Positive));
            lines.push(Line::plain(format!("  {}", doc.body)));
        }
        lines
    }
}

/// Voice search session. A recognizer that reports no support disables voice
/// input for the lifetime of the session; typed search keeps working.
pub struct VoiceSearch<R> {
    recognizer: Option<R>,
    index: DocumentIndex,
    listening: bool,
    transcript: String,
    results: Option<SearchResults>,
    last_error: Option<SpeechErrorKind>,
    searches: usize,
}

impl<R: Recognizer> VoiceSearch<R> {
    pub fn new(recognizer: R, index: DocumentIndex) -> Self {
        let recognizer = if recognizer.is_supported() {
            Some(recognizer)
        } else {
            warn!("speech recognition unavailable; voice input disabled");
            None
        };
        Self {
            recognizer,
            index,
            listening: false,
            transcript: String::new(),
            results: None,
            last_error: None,
            searches: 0,
        }
    }

    pub fn is_voice_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn results(&self) -> Option<&SearchResults> {
        self.results.as_ref()
    }

    pub fn last_error(&self) -> Option<&SpeechErrorKind> {
        self.last_error.as_ref()
    }

    /// Number of searches run so far, from either channel.
    pub fn search_count(&self) -> usize {
        self.searches
    }

    /// Clears the transcript and previous results, then starts listening.
    pub fn start(&mut self) -> Result<(), VoiceError> {
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or(VoiceError::RecognitionUnavailable)?;

        self.transcript.clear();
        self.results = None;
        self.last_error = None;
        match recognizer.start() {
            Ok(()) => {
                self.listening = true;
                Ok(())
            }
            Err(kind) => {
                self.last_error = Some(kind.clone());
                Err(VoiceError::Recognition(kind))
            }
        }
    }

    /// Asks the recognizer to stop; the search runs when it reports `End`.
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }

    /// Applies one recognizer event. Returns the results when it ran a search.
    pub fn handle(&mut self, event: SpeechEvent) -> Option<&SearchResults> {
        match event {
            SpeechEvent::Interim(text) => {
                self.transcript = text.trim().to_owned();
                None
            }
            SpeechEvent::End => {
                let was_listening = std::mem::replace(&mut self.listening, false);
                if !was_listening {
                    return None;
                }
                let transcript = self.transcript.clone();
                self.run_search(&transcript)
            }
            SpeechEvent::Error(kind) => {
                warn!(error = %kind, "speech recognition error");
                self.listening = false;
                self.last_error = Some(kind);
                None
            }
        }
    }

    /// Typed input path. Blank text leaves the results untouched.
    pub fn search_text(&mut self, raw: &str) -> Option<&SearchResults> {
        self.transcript = raw.trim().to_owned();
        self.run_search(raw)
    }

    fn run_search(&mut self, raw: &str) -> Option<&SearchResults> {
        let query = Query::parse(raw).ok()?;
        let documents = self.index.search(&query);
        debug!(%query, matches = documents.len(), "document search");

        self.searches += 1;
        self.results = Some(SearchResults {
            query: query.to_string(),
            documents,
        });
        self.results.as_ref()
    }
}

impl<R> std::fmt::Debug for VoiceSearch<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSearch")
            .field("voice_available", &self.recognizer.is_some())
            .field("listening", &self.listening)
            .field("transcript", &self.transcript)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_recognizer_codes() {
        assert_eq!(SpeechErrorKind::from_code("not-allowed"), SpeechErrorKind::PermissionDenied);
        assert_eq!(SpeechErrorKind::from_code("no-speech"), SpeechErrorKind::NoSpeechDetected);
        assert_eq!(SpeechErrorKind::from_code("aborted"), SpeechErrorKind::Aborted);
        assert_eq!(
            SpeechErrorKind::from_code("network"),
            SpeechErrorKind::Other(String::from("network"))
        );
    }

    #[test]
    fn distinct_errors_have_distinct_remedies() {
        assert_ne!(
            SpeechErrorKind::PermissionDenied.remedy(),
            SpeechErrorKind::NoSpeechDetected.remedy()
        );
    }

    #[test]
    fn index_matches_title_and_body() {
        let index = DocumentIndex::sample();

        let by_title = index.search(&Query::parse("dashboard").expect("query"));
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, 3);

        let by_body = index.search(&Query::parse("SPEECHRECOGNITION").expect("query"));
        assert_eq!(by_body[0].id, 1);

        let spanning = index.search(&Query::parse("api guide").expect("query"));
        assert_eq!(spanning.len(), 1);
    }

    #[test]
    fn empty_results_render_message() {
        let results = SearchResults {
            query: String::from("zebra"),
            documents: Vec::new(),
        };
        assert_eq!(results.render()[0].text, "No results found.");
    }
}
