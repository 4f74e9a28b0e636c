use serde::{Deserialize, Serialize};

use crate::render::format::Tone;

pub const LOADING_STATUS: &str = "…";
pub const EMPTY_TEXT: &str = "No data available";

/// Renderer input: a value, or one of the sentinels that drive branching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Empty,
    Value(T),
    /// User-visible one-line failure.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One styled output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Plain)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Muted)
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Values that know how to lay themselves out in a region.
pub trait Render {
    fn render(&self) -> Vec<Line>;
}

/// Fixed output area owned by one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    lines: Vec<Line>,
    status: Option<String>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show<T: Render>(&mut self, state: &ViewState<T>) {
        match state {
            // Previous content stays until the replacement is ready.
            ViewState::Loading => self.status = Some(String::from(LOADING_STATUS)),
            ViewState::Empty => self.replace(vec![Line::muted(EMPTY_TEXT)]),
            ViewState::Value(value) => self.replace(value.render()),
            ViewState::Failed(message) => {
                self.replace(vec![Line::toned(message.clone(), Tone::Negative)])
            }
        }
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain text with the status line first, if any.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(status) = &self.status {
            out.push_str(status);
            out.push('\n');
        }
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }

    fn replace(&mut self, lines: Vec<Line>) {
        self.lines = lines;
        self.status = None;
    }
}
