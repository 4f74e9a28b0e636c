use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::data_source::{MovieSource, SourceErrorKind};
use crate::render::{Line, Region, Render, ViewState};
use crate::sequence::{RequestSequencer, Trigger};
use crate::{Movie, Query};

const NO_PLOT: &str = "No plot available.";
const NO_ACTORS: &str = "No cast information.";

#[derive(Debug, Default)]
struct Panel {
    view: Option<ViewState<Movie>>,
    region: Region,
}

/// Movie finder controller.
pub struct MovieFinder {
    source: Arc<dyn MovieSource>,
    panel: Mutex<Panel>,
    sequencer: RequestSequencer,
    trigger: Trigger,
}

impl MovieFinder {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self {
            source,
            panel: Mutex::new(Panel::default()),
            sequencer: RequestSequencer::new(),
            trigger: Trigger::new(),
        }
    }

    /// Blank input is a no-op and returns `None`.
    pub async fn search(&self, raw: &str) -> Option<ViewState<Movie>> {
        let title = Query::parse(raw).ok()?;
        let ticket = self.sequencer.issue();
        let _guard = self.trigger.engage();
        self.panel()
            .region
            .show(&ViewState::<Movie>::Loading);

        let state = match self.source.lookup(&title).await {
            Ok(movie) => ViewState::Value(movie),
            Err(error) => {
                warn!(%title, code = error.code(), %error, "movie lookup failed");
                let message = match error.kind() {
                    SourceErrorKind::Network => String::from("Network error"),
                    SourceErrorKind::Internal => String::from("Something went wrong"),
                    _ => error.message().to_owned(),
                };
                ViewState::Failed(message)
            }
        };

        if self.sequencer.commit(ticket) {
            let mut panel = self.panel();
            panel.region.show(&state);
            panel.view = Some(state.clone());
        } else {
            debug!(%title, "discarding superseded movie response");
        }
        Some(state)
    }

    pub fn view(&self) -> Option<ViewState<Movie>> {
        self.panel().view.clone()
    }

    pub fn region(&self) -> Region {
        self.panel().region.clone()
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    fn panel(&self) -> std::sync::MutexGuard<'_, Panel> {
        self.panel.lock().expect("movie panel lock poisoned")
    }
}

impl std::fmt::Debug for MovieFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieFinder").finish_non_exhaustive()
    }
}

impl Render for Movie {
    fn render(&self) -> Vec<Line> {
        vec![
            Line::plain(self.title.clone()),
            Line::muted(format!(
                "{} · {}",
                self.year,
                self.runtime.as_deref().unwrap_or_default()
            )),
            Line::plain(self.genre.clone().unwrap_or_default()),
            Line::plain(self.rating_label()),
            Line::plain(self.plot.as_deref().unwrap_or(NO_PLOT)),
            Line::plain(self.actors.as_deref().unwrap_or(NO_ACTORS)),
            Line::muted(format!("Poster: {}", self.poster_url())),
            Line::muted(format!("Trailer: {}", self.trailer_url())),
        ]
    }
}
