//! Behavior-driven tests for the weather, movie, voice search and player
//! widgets.

mod support;

use std::sync::Arc;
use std::time::Duration;

use dashkit_core::fallback::sample_playlist;
use dashkit_core::{
    DocumentIndex, Movie, MovieFinder, NullOutput, PlayerSession, Recognizer, SourceError,
    SpeechErrorKind, SpeechEvent, ViewState, VoiceError, VoiceSearch, WeatherWidget,
};

use support::{forecast_at, ScriptedForecaster, ScriptedGeocoder, ScriptedMovies};

// =============================================================================
// Weather
// =============================================================================

fn weather_widget(
    geocoder: ScriptedGeocoder,
    forecaster: Arc<ScriptedForecaster>,
    refresh_every: Duration,
) -> WeatherWidget {
    WeatherWidget::new(Arc::new(geocoder), forecaster).with_refresh_interval(refresh_every)
}

#[tokio::test]
async fn when_city_resolves_report_is_rendered_and_refresh_is_armed() {
    // Given: A resolving geocoder and a 20°C forecast
    let forecaster = Arc::new(ScriptedForecaster::new(vec![Ok(forecast_at(20.0))]));
    let widget = weather_widget(
        ScriptedGeocoder::resolving(),
        forecaster,
        Duration::from_secs(3600),
    );

    // When: The user searches for Paris
    let view = widget.search("  Paris ").await.expect("not blank");

    // Then: The report is shown, refresh is armed and the trigger is enabled
    let report = view.value().expect("report");
    assert_eq!(report.location.name, "Paris");
    assert_eq!(report.current.humidity, Some(55.0));
    assert_eq!(report.forecast.len(), 2);
    let text = widget.region().to_text();
    assert!(text.starts_with("20°C  Paris\n"));
    assert!(text.contains("5-day forecast"));
    assert!(widget.is_refreshing());
    assert!(widget.trigger().is_enabled());
}

#[tokio::test]
async fn when_refresh_interval_elapses_forecast_is_fetched_again() {
    // Given: A forecast that warms up on the second fetch
    let forecaster = Arc::new(ScriptedForecaster::new(vec![
        Ok(forecast_at(20.0)),
        Ok(forecast_at(25.0)),
    ]));
    let widget = weather_widget(
        ScriptedGeocoder::resolving(),
        forecaster.clone(),
        Duration::from_millis(30),
    );
    widget.search("Paris").await;

    // When: Several refresh periods pass
    tokio::time::sleep(Duration::from_millis(120)).await;

    // Then: The region reflects the refreshed forecast
    assert!(widget.refresh_count() >= 1);
    assert!(forecaster.calls() >= 2);
    assert!(widget.region().to_text().starts_with("25°C  Paris"));
    widget.stop_refresh();
}

#[tokio::test]
async fn when_refresh_fails_current_view_is_kept() {
    // Given: A forecast that fails on every refresh
    let forecaster = Arc::new(ScriptedForecaster::new(vec![
        Ok(forecast_at(18.0)),
        Err(SourceError::network("timeout")),
    ]));
    let widget = weather_widget(
        ScriptedGeocoder::resolving(),
        forecaster.clone(),
        Duration::from_millis(25),
    );
    widget.search("Oslo").await;

    // When: Refresh ticks run and fail
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then: The failure is swallowed and the first report stays on screen
    assert!(forecaster.calls() >= 2);
    assert_eq!(widget.refresh_count(), 0);
    assert!(widget.region().to_text().starts_with("18°C  Oslo"));
    assert!(widget.is_refreshing());
    widget.stop_refresh();
}

#[tokio::test]
async fn when_a_new_search_fails_previous_refresh_is_cancelled() {
    // Given: A successful search with an armed refresh
    let forecaster = Arc::new(ScriptedForecaster::new(vec![
        Ok(forecast_at(20.0)),
        Err(SourceError::network("connection reset")),
    ]));
    let widget = weather_widget(
        ScriptedGeocoder::resolving(),
        forecaster,
        Duration::from_secs(3600),
    );
    widget.search("Paris").await;
    assert!(widget.is_refreshing());

    // When: The next search cannot fetch a forecast
    let view = widget.search("Lyon").await.expect("not blank");

    // Then: The panel shows one failure line and no refresh is armed
    assert_eq!(view, ViewState::Failed(String::from("Failed to fetch weather")));
    assert_eq!(widget.region().to_text(), "Failed to fetch weather\n");
    assert!(!widget.is_refreshing());
    assert_eq!(widget.location(), None);
}

#[tokio::test]
async fn when_city_is_not_found_provider_message_is_shown() {
    let forecaster = Arc::new(ScriptedForecaster::new(Vec::new()));
    let widget = weather_widget(
        ScriptedGeocoder::failing(SourceError::provider("City not found")),
        forecaster.clone(),
        Duration::from_secs(3600),
    );

    let view = widget.search("Atlantis").await.expect("not blank");

    assert_eq!(view.failure(), Some("City not found"));
    assert_eq!(forecaster.calls(), 0);
    assert!(widget.trigger().is_enabled());
}

#[tokio::test]
async fn when_city_is_blank_nothing_is_requested() {
    let geocoder = Arc::new(ScriptedGeocoder::resolving());
    let forecaster = Arc::new(ScriptedForecaster::new(Vec::new()));
    let widget = WeatherWidget::new(geocoder.clone(), forecaster);

    assert_eq!(widget.search("   ").await, None);
    assert_eq!(geocoder.calls(), 0);
    assert!(widget.region().is_empty());
}

// =============================================================================
// Movie finder
// =============================================================================

fn heat() -> Movie {
    Movie {
        title: String::from("Heat"),
        year: String::from("1995"),
        runtime: Some(String::from("170 min")),
        genre: Some(String::from("Crime, Drama")),
        rating: None,
        plot: Some(String::from("A group of high-end professional thieves...")),
        actors: Some(String::from("Al Pacino, Robert De Niro")),
        poster: None,
    }
}

#[tokio::test]
async fn when_movie_is_found_details_are_rendered() {
    let finder = MovieFinder::new(Arc::new(ScriptedMovies::found(heat())));

    let view = finder.search("heat").await.expect("not blank");

    assert_eq!(view.value().map(|movie| movie.year.as_str()), Some("1995"));
    let text = finder.region().to_text();
    assert!(text.starts_with("Heat\n"));
    assert!(text.contains("IMDb rating: N/A"));
    assert!(text.contains("search_query=Heat%20trailer"));
}

#[tokio::test]
async fn when_movie_is_missing_provider_message_is_shown() {
    let finder = MovieFinder::new(Arc::new(ScriptedMovies::failing(SourceError::provider(
        "Movie not found!",
    ))));

    let view = finder.search("qwertyuiop").await.expect("not blank");

    assert_eq!(view, ViewState::Failed(String::from("Movie not found!")));
    assert_eq!(finder.region().lines().len(), 1);
}

#[tokio::test]
async fn when_network_fails_movie_finder_says_network_error() {
    let finder = MovieFinder::new(Arc::new(ScriptedMovies::failing(SourceError::network(
        "omdb transport error: dns",
    ))));

    let view = finder.search("Heat").await.expect("not blank");

    assert_eq!(view.failure(), Some("Network error"));
}

#[tokio::test]
async fn when_movie_title_is_blank_search_is_skipped() {
    let finder = MovieFinder::new(Arc::new(ScriptedMovies::found(heat())));

    assert_eq!(finder.search("").await, None);
    assert_eq!(finder.view(), None);
}

// =============================================================================
// Voice search
// =============================================================================

#[derive(Debug)]
struct FakeRecognizer {
    supported: bool,
}

impl FakeRecognizer {
    fn supported() -> Self {
        Self { supported: true }
    }
}

impl Recognizer for FakeRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self) -> Result<(), SpeechErrorKind> {
        Ok(())
    }

    fn stop(&mut self) {}
}

#[test]
fn when_interim_transcripts_arrive_latest_one_is_searched_once() {
    // Given: A listening session
    let mut session = VoiceSearch::new(FakeRecognizer::supported(), DocumentIndex::sample());
    session.start().expect("start");

    // When: Two interim transcripts arrive, then recognition ends
    assert!(session.handle(SpeechEvent::Interim(String::from("stock"))).is_none());
    assert!(session.handle(SpeechEvent::Interim(String::from(" voice "))).is_none());
    let titles: Vec<String> = session
        .handle(SpeechEvent::End)
        .expect("one search")
        .documents
        .iter()
        .map(|doc| doc.title.clone())
        .collect();

    // Then: Only the latest transcript was searched, exactly once
    assert_eq!(session.transcript(), "voice");
    assert_eq!(titles, ["Voice Interfaces"]);
    assert_eq!(session.search_count(), 1);
    assert!(session.handle(SpeechEvent::End).is_none());
    assert_eq!(session.search_count(), 1);
}

#[test]
fn when_recognizer_reports_error_listening_stops_with_tagged_error() {
    let mut session = VoiceSearch::new(FakeRecognizer::supported(), DocumentIndex::sample());
    session.start().expect("start");

    session.handle(SpeechEvent::Error(SpeechErrorKind::from_code("not-allowed")));

    assert!(!session.is_listening());
    assert_eq!(session.last_error(), Some(&SpeechErrorKind::PermissionDenied));
    assert!(session.handle(SpeechEvent::End).is_none());
    assert_eq!(session.search_count(), 0);
}

#[test]
fn when_recognizer_is_unsupported_voice_is_disabled_but_typing_works() {
    let recognizer = FakeRecognizer { supported: false };
    let mut session = VoiceSearch::new(recognizer, DocumentIndex::sample());

    assert!(!session.is_voice_available());
    assert_eq!(session.start(), Err(VoiceError::RecognitionUnavailable));

    let results = session.search_text("DASHBOARD").expect("typed search");
    assert_eq!(results.documents.len(), 1);
}

#[test]
fn when_typed_text_is_blank_previous_results_stay() {
    let mut session = VoiceSearch::new(FakeRecognizer::supported(), DocumentIndex::sample());
    session.search_text("speech");

    assert!(session.search_text("   ").is_none());
    assert_eq!(session.results().map(|results| results.query.as_str()), Some("speech"));
}

// =============================================================================
// Player
// =============================================================================

#[test]
fn when_last_track_ends_queue_wraps_to_first() {
    let mut player = PlayerSession::new(sample_playlist(), NullOutput).expect("playlist");
    let last = player.playlist().len() - 1;
    player.select(last).expect("select");

    player.on_ended();

    assert_eq!(player.index(), 0);
    assert!(player.is_playing());
}

#[test]
fn when_prev_is_pressed_on_first_track_queue_wraps_to_last() {
    let mut player = PlayerSession::new(sample_playlist(), NullOutput).expect("playlist");

    player.prev();

    assert_eq!(player.index(), player.playlist().len() - 1);
}

#[test]
fn when_volume_is_zero_player_is_muted() {
    let mut player = PlayerSession::new(sample_playlist(), NullOutput).expect("playlist");

    player.set_volume(0);
    assert!(player.is_muted());

    player.set_volume(40);
    assert!(!player.is_muted());
    assert_eq!(player.volume(), 40);
}

#[test]
fn when_duration_is_known_seek_moves_progress() {
    let mut player = PlayerSession::new(sample_playlist(), NullOutput).expect("playlist");

    player.seek_percent(50.0);
    assert_eq!(player.progress_percent(), 0.0);

    player.on_time_update(10.0, 200.0);
    player.seek_percent(25.0);
    assert_eq!(player.progress_percent(), 25.0);
    assert_eq!(player.status().elapsed, "00:50");
}
