//! Weather dashboard: geocode a city, fetch its forecast, render current
//! conditions plus five daily cards, and keep them fresh on a timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::open_meteo::{ForecastPayload, HourlySeries};
use crate::data_source::{ForecastSource, GeocodeSource, SourceError, SourceErrorKind};
use crate::refresh::RefreshTimer;
use crate::render::{format_compact, Line, Region, Render, Tone, ViewState};
use crate::sequence::{RequestSequencer, Trigger};
use crate::{
    day_label, CurrentConditions, ForecastDay, Location, Query, Sky, UtcDateTime, WeatherReport,
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
const FORECAST_DAYS: usize = 5;

#[derive(Debug, Default)]
struct Panel {
    view: Option<ViewState<WeatherReport>>,
    region: Region,
    location: Option<Location>,
    refreshes: u64,
}

/// State shared with the refresh task.
struct Shared {
    forecaster: Arc<dyn ForecastSource>,
    panel: Mutex<Panel>,
    sequencer: RequestSequencer,
}

impl Shared {
    fn panel(&self) -> std::sync::MutexGuard<'_, Panel> {
        self.panel.lock().expect("weather panel lock poisoned")
    }

    async fn load(&self, location: &Location) -> Result<WeatherReport, SourceError> {
        let payload = self
            .forecaster
            .forecast(location.latitude, location.longitude)
            .await?;
        Ok(build_report(location.clone(), &payload, UtcDateTime::now()))
    }

    /// One timer tick: refetch for the resolved location. Failures keep the
    /// current view.
    async fn refresh(&self, location: Location) {
        let ticket = self.sequencer.issue();
        match self.load(&location).await {
            Ok(report) => {
                if !self.sequencer.commit(ticket) {
                    debug!(city = %location.name, "refresh superseded by a newer search");
                    return;
                }
                let state = ViewState::Value(report);
                let mut panel = self.panel();
                panel.region.show(&state);
                panel.view = Some(state);
                panel.refreshes += 1;
                debug!(city = %location.name, "weather refreshed");
            }
            Err(error) => {
                warn!(city = %location.name, code = error.code(), %error, "weather auto-refresh failed");
            }
        }
    }
}

pub struct WeatherWidget {
    geocoder: Arc<dyn GeocodeSource>,
    shared: Arc<Shared>,
    timer: RefreshTimer,
    refresh_every: Duration,
    trigger: Trigger,
}

impl WeatherWidget {
    pub fn new(geocoder: Arc<dyn GeocodeSource>, forecaster: Arc<dyn ForecastSource>) -> Self {
        Self {
            geocoder,
            shared: Arc::new(Shared {
                forecaster,
                panel: Mutex::new(Panel::default()),
                sequencer: RequestSequencer::new(),
            }),
            timer: RefreshTimer::new(),
            refresh_every: DEFAULT_REFRESH_INTERVAL,
            trigger: Trigger::new(),
        }
    }

    pub fn with_refresh_interval(mut self, refresh_every: Duration) -> Self {
        self.refresh_every = refresh_every;
        self
    }

    /// Runs a manual search. Blank input is a no-op and returns `None`.
    ///
    /// Any armed refresh is cancelled first; a successful search arms a new one
    /// for the resolved location.
    pub async fn search(&self, raw: &str) -> Option<ViewState<WeatherReport>> {
        let city = Query::parse(raw).ok()?;

        self.timer.cancel();
        let ticket = self.shared.sequencer.issue();
        let _guard = self.trigger.engage();
        self.shared
            .panel()
            .region
            .show(&ViewState::<WeatherReport>::Loading);

        let outcome = match self.geocoder.geocode(&city).await {
            Ok(location) => self
                .shared
                .load(&location)
                .await
                .map(|report| (location, report))
                .map_err(|error| user_message(&error, "Failed to fetch weather")),
            Err(error) => Err(user_message(&error, "Failed to geocode city")),
        };

        if !self.shared.sequencer.commit(ticket) {
            debug!(%city, "discarding superseded weather response");
            return Some(match outcome {
                Ok((_, report)) => ViewState::Value(report),
                Err(message) => ViewState::Failed(message),
            });
        }

        let state = match outcome {
            Ok((location, report)) => {
                self.arm_refresh(location.clone());
                self.shared.panel().location = Some(location);
                ViewState::Value(report)
            }
            Err(message) => {
                warn!(%city, %message, "weather search failed");
                self.shared.panel().location = None;
                ViewState::Failed(message)
            }
        };

        let mut panel = self.shared.panel();
        panel.region.show(&state);
        panel.view = Some(state.clone());
        Some(state)
    }

    fn arm_refresh(&self, location: Location) {
        let shared = Arc::clone(&self.shared);
        self.timer.arm(self.refresh_every, move || {
            let shared = Arc::clone(&shared);
            let location = location.clone();
            async move { shared.refresh(location).await }
        });
    }

    pub fn stop_refresh(&self) {
        self.timer.cancel();
    }

    pub fn is_refreshing(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn view(&self) -> Option<ViewState<WeatherReport>> {
        self.shared.panel().view.clone()
    }

    pub fn region(&self) -> Region {
        self.shared.panel().region.clone()
    }

    pub fn location(&self) -> Option<Location> {
        self.shared.panel().location.clone()
    }

    /// Number of successful timer refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.shared.panel().refreshes
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }
}

impl std::fmt::Debug for WeatherWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherWidget")
            .field("refresh_every", &self.refresh_every)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

fn user_message(error: &SourceError, transport_message: &str) -> String {
    match error.kind() {
        SourceErrorKind::Provider | SourceErrorKind::InvalidRequest => error.message().to_owned(),
        _ => transport_message.to_owned(),
    }
}

pub fn build_report(
    location: Location,
    payload: &ForecastPayload,
    observed_at: UtcDateTime,
) -> WeatherReport {
    let current = payload.current_weather.clone().unwrap_or_default();
    WeatherReport {
        location,
        current: CurrentConditions {
            temperature: current.temperature,
            wind_speed: current.windspeed,
            humidity: payload
                .hourly
                .relativehumidity_2m
                .first()
                .copied()
                .flatten(),
        },
        forecast: summarize_hourly(&payload.hourly),
        observed_at,
    }
}

/// Groups hourly samples by calendar date and keeps the first five dates.
///
/// Each day's temperature is the rounded mean of its non-null samples; the sky
/// comes from the middle sample's weather code. Days without any temperature
/// sample are dropped.
pub fn summarize_hourly(hourly: &HourlySeries) -> Vec<ForecastDay> {
    let mut days: Vec<(&str, Vec<(Option<f64>, Option<i64>)>)> = Vec::new();
    for (index, time) in hourly.time.iter().enumerate() {
        let date = time.split('T').next().unwrap_or(time.as_str());
        let sample = (
            hourly.temperature_2m.get(index).copied().flatten(),
            hourly.weathercode.get(index).copied().flatten(),
        );
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, samples)) => samples.push(sample),
            None => days.push((date, vec![sample])),
        }
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .filter_map(|(date, samples)| {
            let temps = samples
                .iter()
                .filter_map(|(temp, _)| *temp)
                .collect::<Vec<_>>();
            if temps.is_empty() {
                return None;
            }
            let mean = temps.iter().sum::<f64>() / temps.len() as f64;
            let middle_code = samples.get(samples.len() / 2).and_then(|(_, code)| *code);

            Some(ForecastDay {
                date: date.to_owned(),
                temperature: mean.round() as i64,
                sky: Sky::from_code(middle_code),
            })
        })
        .collect()
}

impl Render for WeatherReport {
    fn render(&self) -> Vec<Line> {
        let rounded = self
            .current
            .temperature
            .map_or_else(|| String::from("--"), |temp| format!("{}", temp.round() as i64));
        let humidity = self
            .current
            .humidity
            .map_or_else(|| String::from("--"), format_compact);
        let wind = self
            .current
            .wind_speed
            .map_or_else(|| String::from("--"), format_compact);

        let mut lines = vec![
            Line::plain(format!("{rounded}°C  {}", self.location.name)),
            Line::muted(self.observed_at.format_clock()),
            Line::plain(format!(
                "Humidity {humidity}%  Wind {wind} km/h  Feels {rounded}°C"
            )),
        ];

        if !self.forecast.is_empty() {
            lines.push(Line::muted("5-day forecast"));
            lines.extend(self.forecast.iter().map(|day| {
                let tone = match day.sky {
                    Sky::Precip => Tone::Negative,
                    Sky::Clear => Tone::Positive,
                    Sky::Cloudy | Sky::Unknown => Tone::Plain,
                };
                Line::toned(
                    format!(
                        "{:<12} {:>4}°C  {}",
                        day_label(&day.date),
                        day.temperature,
                        day.sky.label()
                    ),
                    tone,
                )
            }));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(samples: &[(&str, Option<f64>, Option<i64>)]) -> HourlySeries {
        HourlySeries {
            time: samples.iter().map(|(time, _, _)| (*time).to_owned()).collect(),
            temperature_2m: samples.iter().map(|(_, temp, _)| *temp).collect(),
            relativehumidity_2m: Vec::new(),
            windspeed_10m: Vec::new(),
            weathercode: samples.iter().map(|(_, _, code)| *code).collect(),
        }
    }

    #[test]
    fn groups_by_date_and_uses_middle_code() {
        let hourly = series(&[
            ("2025-01-06T00:00", Some(10.0), Some(0)),
            ("2025-01-06T01:00", Some(11.0), Some(2)),
            ("2025-01-06T02:00", Some(13.0), Some(61)),
            ("2025-01-07T00:00", Some(4.4), Some(0)),
        ]);

        let days = summarize_hourly(&hourly);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2025-01-06");
        assert_eq!(days[0].temperature, 11);
        assert_eq!(days[0].sky, Sky::Cloudy);
        assert_eq!(days[1].temperature, 4);
        assert_eq!(days[1].sky, Sky::Clear);
    }

    #[test]
    fn keeps_first_five_dates() {
        let times = (1..=7)
            .map(|day| format!("2025-01-{day:02}T12:00"))
            .collect::<Vec<_>>();
        let samples = times
            .iter()
            .map(|time| (time.as_str(), Some(20.0), Some(80)))
            .collect::<Vec<_>>();

        let days = summarize_hourly(&series(&samples));

        assert_eq!(days.len(), 5);
        assert_eq!(days[4].date, "2025-01-05");
        assert!(days.iter().all(|day| day.sky == Sky::Precip));
    }

    #[test]
    fn null_samples_do_not_skew_the_mean() {
        let hourly = series(&[
            ("2025-01-06T00:00", Some(9.0), None),
            ("2025-01-06T01:00", None, Some(3)),
            ("2025-01-07T00:00", None, None),
        ]);

        let days = summarize_hourly(&hourly);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature, 9);
        assert_eq!(days[0].sky, Sky::Cloudy);
    }

    #[test]
    fn report_takes_first_hourly_humidity() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"current_weather":{"temperature":21.6,"windspeed":11.2},
                "hourly":{"time":["2025-01-06T00:00"],"temperature_2m":[18.0],
                          "relativehumidity_2m":[64,70],"weathercode":[0]}}"#,
        )
        .expect("payload");
        let location = Location {
            name: String::from("Pune"),
            latitude: 18.52,
            longitude: 73.85,
        };
        let observed_at = UtcDateTime::parse("2025-01-06T14:05:09Z").expect("timestamp");

        let report = build_report(location, &payload, observed_at);
        let lines = report.render();

        assert_eq!(report.current.humidity, Some(64.0));
        assert_eq!(lines[0].text, "22°C  Pune");
        assert_eq!(lines[1].text, "Jan 6, 2025 14:05:09 UTC");
        assert_eq!(lines[2].text, "Humidity 64%  Wind 11.2 km/h  Feels 22°C");
        assert!(lines[4].text.starts_with("Mon, Jan 6"));
    }
}
