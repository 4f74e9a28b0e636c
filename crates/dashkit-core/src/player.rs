//! Music player session: playlist cursor, transport state and volume.

use serde::Serialize;
use tracing::debug;

use crate::render::{Line, Render, Tone};
use crate::{Track, ValidationError};

pub const DEFAULT_VOLUME: u8 = 80;
const PROGRESS_WIDTH: usize = 24;

/// Audio element boundary.
pub trait AudioOutput {
    fn load(&mut self, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Linear gain, `0.0..=1.0`.
    fn set_volume(&mut self, gain: f32);
    fn set_muted(&mut self, muted: bool);
}

/// Output that drops everything; state is still tracked by the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn load(&mut self, _source: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _seconds: f64) {}
    fn set_volume(&mut self, _gain: f32) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Snapshot of the transport for display and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatus {
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub playing: bool,
    pub volume: u8,
    pub muted: bool,
    pub elapsed: String,
    pub duration: String,
    pub progress_percent: f64,
}

#[derive(Debug)]
pub struct PlayerSession<A> {
    playlist: Vec<Track>,
    index: usize,
    playing: bool,
    volume: u8,
    muted: bool,
    position: f64,
    duration: Option<f64>,
    output: A,
}

impl<A: AudioOutput> PlayerSession<A> {
    /// Loads the first track without starting playback.
    pub fn new(playlist: Vec<Track>, output: A) -> Result<Self, ValidationError> {
        if playlist.is_empty() {
            return Err(ValidationError::EmptyPlaylist);
        }

        let mut session = Self {
            playlist,
            index: 0,
            playing: false,
            volume: DEFAULT_VOLUME,
            muted: false,
            position: 0.0,
            duration: None,
            output,
        };
        session.apply_volume();
        session.load(0)?;
        Ok(session)
    }

    pub fn load(&mut self, index: usize) -> Result<(), ValidationError> {
        let track = self
            .playlist
            .get(index)
            .ok_or(ValidationError::TrackOutOfRange {
                index,
                len: self.playlist.len(),
            })?;

        self.output.load(&track.source);
        debug!(index, title = %track.title, "track loaded");
        self.index = index;
        self.position = 0.0;
        self.duration = None;
        Ok(())
    }

    /// Queue click: load and play.
    pub fn select(&mut self, index: usize) -> Result<(), ValidationError> {
        self.load(index)?;
        self.play();
        Ok(())
    }

    pub fn play(&mut self) {
        self.output.play();
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.output.pause();
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn next(&mut self) {
        let next = (self.index + 1) % self.playlist.len();
        self.jump(next);
    }

    pub fn prev(&mut self) {
        let prev = (self.index + self.playlist.len() - 1) % self.playlist.len();
        self.jump(prev);
    }

    fn jump(&mut self, index: usize) {
        // Both callers wrap the index into range.
        if self.load(index).is_ok() {
            self.play();
        }
    }

    /// Track finished: advance and keep playing.
    pub fn on_ended(&mut self) {
        self.next();
    }

    /// Progress report from the output.
    pub fn on_time_update(&mut self, position: f64, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
            self.position = position.clamp(0.0, duration);
        }
    }

    /// Seeks to `percent` of the track. Ignored until the duration is known.
    pub fn seek_percent(&mut self, percent: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        if !percent.is_finite() {
            return;
        }
        self.position = percent.clamp(0.0, 100.0) / 100.0 * duration;
        self.output.seek(self.position);
    }

    /// Sets volume in percent; zero mutes, anything else unmutes.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.muted = self.volume == 0;
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.output.set_muted(self.muted);
    }

    fn apply_volume(&mut self) {
        self.output.set_volume(f32::from(self.volume) / 100.0);
        self.output.set_muted(self.muted);
    }

    pub fn progress_percent(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => self.position / duration * 100.0,
            _ => 0.0,
        }
    }

    pub fn current(&self) -> &Track {
        &self.playlist[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    pub fn status(&self) -> PlayerStatus {
        let track = self.current();
        PlayerStatus {
            index: self.index,
            title: track.title.clone(),
            artist: track.artist.clone(),
            playing: self.playing,
            volume: self.volume,
            muted: self.muted,
            elapsed: format_time(self.position),
            duration: self
                .duration
                .map_or_else(|| track.duration_text.clone(), format_time),
            progress_percent: self.progress_percent(),
        }
    }
}

/// `mm:ss`; anything that is not a finite non-negative number is `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return String::from("00:00");
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

impl<A: AudioOutput> Render for PlayerSession<A> {
    fn render(&self) -> Vec<Line> {
        let status = self.status();
        let filled = ((status.progress_percent / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled.min(PROGRESS_WIDTH)),
            "-".repeat(PROGRESS_WIDTH - filled.min(PROGRESS_WIDTH))
        );
        let transport = if status.playing { "Playing" } else { "Paused" };
        let sound = if status.muted {
            String::from("Muted")
        } else {
            format!("Volume {}%", status.volume)
        };

        let mut lines = vec![
            Line::plain(format!("{} - {}", status.title, status.artist)),
            Line::plain(format!("{} {bar} {}", status.elapsed, status.duration)),
            Line::muted(format!("{transport}  {sound}")),
        ];
        lines.extend(self.playlist.iter().enumerate().map(|(index, track)| {
            let active = index == self.index;
            Line::toned(
                format!(
                    "{} {}. {:<26} {}",
                    if active { ">" } else { " " },
                    index + 1,
                    track.title,
                    track.duration_text
                ),
                if active { Tone::Positive } else { Tone::Plain },
            )
        }));
        lines
    }
}
