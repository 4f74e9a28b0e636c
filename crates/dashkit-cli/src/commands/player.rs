use std::io::{self, BufRead, Write};

use dashkit_core::fallback::sample_playlist;
use dashkit_core::{AudioOutput, Line, PlayerSession, ProviderId, Render};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::CommandResult;

const HELP: &str = "commands: play, pause, next, prev, seek <0-100>, vol <0-100>, mute, track <n>, quit";

/// Audio sink for a terminal without a sound device: logs what would play.
#[derive(Debug, Default)]
struct TraceOutput;

impl AudioOutput for TraceOutput {
    fn load(&mut self, source: &str) {
        debug!(source, "audio load");
    }

    fn play(&mut self) {
        debug!("audio play");
    }

    fn pause(&mut self) {
        debug!("audio pause");
    }

    fn seek(&mut self, seconds: f64) {
        debug!(seconds, "audio seek");
    }

    fn set_volume(&mut self, gain: f32) {
        debug!(gain, "audio volume");
    }

    fn set_muted(&mut self, muted: bool) {
        debug!(muted, "audio mute");
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayerCommand {
    Play,
    Pause,
    Next,
    Prev,
    Seek(f64),
    Volume(u8),
    Mute,
    Track(usize),
    Quit,
}

pub fn run(format: OutputFormat) -> Result<CommandResult, CliError> {
    let mut session = PlayerSession::new(sample_playlist(), TraceOutput)?;
    report_listed_duration(&mut session);
    let interactive = format == OutputFormat::Table;

    if interactive {
        output::print_lines(&session.render())?;
        println!("{HELP}");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == PlayerCommand::Quit {
            break;
        }
        apply(&mut session, command)?;
        if interactive {
            output::print_lines(&session.render())?;
            io::stdout().flush()?;
        }
    }

    let lines = if interactive { Vec::new() } else { session.render() };
    Ok(CommandResult::ok(
        serde_json::to_value(session.status())?,
        lines,
        ProviderId::Local,
    ))
}

fn apply(session: &mut PlayerSession<TraceOutput>, command: PlayerCommand) -> Result<(), CliError> {
    match command {
        PlayerCommand::Play => session.play(),
        PlayerCommand::Pause => session.pause(),
        PlayerCommand::Next => session.next(),
        PlayerCommand::Prev => session.prev(),
        PlayerCommand::Seek(percent) => session.seek_percent(percent),
        PlayerCommand::Volume(volume) => session.set_volume(volume),
        PlayerCommand::Mute => session.toggle_mute(),
        PlayerCommand::Track(number) => session.select(number.saturating_sub(1))?,
        PlayerCommand::Quit => {}
    }
    if matches!(
        command,
        PlayerCommand::Next | PlayerCommand::Prev | PlayerCommand::Track(_)
    ) {
        report_listed_duration(session);
    }
    Ok(())
}

/// Without a decoder the listed `mm:ss` length stands in for the real one,
/// which makes seeking possible.
fn report_listed_duration(session: &mut PlayerSession<TraceOutput>) {
    if let Some(seconds) = parse_clock(&session.current().duration_text) {
        session.on_time_update(0.0, seconds);
    }
}

fn parse_clock(text: &str) -> Option<f64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes = minutes.parse::<u32>().ok()?;
    let seconds = seconds.parse::<u32>().ok()?;
    Some(f64::from(minutes * 60 + seconds))
}

fn parse_command(line: &str) -> Result<PlayerCommand, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();
    let number = |what: &str| -> Result<f64, String> {
        arg.and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| (0.0..=100.0).contains(value))
            .ok_or_else(|| format!("{what} needs a number between 0 and 100"))
    };

    match verb.as_str() {
        "play" => Ok(PlayerCommand::Play),
        "pause" => Ok(PlayerCommand::Pause),
        "next" => Ok(PlayerCommand::Next),
        "prev" => Ok(PlayerCommand::Prev),
        "seek" => number("seek").map(PlayerCommand::Seek),
        "vol" | "volume" => number("vol").map(|value| PlayerCommand::Volume(value.round() as u8)),
        "mute" => Ok(PlayerCommand::Mute),
        "track" => arg
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|number| *number >= 1)
            .map(PlayerCommand::Track)
            .ok_or_else(|| String::from("track needs a number starting at 1")),
        "quit" | "exit" | "q" => Ok(PlayerCommand::Quit),
        _ => Err(format!("unknown command '{verb}'; {HELP}")),
    }
}
