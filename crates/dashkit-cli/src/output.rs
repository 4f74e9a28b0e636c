use std::io::{self, IsTerminal, Write};

use dashkit_core::{Envelope, Line, Tone};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

const RESET: &str = "\x1b[0m";

/// Finished command: the JSON envelope plus the widget's region lines.
#[derive(Debug)]
pub struct Report {
    pub envelope: Envelope<Value>,
    pub lines: Vec<Line>,
}

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&report.envelope)?
            } else {
                serde_json::to_string(&report.envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            print_lines(&report.lines)?;
            for warning in &report.envelope.meta.warnings {
                eprintln!("warning: {warning}");
            }
        }
    }

    Ok(())
}

/// Writes region lines to stdout, colored when stdout is a terminal.
pub fn print_lines(lines: &[Line]) -> Result<(), CliError> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", styled(line, color))?;
    }
    out.flush()?;
    Ok(())
}

pub fn styled(line: &Line, color: bool) -> String {
    match ansi_code(line.tone) {
        Some(code) if color => format!("\x1b[{code}m{}{RESET}", line.text),
        _ => line.text.clone(),
    }
}

const fn ansi_code(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Plain => None,
        Tone::Positive => Some("32"),
        Tone::Negative => Some("31"),
        Tone::Muted => Some("2"),
    }
}
