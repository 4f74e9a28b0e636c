use serde::{Deserialize, Serialize};

/// Styling class for a rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Plain,
    Positive,
    Negative,
    Muted,
}

impl Tone {
    /// Non-negative values (including zero) style as positive.
    pub fn from_sign(value: f64) -> Self {
        if value >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

pub fn format_fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// `+0.42%`, `-2.15%`. Zero renders with a plus sign.
pub fn format_signed_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// Axis and reading labels: whole numbers with separators in the thousands,
/// otherwise at most two decimals with trailing zeros dropped.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if (1_000.0..1_000_000.0).contains(&magnitude) {
        return group_thousands(value.round() as i64);
    }

    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        String::from("0")
    } else {
        text.to_owned()
    }
}

pub fn format_volume(volume: u64) -> String {
    group_digits(&volume.to_string())
}

fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
