use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Where a rendered value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Alphavantage,
    Nominatim,
    OpenMeteo,
    Omdb,
    /// Bundled sample tables.
    Fallback,
    /// Data that never leaves the machine (todo list, document index, playlist).
    Local,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphavantage => "alphavantage",
            Self::Nominatim => "nominatim",
            Self::OpenMeteo => "open_meteo",
            Self::Omdb => "omdb",
            Self::Fallback => "fallback",
            Self::Local => "local",
        }
    }

    pub const fn is_remote(self) -> bool {
        !matches!(self, Self::Fallback | Self::Local)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
