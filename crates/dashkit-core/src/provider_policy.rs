use std::time::Duration;

use crate::ProviderId;

/// Client-side request budget for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPolicy {
    pub provider_id: ProviderId,
    pub quota_window: Duration,
    pub quota_limit: u32,
}

impl ProviderPolicy {
    /// Alpha Vantage free tier: five calls per minute.
    pub fn alphavantage_default() -> Self {
        Self {
            provider_id: ProviderId::Alphavantage,
            quota_window: Duration::from_secs(60),
            quota_limit: 5,
        }
    }

    /// Nominatim usage policy: at most one request per second.
    pub fn nominatim_default() -> Self {
        Self {
            provider_id: ProviderId::Nominatim,
            quota_window: Duration::from_secs(1),
            quota_limit: 1,
        }
    }

    pub fn open_meteo_default() -> Self {
        Self {
            provider_id: ProviderId::OpenMeteo,
            quota_window: Duration::from_secs(60),
            quota_limit: 600,
        }
    }

    /// OMDb free keys allow 1,000 calls per day.
    pub fn omdb_default() -> Self {
        Self {
            provider_id: ProviderId::Omdb,
            quota_window: Duration::from_secs(86_400),
            quota_limit: 1_000,
        }
    }

    pub fn default_for(provider_id: ProviderId) -> Option<Self> {
        match provider_id {
            ProviderId::Alphavantage => Some(Self::alphavantage_default()),
            ProviderId::Nominatim => Some(Self::nominatim_default()),
            ProviderId::OpenMeteo => Some(Self::open_meteo_default()),
            ProviderId::Omdb => Some(Self::omdb_default()),
            ProviderId::Fallback | ProviderId::Local => None,
        }
    }
}
