use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{sanitize_base_url, validate_session_token, DEFAULT_TIMEOUT};
use crate::router::Route;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid FEED_API_URL {value:?}: {reason}")]
    ApiUrl { value: String, reason: String },
    #[error("invalid FEED_SESSION_TOKEN: {0}")]
    SessionToken(String),
    #[error("invalid FEED_START_ROUTE {0:?}, expected /posts or /posts/<id>")]
    StartRoute(String),
    #[error("invalid FEED_CARD_VARIANT {0:?}, expected \"rich\" or \"reduced\"")]
    CardVariant(String),
}

/// Which post card flavour the feed renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardVariant {
    #[default]
    Rich,
    Reduced,
}

impl CardVariant {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rich" => Some(CardVariant::Rich),
            "reduced" => Some(CardVariant::Reduced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub api_url: String,
    pub session_token: Option<String>,
    pub start_route: Route,
    pub card_variant: CardVariant,
    pub request_timeout: Duration,
    /// Fields set through the environment; these win over saved settings.
    pub explicit: ExplicitFields,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitFields {
    pub api_url: bool,
    pub card_variant: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_token: None,
            start_route: Route::Posts,
            card_variant: CardVariant::Rich,
            request_timeout: DEFAULT_TIMEOUT,
            explicit: ExplicitFields::default(),
        }
    }
}

impl FrontendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let api_url = match non_blank("FEED_API_URL") {
            Some(raw) => sanitize_base_url(raw.clone()).map_err(|err| ConfigError::ApiUrl {
                value: raw,
                reason: err.to_string(),
            })?,
            None => DEFAULT_API_URL.to_string(),
        };

        let session_token = non_blank("FEED_SESSION_TOKEN").map(|raw| raw.trim().to_string());
        if let Some(token) = &session_token {
            validate_session_token(token)
                .map_err(|err| ConfigError::SessionToken(format!("{err:#}")))?;
        }

        let start_route = match non_blank("FEED_START_ROUTE") {
            Some(raw) => Route::parse(&raw).ok_or(ConfigError::StartRoute(raw))?,
            None => Route::Posts,
        };

        let card_variant = match non_blank("FEED_CARD_VARIANT") {
            Some(raw) => CardVariant::parse(&raw).ok_or(ConfigError::CardVariant(raw))?,
            None => CardVariant::Rich,
        };

        let request_timeout = non_blank("FEED_HTTP_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let explicit = ExplicitFields {
            api_url: non_blank("FEED_API_URL").is_some(),
            card_variant: non_blank("FEED_CARD_VARIANT").is_some(),
        };

        Ok(Self {
            api_url,
            session_token,
            start_route,
            card_variant,
            request_timeout,
            explicit,
        })
    }

    /// Applies settings saved by a previous run, except where the
    /// environment already chose a value.
    pub fn apply_saved(&mut self, api_url: String, card_variant: CardVariant) {
        if !self.explicit.api_url {
            self.api_url = api_url;
        }
        if !self.explicit.card_variant {
            self.card_variant = card_variant;
        }
    }
}
