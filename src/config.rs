//! Scoreboard configuration, read once at startup from a JSON file.
//!
//! Every decision point in the refresh and render loops consults these
//! flags, so the whole struct is immutable after load and passed by
//! reference. Panel dimensions are an input to loading: layout choices
//! (static vs. rotating standings, full team names) key off panel width.

use crate::PanelConfig;
use crate::data::game::GameStatus;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferred {
    /// First entry is "the" preferred team for off-day decisions.
    pub teams: Vec<String>,
    pub divisions: Vec<String>,
}

impl Default for Preferred {
    fn default() -> Self {
        Self {
            teams: vec!["Cubs".to_string()],
            divisions: vec!["NL Central".to_string()],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsTickerOptions {
    pub always_display: bool,
    pub team_offday: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsOptions {
    pub always_display: bool,
    pub mlb_offday: bool,
    pub team_offday: bool,
    /// Show standings in place of games while nothing is live.
    pub no_games: bool,
}

/// Dwell time per game, in seconds, keyed by game status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationRates {
    pub live: f64,
    #[serde(rename = "final")]
    pub final_: f64,
    pub pregame: f64,
}

impl Default for RotationRates {
    fn default() -> Self {
        Self {
            live: 10.0,
            final_: 15.0,
            pregame: 15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationOptions {
    pub enabled: bool,
    /// Only rotate while at least one game is live.
    pub only_live: bool,
    pub rates: RotationRates,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            only_live: false,
            rates: RotationRates::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherOptions {
    pub latitude: f64,
    pub longitude: f64,
    pub metric_units: bool,
}

impl Default for WeatherOptions {
    fn default() -> Self {
        // Wrigley Field
        Self {
            latitude: 41.948,
            longitude: -87.655,
            metric_units: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    pub preferred: Preferred,
    pub news_ticker: NewsTickerOptions,
    pub standings: StandingsOptions,
    pub rotation: RotationOptions,
    pub weather: WeatherOptions,
    pub news_url: String,
    pub full_team_names: bool,
    pub show_hits_and_errors: bool,
    pub debug: bool,
    #[serde(skip)]
    pub panel: PanelConfig,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            preferred: Preferred::default(),
            news_ticker: NewsTickerOptions::default(),
            standings: StandingsOptions::default(),
            rotation: RotationOptions::default(),
            weather: WeatherOptions::default(),
            news_url: "https://site.api.espn.com/apis/site/v2/sports/baseball/mlb/news"
                .to_string(),
            full_team_names: true,
            show_hits_and_errors: false,
            debug: false,
            panel: PanelConfig::default(),
        }
    }
}

impl ScoreboardConfig {
    /// Load the config file, or fall back to defaults when it does not
    /// exist. A file that exists but cannot be read or parsed is a fatal
    /// error.
    pub fn load<P: AsRef<Path>>(path: P, panel: PanelConfig) -> Result<Self, crate::Error> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let raw = read_to_string(path).map_err(|source| crate::Error::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| crate::Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            warn!("config file {} not found, using defaults", path.display());
            Self::default()
        };

        config.panel = panel;

        if config.full_team_names && !panel.is_wide() {
            // Full names can never fit on a 32-wide panel.
            config.full_team_names = false;
        }

        Ok(config)
    }

    /// Dwell time before the current game may rotate away, keyed by its
    /// status. Anything that is not live or final dwells at the pregame
    /// rate.
    pub fn rotate_rate_for_status(&self, status: GameStatus) -> Duration {
        let secs = match status {
            GameStatus::Live => self.rotation.rates.live,
            GameStatus::Final => self.rotation.rates.final_,
            GameStatus::Scheduled | GameStatus::Other => self.rotation.rates.pregame,
        };
        Duration::from_secs_f64(secs)
    }
}
