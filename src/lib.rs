//! Shared types for the MLB LED matrix scoreboard.
//!
//! This module provides what every part of the binary needs:
//! - Panel configuration (dimensions drive layout decisions)
//! - Color handling and the MLB team color table
//! - Matrix initialization with our hardware defaults
//! - Signal handling for clean shutdown
//! - The crate-level error type
//!
//! It also declares the config, data, screen, and refresh modules used by
//! the main binary. The render module (and the matrix itself) only exist
//! with the `hardware` feature; everything else compiles and tests on any
//! host.

pub mod config;
pub mod data;
pub mod refresh;
#[cfg(feature = "hardware")]
pub mod render;
pub mod screen;

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Errors ─────────────────────────────────────────────────────────

/// Fatal errors. Transient fetch failures never surface here; the data
/// store swallows those and keeps the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to initialize LED matrix: {0}")]
    Matrix(String),
    #[error("failed to load font {path}: {msg}")]
    Font { path: PathBuf, msg: String },
    #[error("failed to build HTTP client: {0}")]
    Source(#[from] data::source::SourceError),
    #[error("render thread panicked")]
    RenderPanicked,
}

// ── Panel configuration ────────────────────────────────────────────

/// Dimensions of the LED panel, taken from the CLI and passed explicitly
/// to everything that needs them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Wide panels get static layouts; narrow ones rotate content instead.
    pub fn is_wide(&self) -> bool {
        self.cols > 32
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 32, cols: 64 }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// This lets us test color logic off the Pi. At the hardware boundary we
/// convert via `Into<LedColor>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);
}

#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Team colors ────────────────────────────────────────────────────

/// Banner colors for one club: background band, accent strip, text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamColors {
    pub bg: Color,
    pub accent: Color,
    pub text: Color,
}

impl TeamColors {
    const fn new(bg: Color, accent: Color) -> Self {
        Self {
            bg,
            accent,
            text: Color::WHITE,
        }
    }
}

impl Default for TeamColors {
    fn default() -> Self {
        Self {
            bg: Color::new(7, 7, 7),
            accent: Color::new(64, 64, 64),
            text: Color::WHITE,
        }
    }
}

/// Look up banner colors by club abbreviation. Unknown clubs (spring
/// training split squads, futures games) fall back to the default grey.
pub fn team_colors(abbrev: &str) -> TeamColors {
    let c = Color::new;
    match abbrev.to_ascii_uppercase().as_str() {
        "ARI" => TeamColors::new(c(167, 25, 48), c(227, 212, 173)),
        "ATL" => TeamColors::new(c(19, 39, 79), c(206, 17, 65)),
        "BAL" => TeamColors::new(c(223, 70, 1), c(0, 0, 0)),
        "BOS" => TeamColors::new(c(189, 48, 57), c(12, 35, 64)),
        "CHC" => TeamColors::new(c(14, 51, 134), c(204, 52, 51)),
        "CIN" => TeamColors::new(c(198, 1, 31), c(0, 0, 0)),
        "CLE" => TeamColors::new(c(12, 35, 64), c(227, 25, 55)),
        "COL" => TeamColors::new(c(51, 0, 111), c(196, 206, 211)),
        "CWS" => TeamColors::new(c(39, 37, 31), c(196, 206, 212)),
        "DET" => TeamColors::new(c(12, 35, 64), c(250, 70, 22)),
        "HOU" => TeamColors::new(c(0, 45, 98), c(244, 145, 30)),
        "KC" => TeamColors::new(c(0, 70, 135), c(189, 155, 96)),
        "LAA" => TeamColors::new(c(186, 0, 33), c(134, 147, 151)),
        "LAD" => TeamColors::new(c(0, 90, 156), c(239, 62, 66)),
        "MIA" => TeamColors::new(c(0, 163, 224), c(239, 51, 64)),
        "MIL" => TeamColors::new(c(18, 40, 75), c(255, 197, 47)),
        "MIN" => TeamColors::new(c(0, 43, 92), c(211, 17, 69)),
        "NYM" => TeamColors::new(c(0, 45, 114), c(252, 89, 16)),
        "NYY" => TeamColors::new(c(12, 35, 64), c(196, 206, 212)),
        "OAK" => TeamColors::new(c(0, 56, 49), c(239, 178, 30)),
        "PHI" => TeamColors::new(c(232, 24, 40), c(0, 45, 114)),
        "PIT" => TeamColors::new(c(39, 37, 31), c(253, 184, 39)),
        "SD" => TeamColors::new(c(47, 36, 29), c(255, 196, 37)),
        "SEA" => TeamColors::new(c(12, 44, 86), c(0, 92, 92)),
        "SF" => TeamColors::new(c(253, 90, 30), c(39, 37, 31)),
        "STL" => TeamColors::new(c(196, 30, 58), c(12, 35, 64)),
        "TB" => TeamColors::new(c(9, 44, 92), c(143, 188, 230)),
        "TEX" => TeamColors::new(c(0, 50, 120), c(192, 17, 31)),
        "TOR" => TeamColors::new(c(19, 74, 142), c(232, 41, 28)),
        "WSH" => TeamColors::new(c(171, 0, 3), c(20, 34, 90)),
        _ => TeamColors::default(),
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Pi + Adafruit Bonnet + configurable panel size.
#[cfg(feature = "hardware")]
pub fn create_matrix(panel: PanelConfig) -> Result<LedMatrix, Error> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");

    options
        .set_pwm_bits(8)
        .map_err(|e| Error::Matrix(e.to_string()))?;
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2);

    LedMatrix::new(Some(options), Some(rt_options)).map_err(|e| Error::Matrix(e.to_string()))
}

// ── Shutdown flag ──────────────────────────────────────────────────

/// Set up a Ctrl+C handler that clears `running`. The render loop polls
/// this flag and returns when it clears; the refresh loop then observes
/// the dead render thread and the process winds down.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    running
}

pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn panel_config_default_is_32x64() {
        let panel = PanelConfig::default();
        assert_eq!(panel.rows, 32);
        assert_eq!(panel.cols, 64);
    }

    #[rstest]
    #[case(32, 32, false)]
    #[case(32, 64, true)]
    #[case(64, 128, true)]
    fn panel_wide_depends_on_cols(#[case] rows: u32, #[case] cols: u32, #[case] wide: bool) {
        assert_eq!(PanelConfig::new(rows, cols).is_wide(), wide);
    }

    #[test]
    fn team_colors_known_club() {
        let cubs = team_colors("CHC");
        assert_eq!(cubs.bg, Color::new(14, 51, 134));
        assert_eq!(cubs.text, Color::WHITE);
    }

    #[test]
    fn team_colors_is_case_insensitive() {
        assert_eq!(team_colors("nyy"), team_colors("NYY"));
    }

    #[test]
    fn team_colors_unknown_club_falls_back() {
        assert_eq!(team_colors("XYZ"), TeamColors::default());
    }
}
