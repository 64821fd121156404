//! Off-day screen content: a weather snapshot and the news ticker text.

/// Current conditions, as fetched. `code` is a WMO weather code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Weather {
    pub temperature: f64,
    pub code: u32,
    pub metric_units: bool,
}

impl Weather {
    /// Name of the icon asset for the current conditions.
    pub fn icon_name(&self) -> &'static str {
        match self.code {
            0 => "clear",
            1..=3 => "cloudy",
            45 | 48 => "fog",
            51..=67 | 80..=82 => "rain",
            71..=77 | 85 | 86 => "snow",
            95..=99 => "storm",
            _ => "cloudy",
        }
    }

    /// Short temperature readout for the panel, e.g. `72°F`.
    pub fn temperature_label(&self) -> String {
        let unit = if self.metric_units { 'C' } else { 'F' };
        format!("{}°{}", self.temperature.round() as i64, unit)
    }
}

/// Headlines shown as one long scrolling line. Rebuilt wholesale on each
/// refresh; never appended to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewsTicker {
    pub headlines: Vec<String>,
}

const TICKER_SEPARATOR: &str = "  •  ";

impl NewsTicker {
    pub fn new(headlines: Vec<String>) -> Self {
        Self { headlines }
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    /// The full line the renderer scrolls.
    pub fn ticker_text(&self) -> String {
        if self.headlines.is_empty() {
            "No news is good news".to_string()
        } else {
            self.headlines.join(TICKER_SEPARATOR)
        }
    }
}
