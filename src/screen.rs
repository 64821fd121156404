//! Screen selection: what the panel should be showing right now.
//!
//! Pure function of configuration and store state. Called once at startup
//! to pick the refresh policy and again by the render loop to pick what to
//! draw; both read the same shared state, so they cannot disagree.

use crate::config::ScoreboardConfig;
use crate::data::DataState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenType {
    News,
    Standings,
    Games,
}

/// First match wins:
/// 1. forced news ticker
/// 2. forced standings
/// 3. league off-day → standings or news, per config
/// 4. preferred-team off-day → news, standings, or fall through to games
/// 5. games
pub fn select_screen(config: &ScoreboardConfig, state: &DataState) -> ScreenType {
    if config.news_ticker.always_display {
        ScreenType::News
    } else if config.standings.always_display {
        ScreenType::Standings
    } else if state.schedule.is_offday() {
        if config.standings.mlb_offday {
            ScreenType::Standings
        } else {
            ScreenType::News
        }
    } else if is_offday_for_preferred_team(config, state) {
        if config.news_ticker.team_offday {
            ScreenType::News
        } else if config.standings.team_offday {
            ScreenType::Standings
        } else {
            // Neither preference set: show the rest of the league's games.
            ScreenType::Games
        }
    } else {
        ScreenType::Games
    }
}

fn is_offday_for_preferred_team(config: &ScoreboardConfig, state: &DataState) -> bool {
    config
        .preferred
        .teams
        .first()
        .is_some_and(|team| state.schedule.is_offday_for_team(team))
}
