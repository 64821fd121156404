//! The data store: one shared aggregate of everything the panel shows.
//!
//! `Data` is the writer-side handle, owned by whichever thread runs the
//! refresh loop. The render thread holds a clone of the inner
//! `Arc<Mutex<DataState>>` and locks it briefly per frame. Every refresh
//! operation fetches from the remote source *outside* the lock, then takes
//! it just long enough to swap the new snapshot in, so the render thread
//! never waits on the network.
//!
//! Transient fetch failures are logged and swallowed here; the loops above
//! never see them and the panel keeps showing the previous snapshot.

pub mod game;
pub mod offday;
pub mod schedule;
pub mod source;
pub mod standings;

use crate::config::ScoreboardConfig;
use game::GameStatus;
use offday::{NewsTicker, Weather};
use schedule::Schedule;
use source::RemoteSource;
use standings::Standings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Everything shared between the refresh and render threads.
#[derive(Clone, Debug, Default)]
pub struct DataState {
    pub schedule: Schedule,
    pub standings: Standings,
    pub weather: Weather,
    pub news: NewsTicker,
}

pub struct Data {
    config: ScoreboardConfig,
    source: Box<dyn RemoteSource>,
    state: Arc<Mutex<DataState>>,
    /// Render side stores, refresh side loads. Gates game rotation until
    /// any in-flight scroll has completed a full pass.
    scrolling_finished: Arc<AtomicBool>,
}

impl Data {
    /// Build the store and perform the initial synchronous fetch. A cold
    /// start with no network still boots: the empty schedule reads as an
    /// off-day and the loops keep retrying on their normal cadence.
    pub fn new(config: ScoreboardConfig, source: Box<dyn RemoteSource>) -> Self {
        let data = Self {
            config,
            source,
            state: Arc::new(Mutex::new(DataState::default())),
            scrolling_finished: Arc::new(AtomicBool::new(true)),
        };

        data.refresh_schedule();
        data.refresh_standings();
        data.refresh_weather();
        data.refresh_news_ticker();
        data
    }

    pub fn config(&self) -> &ScoreboardConfig {
        &self.config
    }

    /// Shared state handle for the render thread.
    pub fn state(&self) -> Arc<Mutex<DataState>> {
        self.state.clone()
    }

    pub fn scrolling_flag(&self) -> Arc<AtomicBool> {
        self.scrolling_finished.clone()
    }

    pub fn scrolling_finished(&self) -> bool {
        self.scrolling_finished.load(Ordering::SeqCst)
    }

    // ── Refresh operations ─────────────────────────────────────────

    pub fn refresh_schedule(&self) {
        match self.source.fetch_schedule() {
            Ok((date, games)) => {
                let mut state = self.state.lock().unwrap();
                state.schedule.replace_games(date, games);
            }
            Err(e) => warn!("schedule refresh failed: {e}"),
        }
    }

    /// Refresh live detail for the current game only.
    pub fn refresh_game(&self) {
        let id = {
            let state = self.state.lock().unwrap();
            state.schedule.current_game().map(|g| g.id)
        };
        let Some(id) = id else { return };

        match self.source.fetch_game(id) {
            Ok(game) => {
                let mut state = self.state.lock().unwrap();
                state.schedule.update_current_game(game);
            }
            Err(e) => warn!("game refresh failed: {e}"),
        }
    }

    pub fn refresh_standings(&self) {
        match self.source.fetch_standings() {
            Ok(standings) => {
                let mut state = self.state.lock().unwrap();
                state.standings = standings;
            }
            Err(e) => warn!("standings refresh failed: {e}"),
        }
    }

    pub fn refresh_weather(&self) {
        match self.source.fetch_weather(&self.config.weather) {
            Ok(weather) => {
                let mut state = self.state.lock().unwrap();
                state.weather = weather;
            }
            Err(e) => warn!("weather refresh failed: {e}"),
        }
    }

    pub fn refresh_news_ticker(&self) {
        match self.source.fetch_headlines() {
            Ok(headlines) => {
                let mut state = self.state.lock().unwrap();
                state.news = NewsTicker::new(headlines);
            }
            Err(e) => warn!("news refresh failed: {e}"),
        }
    }

    // ── Accessors for the refresh policies ─────────────────────────

    pub fn games_live(&self) -> bool {
        self.state.lock().unwrap().schedule.games_live()
    }

    pub fn is_offday(&self) -> bool {
        self.state.lock().unwrap().schedule.is_offday()
    }

    pub fn is_offday_for_preferred_team(&self) -> bool {
        let state = self.state.lock().unwrap();
        self.config
            .preferred
            .teams
            .first()
            .is_some_and(|team| state.schedule.is_offday_for_team(team))
    }

    pub fn has_standings(&self) -> bool {
        self.state.lock().unwrap().standings.has_divisions()
    }

    pub fn current_game_status(&self) -> GameStatus {
        self.state
            .lock()
            .unwrap()
            .schedule
            .current_game()
            .map(|g| g.status)
            .unwrap_or(GameStatus::Other)
    }

    /// The only way the current-game pointer moves.
    pub fn advance_to_next_game(&self) {
        let mut state = self.state.lock().unwrap();
        state.schedule.advance();
        debug!(
            "advanced to game {} of {}",
            state.schedule.current_index() + 1,
            state.schedule.game_count()
        );
    }

    /// Whether the dwell timer, once expired, should move to the next
    /// game. Rotation needs something to rotate through, and can be
    /// restricted to days with live baseball.
    pub fn should_rotate_to_next_game(&self) -> bool {
        if !self.config.rotation.enabled {
            return false;
        }
        let state = self.state.lock().unwrap();
        state.schedule.game_count() > 1
            && (!self.config.rotation.only_live || state.schedule.games_live())
    }
}

// ── Test support ───────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use super::game::{Game, InningHalf, TeamLine};
    use super::source::{RemoteSource, SourceError};

    pub fn game(id: u64, away: &str, home: &str, status: GameStatus) -> Game {
        Game {
            id,
            status,
            away: TeamLine::new(away, &away[..3].to_uppercase()),
            home: TeamLine::new(home, &home[..3].to_uppercase()),
            inning: 1,
            inning_half: InningHalf::Top,
            start_time: "1:20 PM".to_string(),
        }
    }

    pub fn one_division() -> Standings {
        Standings {
            divisions: vec![standings::Division {
                name: "NL Central".to_string(),
                teams: vec![standings::TeamRecord {
                    abbrev: "CHC".to_string(),
                    wins: 62,
                    losses: 50,
                    games_back: "-".to_string(),
                    ..standings::TeamRecord::default()
                }],
            }],
        }
    }

    /// Canned responses plus a call log, so loop tests can assert which
    /// refresh operations ran and in what order.
    pub struct MockSource {
        pub schedule: Mutex<(String, Vec<Game>)>,
        pub standings: Mutex<Standings>,
        pub calls: Arc<Mutex<Vec<&'static str>>>,
        pub fail_weather: bool,
    }

    impl MockSource {
        pub fn new(games: Vec<Game>, standings: Standings) -> Self {
            Self {
                schedule: Mutex::new(("2026-08-06".to_string(), games)),
                standings: Mutex::new(standings),
                calls: Arc::new(Mutex::new(Vec::new())),
                fail_weather: false,
            }
        }

        pub fn call_log(&self) -> Arc<Mutex<Vec<&'static str>>> {
            self.calls.clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl RemoteSource for MockSource {
        fn fetch_schedule(&self) -> Result<(String, Vec<Game>), SourceError> {
            self.record("schedule");
            Ok(self.schedule.lock().unwrap().clone())
        }

        fn fetch_game(&self, id: u64) -> Result<Game, SourceError> {
            self.record("game");
            self.schedule
                .lock()
                .unwrap()
                .1
                .iter()
                .find(|g| g.id == id)
                .cloned()
                .ok_or(SourceError::Malformed("no such game"))
        }

        fn fetch_standings(&self) -> Result<Standings, SourceError> {
            self.record("standings");
            Ok(self.standings.lock().unwrap().clone())
        }

        fn fetch_weather(
            &self,
            _options: &crate::config::WeatherOptions,
        ) -> Result<Weather, SourceError> {
            self.record("weather");
            if self.fail_weather {
                return Err(SourceError::Malformed("weather down"));
            }
            Ok(Weather {
                temperature: 72.0,
                code: 0,
                metric_units: false,
            })
        }

        fn fetch_headlines(&self) -> Result<Vec<String>, SourceError> {
            self.record("news");
            Ok(vec!["Cubs walk off in the 10th".to_string()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::{MockSource, game, one_division};
    use super::*;
    use pretty_assertions::assert_eq;

    fn live_slate() -> Vec<game::Game> {
        vec![
            game(1, "Cubs", "Cardinals", GameStatus::Live),
            game(2, "Mets", "Braves", GameStatus::Scheduled),
            game(3, "Dodgers", "Giants", GameStatus::Final),
        ]
    }

    fn build(config: ScoreboardConfig, source: MockSource) -> Data {
        Data::new(config, Box::new(source))
    }

    #[test]
    fn new_performs_initial_fetch() {
        let source = MockSource::new(live_slate(), one_division());
        let calls = source.call_log();
        let data = build(ScoreboardConfig::default(), source);

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["schedule", "standings", "weather", "news"]
        );
        assert!(!data.is_offday());
        assert!(data.has_standings());
        assert_eq!(data.current_game_status(), GameStatus::Live);
    }

    #[test]
    fn failed_fetch_keeps_previous_snapshot() {
        let mut source = MockSource::new(live_slate(), one_division());
        source.fail_weather = true;
        let data = build(ScoreboardConfig::default(), source);

        let before = data.state().lock().unwrap().weather.clone();
        data.refresh_weather();
        assert_eq!(data.state().lock().unwrap().weather, before);
    }

    #[test]
    fn refresh_game_updates_only_the_current_slot() {
        let source = MockSource::new(live_slate(), one_division());
        let data = build(ScoreboardConfig::default(), source);

        data.refresh_game();
        let state = data.state();
        let state = state.lock().unwrap();
        assert_eq!(state.schedule.current_game().unwrap().id, 1);
        assert_eq!(state.schedule.games().len(), 3);
    }

    #[test]
    fn offday_for_preferred_team_uses_first_configured_team() {
        let source = MockSource::new(live_slate(), one_division());
        let mut config = ScoreboardConfig::default();
        config.preferred.teams = vec!["Yankees".to_string()];
        let data = build(config, source);
        assert!(data.is_offday_for_preferred_team());

        let source = MockSource::new(live_slate(), one_division());
        let data = build(ScoreboardConfig::default(), source);
        assert!(!data.is_offday_for_preferred_team());
    }

    #[test]
    fn should_rotate_requires_rotation_enabled() {
        let source = MockSource::new(live_slate(), one_division());
        let mut config = ScoreboardConfig::default();
        config.rotation.enabled = false;
        let data = build(config, source);
        assert!(!data.should_rotate_to_next_game());
    }

    #[test]
    fn should_rotate_requires_more_than_one_game() {
        let source = MockSource::new(
            vec![game(1, "Cubs", "Cardinals", GameStatus::Live)],
            one_division(),
        );
        let data = build(ScoreboardConfig::default(), source);
        assert!(!data.should_rotate_to_next_game());
    }

    #[test]
    fn should_rotate_only_live_needs_a_live_game() {
        let quiet = vec![
            game(1, "Cubs", "Cardinals", GameStatus::Scheduled),
            game(2, "Mets", "Braves", GameStatus::Scheduled),
        ];
        let source = MockSource::new(quiet.clone(), one_division());
        let mut config = ScoreboardConfig::default();
        config.rotation.only_live = true;
        let data = build(config.clone(), source);
        assert!(!data.should_rotate_to_next_game());

        let source = MockSource::new(live_slate(), one_division());
        let data = build(config, source);
        assert!(data.should_rotate_to_next_game());

        let source = MockSource::new(quiet, one_division());
        let data = build(ScoreboardConfig::default(), source);
        assert!(data.should_rotate_to_next_game());
    }

    #[test]
    fn advance_moves_the_pointer() {
        let source = MockSource::new(live_slate(), one_division());
        let data = build(ScoreboardConfig::default(), source);
        data.advance_to_next_game();
        assert_eq!(data.state().lock().unwrap().schedule.current_index(), 1);
    }
}
