//! The remote data source behind the store.
//!
//! `RemoteSource` is deliberately narrow: five fetch operations, each a
//! single request mapped into our model types. `StatsApi` is the real
//! implementation (MLB stats API for schedule/game/standings, Open-Meteo
//! for weather, ESPN for headlines); tests substitute a recording mock.
//! No retries here; the refresh loops treat a failed fetch as "keep the
//! previous snapshot".

use super::game::{Game, GameStatus, InningHalf, TeamLine};
use super::offday::Weather;
use super::standings::{Division, Standings, TeamRecord};
use crate::config::WeatherOptions;
use serde::Deserialize;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected payload: {0}")]
    Malformed(&'static str),
}

pub trait RemoteSource: Send {
    /// Today's slate: the date string and its games, in feed order.
    fn fetch_schedule(&self) -> Result<(String, Vec<Game>), SourceError>;
    /// Live detail for one game.
    fn fetch_game(&self, id: u64) -> Result<Game, SourceError>;
    fn fetch_standings(&self) -> Result<Standings, SourceError>;
    fn fetch_weather(&self, options: &WeatherOptions) -> Result<Weather, SourceError>;
    fn fetch_headlines(&self) -> Result<Vec<String>, SourceError>;
}

// ── Wire formats ───────────────────────────────────────────────────
// Only the fields we read; everything else in the payloads is ignored.

#[derive(Deserialize)]
struct SchedulePayload {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Deserialize)]
struct ScheduleDate {
    date: String,
    #[serde(default)]
    games: Vec<ScheduleGame>,
}

#[derive(Deserialize)]
struct ScheduleGame {
    #[serde(rename = "gamePk")]
    game_pk: u64,
    #[serde(rename = "gameDate", default)]
    game_date: String,
    status: WireStatus,
    teams: WireTeams,
    #[serde(default)]
    linescore: Option<WireLinescore>,
}

#[derive(Deserialize)]
struct WireStatus {
    #[serde(rename = "detailedState", default)]
    detailed_state: String,
}

#[derive(Deserialize)]
struct WireTeams {
    away: WireTeamSide,
    home: WireTeamSide,
}

#[derive(Deserialize)]
struct WireTeamSide {
    team: WireTeam,
    #[serde(default)]
    score: Option<u32>,
}

#[derive(Deserialize)]
struct WireTeam {
    #[serde(default)]
    name: String,
    #[serde(rename = "teamName", default)]
    team_name: String,
    #[serde(default)]
    abbreviation: String,
}

#[derive(Deserialize)]
struct WireLinescore {
    #[serde(rename = "currentInning", default)]
    current_inning: Option<u32>,
    #[serde(rename = "inningHalf", default)]
    inning_half: Option<String>,
    #[serde(default)]
    teams: Option<WireLinescoreTeams>,
}

#[derive(Deserialize, Default)]
struct WireLinescoreTeams {
    #[serde(default)]
    away: WireLine,
    #[serde(default)]
    home: WireLine,
}

#[derive(Deserialize, Default)]
struct WireLine {
    #[serde(default)]
    runs: u32,
    #[serde(default)]
    hits: u32,
    #[serde(default)]
    errors: u32,
}

#[derive(Deserialize)]
struct FeedPayload {
    #[serde(rename = "gamePk")]
    game_pk: u64,
    #[serde(rename = "gameData")]
    game_data: FeedGameData,
    #[serde(rename = "liveData")]
    live_data: FeedLiveData,
}

#[derive(Deserialize)]
struct FeedGameData {
    status: WireStatus,
    teams: FeedTeams,
    #[serde(default)]
    datetime: FeedDatetime,
}

#[derive(Deserialize, Default)]
struct FeedDatetime {
    #[serde(rename = "dateTime", default)]
    date_time: String,
}

#[derive(Deserialize)]
struct FeedTeams {
    away: WireTeam,
    home: WireTeam,
}

#[derive(Deserialize)]
struct FeedLiveData {
    #[serde(default)]
    linescore: Option<WireLinescore>,
}

#[derive(Deserialize)]
struct StandingsPayload {
    #[serde(default)]
    records: Vec<StandingsRecord>,
}

#[derive(Deserialize)]
struct StandingsRecord {
    division: WireDivision,
    #[serde(rename = "teamRecords", default)]
    team_records: Vec<WireTeamRecord>,
}

#[derive(Deserialize)]
struct WireDivision {
    id: u32,
}

#[derive(Deserialize)]
struct WireTeamRecord {
    team: WireTeam,
    wins: u32,
    losses: u32,
    #[serde(rename = "gamesBack", default)]
    games_back: String,
    #[serde(rename = "clinchIndicator", default)]
    clinch_indicator: Option<String>,
}

#[derive(Deserialize)]
struct WeatherPayload {
    current_weather: WireCurrentWeather,
}

#[derive(Deserialize)]
struct WireCurrentWeather {
    temperature: f64,
    weathercode: u32,
}

#[derive(Deserialize)]
struct NewsPayload {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
struct NewsArticle {
    #[serde(default)]
    headline: String,
}

// ── Mapping ────────────────────────────────────────────────────────

fn map_team(side: &WireTeamSide, line: Option<&WireLine>) -> TeamLine {
    TeamLine {
        name: if side.team.team_name.is_empty() {
            side.team.name.clone()
        } else {
            side.team.team_name.clone()
        },
        abbrev: side.team.abbreviation.clone(),
        runs: line.map(|l| l.runs).or(side.score).unwrap_or(0),
        hits: line.map(|l| l.hits).unwrap_or(0),
        errors: line.map(|l| l.errors).unwrap_or(0),
    }
}

fn map_inning(linescore: Option<&WireLinescore>) -> (u32, InningHalf) {
    let inning = linescore.and_then(|l| l.current_inning).unwrap_or(1);
    let half = match linescore.and_then(|l| l.inning_half.as_deref()) {
        Some("Bottom") => InningHalf::Bottom,
        _ => InningHalf::Top,
    };
    (inning, half)
}

fn map_schedule(payload: SchedulePayload, offset: UtcOffset) -> (String, Vec<Game>) {
    let Some(day) = payload.dates.into_iter().next() else {
        return (String::new(), Vec::new());
    };

    let games = day
        .games
        .into_iter()
        .map(|g| {
            let lines = g.linescore.as_ref().and_then(|l| l.teams.as_ref());
            let (inning, inning_half) = map_inning(g.linescore.as_ref());
            Game {
                id: g.game_pk,
                status: GameStatus::classify(&g.status.detailed_state),
                away: map_team(&g.teams.away, lines.map(|l| &l.away)),
                home: map_team(&g.teams.home, lines.map(|l| &l.home)),
                inning,
                inning_half,
                start_time: format_start_time(&g.game_date, offset),
            }
        })
        .collect();

    (day.date, games)
}

fn map_feed(payload: FeedPayload, offset: UtcOffset) -> Game {
    let linescore = payload.live_data.linescore.as_ref();
    let lines = linescore.and_then(|l| l.teams.as_ref());
    let (inning, inning_half) = map_inning(linescore);

    let side = |team: &WireTeam, line: Option<&WireLine>| TeamLine {
        name: if team.team_name.is_empty() {
            team.name.clone()
        } else {
            team.team_name.clone()
        },
        abbrev: team.abbreviation.clone(),
        runs: line.map(|l| l.runs).unwrap_or(0),
        hits: line.map(|l| l.hits).unwrap_or(0),
        errors: line.map(|l| l.errors).unwrap_or(0),
    };

    Game {
        id: payload.game_pk,
        status: GameStatus::classify(&payload.game_data.status.detailed_state),
        away: side(&payload.game_data.teams.away, lines.map(|l| &l.away)),
        home: side(&payload.game_data.teams.home, lines.map(|l| &l.home)),
        inning,
        inning_half,
        start_time: format_start_time(&payload.game_data.datetime.date_time, offset),
    }
}

/// Division ids as the stats API numbers them.
fn division_name(id: u32) -> &'static str {
    match id {
        200 => "AL West",
        201 => "AL East",
        202 => "AL Central",
        203 => "NL West",
        204 => "NL East",
        205 => "NL Central",
        _ => "MLB",
    }
}

fn map_standings(payload: StandingsPayload) -> Standings {
    let divisions = payload
        .records
        .into_iter()
        .map(|record| Division {
            name: division_name(record.division.id).to_string(),
            teams: record
                .team_records
                .into_iter()
                .map(|t| {
                    let clinch = t.clinch_indicator.as_deref();
                    TeamRecord {
                        abbrev: t.team.abbreviation,
                        wins: t.wins,
                        losses: t.losses,
                        games_back: t.games_back,
                        clinched: matches!(clinch, Some("x" | "y" | "z")),
                        eliminated: matches!(clinch, Some("e")),
                    }
                })
                .collect(),
        })
        .collect();

    Standings { divisions }
}

/// Render a feed timestamp ("2026-08-06T23:05:00Z") as panel-friendly
/// local time ("7:05 PM"). Unparseable input becomes "TBD"; the feed
/// leaves the field empty for games without a start time yet.
fn format_start_time(iso: &str, offset: UtcOffset) -> String {
    let format = format_description!("[hour repr:12 padding:none]:[minute] [period]");
    OffsetDateTime::parse(iso, &Rfc3339)
        .ok()
        .and_then(|dt| dt.to_offset(offset).format(format).ok())
        .unwrap_or_else(|| "TBD".to_string())
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

// ── HTTP implementation ────────────────────────────────────────────

const SCHEDULE_URL: &str =
    "https://statsapi.mlb.com/api/v1/schedule?sportId=1&hydrate=team,linescore";
const FEED_URL: &str = "https://statsapi.mlb.com/api/v1.1/game";
const STANDINGS_URL: &str =
    "https://statsapi.mlb.com/api/v1/standings?leagueId=103,104&hydrate=team";
const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub struct StatsApi {
    client: reqwest::blocking::Client,
    news_url: String,
}

impl StatsApi {
    pub fn new(news_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            news_url: news_url.to_string(),
        })
    }
}

impl RemoteSource for StatsApi {
    fn fetch_schedule(&self) -> Result<(String, Vec<Game>), SourceError> {
        let payload: SchedulePayload = self.client.get(SCHEDULE_URL).send()?.json()?;
        Ok(map_schedule(payload, local_offset()))
    }

    fn fetch_game(&self, id: u64) -> Result<Game, SourceError> {
        let url = format!("{FEED_URL}/{id}/feed/live");
        let payload: FeedPayload = self.client.get(url).send()?.json()?;
        Ok(map_feed(payload, local_offset()))
    }

    fn fetch_standings(&self) -> Result<Standings, SourceError> {
        let payload: StandingsPayload = self.client.get(STANDINGS_URL).send()?.json()?;
        Ok(map_standings(payload))
    }

    fn fetch_weather(&self, options: &WeatherOptions) -> Result<Weather, SourceError> {
        let unit = if options.metric_units {
            "celsius"
        } else {
            "fahrenheit"
        };
        let url = format!(
            "{WEATHER_URL}?latitude={}&longitude={}&current_weather=true&temperature_unit={unit}",
            options.latitude, options.longitude
        );
        let payload: WeatherPayload = self.client.get(url).send()?.json()?;
        Ok(Weather {
            temperature: payload.current_weather.temperature,
            code: payload.current_weather.weathercode,
            metric_units: options.metric_units,
        })
    }

    fn fetch_headlines(&self) -> Result<Vec<String>, SourceError> {
        let payload: NewsPayload = self.client.get(&self.news_url).send()?.json()?;
        Ok(payload
            .articles
            .into_iter()
            .map(|a| a.headline)
            .filter(|h| !h.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEDULE_JSON: &str = r#"{
        "dates": [{
            "date": "2026-08-06",
            "games": [{
                "gamePk": 745804,
                "gameDate": "2026-08-06T18:20:00Z",
                "status": {"detailedState": "In Progress"},
                "teams": {
                    "away": {"team": {"name": "St. Louis Cardinals", "teamName": "Cardinals", "abbreviation": "STL"}, "score": 2},
                    "home": {"team": {"name": "Chicago Cubs", "teamName": "Cubs", "abbreviation": "CHC"}, "score": 5}
                },
                "linescore": {
                    "currentInning": 6,
                    "inningHalf": "Bottom",
                    "teams": {
                        "away": {"runs": 2, "hits": 7, "errors": 1},
                        "home": {"runs": 5, "hits": 9, "errors": 0}
                    }
                }
            }]
        }]
    }"#;

    #[test]
    fn schedule_payload_maps_to_games() {
        let payload: SchedulePayload = serde_json::from_str(SCHEDULE_JSON).unwrap();
        let (date, games) = map_schedule(payload, UtcOffset::UTC);

        assert_eq!(date, "2026-08-06");
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.id, 745804);
        assert_eq!(game.status, GameStatus::Live);
        assert_eq!(game.away.abbrev, "STL");
        assert_eq!(game.away.runs, 2);
        assert_eq!(game.away.hits, 7);
        assert_eq!(game.away.errors, 1);
        assert_eq!(game.home.runs, 5);
        assert_eq!(game.inning, 6);
        assert_eq!(game.inning_half, InningHalf::Bottom);
        assert_eq!(game.start_time, "6:20 PM");
    }

    #[test]
    fn schedule_without_linescore_uses_schedule_scores() {
        let json = r#"{
            "dates": [{
                "date": "2026-08-06",
                "games": [{
                    "gamePk": 1,
                    "gameDate": "",
                    "status": {"detailedState": "Scheduled"},
                    "teams": {
                        "away": {"team": {"teamName": "Mets", "abbreviation": "NYM"}},
                        "home": {"team": {"teamName": "Braves", "abbreviation": "ATL"}}
                    }
                }]
            }]
        }"#;
        let payload: SchedulePayload = serde_json::from_str(json).unwrap();
        let (_, games) = map_schedule(payload, UtcOffset::UTC);
        assert_eq!(games[0].away.runs, 0);
        assert_eq!(games[0].start_time, "TBD");
        assert_eq!(games[0].inning, 1);
    }

    #[test]
    fn empty_schedule_payload_is_an_offday() {
        let payload: SchedulePayload = serde_json::from_str(r#"{"dates": []}"#).unwrap();
        let (date, games) = map_schedule(payload, UtcOffset::UTC);
        assert_eq!(date, "");
        assert!(games.is_empty());
    }

    #[test]
    fn standings_payload_maps_divisions_and_flags() {
        let json = r#"{
            "records": [{
                "division": {"id": 205},
                "teamRecords": [
                    {"team": {"abbreviation": "CHC"}, "wins": 62, "losses": 50, "gamesBack": "-", "clinchIndicator": "x"},
                    {"team": {"abbreviation": "PIT"}, "wins": 40, "losses": 72, "gamesBack": "22.0", "clinchIndicator": "e"}
                ]
            }]
        }"#;
        let payload: StandingsPayload = serde_json::from_str(json).unwrap();
        let standings = map_standings(payload);

        assert_eq!(standings.divisions.len(), 1);
        let division = &standings.divisions[0];
        assert_eq!(division.name, "NL Central");
        assert!(division.teams[0].clinched);
        assert!(!division.teams[0].eliminated);
        assert!(division.teams[1].eliminated);
        assert_eq!(division.teams[1].games_back, "22.0");
    }

    #[test]
    fn feed_payload_maps_to_game() {
        let json = r#"{
            "gamePk": 745804,
            "gameData": {
                "status": {"detailedState": "Final"},
                "teams": {
                    "away": {"teamName": "Cardinals", "abbreviation": "STL"},
                    "home": {"teamName": "Cubs", "abbreviation": "CHC"}
                },
                "datetime": {"dateTime": "2026-08-06T18:20:00Z"}
            },
            "liveData": {
                "linescore": {
                    "currentInning": 9,
                    "inningHalf": "Bottom",
                    "teams": {
                        "away": {"runs": 2, "hits": 7, "errors": 1},
                        "home": {"runs": 5, "hits": 9, "errors": 0}
                    }
                }
            }
        }"#;
        let payload: FeedPayload = serde_json::from_str(json).unwrap();
        let game = map_feed(payload, UtcOffset::UTC);
        assert_eq!(game.status, GameStatus::Final);
        assert_eq!(game.home.runs, 5);
        assert_eq!(game.inning, 9);
    }

    #[test]
    fn start_time_respects_offset() {
        let central = UtcOffset::from_hms(-5, 0, 0).unwrap();
        assert_eq!(
            format_start_time("2026-08-06T23:05:00Z", central),
            "6:05 PM"
        );
        assert_eq!(format_start_time("not a time", central), "TBD");
    }

    #[test]
    fn weather_payload_maps() {
        let json = r#"{"current_weather": {"temperature": 71.6, "weathercode": 2}}"#;
        let payload: WeatherPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.current_weather.temperature, 71.6);
        assert_eq!(payload.current_weather.weathercode, 2);
    }

    #[test]
    fn headlines_skip_empty_entries() {
        let json = r#"{"articles": [{"headline": "Cubs walk off"}, {"headline": ""}]}"#;
        let payload: NewsPayload = serde_json::from_str(json).unwrap();
        let headlines: Vec<String> = payload
            .articles
            .into_iter()
            .map(|a| a.headline)
            .filter(|h| !h.is_empty())
            .collect();
        assert_eq!(headlines, vec!["Cubs walk off".to_string()]);
    }
}
