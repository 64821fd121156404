//! Game state: status classification and per-team score lines.

use std::fmt;

/// Coarse game state driving refresh cadence and rotation dwell times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
    /// Postponed, suspended, cancelled: anything we can't act on.
    Other,
}

impl GameStatus {
    /// Classify the feed's detailed status string. The feed vocabulary is
    /// larger than we care about; unknown strings land in `Other` rather
    /// than failing the whole refresh.
    pub fn classify(detailed: &str) -> Self {
        match detailed {
            "Scheduled" | "Pre-Game" | "Warmup" | "Preview" => Self::Scheduled,
            "In Progress" | "Live" | "Manager Challenge" | "Umpire Review" => Self::Live,
            "Final" | "Game Over" | "Completed Early" => Self::Final,
            _ => Self::Other,
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InningHalf {
    Top,
    Bottom,
}

/// One team's line score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamLine {
    pub name: String,
    pub abbrev: String,
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
}

impl TeamLine {
    pub fn new(name: &str, abbrev: &str) -> Self {
        Self {
            name: name.to_string(),
            abbrev: abbrev.to_string(),
            runs: 0,
            hits: 0,
            errors: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: u64,
    pub status: GameStatus,
    pub away: TeamLine,
    pub home: TeamLine,
    pub inning: u32,
    pub inning_half: InningHalf,
    /// Start time as the feed gives it, already local ("7:05 PM").
    pub start_time: String,
}

impl Game {
    pub fn involves(&self, team_name: &str) -> bool {
        self.away.name == team_name || self.home.name == team_name
    }

    /// Short inning indicator for the banner, e.g. `T5` / `B7`.
    pub fn inning_label(&self) -> InningLabel<'_> {
        InningLabel(self)
    }
}

pub struct InningLabel<'a>(&'a Game);

impl fmt::Display for InningLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.status {
            GameStatus::Live => {
                let half = match self.0.inning_half {
                    InningHalf::Top => 'T',
                    InningHalf::Bottom => 'B',
                };
                write!(f, "{}{}", half, self.0.inning)
            }
            GameStatus::Final if self.0.inning != 9 => write!(f, "F/{}", self.0.inning),
            GameStatus::Final => write!(f, "F"),
            _ => write!(f, "{}", self.0.start_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn game(status: GameStatus, inning: u32, half: InningHalf) -> Game {
        Game {
            id: 1,
            status,
            away: TeamLine::new("Cubs", "CHC"),
            home: TeamLine::new("Cardinals", "STL"),
            inning,
            inning_half: half,
            start_time: "7:05 PM".to_string(),
        }
    }

    #[rstest]
    #[case("Scheduled", GameStatus::Scheduled)]
    #[case("Pre-Game", GameStatus::Scheduled)]
    #[case("Warmup", GameStatus::Scheduled)]
    #[case("In Progress", GameStatus::Live)]
    #[case("Manager Challenge", GameStatus::Live)]
    #[case("Final", GameStatus::Final)]
    #[case("Game Over", GameStatus::Final)]
    #[case("Postponed", GameStatus::Other)]
    #[case("Suspended: Rain", GameStatus::Other)]
    #[case("", GameStatus::Other)]
    fn classify_feed_statuses(#[case] detailed: &str, #[case] expected: GameStatus) {
        assert_eq!(GameStatus::classify(detailed), expected);
    }

    #[test]
    fn involves_matches_either_side() {
        let g = game(GameStatus::Scheduled, 1, InningHalf::Top);
        assert!(g.involves("Cubs"));
        assert!(g.involves("Cardinals"));
        assert!(!g.involves("Mets"));
    }

    #[rstest]
    #[case(GameStatus::Live, 5, InningHalf::Top, "T5")]
    #[case(GameStatus::Live, 7, InningHalf::Bottom, "B7")]
    #[case(GameStatus::Final, 9, InningHalf::Bottom, "F")]
    #[case(GameStatus::Final, 11, InningHalf::Bottom, "F/11")]
    #[case(GameStatus::Scheduled, 1, InningHalf::Top, "7:05 PM")]
    fn inning_label_by_status(
        #[case] status: GameStatus,
        #[case] inning: u32,
        #[case] half: InningHalf,
        #[case] expected: &str,
    ) {
        assert_eq!(game(status, inning, half).inning_label().to_string(), expected);
    }
}
