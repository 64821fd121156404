//! Today's slate of games and the "current game" pointer.

use super::game::Game;

/// Ordered games for one date plus the index of the game on display.
///
/// The index only moves through [`Schedule::advance`]; a refresh replaces
/// the game data wholesale but leaves the pointer where it was (clamped if
/// the slate shrank).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    pub date: String,
    games: Vec<Game>,
    current: usize,
}

impl Schedule {
    pub fn new(date: String, games: Vec<Game>) -> Self {
        Self {
            date,
            games,
            current: 0,
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.games.get(self.current)
    }

    /// Move the pointer to the next game, wrapping at the end of the
    /// slate. No-op on an empty schedule.
    pub fn advance(&mut self) {
        if !self.games.is_empty() {
            self.current = (self.current + 1) % self.games.len();
        }
    }

    /// Swap in freshly fetched games. The current index survives a
    /// refresh; it is clamped when the new slate is shorter.
    pub fn replace_games(&mut self, date: String, games: Vec<Game>) {
        self.date = date;
        self.games = games;
        if self.current >= self.games.len() {
            self.current = self.games.len().saturating_sub(1);
        }
    }

    /// Replace the current game's detail in place (live score updates).
    pub fn update_current_game(&mut self, game: Game) {
        if let Some(slot) = self.games.get_mut(self.current) {
            *slot = game;
        }
    }

    pub fn games_live(&self) -> bool {
        self.games.iter().any(|g| g.status.is_live())
    }

    /// League-wide off-day: nothing scheduled at all.
    pub fn is_offday(&self) -> bool {
        self.games.is_empty()
    }

    pub fn is_offday_for_team(&self, team_name: &str) -> bool {
        !self.games.iter().any(|g| g.involves(team_name))
    }
}
