//! Division standings.

/// One club's row in a division table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub abbrev: String,
    pub wins: u32,
    pub losses: u32,
    /// Games back, as the feed renders it ("-" for the leader, "2.5", ...).
    pub games_back: String,
    pub clinched: bool,
    pub eliminated: bool,
}

impl TeamRecord {
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Division {
    pub name: String,
    /// In feed order, leader first.
    pub teams: Vec<TeamRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Standings {
    pub divisions: Vec<Division>,
}

impl Standings {
    /// The standings refresh policy only makes sense with data behind it;
    /// an empty fetch degrades the caller to the off-day policy.
    pub fn has_divisions(&self) -> bool {
        !self.divisions.is_empty()
    }

    /// Divisions the user asked for, in config order; all of them when the
    /// preference list is empty or matches nothing.
    pub fn preferred<'a>(&'a self, names: &[String]) -> Vec<&'a Division> {
        let picked: Vec<&Division> = self
            .divisions
            .iter()
            .filter(|d| names.iter().any(|n| n == &d.name))
            .collect();
        if picked.is_empty() {
            self.divisions.iter().collect()
        } else {
            picked
        }
    }
}
