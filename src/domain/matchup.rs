//! Opponent resolution from matchup strings.
//!
//! Salary files describe each game as free text such as
//! `"LVA@NYL 07/15/2025 07:00PM ET"`. The accepted grammar is:
//!
//! ```text
//! matchup := AWAY '@' HOME [ WHITESPACE rest ]
//! AWAY    := one or more characters other than '@' and whitespace
//! HOME    := one or more characters other than '@' and whitespace
//! ```
//!
//! Team comparison is exact (case-sensitive) after trimming. A team that is
//! neither `AWAY` nor `HOME`, or a field that does not match the grammar,
//! resolves to the literal [`TeamId::UNKNOWN`]. `Unknown` is a valid
//! opponent value, never an error.

use super::TeamId;

/// The two sides of a parsed matchup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub away: TeamId,
    pub home: TeamId,
}

impl Matchup {
    /// Parse a matchup field. Returns `None` when it does not match the grammar.
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        let token = field.split_whitespace().next()?;
        let (away, home) = token.split_once('@')?;
        if away.is_empty() || home.is_empty() || home.contains('@') {
            return None;
        }
        Some(Self {
            away: TeamId::new(away),
            home: TeamId::new(home),
        })
    }

    /// The opponent of `team` in this matchup, if `team` plays in it.
    #[must_use]
    pub fn opponent_of(&self, team: &TeamId) -> Option<&TeamId> {
        if team == &self.away {
            Some(&self.home)
        } else if team == &self.home {
            Some(&self.away)
        } else {
            None
        }
    }
}

/// Resolve `team`'s opponent from an optional matchup field.
#[must_use]
pub fn resolve_opponent(field: Option<&str>, team: &TeamId) -> TeamId {
    let team = TeamId::new(team.as_str().trim());
    field
        .and_then(Matchup::parse)
        .and_then(|m| m.opponent_of(&team).cloned())
        .unwrap_or_else(TeamId::unknown)
}
