//! Contest format presets.
//!
//! A preset supplies the roster shape and limits of one contest format,
//! and names the slot whose eligibility makes an entity captain eligible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, RosterShape, SlotId, SlotSpec};
use crate::error::ConfigError;

/// Salary cap shared by every preset.
pub const DEFAULT_SALARY_CAP: u32 = 50_000;

/// Supported contest formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sport {
    /// Single-game captain format (NBA/WNBA): `CPT` plus five `UTIL`.
    #[default]
    Showdown,
    /// Classic baseball: `P:2, C, 1B, 2B, 3B, SS, OF:3`.
    MlbClassic,
    /// Single-race F1: `CPT`, four drivers and one constructor.
    F1Showdown,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Showdown, Sport::MlbClassic, Sport::F1Showdown];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Showdown => "showdown",
            Self::MlbClassic => "mlb-classic",
            Self::F1Showdown => "f1-showdown",
        }
    }

    /// Roster shape with the preset's cap and team limits.
    ///
    /// # Errors
    ///
    /// Returns an error only if the preset's slot list is malformed.
    pub fn roster_shape(self) -> Result<RosterShape, DomainError> {
        match self {
            Self::Showdown => RosterShape::try_new(
                vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 5)],
                DEFAULT_SALARY_CAP,
                5,
                2,
            ),
            Self::MlbClassic => RosterShape::try_new(
                vec![
                    SlotSpec::new("P", 2),
                    SlotSpec::new("C", 1),
                    SlotSpec::new("1B", 1),
                    SlotSpec::new("2B", 1),
                    SlotSpec::new("3B", 1),
                    SlotSpec::new("SS", 1),
                    SlotSpec::new("OF", 3),
                ],
                DEFAULT_SALARY_CAP,
                5,
                3,
            ),
            // Constructors do not count toward team limits or stacks.
            Self::F1Showdown => RosterShape::try_new(
                vec![
                    SlotSpec::captain("CPT", 1),
                    SlotSpec::new("D", 4),
                    SlotSpec::new("CNSTR", 1).team_exempt(),
                ],
                DEFAULT_SALARY_CAP,
                3,
                2,
            ),
        }
    }

    /// Slot whose eligible entities may also fill the captain slot.
    #[must_use]
    pub fn captain_source(self) -> Option<SlotId> {
        match self {
            Self::Showdown => Some(SlotId::from("UTIL")),
            Self::F1Showdown => Some(SlotId::from("D")),
            Self::MlbClassic => None,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str() == wanted)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "sport",
                reason: format!(
                    "unknown sport '{s}', expected one of: {}",
                    Self::ALL.map(Sport::as_str).join(", ")
                ),
            })
    }
}
