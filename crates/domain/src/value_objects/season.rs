//! Agricultural season value object
//!
//! Indian cropping follows three broad periods. The backend infers the
//! current one from the calendar month biased by live weather, and crop rules
//! are tagged with the seasons they apply to.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agricultural season used to select applicable crop rules
///
/// Serializes as the backend's spelling. A name the client does not recognize
/// is kept verbatim in `Other` so it survives display and update round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Season {
    /// Monsoon sowing, roughly June to October
    Kharif,
    /// Winter sowing, roughly November to March
    Rabi,
    /// Short dry-season window, April and May
    Summer,
    /// Season name sent by the backend that is none of the above
    Other(String),
}

impl Season {
    /// All seasons the backend is known to produce
    pub const KNOWN: [Season; 3] = [Season::Kharif, Season::Rabi, Season::Summer];

    /// Wire name as the backend spells it
    pub fn as_str(&self) -> &str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Summer => "Summer",
            Season::Other(name) => name,
        }
    }

    /// Parse an optional season where a blank string means "unspecified".
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = DomainError;

    /// Case-insensitive. Unlike serde (which keeps unrecognized names in
    /// `Other`), this rejects them so user input is caught before it is sent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Season::KNOWN
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                DomainError::parse(format!(
                    "Unknown season: '{}' (expected Kharif, Rabi or Summer)",
                    s
                ))
            })
    }
}

impl From<String> for Season {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or(Season::Other(raw))
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        match season {
            Season::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Deserialize a season field that may be blank or null.
///
/// `/live_crops` echoes back whatever season it was asked for, including the
/// empty string, so a blank value maps to `None` rather than `Other("")`.
pub fn deserialize_optional_season<'de, D>(deserializer: D) -> Result<Option<Season>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Season::from(trimmed.to_string()))
        }
    }))
}
