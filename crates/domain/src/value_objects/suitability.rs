//! Suitability tag attached to each scored crop

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend's verbal bucket for a crop suitability score
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuitabilityTag {
    Excellent,
    Good,
    Moderate,
    Low,
    /// Tag the client does not recognize, kept as sent
    Other(String),
}

impl SuitabilityTag {
    const KNOWN: [SuitabilityTag; 4] = [
        SuitabilityTag::Excellent,
        SuitabilityTag::Good,
        SuitabilityTag::Moderate,
        SuitabilityTag::Low,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SuitabilityTag::Excellent => "Excellent",
            SuitabilityTag::Good => "Good",
            SuitabilityTag::Moderate => "Moderate",
            SuitabilityTag::Low => "Low",
            SuitabilityTag::Other(name) => name,
        }
    }

    /// Whether the crop is worth recommending (Good or better)
    pub fn is_recommended(&self) -> bool {
        matches!(self, SuitabilityTag::Excellent | SuitabilityTag::Good)
    }
}

impl From<String> for SuitabilityTag {
    fn from(raw: String) -> Self {
        SuitabilityTag::KNOWN
            .into_iter()
            .find(|tag| tag.as_str() == raw)
            .unwrap_or(SuitabilityTag::Other(raw))
    }
}

impl From<SuitabilityTag> for String {
    fn from(tag: SuitabilityTag) -> Self {
        match tag {
            SuitabilityTag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SuitabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
