//! Admin-managed crop rules
//!
//! A rule names a crop, the seasons it is sown in, and the temperature and
//! rainfall windows the backend scores live weather against.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;
use crate::value_objects::Season;

/// A stored crop rule as returned by `/admin/crop_rules`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRule {
    pub id: i64,
    pub name: String,
    pub seasons: Vec<Season>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub rain_min: f64,
    pub rain_max: f64,
    pub active: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl CropRule {
    /// Editable fields, for update round-trips.
    ///
    /// Seasons the client does not recognize are carried over unchanged.
    pub fn to_input(&self) -> CropRuleInput {
        CropRuleInput {
            name: self.name.clone(),
            seasons: self.seasons.clone(),
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            rain_min: self.rain_min,
            rain_max: self.rain_max,
            active: self.active,
        }
    }
}

/// Body for creating or replacing a crop rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRuleInput {
    pub name: String,
    pub seasons: Vec<Season>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub rain_min: f64,
    pub rain_max: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CropRuleInput {
    /// Reject input the backend would store but never match.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Crop name cannot be empty"));
        }
        if self.seasons.is_empty() {
            return Err(DomainError::validation(
                "A crop rule needs at least one season",
            ));
        }
        if self.seasons.iter().any(|s| s.as_str().trim().is_empty()) {
            return Err(DomainError::validation("Season names cannot be blank"));
        }
        if !self.temp_min.is_finite() || !self.temp_max.is_finite() {
            return Err(DomainError::validation("Temperature bounds must be numbers"));
        }
        if !self.rain_min.is_finite() || !self.rain_max.is_finite() {
            return Err(DomainError::validation("Rainfall bounds must be numbers"));
        }
        if self.temp_min > self.temp_max {
            return Err(DomainError::validation(format!(
                "temp_min ({}) must not exceed temp_max ({})",
                self.temp_min, self.temp_max
            )));
        }
        if self.rain_min > self.rain_max {
            return Err(DomainError::validation(format!(
                "rain_min ({}) must not exceed rain_max ({})",
                self.rain_min, self.rain_max
            )));
        }
        Ok(())
    }
}

/// Accepts RFC 3339 or a naive ISO timestamp (read back from SQLite without
/// an offset), treating the latter as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| DomainError::parse(format!("Invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn wheat() -> CropRuleInput {
        CropRuleInput {
            name: "Wheat".to_string(),
            seasons: vec![Season::Rabi],
            temp_min: 10.0,
            temp_max: 25.0,
            rain_min: 20.0,
            rain_max: 100.0,
            active: true,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(wheat().validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_name() {
        let input = CropRuleInput {
            name: "  ".to_string(),
            ..wheat()
        };
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_rejects_no_seasons() {
        let input = CropRuleInput {
            seasons: vec![],
            ..wheat()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let hot = CropRuleInput {
            temp_min: 30.0,
            temp_max: 20.0,
            ..wheat()
        };
        let wet = CropRuleInput {
            rain_min: 200.0,
            rain_max: 20.0,
            ..wheat()
        };
        assert!(hot.validate().is_err());
        assert!(wet.validate().is_err());
    }

    #[test]
    fn test_active_defaults_true() {
        let json = r#"{"name":"Maize","seasons":["Kharif","Rabi"],
            "temp_min":18,"temp_max":32,"rain_min":25,"rain_max":150}"#;
        let input: CropRuleInput = serde_json::from_str(json).expect("deserialize");
        assert!(input.active);
        assert_eq!(input.seasons, vec![Season::Kharif, Season::Rabi]);
    }

    #[test]
    fn test_created_at_naive_and_rfc3339() {
        let naive = parse_timestamp("2025-06-01T08:30:00.123456").expect("naive");
        assert_eq!(naive.month(), 6);
        assert_eq!(naive.hour(), 8);

        let zoned = parse_timestamp("2025-06-01T08:30:00+05:30").expect("rfc3339");
        assert_eq!(zoned.hour(), 3);

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_crop_rule_and_round_trip_input() {
        let json = r#"{"id":4,"name":"Pulses","seasons":["Rabi","Kharif"],
            "temp_min":18.0,"temp_max":30.0,"rain_min":20.0,"rain_max":120.0,
            "active":true,"created_at":"2025-01-15T10:00:00"}"#;
        let rule: CropRule = serde_json::from_str(json).expect("deserialize");
        assert_eq!(rule.id, 4);
        assert_eq!(rule.rain_max, 120.0);
        assert_eq!(rule.to_input().name, "Pulses");
    }

    #[test]
    fn test_unrecognized_season_survives_update_round_trip() {
        let json = r#"{"id":9,"name":"Moong","seasons":["Zaid","Summer"],
            "temp_min":25.0,"temp_max":35.0,"rain_min":10.0,"rain_max":60.0,
            "active":true,"created_at":"2025-03-01T06:00:00"}"#;
        let rule: CropRule = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            rule.seasons,
            vec![Season::Other("Zaid".to_string()), Season::Summer]
        );

        let input = rule.to_input();
        assert!(input.validate().is_ok());
        let body = serde_json::to_value(&input).expect("serialize");
        assert_eq!(body["seasons"], serde_json::json!(["Zaid", "Summer"]));
    }

    #[test]
    fn test_rejects_blank_season_name() {
        let input = CropRuleInput {
            seasons: vec![Season::Other(" ".to_string())],
            ..wheat()
        };
        assert!(input.validate().is_err());
    }
}
