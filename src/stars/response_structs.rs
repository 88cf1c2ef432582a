//! Response structures for the stars API.
//!
//! This module contains structures for deserializing JSON responses from
//! the upstream star tracking API.

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Representation of a star from the stars API.
///
/// The API returns a json array of these records:
/// ```json
/// [
///   { "world": 420, "location": 302, "calledLocation": "Aldarin mine",
///     "calledAt": 1718000000.25, "tier": 6, "minTime": 60, "maxTime": 120 }
/// ]
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StarResponse {
    /// World the star landed on.
    pub world: u32,
    /// Location slot of the star.
    pub location: u32,
    /// Free text description of where the star landed.
    pub called_location: String,
    /// Unix timestamp in seconds, may be fractional.
    pub called_at: f64,
    /// Star size.
    pub tier: u32,
    /// Lower bound of the landing window, in seconds, 0 when unknown.
    #[serde(default, deserialize_with = "deserialize_time")]
    pub min_time: i64,
    /// Upper bound of the landing window, in seconds, 0 when unknown.
    #[serde(default, deserialize_with = "deserialize_time")]
    pub max_time: i64,
}

/// Reads a landing window bound, `null` meaning unknown.
fn deserialize_time<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes every record of a stars API response.
///
/// A record that does not match [`StarResponse`] is logged and skipped, it
/// never fails the whole response.
pub fn parse_star_records(records: Vec<Value>) -> Vec<StarResponse> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(star) => Some(star),
            Err(e) => {
                warn!("ignore malformed star record {}: {}", record, e);
                None
            }
        })
        .collect()
}

impl fmt::Display for StarResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "world={}, location={}, called_location={}, called_at={}, tier={}",
            self.world, self.location, self.called_location, self.called_at, self.tier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_star_list() {
        let json = r#"[
            {"world": 420, "location": 302, "calledLocation": "Aldarin mine",
             "calledAt": 1718000000.75, "tier": 6, "minTime": 60, "maxTime": 120},
            {"world": 301, "location": 4, "calledLocation": "Custodia pass",
             "calledAt": 1718000100, "tier": 9, "minTime": 0, "maxTime": 30}
        ]"#;

        let stars: Vec<StarResponse> = serde_json::from_str(json).unwrap();

        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].world, 420);
        assert_eq!(stars[0].called_location, "Aldarin mine");
        assert_eq!(stars[0].called_at as i64, 1718000000);
        assert_eq!(stars[1].tier, 9);
        assert_eq!(stars[1].max_time, 30);
    }

    #[test]
    fn test_missing_or_null_times_default_to_zero() {
        let json = r#"[
            {"world": 420, "location": 302, "calledLocation": "Aldarin mine",
             "calledAt": 1718000000, "tier": 6, "minTime": null},
            {"world": 421, "location": 302, "calledLocation": "Aldarin mine",
             "calledAt": 1718000000, "tier": 6}
        ]"#;

        let stars: Vec<StarResponse> = serde_json::from_str(json).unwrap();

        assert_eq!(stars[0].min_time, 0);
        assert_eq!(stars[0].max_time, 0);
        assert_eq!(stars[1].min_time, 0);
    }

    #[test]
    fn test_parse_star_records_skips_malformed_record() {
        let records: Vec<Value> = serde_json::from_str(
            r#"[
                {"world": 420, "location": 302, "calledLocation": "Aldarin mine",
                 "calledAt": 1718000000, "tier": 6, "minTime": 60, "maxTime": 120},
                {"world": -1, "location": 302, "calledLocation": "Aldarin mine",
                 "calledAt": 1718000000, "tier": 6, "minTime": 60, "maxTime": 120},
                {"world": 422, "calledLocation": "Aldarin mine", "tier": 6},
                "not a star"
            ]"#,
        )
        .unwrap();

        let stars = parse_star_records(records);

        assert_eq!(stars.len(), 1);
        assert_eq!(stars[0].world, 420);
    }

    #[test]
    fn test_star_response_display() {
        let star = StarResponse {
            world: 420,
            location: 302,
            called_location: "Aldarin mine".to_string(),
            called_at: 10.0,
            tier: 6,
            min_time: 0,
            max_time: 0,
        };

        let display = format!("{}", star);
        assert!(display.contains("world=420"));
        assert!(display.contains("called_location=Aldarin mine"));
    }
}
