//! Core sample types for grainview.
//!
//! This module defines the sediment sample record as it appears in the
//! source dataset, plus the grain-size classification used by the map view.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a sample.
///
/// Datasets in the wild carry either numeric or string ids; both are kept
/// as given so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleId {
    /// Numeric id.
    Number(i64),
    /// Text id.
    Text(String),
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One sediment measurement at a location and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Unique key of this sample.
    pub id: SampleId,

    /// Human-readable location, e.g. `"Calangute Beach, Goa"`.
    pub location: String,

    /// Administrative region the location belongs to.
    pub state: String,

    /// Identifier of the device that collected the sample.
    pub device_id: String,

    /// Coarse category label ("beach type").
    pub beach_type: String,

    /// Median grain size in millimeters.
    pub grain_size: f64,

    /// Temperature in degrees Celsius.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// When the sample was collected.
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Grain-size class of this sample.
    #[must_use]
    pub fn grain_class(&self) -> GrainClass {
        GrainClass::classify(self.grain_size)
    }

    /// The location up to the first comma, as used for chart labels.
    #[must_use]
    pub fn short_location(&self) -> &str {
        self.location
            .split(',')
            .next()
            .unwrap_or(self.location.as_str())
    }
}

/// Grain-size class, as shown in the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainClass {
    /// Below 0.3 mm.
    VeryFine,
    /// 0.3 mm up to 0.4 mm.
    Fine,
    /// 0.4 mm up to 0.5 mm.
    Medium,
    /// 0.5 mm and above.
    Coarse,
}

impl GrainClass {
    /// All classes, finest first.
    pub const ALL: [Self; 4] = [Self::VeryFine, Self::Fine, Self::Medium, Self::Coarse];

    /// Classify a grain size given in millimeters.
    #[must_use]
    pub fn classify(grain_size: f64) -> Self {
        if grain_size < 0.3 {
            Self::VeryFine
        } else if grain_size < 0.4 {
            Self::Fine
        } else if grain_size < 0.5 {
            Self::Medium
        } else {
            Self::Coarse
        }
    }

    /// Legend label for this class.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryFine => "Very Fine (<0.3mm)",
            Self::Fine => "Fine (0.3-0.4mm)",
            Self::Medium => "Medium (0.4-0.5mm)",
            Self::Coarse => "Coarse (>0.5mm)",
        }
    }

    /// Marker colour for this class.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::VeryFine => "#10b981",
            Self::Fine => "#3b82f6",
            Self::Medium => "#f59e0b",
            Self::Coarse => "#ef4444",
        }
    }
}

impl std::fmt::Display for GrainClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryFine => write!(f, "very_fine"),
            Self::Fine => write!(f, "fine"),
            Self::Medium => write!(f, "medium"),
            Self::Coarse => write!(f, "coarse"),
        }
    }
}

/// Parse a collection timestamp.
///
/// RFC 3339 strings keep their offset, with or without seconds. Naive
/// date-times (down to minute precision) and bare dates are read as UTC,
/// a bare date as midnight.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

mod timestamp_format {
    use super::{parse_timestamp, DateTime, Deserialize, Deserializer, Serializer, Utc};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_record() {
        let json = r#"{
            "id": 7,
            "location": "Marina Beach, Chennai",
            "state": "Tamil Nadu",
            "deviceId": "GS-007",
            "beachType": "Sandy",
            "grainSize": 0.32,
            "temperature": 30.5,
            "humidity": 74,
            "latitude": 13.05,
            "longitude": 80.28,
            "timestamp": "2024-01-15T10:30:00Z"
        }"#;

        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.id, SampleId::Number(7));
        assert_eq!(sample.device_id, "GS-007");
        assert_eq!(sample.beach_type, "Sandy");
        assert!((sample.humidity - 74.0).abs() < f64::EPSILON);
        assert_eq!(sample.timestamp.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_string_id() {
        let id: SampleId = serde_json::from_str(r#""S-1""#).unwrap();
        assert_eq!(id, SampleId::Text("S-1".to_string()));
        assert_eq!(id.to_string(), "S-1");
        assert_eq!(SampleId::Number(12).to_string(), "12");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let utc = parse_timestamp("2024-03-01T08:00:00Z").unwrap();
        let offset = parse_timestamp("2024-03-01T13:30:00+05:30").unwrap();
        assert_eq!(utc, offset);

        let naive = parse_timestamp("2024-03-01T08:00:00").unwrap();
        assert_eq!(naive, utc);

        let spaced = parse_timestamp("2024-03-01 08:00:00").unwrap();
        assert_eq!(spaced, utc);

        let fractional = parse_timestamp("2024-03-01T08:00:00.000").unwrap();
        assert_eq!(fractional, utc);

        assert_eq!(parse_timestamp("2024-03-01T08:00").unwrap(), utc);
        assert_eq!(parse_timestamp("2024-03-01 08:00").unwrap(), utc);
        assert_eq!(parse_timestamp("2024-03-01T08:00Z").unwrap(), utc);
        assert_eq!(parse_timestamp("2024-03-01T13:30+05:30").unwrap(), utc);

        let midnight = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(midnight, parse_timestamp("2024-03-01T00:00:00Z").unwrap());
        assert!(midnight < utc);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_short_timestamp_deserializes() {
        let json = r#"{"id":1,"location":"x","state":"s","deviceId":"d","beachType":"b",
            "grainSize":0.1,"temperature":1,"humidity":1,"latitude":0,"longitude":0,
            "timestamp":"2024-01-15"}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.timestamp.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let json = r#"{"id":1,"location":"x","state":"s","deviceId":"d","beachType":"b",
            "grainSize":0.1,"temperature":1,"humidity":1,"latitude":0,"longitude":0,
            "timestamp":"not a date"}"#;
        let err = serde_json::from_str::<Sample>(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn test_serialization_keeps_field_names() {
        let sample = fixtures::goa_and_chennai().remove(0);
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["deviceId"], "D1");
        assert_eq!(json["beachType"], "Sandy");
        assert_eq!(json["timestamp"], "2024-01-15T10:30:00+00:00");

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_grain_class_boundaries() {
        assert_eq!(GrainClass::classify(0.1), GrainClass::VeryFine);
        assert_eq!(GrainClass::classify(0.299), GrainClass::VeryFine);
        assert_eq!(GrainClass::classify(0.3), GrainClass::Fine);
        assert_eq!(GrainClass::classify(0.4), GrainClass::Medium);
        assert_eq!(GrainClass::classify(0.49), GrainClass::Medium);
        assert_eq!(GrainClass::classify(0.5), GrainClass::Coarse);
        assert_eq!(GrainClass::classify(1.2), GrainClass::Coarse);
    }

    #[test]
    fn test_grain_class_legend() {
        assert_eq!(GrainClass::VeryFine.color(), "#10b981");
        assert_eq!(GrainClass::Coarse.label(), "Coarse (>0.5mm)");
        assert_eq!(GrainClass::Medium.to_string(), "medium");
        assert_eq!(GrainClass::ALL.len(), 4);
    }

    #[test]
    fn test_short_location() {
        let mut sample = fixtures::goa_and_chennai().remove(0);
        sample.location = "Baga Beach, North Goa".to_string();
        assert_eq!(sample.short_location(), "Baga Beach");

        sample.location = "Kovalam".to_string();
        assert_eq!(sample.short_location(), "Kovalam");
        assert_eq!(sample.grain_class(), GrainClass::VeryFine);
    }
}
