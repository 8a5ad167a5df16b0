//! Summary statistics over the sample collection.
//!
//! These back the dashboard cards and charts, the report summary, and the
//! map markers. All functions take the full collection and are pure.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sample::{GrainClass, Sample, SampleId};

/// Number of samples plotted in the dashboard grain-size chart.
pub const DASHBOARD_SERIES_LEN: usize = 10;

/// Count of samples for one beach type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    /// Beach type.
    pub name: String,
    /// Number of samples with this beach type.
    pub count: usize,
    /// Share of all samples, in percent.
    pub percent: f64,
}

/// Aggregate statistics for a non-empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of samples.
    pub total_samples: usize,
    /// Mean grain size in millimeters.
    pub avg_grain_size: f64,
    /// Mean temperature in °C.
    pub avg_temperature: f64,
    /// Mean humidity in percent.
    pub avg_humidity: f64,
    /// Samples per beach type, in first-seen order.
    pub beach_types: Vec<CategoryCount>,
    /// Earliest collection time.
    pub first_sample: DateTime<Utc>,
    /// Latest collection time.
    pub last_sample: DateTime<Utc>,
}

impl Summary {
    /// Mean grain size as displayed (3 decimals).
    #[must_use]
    pub fn grain_size_display(&self) -> String {
        format!("{:.3}", self.avg_grain_size)
    }

    /// Mean temperature as displayed (1 decimal).
    #[must_use]
    pub fn temperature_display(&self) -> String {
        format!("{:.1}", self.avg_temperature)
    }

    /// Mean humidity as displayed (1 decimal).
    #[must_use]
    pub fn humidity_display(&self) -> String {
        format!("{:.1}", self.avg_humidity)
    }
}

/// One bar of the dashboard grain-size chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrainPoint {
    /// Location up to the first comma.
    pub label: String,
    /// Grain size in millimeters.
    pub grain_size: f64,
    /// Administrative region.
    pub state: String,
}

/// A sample plotted on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Sample id.
    pub id: SampleId,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Grain size in millimeters.
    pub grain_size: f64,
    /// Grain-size class, which picks the marker colour.
    pub class: GrainClass,
}

/// Arithmetic mean; 0 for no values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Samples per beach type, in first-seen order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn category_distribution(samples: &[Sample]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|c| c.name == sample.beach_type) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                name: sample.beach_type.clone(),
                count: 1,
                percent: 0.0,
            }),
        }
    }

    let total = samples.len() as f64;
    for entry in &mut counts {
        entry.percent = entry.count as f64 * 100.0 / total;
    }
    counts
}

/// Aggregate statistics, or `None` for an empty collection.
#[must_use]
pub fn summarize(samples: &[Sample]) -> Option<Summary> {
    let first_sample = samples.iter().map(|s| s.timestamp).min()?;
    let last_sample = samples.iter().map(|s| s.timestamp).max()?;

    Some(Summary {
        total_samples: samples.len(),
        avg_grain_size: average(samples.iter().map(|s| s.grain_size)),
        avg_temperature: average(samples.iter().map(|s| s.temperature)),
        avg_humidity: average(samples.iter().map(|s| s.humidity)),
        beach_types: category_distribution(samples),
        first_sample,
        last_sample,
    })
}

/// The first `limit` samples as chart points, in source order.
#[must_use]
pub fn grain_size_series(samples: &[Sample], limit: usize) -> Vec<GrainPoint> {
    samples
        .iter()
        .take(limit)
        .map(|s| GrainPoint {
            label: s.short_location().to_string(),
            grain_size: s.grain_size,
            state: s.state.clone(),
        })
        .collect()
}

/// One marker per sample.
#[must_use]
pub fn map_markers(samples: &[Sample]) -> Vec<MapMarker> {
    samples
        .iter()
        .map(|s| MapMarker {
            id: s.id.clone(),
            latitude: s.latitude,
            longitude: s.longitude,
            grain_size: s.grain_size,
            class: s.grain_class(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::{goa_and_chennai, sample};

    #[test]
    fn test_average() {
        assert!((average([1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
        assert!(average(std::iter::empty()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_two_samples() {
        let samples = goa_and_chennai();
        let summary = summarize(&samples).unwrap();

        assert_eq!(summary.total_samples, 2);
        assert_eq!(summary.grain_size_display(), "0.400");
        assert_eq!(summary.temperature_display(), "29.8");
        assert_eq!(summary.humidity_display(), "68.8");
        assert_eq!(summary.first_sample, samples[0].timestamp);
        assert_eq!(summary.last_sample, samples[1].timestamp);
        assert_eq!(summary.beach_types.len(), 2);
    }

    #[test]
    fn test_category_distribution_order_and_share() {
        let samples = vec![
            sample(1, "A", "D1", "Sandy", 0.2, "2024-01-01T00:00:00Z"),
            sample(2, "B", "D2", "Rocky", 0.2, "2024-01-01T00:00:00Z"),
            sample(3, "C", "D3", "Sandy", 0.2, "2024-01-01T00:00:00Z"),
            sample(4, "D", "D4", "Sandy", 0.2, "2024-01-01T00:00:00Z"),
        ];
        let dist = category_distribution(&samples);

        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].name, "Sandy");
        assert_eq!(dist[0].count, 3);
        assert!((dist[0].percent - 75.0).abs() < 1e-9);
        assert_eq!(dist[1].name, "Rocky");
        assert!((dist[1].percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_distribution_empty() {
        assert!(category_distribution(&[]).is_empty());
    }

    #[test]
    fn test_grain_size_series() {
        let mut samples: Vec<Sample> = (0..12)
            .map(|i| sample(i, &format!("Beach {i}, Goa"), "D1", "Sandy", 0.3, "2024-01-01T00:00:00Z"))
            .collect();
        samples[0].state = "Kerala".to_string();

        let series = grain_size_series(&samples, DASHBOARD_SERIES_LEN);
        assert_eq!(series.len(), 10);
        assert_eq!(series[0].label, "Beach 0");
        assert_eq!(series[0].state, "Kerala");
        assert_eq!(series[9].label, "Beach 9");
    }

    #[test]
    fn test_map_markers() {
        let samples = goa_and_chennai();
        let markers = map_markers(&samples);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].class, GrainClass::VeryFine);
        assert_eq!(markers[1].class, GrainClass::Coarse);
        assert_eq!(markers[1].id, SampleId::Number(2));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = summarize(&goa_and_chennai()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_samples"], 2);
        assert_eq!(json["beach_types"][0]["name"], "Sandy");
    }
}
