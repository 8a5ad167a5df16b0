//! CSV export and plain-text reports.
//!
//! The CSV layout is a fixed contract: seven named columns, text fields
//! wrapped in double quotes, lines joined by `\n` with no trailing newline.
//! Exports always cover the full collection in source order.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::stats::Summary;

/// Header row of the CSV export.
pub const CSV_HEADER: &str =
    "Location,Date,Grain Size (mm),Temperature (°C),Humidity (%),Device ID,Beach Type";

/// Default `chrono` format for the CSV date column (US short date).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Render the full collection as CSV.
///
/// `date_format` is a `chrono` strftime format applied to the UTC
/// collection time.
#[must_use]
pub fn to_csv(samples: &[Sample], date_format: &str) -> String {
    let mut out = String::from(CSV_HEADER);
    for sample in samples {
        out.push_str(&format!(
            "\n\"{}\",{},{},{},{},{},\"{}\"",
            sample.location,
            sample.timestamp.format(date_format),
            csv_number(sample.grain_size),
            csv_number(sample.temperature),
            csv_number(sample.humidity),
            sample.device_id,
            sample.beach_type,
        ));
    }
    debug!("Rendered {} samples as CSV", samples.len());
    out
}

/// Negative zero prints as `0`.
fn csv_number(value: f64) -> f64 {
    value + 0.0
}

/// File name for a CSV export made on `date`.
#[must_use]
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("grain-size-data-{}.csv", date.format("%Y-%m-%d"))
}

/// File name for a report made on `date`.
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("grain-size-report-{}.txt", date.format("%Y-%m-%d"))
}

/// Render the summary report.
///
/// `None` renders the report for an empty collection.
#[must_use]
pub fn render_report(summary: Option<&Summary>, date_format: &str) -> String {
    let mut out = String::from("Grain Size Analysis Report\n==========================\n\n");

    let Some(summary) = summary else {
        out.push_str("No samples available.\n");
        return out;
    };

    out.push_str(&format!(
        "Total samples:        {}\n\
         Average grain size:   {} mm\n\
         Average temperature:  {} °C\n\
         Average humidity:     {} %\n\
         Date range:           {} - {}\n",
        summary.total_samples,
        summary.grain_size_display(),
        summary.temperature_display(),
        summary.humidity_display(),
        summary.first_sample.format(date_format),
        summary.last_sample.format(date_format)
    ));

    out.push_str("\nBeach types\n-----------\n");
    for entry in &summary.beach_types {
        out.push_str(&format!("{:<20} {:>5}\n", entry.name, entry.count));
    }
    out
}

/// Write `contents` to `dir/file_name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub fn write_export(dir: impl AsRef<Path>, file_name: &str, contents: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let path = dir.join(file_name);
    std::fs::write(&path, contents)?;
    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::goa_and_chennai;
    use crate::stats::summarize;

    #[test]
    fn test_csv_two_records_exact() {
        let csv = to_csv(&goa_and_chennai(), DEFAULT_DATE_FORMAT);
        let expected = "Location,Date,Grain Size (mm),Temperature (°C),Humidity (%),Device ID,Beach Type\n\
                        \"Goa Beach\",1/15/2024,0.25,28.5,65,D1,\"Sandy\"\n\
                        \"Chennai Beach\",1/16/2024,0.55,31,72.5,D2,\"Rocky\"";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        assert_eq!(to_csv(&[], DEFAULT_DATE_FORMAT), CSV_HEADER);
    }

    #[test]
    fn test_csv_keeps_source_order() {
        let mut samples = goa_and_chennai();
        samples.reverse();
        let csv = to_csv(&samples, DEFAULT_DATE_FORMAT);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"Chennai Beach\""));
        assert!(lines[2].starts_with("\"Goa Beach\""));
    }

    #[test]
    fn test_csv_text_fields_are_not_escaped() {
        let mut samples = goa_and_chennai();
        samples.truncate(1);
        samples[0].location = "Baga Beach, Goa".to_string();
        let csv = to_csv(&samples, DEFAULT_DATE_FORMAT);
        assert!(csv.ends_with("\"Baga Beach, Goa\",1/15/2024,0.25,28.5,65,D1,\"Sandy\""));
    }

    #[test]
    fn test_csv_negative_zero_prints_as_zero() {
        let mut samples = goa_and_chennai();
        samples.truncate(1);
        samples[0].temperature = -0.0;
        samples[0].humidity = -2.5;
        let csv = to_csv(&samples, DEFAULT_DATE_FORMAT);
        assert!(csv.ends_with("\"Goa Beach\",1/15/2024,0.25,0,-2.5,D1,\"Sandy\""));
    }

    #[test]
    fn test_csv_custom_date_format() {
        let csv = to_csv(&goa_and_chennai(), "%Y-%m-%d");
        assert!(csv.contains(",2024-01-15,"));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(csv_file_name(date), "grain-size-data-2024-03-09.csv");
        assert_eq!(report_file_name(date), "grain-size-report-2024-03-09.txt");
    }

    #[test]
    fn test_render_report() {
        let summary = summarize(&goa_and_chennai()).unwrap();
        let report = render_report(Some(&summary), DEFAULT_DATE_FORMAT);

        assert!(report.starts_with("Grain Size Analysis Report"));
        assert!(report.contains("Total samples:        2"));
        assert!(report.contains("Average grain size:   0.400 mm"));
        assert!(report.contains("Date range:           1/15/2024 - 1/16/2024"));
        assert!(report.contains("Sandy"));
        assert!(report.contains("Rocky"));
    }

    #[test]
    fn test_render_report_empty() {
        let report = render_report(None, DEFAULT_DATE_FORMAT);
        assert!(report.contains("No samples available."));
    }

    #[test]
    fn test_write_export_creates_directory() {
        let dir = std::env::temp_dir().join(format!("grainview_export_{}/nested", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let path = write_export(&dir, "out.csv", CSV_HEADER).unwrap();
        assert_eq!(path, dir.join("out.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CSV_HEADER);

        if let Some(parent) = dir.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }
}
