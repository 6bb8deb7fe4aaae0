//! Output formatting and persistence for snapshots and alert records.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::model::{Alert, AlertPriority, AlertType, Snapshot};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Flat, CSV-friendly projection of an [`Alert`]: one column per scalar
/// field, the reported location split into lat/lng columns.
#[derive(Debug, Serialize)]
pub struct AlertRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub timestamp: DateTime<Utc>,
    pub unit_id: String,
    pub route_id: String,
    pub ride_start: DateTime<Utc>,
    pub ride_end: DateTime<Utc>,
    pub delay_minutes: Option<i32>,
    pub stop_skipped: Option<u32>,
    pub speed_kmh: Option<u32>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub is_read: bool,
}

impl From<&Alert> for AlertRecord {
    fn from(alert: &Alert) -> Self {
        AlertRecord {
            id: alert.id.clone(),
            alert_type: alert.alert_type,
            priority: alert.priority,
            timestamp: alert.timestamp,
            unit_id: alert.unit_id.clone(),
            route_id: alert.route_id.clone(),
            ride_start: alert.ride_start,
            ride_end: alert.ride_end,
            delay_minutes: alert.details.delay,
            stop_skipped: alert.details.stop_skipped,
            speed_kmh: alert.details.speed,
            location_lat: alert.details.location.map(|l| l.lat),
            location_lng: alert.details.location.map(|l| l.lng),
            is_read: alert.is_read,
        }
    }
}

/// Logs a snapshot using Rust's debug pretty-print format.
pub fn print_pretty(snapshot: &Snapshot) {
    debug!("{:#?}", snapshot);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends an [`AlertRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &AlertRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Appends every alert in a snapshot to a CSV file.
pub fn append_snapshot_alerts(path: &str, snapshot: &Snapshot) -> Result<()> {
    for alert in &snapshot.alerts {
        append_record(path, &AlertRecord::from(alert))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertDetails, GeoPoint};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> AlertRecord {
        let now = Utc::now();
        AlertRecord::from(&Alert {
            id: "alert-1".to_string(),
            alert_type: AlertType::OverSpeed,
            priority: AlertPriority::High,
            timestamp: now,
            unit_id: "Bus 1".to_string(),
            route_id: "7b".to_string(),
            ride_start: now,
            ride_end: now,
            details: AlertDetails {
                delay: Some(3),
                stop_skipped: None,
                speed: Some(84),
                location: Some(GeoPoint {
                    lat: -33.44,
                    lng: -70.66,
                }),
            },
            is_read: false,
        })
    }

    #[test]
    fn test_record_flattens_details() {
        let record = sample_record();
        assert_eq!(record.speed_kmh, Some(84));
        assert_eq!(record.delay_minutes, Some(3));
        assert_eq!(record.stop_skipped, None);
        assert_eq!(record.location_lat, Some(-33.44));
        assert_eq!(record.location_lng, Some(-70.66));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let record = sample_record();
        print_json(&record).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("fleet_telemetry_engine_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("over-speed"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("fleet_telemetry_engine_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_two_rows() {
        let path = temp_path("fleet_telemetry_engine_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
