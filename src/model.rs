//! Core data types shared by the simulator and the analysis functions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of operational event a unit can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    OverSpeed,
    UnauthorizedStop,
    RouteDeviation,
    SignalLoss,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [
        AlertType::OverSpeed,
        AlertType::UnauthorizedStop,
        AlertType::RouteDeviation,
        AlertType::SignalLoss,
    ];

    /// Human-readable label for dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            AlertType::OverSpeed => "Over Speed",
            AlertType::UnauthorizedStop => "Unauthorized Stop",
            AlertType::RouteDeviation => "Route Deviation",
            AlertType::SignalLoss => "Signal Loss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

impl AlertPriority {
    pub const ALL: [AlertPriority; 3] = [
        AlertPriority::High,
        AlertPriority::Medium,
        AlertPriority::Low,
    ];
}

/// A single waypoint. A route's path is an ordered sequence of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Last known position of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusPosition {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

/// Optional structured payload attached to an alert. Presence of each field
/// depends on the alert type and on reporting conditions at the unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDetails {
    /// Signed minutes. Negative means ahead of schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_skipped: Option<u32>,
    /// km/h. Only reported for over-speed events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    /// Reported position. May diverge from the route's own path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

/// An operational event reported against a (unit, route) pair.
///
/// The pair is not guaranteed to identify exactly one route in a snapshot,
/// which is why lookups go through the correlation resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub timestamp: DateTime<Utc>,
    pub unit_id: String,
    pub route_id: String,
    pub ride_start: DateTime<Utc>,
    pub ride_end: DateTime<Utc>,
    pub details: AlertDetails,
    pub is_read: bool,
}

/// A simulated vehicle's trip snapshot.
///
/// Invariant: `completed_segments` plus `remaining_segments` form the full
/// planned path, and `current_position` sits at the split between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    /// Composite `route-{route_id}-{unit_id}`, unique within a snapshot.
    pub id: String,
    pub route_id: String,
    pub unit_id: String,
    pub route_name: String,
    pub completed_segments: Vec<GeoPoint>,
    pub remaining_segments: Vec<GeoPoint>,
    pub current_position: BusPosition,
    pub ride_start: DateTime<Utc>,
    pub ride_end: DateTime<Utc>,
    /// Signed minutes. Negative means ahead of schedule.
    pub delay: i32,
}

impl BusRoute {
    pub fn total_segments(&self) -> usize {
        self.completed_segments.len() + self.remaining_segments.len()
    }
}

/// One complete generated fleet state. Each refresh replaces the previous
/// snapshot wholesale; partial updates are never observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub routes: Vec<BusRoute>,
    pub alerts: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn unread_alerts(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }
}
