//! Fleet snapshot synthesis.
//!
//! Produces a plausible in-memory fleet state: spiral route paths split
//! into completed and remaining segments, a current position at the split,
//! a now-centered schedule window, and a batch of alerts per unit. All
//! randomness flows through [`UniformSource`].

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    Alert, AlertDetails, AlertPriority, AlertType, BusPosition, BusRoute, GeoPoint, Snapshot,
};
use crate::random::{ThreadRngSource, UniformSource};

// Base coordinate the simulated routes orbit (Santiago, Chile).
const BASE_LAT: f64 = -33.4489;
const BASE_LNG: f64 = -70.6693;

/// Fixed pool of route identifiers. Units are assigned cyclically, so a
/// snapshot with more units than pool entries has buses sharing a route id.
const ROUTE_ID_POOL: [&str; 5] = ["13g", "5a", "7b", "12c", "9d"];

const RIDE_START_OFFSET_MIN: i64 = 20;
const RIDE_END_OFFSET_MIN: i64 = 15;

/// Snapshot generator holding its random source.
pub struct Generator<S: UniformSource> {
    source: S,
}

impl Generator<ThreadRngSource> {
    pub fn new() -> Self {
        Self::with_source(ThreadRngSource::new())
    }
}

impl Default for Generator<ThreadRngSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: UniformSource> Generator<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Produces an independent fleet snapshot anchored to the current time.
    pub fn generate(&mut self) -> Snapshot {
        generate_with(&mut self.source, Utc::now())
    }
}

/// Deterministic core: the snapshot is fully pinned by `(source, now)`.
pub fn generate_with(source: &mut dyn UniformSource, now: DateTime<Utc>) -> Snapshot {
    let mut routes = Vec::new();
    let mut alerts = Vec::new();

    // 5-8 units across the fixed route pool
    let num_buses = 5 + source.next_index(4);

    for i in 0..num_buses {
        let route_id = ROUTE_ID_POOL[i % ROUTE_ID_POOL.len()];
        let unit_id = format!("Bus {}", i + 1);

        let route = generate_route(source, route_id, &unit_id, now);

        // 2-4 alerts per unit
        let num_alerts = 2 + source.next_index(3);
        for _ in 0..num_alerts {
            alerts.push(generate_alert(
                source,
                route_id,
                &unit_id,
                route.ride_start,
                route.ride_end,
                now,
            ));
        }

        routes.push(route);
    }

    // Most recent first. Guaranteed post-condition, consumers rely on it.
    alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Snapshot {
        routes,
        alerts,
        generated_at: now,
    }
}

/// Lays a route on a circular spiral around the base coordinate and splits
/// it at a random completion point.
fn generate_route(
    source: &mut dyn UniformSource,
    route_id: &str,
    unit_id: &str,
    now: DateTime<Utc>,
) -> BusRoute {
    let num_segments = 15 + source.next_index(10);
    let completed_ratio = 0.3 + source.next_unit() * 0.5;
    let completed_count = (num_segments as f64 * completed_ratio) as usize;

    let mut segments = Vec::with_capacity(num_segments);
    for i in 0..num_segments {
        let t = i as f64 / num_segments as f64;
        let angle = t * std::f64::consts::TAU;
        let radius = 0.01 + t * 0.05;
        segments.push(GeoPoint {
            lat: BASE_LAT + angle.cos() * radius + (source.next_unit() - 0.5) * 0.005,
            lng: BASE_LNG + angle.sin() * radius + (source.next_unit() - 0.5) * 0.005,
        });
    }

    // Current position sits at the completed/remaining split, clamped so a
    // fully completed route still points at a real segment.
    let current_index = completed_count.min(num_segments - 1);
    let current = segments[current_index];

    let remaining_segments = segments.split_off(completed_count);
    let completed_segments = segments;

    BusRoute {
        id: format!("route-{route_id}-{unit_id}"),
        route_id: route_id.to_string(),
        unit_id: unit_id.to_string(),
        route_name: format!("Route {route_id}"),
        completed_segments,
        remaining_segments,
        current_position: BusPosition {
            lat: current.lat,
            lng: current.lng,
            timestamp: now,
        },
        ride_start: now - Duration::minutes(RIDE_START_OFFSET_MIN),
        ride_end: now + Duration::minutes(RIDE_END_OFFSET_MIN),
        delay: ((source.next_unit() - 0.5) * 10.0).floor() as i32,
    }
}

fn generate_alert(
    source: &mut dyn UniformSource,
    route_id: &str,
    unit_id: &str,
    ride_start: DateTime<Utc>,
    ride_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Alert {
    let alert_type = AlertType::ALL[source.next_index(AlertType::ALL.len())];
    let priority = AlertPriority::ALL[source.next_index(AlertPriority::ALL.len())];

    let mut details = AlertDetails {
        // Reported positions come from the unit, not the planned path, so
        // they are jittered around the base rather than snapped to a segment.
        location: Some(GeoPoint {
            lat: BASE_LAT + (source.next_unit() - 0.5) * 0.1,
            lng: BASE_LNG + (source.next_unit() - 0.5) * 0.1,
        }),
        ..AlertDetails::default()
    };

    if alert_type == AlertType::OverSpeed {
        details.speed = Some(60 + source.next_index(40) as u32);
    }
    if source.next_unit() > 0.5 {
        details.delay = Some(((source.next_unit() - 0.5) * 10.0).floor() as i32);
    }
    if source.next_unit() > 0.6 {
        details.stop_skipped = Some(source.next_index(3) as u32 + 1);
    }

    let id = format!(
        "alert-{}-{:09}",
        now.timestamp_millis(),
        (source.next_unit() * 1_000_000_000.0) as u64
    );
    let age_ms = (source.next_unit() * 30.0 * 60.0 * 1000.0) as i64;

    Alert {
        id,
        alert_type,
        priority,
        timestamp: now - Duration::milliseconds(age_ms),
        unit_id: unit_id.to_string(),
        route_id: route_id.to_string(),
        ride_start,
        ride_end,
        details,
        is_read: source.next_unit() > 0.7,
    }
}
