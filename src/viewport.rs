//! Map viewport fitting and focus.
//!
//! On a fresh snapshot the map frames the whole fleet once; after that the
//! viewport only moves on explicit selection, so periodic refreshes never
//! fight user navigation.

use serde::Serialize;
use std::time::Duration;

use crate::model::{BusRoute, GeoPoint};

/// Zoom level used when focusing a single route.
pub const FOCUS_ZOOM: u8 = 15;

/// Duration of the smooth pan/zoom toward a focused route.
pub const FOCUS_TRANSITION: Duration = Duration::from_secs(1);

/// Geographic bounding box as south/west/north/east edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// A degenerate box containing exactly one point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.south = self.south.min(point.lat);
        self.west = self.west.min(point.lng);
        self.north = self.north.max(point.lat);
        self.east = self.east.max(point.lng);
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }
}

/// Camera target for a single selected route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Focus {
    pub center: GeoPoint,
    pub zoom: u8,
    #[serde(skip)]
    pub transition: Duration,
}

/// Union of every coordinate in the fleet: completed and remaining
/// segments plus current positions. `None` when there are no routes; a
/// single point yields a zero-area box rather than an error.
pub fn initial_bounds(routes: &[BusRoute]) -> Option<BoundingBox> {
    let mut points = routes.iter().flat_map(|route| {
        route
            .completed_segments
            .iter()
            .chain(route.remaining_segments.iter())
            .copied()
            .chain(std::iter::once(GeoPoint {
                lat: route.current_position.lat,
                lng: route.current_position.lng,
            }))
    });

    let mut bounds = BoundingBox::from_point(points.next()?);
    for point in points {
        bounds.extend(point);
    }
    Some(bounds)
}

/// Camera move for a newly selected route: center on its current position
/// at a fixed zoom, animated rather than jumped.
pub fn focus_on(route: &BusRoute) -> Focus {
    Focus {
        center: GeoPoint {
            lat: route.current_position.lat,
            lng: route.current_position.lng,
        },
        zoom: FOCUS_ZOOM,
        transition: FOCUS_TRANSITION,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportState {
    Unset,
    FittedToFleet(BoundingBox),
    FocusedOnRoute(Focus),
}

/// Tracks what the map is currently framing.
///
/// Fits to the fleet exactly once, on the first non-empty snapshot with no
/// active selection. Selection always wins; deselection deliberately does
/// not refit.
#[derive(Debug)]
pub struct ViewportController {
    state: ViewportState,
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            state: ViewportState::Unset,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Called on every snapshot arrival. Only the first snapshot moves the
    /// viewport, and only while nothing is selected.
    pub fn on_snapshot(&mut self, routes: &[BusRoute]) {
        if let ViewportState::Unset = self.state {
            if let Some(bounds) = initial_bounds(routes) {
                self.state = ViewportState::FittedToFleet(bounds);
            }
        }
    }

    /// Called when the selected route changes.
    pub fn on_select(&mut self, route: &BusRoute) {
        self.state = ViewportState::FocusedOnRoute(focus_on(route));
    }

    /// Clearing the selection keeps the last focus; the map never snaps
    /// back to the fleet on its own.
    pub fn on_deselect(&mut self) {}
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BusPosition;
    use chrono::Utc;

    fn route_with_points(
        completed: Vec<GeoPoint>,
        remaining: Vec<GeoPoint>,
        current: GeoPoint,
    ) -> BusRoute {
        let now = Utc::now();
        BusRoute {
            id: "route-7b-Bus 1".to_string(),
            route_id: "7b".to_string(),
            unit_id: "Bus 1".to_string(),
            route_name: "Route 7b".to_string(),
            completed_segments: completed,
            remaining_segments: remaining,
            current_position: BusPosition {
                lat: current.lat,
                lng: current.lng,
                timestamp: now,
            },
            ride_start: now,
            ride_end: now,
            delay: 0,
        }
    }

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    #[test]
    fn test_bounds_cover_all_coordinate_sources() {
        let route = route_with_points(
            vec![p(-33.50, -70.70)],
            vec![p(-33.40, -70.60)],
            p(-33.45, -70.75),
        );

        let bounds = initial_bounds(std::slice::from_ref(&route)).unwrap();
        assert_eq!(bounds.south, -33.50);
        assert_eq!(bounds.north, -33.40);
        assert_eq!(bounds.west, -70.75); // current position extends west edge
        assert_eq!(bounds.east, -70.60);
    }

    #[test]
    fn test_bounds_union_across_routes() {
        let a = route_with_points(vec![p(-33.50, -70.70)], vec![], p(-33.50, -70.70));
        let b = route_with_points(vec![p(-33.30, -70.50)], vec![], p(-33.30, -70.50));

        let bounds = initial_bounds(&[a, b]).unwrap();
        assert_eq!(bounds.south, -33.50);
        assert_eq!(bounds.north, -33.30);
        assert!(bounds.contains(p(-33.40, -70.60)));
    }

    #[test]
    fn test_empty_fleet_has_no_bounds() {
        assert!(initial_bounds(&[]).is_none());
    }

    #[test]
    fn test_single_point_is_a_degenerate_box() {
        let route = route_with_points(vec![], vec![], p(-33.45, -70.66));
        let bounds = initial_bounds(std::slice::from_ref(&route)).unwrap();

        assert_eq!(bounds.south, bounds.north);
        assert_eq!(bounds.west, bounds.east);
        assert!(bounds.contains(p(-33.45, -70.66)));
    }

    #[test]
    fn test_focus_targets_current_position() {
        let route = route_with_points(vec![p(-33.50, -70.70)], vec![], p(-33.45, -70.66));
        let focus = focus_on(&route);

        assert_eq!(focus.center, p(-33.45, -70.66));
        assert_eq!(focus.zoom, FOCUS_ZOOM);
        assert_eq!(focus.transition, FOCUS_TRANSITION);
    }

    #[test]
    fn test_controller_fits_once() {
        let mut controller = ViewportController::new();
        assert_eq!(*controller.state(), ViewportState::Unset);

        let first = route_with_points(vec![p(-33.50, -70.70)], vec![], p(-33.50, -70.70));
        controller.on_snapshot(std::slice::from_ref(&first));
        let fitted = controller.state().clone();
        assert!(matches!(fitted, ViewportState::FittedToFleet(_)));

        // A later snapshot with different geometry must not refit.
        let second = route_with_points(vec![p(-33.10, -70.10)], vec![], p(-33.10, -70.10));
        controller.on_snapshot(std::slice::from_ref(&second));
        assert_eq!(*controller.state(), fitted);
    }

    #[test]
    fn test_controller_empty_snapshot_stays_unset() {
        let mut controller = ViewportController::new();
        controller.on_snapshot(&[]);
        assert_eq!(*controller.state(), ViewportState::Unset);
    }

    #[test]
    fn test_selection_always_wins_and_deselect_keeps_focus() {
        let mut controller = ViewportController::new();
        let route = route_with_points(vec![p(-33.50, -70.70)], vec![], p(-33.45, -70.66));

        controller.on_snapshot(std::slice::from_ref(&route));
        controller.on_select(&route);
        let focused = controller.state().clone();
        assert!(matches!(focused, ViewportState::FocusedOnRoute(_)));

        controller.on_deselect();
        assert_eq!(*controller.state(), focused);

        // A refresh while focused must not move the viewport either.
        controller.on_snapshot(std::slice::from_ref(&route));
        assert_eq!(*controller.state(), focused);
    }
}
