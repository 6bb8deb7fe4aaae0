//! Alert/route correlation.
//!
//! A (unit_id, route_id) pair does not necessarily identify one route in a
//! snapshot, so alert-to-route lookup walks an ordered chain of matchers
//! from exact to partial. Route-to-alerts goes the other way and is exact
//! only.

use crate::model::{Alert, BusRoute};

/// Finds the best-matching route for an alert.
///
/// Tiers are tried in order, first match wins, routes scanned in snapshot
/// order within a tier:
/// 1. unit and route ids both equal
/// 2. unit id equal
/// 3. route id equal
///
/// A miss is a normal outcome, not an error.
pub fn resolve_route_for_alert<'a>(alert: &Alert, routes: &'a [BusRoute]) -> Option<&'a BusRoute> {
    let exact = |r: &BusRoute| r.unit_id == alert.unit_id && r.route_id == alert.route_id;
    let by_unit = |r: &BusRoute| r.unit_id == alert.unit_id;
    let by_route = |r: &BusRoute| r.route_id == alert.route_id;
    let matchers: [&dyn Fn(&BusRoute) -> bool; 3] = [&exact, &by_unit, &by_route];

    matchers
        .iter()
        .find_map(|matches| routes.iter().find(|&r| matches(r)))
}

/// All alerts raised against exactly this route's (unit, route) pair, in
/// input order. Callers treat the first entry, if any, as the
/// representative alert for the route.
pub fn resolve_alerts_for_route<'a>(route: &BusRoute, alerts: &'a [Alert]) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|a| a.unit_id == route.unit_id && a.route_id == route.route_id)
        .collect()
}
