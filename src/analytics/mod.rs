//! Alert aggregation for the dashboard charts.
//!
//! This module shapes an in-memory alert set into chart-ready series:
//! per-type counts, a 5-minute bucketed recent-activity series, and a
//! synthetic period-over-period comparison. Every function is a pure
//! transformation of its inputs; the evaluation instant is always an
//! explicit parameter, never read from the clock.

pub mod aggregate;
pub mod types;

pub use aggregate::{aggregate_by_type, aggregate_over_time, compare_periods};
