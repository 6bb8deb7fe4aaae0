//! Chart-ready output types produced by the aggregation functions.

use serde::Serialize;

use crate::model::AlertType;

/// One slice of the by-type donut chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub label: &'static str,
    pub count: usize,
}

/// One 5-minute window of the recent-activity series.
///
/// The label is anchored to the evaluation instant, not to the alerts in
/// the bucket, and is display-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub label: String,
    pub total: usize,
    pub high_priority: usize,
}

/// Synthetic current-vs-previous period statistic derived from present
/// alert volume alone. A placeholder proxy, not a historical comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current: usize,
    pub previous: usize,
    pub change_pct: f64,
    pub is_increase: bool,
}
