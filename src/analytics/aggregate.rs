use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::analytics::types::{PeriodComparison, TimeBucket, TypeCount};
use crate::model::{Alert, AlertPriority};

const BUCKET_MINUTES: i64 = 5;
const WINDOW_MINUTES: i64 = 60;

/// Counts alerts per type.
///
/// Output order is the order in which each type first occurs in the input,
/// not a ranking.
pub fn aggregate_by_type(alerts: &[Alert]) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();

    for alert in alerts {
        match counts.iter_mut().find(|c| c.alert_type == alert.alert_type) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount {
                alert_type: alert.alert_type,
                label: alert.alert_type.label(),
                count: 1,
            }),
        }
    }

    counts
}

/// Buckets the last hour of alerts into 5-minute windows.
///
/// Alerts with a future timestamp or older than 60 minutes relative to
/// `now` are dropped. Buckets are keyed by `age_minutes / 5`; the label is
/// `now` minus the bucket offset, formatted HH:MM. Labels approximate and
/// can collide when minute arithmetic wraps; the bucket key is always the
/// index. Presented sorted by label ascending then reversed, most recent
/// first.
pub fn aggregate_over_time(alerts: &[Alert], now: DateTime<Utc>) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<i64, (usize, usize)> = BTreeMap::new();

    for alert in alerts {
        let age_minutes = (now - alert.timestamp).num_minutes();
        if !(0..=WINDOW_MINUTES).contains(&age_minutes) {
            continue;
        }

        let index = age_minutes / BUCKET_MINUTES;
        let entry = buckets.entry(index).or_insert((0, 0));
        entry.0 += 1;
        if alert.priority == AlertPriority::High {
            entry.1 += 1;
        }
    }

    let mut series: Vec<TimeBucket> = buckets
        .into_iter()
        .map(|(index, (total, high_priority))| TimeBucket {
            label: (now - Duration::minutes(index * BUCKET_MINUTES))
                .format("%H:%M")
                .to_string(),
            total,
            high_priority,
        })
        .collect();

    series.sort_by(|a, b| a.label.cmp(&b.label));
    series.reverse();
    series
}

/// Derives a current-vs-previous month statistic from present volume:
/// current = volume x 1.4, previous = volume x 1.2, both rounded. With no
/// previous volume the change is pinned to 0% and flagged as an increase.
pub fn compare_periods(alerts: &[Alert]) -> PeriodComparison {
    let volume = alerts.len() as f64;
    let current = (volume * 1.4).round() as usize;
    let previous = (volume * 1.2).round() as usize;

    if previous == 0 {
        return PeriodComparison {
            current,
            previous,
            change_pct: 0.0,
            is_increase: true,
        };
    }

    let change_pct = (current as f64 - previous as f64) / previous as f64 * 100.0;

    PeriodComparison {
        current,
        previous,
        change_pct,
        is_increase: current >= previous,
    }
}
