use std::sync::Arc;

use chrono::{Local, NaiveTime};

use super::model::{GlucoseReading, HealthSnapshot, LastReading};

pub const MAX_SPO2: i32 = 100;
const LAST_READING_LABEL: &str = "Just now";

/// Inclusive jitter magnitudes; an offset is drawn from `-bound..=bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterBounds {
    pub glucose: i32,
    pub heart_rate: i32,
    pub spo2: i32,
    pub weekly: i32,
    pub monthly: i32,
}

impl Default for JitterBounds {
    fn default() -> Self {
        Self {
            glucose: 5,
            heart_rate: 3,
            spo2: 2,
            weekly: 3,
            monthly: 2,
        }
    }
}

/// Derives live-looking snapshots from a fixed baseline.
#[derive(Debug, Clone)]
pub struct SnapshotGenerator {
    baseline: Arc<HealthSnapshot>,
    bounds: JitterBounds,
}

impl SnapshotGenerator {
    pub fn new(baseline: HealthSnapshot, bounds: JitterBounds) -> Self {
        Self {
            baseline: Arc::new(baseline),
            bounds,
        }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        let mut rng = fastrand::Rng::new();
        self.snapshot_with(&mut rng, Local::now().time())
    }

    /// Only SpO2 is clamped after jitter. Glucose and heart rate may leave
    /// the physiological range when the bounds are configured wide.
    pub fn snapshot_with(&self, rng: &mut fastrand::Rng, now: NaiveTime) -> HealthSnapshot {
        let base = self.baseline.as_ref();
        let bounds = self.bounds;

        HealthSnapshot {
            current_glucose: base.current_glucose.saturating_add(offset(rng, bounds.glucose)),
            heart_rate: base.heart_rate.saturating_add(offset(rng, bounds.heart_rate)),
            spo2: base
                .spo2
                .saturating_add(offset(rng, bounds.spo2))
                .min(MAX_SPO2),
            weekly_readings: jitter_series(rng, &base.weekly_readings, bounds.weekly),
            monthly_readings: jitter_series(rng, &base.monthly_readings, bounds.monthly),
            last_reading: LastReading {
                time: now.format("%H:%M").to_string(),
                time_ago: LAST_READING_LABEL.to_string(),
            },
            ..base.clone()
        }
    }
}

fn offset(rng: &mut fastrand::Rng, bound: i32) -> i32 {
    let bound = i32::try_from(bound.unsigned_abs()).unwrap_or(i32::MAX);
    rng.i32(-bound..=bound)
}

fn jitter_series(
    rng: &mut fastrand::Rng,
    series: &[GlucoseReading],
    bound: i32,
) -> Vec<GlucoseReading> {
    series
        .iter()
        .map(|reading| GlucoseReading {
            timestamp: reading.timestamp.clone(),
            value: reading.value.saturating_add(offset(rng, bound)),
        })
        .collect()
}
