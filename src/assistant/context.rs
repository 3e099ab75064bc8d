use crate::snapshot::HealthSnapshot;
use crate::snapshot::model::GlucoseReading;

/// Average glucose outside `low..=high` (mg/dL) counts as off target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRange {
    pub low: f64,
    pub high: f64,
}

impl Default for TargetRange {
    fn default() -> Self {
        Self {
            low: 70.0,
            high: 140.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendClass {
    AboveTarget,
    BelowTarget,
    WithinTarget,
    NoData,
}

impl TrendClass {
    pub fn label(&self) -> &'static str {
        match self {
            TrendClass::AboveTarget => "higher than target",
            TrendClass::BelowTarget => "lower than target",
            TrendClass::WithinTarget => "within target",
            TrendClass::NoData => "no data",
        }
    }
}

pub fn mean(series: &[GlucoseReading]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let total: i64 = series.iter().map(|r| i64::from(r.value)).sum();
    Some(total as f64 / series.len() as f64)
}

pub fn classify_mean(mean: Option<f64>, target: TargetRange) -> TrendClass {
    match mean {
        None => TrendClass::NoData,
        Some(m) if m > target.high => TrendClass::AboveTarget,
        Some(m) if m < target.low => TrendClass::BelowTarget,
        Some(_) => TrendClass::WithinTarget,
    }
}

fn trend_line(label: &str, series: &[GlucoseReading], target: TargetRange) -> String {
    let avg = mean(series);
    let class = classify_mean(avg, target);
    match avg {
        Some(avg) => format!(
            "- {label} average glucose: {avg:.1} mg/dL over {} readings ({})",
            series.len(),
            class.label()
        ),
        None => format!("- {label} average glucose: {}", class.label()),
    }
}

/// Renders the snapshot as the plain-text context block embedded in prompts.
pub fn build_context(snapshot: &HealthSnapshot, target: TargetRange) -> String {
    let mut out = String::new();

    out.push_str("Current readings:\n");
    out.push_str(&format!("- Blood glucose: {} mg/dL\n", snapshot.current_glucose));
    out.push_str(&format!("- Heart rate: {} bpm\n", snapshot.heart_rate));
    out.push_str(&format!("- Oxygen saturation: {}%\n", snapshot.spo2));
    out.push_str(&format!(
        "- Activity: {} steps, {} active minutes ({}% of daily goal)\n",
        snapshot.steps, snapshot.activity_minutes, snapshot.activity_progress
    ));
    out.push_str(&format!(
        "- Last reading: {} ({})\n",
        snapshot.last_reading.time, snapshot.last_reading.time_ago
    ));

    if !snapshot.glucose_readings.is_empty() {
        let today: Vec<String> = snapshot
            .glucose_readings
            .iter()
            .map(|r| format!("{} {}", r.timestamp, r.value))
            .collect();
        out.push_str(&format!("- Today's glucose readings: {}\n", today.join(", ")));
    }

    out.push_str("\nMedications:\n");
    if snapshot.medications.is_empty() {
        out.push_str("- none recorded\n");
    }
    for med in &snapshot.medications {
        out.push_str(&format!(
            "- {} {}, {} at {}: {}\n",
            med.name,
            med.dosage,
            med.instructions.to_lowercase(),
            med.scheduled_time,
            if med.taken { "taken" } else { "not taken yet" }
        ));
    }

    out.push_str("\nRecent meals:\n");
    if snapshot.meals.is_empty() {
        out.push_str("- none logged\n");
    }
    for meal in &snapshot.meals {
        out.push_str(&format!(
            "- {} ({}): {}\n",
            meal.meal_type, meal.time, meal.description
        ));
    }
    out.push_str(&format!(
        "- Nutrition today: {} kcal, {} g carbs, {} g protein\n",
        snapshot.nutrition.calories, snapshot.nutrition.carbs, snapshot.nutrition.protein
    ));

    out.push_str("\nActive alerts:\n");
    if snapshot.alerts.is_empty() {
        out.push_str("- none\n");
    }
    for alert in &snapshot.alerts {
        out.push_str(&format!(
            "- [{}] {}: {}\n",
            alert.level.as_str(),
            alert.title,
            alert.message
        ));
    }

    out.push_str("\nTrends:\n");
    out.push_str(&trend_line("Weekly", &snapshot.weekly_readings, target));
    out.push('\n');
    out.push_str(&trend_line("Monthly", &snapshot.monthly_readings, target));
    out.push('\n');

    out
}
