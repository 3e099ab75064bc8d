use std::path::Path;

use anyhow::Context;

use super::model::{
    ActivityDay, Adherence, Alert, AlertLevel, GlucoseReading, HealthSnapshot, LastReading, Meal,
    MealKind, Medication, Nutrition,
};

/// The demo patient record every served snapshot is derived from.
pub fn default_baseline() -> HealthSnapshot {
    HealthSnapshot {
        current_glucose: 118,
        heart_rate: 72,
        spo2: 98,
        steps: 6521,
        activity_minutes: 32,
        activity_progress: 65,
        device_battery: 76,
        glucose_readings: vec![
            GlucoseReading::new("06:00", 110),
            GlucoseReading::new("08:00", 132),
            GlucoseReading::new("10:00", 95),
            GlucoseReading::new("12:00", 118),
            GlucoseReading::new("14:00", 108),
            GlucoseReading::new("16:00", 124),
            GlucoseReading::new("18:00", 115),
        ],
        weekly_readings: vec![
            GlucoseReading::new("Mon", 121),
            GlucoseReading::new("Tue", 115),
            GlucoseReading::new("Wed", 128),
            GlucoseReading::new("Thu", 119),
            GlucoseReading::new("Fri", 135),
            GlucoseReading::new("Sat", 142),
            GlucoseReading::new("Sun", 117),
        ],
        monthly_readings: vec![
            GlucoseReading::new("Week 1", 124),
            GlucoseReading::new("Week 2", 119),
            GlucoseReading::new("Week 3", 138),
            GlucoseReading::new("Week 4", 122),
        ],
        medications: vec![
            Medication {
                name: "Insulin (NovoRapid)".to_string(),
                dosage: "8 units".to_string(),
                instructions: "Before lunch".to_string(),
                scheduled_time: "12:30 PM".to_string(),
                taken: true,
            },
            Medication {
                name: "Metformin".to_string(),
                dosage: "500mg".to_string(),
                instructions: "With dinner".to_string(),
                scheduled_time: "7:00 PM".to_string(),
                taken: false,
            },
            Medication {
                name: "Insulin (Lantus)".to_string(),
                dosage: "12 units".to_string(),
                instructions: "Before bed".to_string(),
                scheduled_time: "10:00 PM".to_string(),
                taken: false,
            },
        ],
        medication_adherence: vec![
            Adherence::Completed,
            Adherence::Completed,
            Adherence::Completed,
            Adherence::Partial,
            Adherence::Partial,
            Adherence::None,
            Adherence::None,
        ],
        meals: vec![
            Meal {
                meal_type: "Breakfast".to_string(),
                time: "8:30 AM".to_string(),
                description: "Oatmeal with berries, Greek yogurt".to_string(),
                icon_type: MealKind::Breakfast,
            },
            Meal {
                meal_type: "Lunch".to_string(),
                time: "12:45 PM".to_string(),
                description: "Grilled chicken, quinoa, mixed veggies".to_string(),
                icon_type: MealKind::Lunch,
            },
        ],
        nutrition: Nutrition {
            calories: 1850,
            carbs: 152,
            protein: 86,
        },
        nutrition_recommendation: "Your glucose peaks after lunch. Consider adding more fiber \
            and reducing simple carbs at this meal."
            .to_string(),
        weekly_activity: [
            (true, 30),
            (true, 60),
            (true, 40),
            (true, 80),
            (true, 65),
            (false, 20),
            (false, 10),
        ]
        .into_iter()
        .map(|(completed, percentage)| ActivityDay {
            completed,
            percentage,
        })
        .collect(),
        activity_impact: "Your morning walk reduced blood sugar by ~15 mg/dL".to_string(),
        alerts: vec![
            Alert {
                level: AlertLevel::Success,
                title: "Good control today".to_string(),
                message: "Blood sugar levels within target range for 80% of the day.".to_string(),
            },
            Alert {
                level: AlertLevel::Info,
                title: "New pattern detected".to_string(),
                message: "Higher readings 1-2 hours after breakfast. Consider adjusting morning \
                    insulin."
                    .to_string(),
            },
            Alert {
                level: AlertLevel::Warning,
                title: "Weather alert".to_string(),
                message: "High temperatures forecasted tomorrow. Stay hydrated to avoid glucose \
                    fluctuations."
                    .to_string(),
            },
        ],
        last_reading: LastReading {
            time: "12:25 PM".to_string(),
            time_ago: "5 min ago".to_string(),
        },
    }
}

/// Loads an alternate baseline from a JSON file, or the built-in one when no
/// path is configured.
pub fn load_baseline(path: Option<&str>) -> anyhow::Result<HealthSnapshot> {
    let Some(path) = path else {
        return Ok(default_baseline());
    };

    let data = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read baseline file {path}"))?;
    let baseline: HealthSnapshot = serde_json::from_str(&data)
        .with_context(|| format!("baseline file {path} is not a valid health snapshot"))?;

    tracing::info!(path = %path, "Loaded baseline from file");

    Ok(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baseline_values() {
        let baseline = default_baseline();
        assert_eq!(baseline.current_glucose, 118);
        assert_eq!(baseline.heart_rate, 72);
        assert_eq!(baseline.spo2, 98);
        assert_eq!(baseline.glucose_readings.len(), 7);
        assert_eq!(baseline.weekly_readings.len(), 7);
        assert_eq!(baseline.monthly_readings.len(), 4);
        assert_eq!(baseline.medication_adherence.len(), 7);
        assert_eq!(baseline.weekly_activity.len(), 7);
    }

    #[test]
    fn test_load_baseline_without_path() {
        let baseline = load_baseline(None).unwrap();
        assert_eq!(baseline, default_baseline());
    }

    #[test]
    fn test_load_baseline_from_file() {
        let mut custom = default_baseline();
        custom.current_glucose = 250;

        let path = std::env::temp_dir().join(format!("baseline-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();

        let loaded = load_baseline(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.current_glucose, 250);
    }

    #[test]
    fn test_load_baseline_missing_file() {
        let err = load_baseline(Some("/nonexistent/baseline.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read baseline file"));
    }
}
