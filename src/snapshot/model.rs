use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub current_glucose: i32,
    pub heart_rate: i32,
    #[serde(rename = "spO2")]
    pub spo2: i32,
    pub steps: u32,
    pub activity_minutes: u32,
    pub activity_progress: u8,
    pub device_battery: u8,
    pub glucose_readings: Vec<GlucoseReading>,
    pub weekly_readings: Vec<GlucoseReading>,
    pub monthly_readings: Vec<GlucoseReading>,
    pub medications: Vec<Medication>,
    pub medication_adherence: Vec<Adherence>,
    pub meals: Vec<Meal>,
    pub nutrition: Nutrition,
    pub nutrition_recommendation: String,
    pub weekly_activity: Vec<ActivityDay>,
    pub activity_impact: String,
    pub alerts: Vec<Alert>,
    pub last_reading: LastReading,
}

/// One point of a glucose series. `timestamp` is a display label such as
/// `06:00`, `Mon` or `Week 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    pub timestamp: String,
    pub value: i32,
}

impl GlucoseReading {
    pub fn new(timestamp: &str, value: i32) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub instructions: String,
    pub scheduled_time: String,
    pub taken: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adherence {
    Completed,
    Partial,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub time: String,
    pub description: String,
    pub icon_type: MealKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: u32,
    pub carbs: u32,
    pub protein: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub completed: bool,
    pub percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastReading {
    pub time: String,
    pub time_ago: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_serializes_type_field() {
        let alert = Alert {
            level: AlertLevel::Warning,
            title: "Weather alert".to_string(),
            message: "Stay hydrated.".to_string(),
        };
        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["type"], "warning");
        assert_eq!(value["title"], "Weather alert");
    }

    #[test]
    fn test_meal_serializes_camel_case() {
        let meal = Meal {
            meal_type: "Lunch".to_string(),
            time: "12:45 PM".to_string(),
            description: "Grilled chicken".to_string(),
            icon_type: MealKind::Lunch,
        };
        let value = serde_json::to_value(&meal).unwrap();
        assert_eq!(value["type"], "Lunch");
        assert_eq!(value["iconType"], "lunch");
    }

    #[test]
    fn test_adherence_lowercase() {
        let value = serde_json::to_value([Adherence::Completed, Adherence::None]).unwrap();
        assert_eq!(value, serde_json::json!(["completed", "none"]));
    }
}
