//! Sample data a fresh session starts with.

use chrono::{Duration, Utc};

use crate::{Category, HealthMetric, KnowledgeDoc, UserProfile};

/// The default user.
pub fn initial_profile() -> UserProfile {
    UserProfile::new("Alex", "Reduce cholesterol and lose 5kg")
        .with_age(34)
        .with_weight(77.0)
        .with_height(178.0)
}

/// Documents present when the session starts, newest first.
pub fn initial_documents() -> Vec<KnowledgeDoc> {
    let now = Utc::now();
    vec![
        KnowledgeDoc {
            id: "1".to_string(),
            title: "Recent Blood Work (Cholesterol)".to_string(),
            category: Category::LabReport,
            content: "Total Cholesterol: 210 mg/dL (High). LDL: 140 mg/dL. HDL: 45 mg/dL. \
                      Triglycerides: 160 mg/dL. Doctor recommends reducing saturated fats \
                      and increasing fiber intake."
                .to_string(),
            date_added: now - Duration::milliseconds(100_000_000),
        },
        KnowledgeDoc {
            id: "2".to_string(),
            title: "Keto Diet Plan Preference".to_string(),
            category: Category::DietPlan,
            content: "Patient prefers a Ketogenic diet approach. Allergies: Peanuts. Dislikes: Fish."
                .to_string(),
            date_added: now - Duration::milliseconds(50_000_000),
        },
    ]
}

/// Body weight in kilograms over the past week.
pub fn weight_series() -> Vec<HealthMetric> {
    series(&[78.5, 78.2, 78.0, 77.8, 77.5, 77.2, 76.9])
}

/// Hours of sleep over the past week.
pub fn sleep_series() -> Vec<HealthMetric> {
    series(&[6.5, 7.2, 5.5, 8.0, 7.5, 9.0, 8.5])
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn series(values: &[f64; 7]) -> Vec<HealthMetric> {
    WEEKDAYS
        .iter()
        .zip(values)
        .map(|(day, value)| HealthMetric::new(*day, *value))
        .collect()
}
