//! Health metric series and summaries for the tracker and dashboard.

use serde::{Deserialize, Serialize};

use crate::UserProfile;

/// One sample of a tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    /// Display label, e.g. `"Mon"`.
    pub date: String,
    pub value: f64,
}

impl HealthMetric {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Aggregate view of a metric series.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Last value minus first value.
    pub change: f64,
}

impl MetricSummary {
    /// Summarize `series`, or `None` if it is empty.
    pub fn of(series: &[HealthMetric]) -> Option<Self> {
        let first = series.first()?.value;
        let latest = series.last()?.value;

        let (min, max, sum) = series.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), m| (min.min(m.value), max.max(m.value), sum + m.value),
        );

        Some(Self {
            latest,
            min,
            max,
            mean: sum / series.len() as f64,
            change: latest - first,
        })
    }
}

/// A quick stat tile on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStat {
    pub label: &'static str,
    pub value: String,
}

/// Quick stats shown on the dashboard. Only weight comes from the profile;
/// the rest are sample values.
pub fn dashboard_stats(profile: &UserProfile) -> Vec<DashboardStat> {
    vec![
        DashboardStat {
            label: "Weight",
            value: format!("{} kg", profile.weight),
        },
        DashboardStat {
            label: "Steps",
            value: "8,432".to_string(),
        },
        DashboardStat {
            label: "Hydration",
            value: "1.2 L".to_string(),
        },
        DashboardStat {
            label: "Sleep",
            value: "7h 20m".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_summary_empty() {
        assert!(MetricSummary::of(&[]).is_none());
    }

    #[test]
    fn test_summary_weight_series() {
        let summary = MetricSummary::of(&seed::weight_series()).unwrap();
        assert_eq!(summary.latest, 76.9);
        assert_eq!(summary.min, 76.9);
        assert_eq!(summary.max, 78.5);
        assert!((summary.change - -1.6).abs() < 1e-9);
        assert!((summary.mean - 77.728_571).abs() < 1e-5);
    }

    #[test]
    fn test_dashboard_stats_use_profile_weight() {
        let stats = dashboard_stats(&seed::initial_profile());
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].label, "Weight");
        assert_eq!(stats[0].value, "77 kg");
    }
}
