//! User profile.

use serde::{Deserialize, Serialize};

/// Attributes of the user the assistant is talking to.
///
/// One profile exists per session and it is not edited after start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in centimetres.
    pub height: f64,
    pub goal: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: 0,
            weight: 0.0,
            height: 0.0,
            goal: goal.into(),
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_weight(mut self, kg: f64) -> Self {
        self.weight = kg;
        self
    }

    pub fn with_height(mut self, cm: f64) -> Self {
        self.height = cm;
        self
    }

    /// Body-mass index, when both weight and height are known.
    pub fn bmi(&self) -> Option<f64> {
        if self.weight <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let metres = self.height / 100.0;
        Some(self.weight / (metres * metres))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let profile = UserProfile::new("Alex", "Reduce cholesterol")
            .with_age(34)
            .with_weight(77.0)
            .with_height(178.0);
        assert_eq!(profile.age, 34);
        assert_eq!(profile.goal, "Reduce cholesterol");
    }

    #[test]
    fn test_bmi() {
        let profile = UserProfile::new("Alex", "")
            .with_weight(77.0)
            .with_height(178.0);
        let bmi = profile.bmi().unwrap();
        assert!((bmi - 24.30).abs() < 0.01);

        assert!(UserProfile::new("Alex", "").bmi().is_none());
    }
}
