use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest confidence a truth value may carry.
pub const MAX_CONFIDENCE: f32 = 0.9999;

/// Frequency/confidence pair summarizing the evidence for a statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthValue {
    frequency: f32,
    confidence: f32,
}

impl TruthValue {
    /// Creates a truth value, clamping both components into range.
    #[must_use]
    pub fn new(frequency: f32, confidence: f32) -> Self {
        Self {
            frequency: frequency.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, MAX_CONFIDENCE),
        }
    }

    /// Frequency component.
    #[must_use]
    pub const fn frequency(self) -> f32 {
        self.frequency
    }

    /// Confidence component.
    #[must_use]
    pub const fn confidence(self) -> f32 {
        self.confidence
    }

    /// `c * (f - 0.5) + 0.5`
    #[must_use]
    pub fn expectation(self) -> f32 {
        self.confidence.mul_add(self.frequency - 0.5, 0.5)
    }

    /// Frequency below one half.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.frequency < 0.5
    }

    /// Absolute difference of the two expectations.
    #[must_use]
    pub fn exp_dif_abs(self, other: Self) -> f32 {
        (self.expectation() - other.expectation()).abs()
    }

    /// Same frequency, different confidence.
    #[must_use]
    pub fn with_confidence(self, confidence: f32) -> Self {
        Self::new(self.frequency, confidence)
    }

    /// Component-wise comparison within `epsilon`.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.frequency - other.frequency).abs() <= epsilon
            && (self.confidence - other.confidence).abs() <= epsilon
    }
}

impl Default for TruthValue {
    fn default() -> Self {
        Self::new(1.0, 0.9)
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{:.2};{:.2}%", self.frequency, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_expects() {
        let truth = TruthValue::new(1.4, 1.0);
        assert!((truth.frequency() - 1.0).abs() < f32::EPSILON);
        assert!((truth.confidence() - MAX_CONFIDENCE).abs() < f32::EPSILON);
        let half = TruthValue::new(0.0, 0.5);
        assert!((half.expectation() - 0.25).abs() < 1e-6);
        assert!(half.is_negative());
        assert_eq!(TruthValue::default().to_string(), "%1.00;0.90%");
    }
}
