use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculus::{and, ave_geo, or};

/// Priority, durability and quality of an item competing for processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetValue {
    priority: f32,
    durability: f32,
    quality: f32,
}

impl BudgetValue {
    /// Creates a budget with every component clamped into `[0, 1]`.
    #[must_use]
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Self {
            priority: priority.clamp(0.0, 1.0),
            durability: durability.clamp(0.0, 1.0),
            quality: quality.clamp(0.0, 1.0),
        }
    }

    /// Priority component.
    #[must_use]
    pub const fn priority(self) -> f32 {
        self.priority
    }

    /// Durability component.
    #[must_use]
    pub const fn durability(self) -> f32 {
        self.durability
    }

    /// Quality component.
    #[must_use]
    pub const fn quality(self) -> f32 {
        self.quality
    }

    /// Overwrites the priority.
    pub fn set_priority(&mut self, value: f32) {
        self.priority = value.clamp(0.0, 1.0);
    }

    /// Raises priority towards one by `value`.
    pub fn inc_priority(&mut self, value: f32) {
        self.priority = or(&[self.priority, value]);
    }

    /// Scales priority down by `value`.
    pub fn dec_priority(&mut self, value: f32) {
        self.priority = and(&[self.priority, value]);
    }

    /// Raises durability towards one by `value`.
    pub fn inc_durability(&mut self, value: f32) {
        self.durability = or(&[self.durability, value]);
    }

    /// Scales durability down by `value`.
    pub fn dec_durability(&mut self, value: f32) {
        self.durability = and(&[self.durability, value]);
    }

    /// Geometric mean of the three components.
    #[must_use]
    pub fn summary(self) -> f32 {
        ave_geo(&[self.priority, self.durability, self.quality])
    }

    /// Whether the summary reaches `threshold`.
    #[must_use]
    pub fn above_threshold(self, threshold: f32) -> bool {
        self.summary() >= threshold
    }

    /// Keeps the larger of each component.
    pub fn merge(&mut self, other: Self) {
        self.priority = self.priority.max(other.priority);
        self.durability = self.durability.max(other.durability);
        self.quality = self.quality.max(other.quality);
    }
}

impl fmt::Display for BudgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.2};{:.2};{:.2}$",
            self.priority, self.durability, self.quality
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_stay_in_range() {
        let mut budget = BudgetValue::new(0.5, 0.5, 0.5);
        budget.inc_priority(0.5);
        assert!((budget.priority() - 0.75).abs() < 1e-6);
        budget.dec_durability(0.5);
        assert!((budget.durability() - 0.25).abs() < 1e-6);
        budget.set_priority(3.0);
        assert!((budget.priority() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn threshold_uses_summary() {
        let budget = BudgetValue::new(0.001, 0.001, 0.001);
        assert!(!budget.above_threshold(0.01));
        assert!(BudgetValue::new(0.8, 0.8, 0.8).above_threshold(0.01));
    }
}
