//! Truth and budget calculus shared by every rule.
//!
//! The functions here are pure; anything that feeds back into link budgets
//! takes the budgets it touches explicitly.

/// Budget functions.
pub mod budget;
/// Truth functions.
pub mod truth;

/// Probabilistic conjunction: the product of all values.
#[must_use]
pub fn and(values: &[f32]) -> f32 {
    values.iter().product()
}

/// Probabilistic disjunction: one minus the product of the complements.
#[must_use]
pub fn or(values: &[f32]) -> f32 {
    1.0 - values.iter().map(|v| 1.0 - v).product::<f32>()
}

/// Arithmetic mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ave_ari(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Geometric mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ave_geo(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    and(values).powf(1.0 / values.len() as f32)
}

/// Evidence weight to confidence under horizon `k`.
#[must_use]
pub fn w2c(w: f32, k: f32) -> f32 {
    w / (w + k)
}

/// Confidence to evidence weight under horizon `k`.
#[must_use]
pub fn c2w(c: f32, k: f32) -> f32 {
    k * c / (1.0 - c)
}
