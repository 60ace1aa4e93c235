//! Truth functions.
//!
//! Functions that convert between evidence weight and confidence take the
//! evidential horizon `k` explicitly.

use super::{and, c2w, or, w2c};
use crate::entity::TruthValue;

/// `{<A --> B>} |- <B --> A>`
#[must_use]
pub fn conversion(v: TruthValue, k: f32) -> TruthValue {
    let w = and(&[v.frequency(), v.confidence()]);
    TruthValue::new(1.0, w2c(w, k))
}

/// `{A} |- (--, A)`
#[must_use]
pub fn negation(v: TruthValue) -> TruthValue {
    TruthValue::new(1.0 - v.frequency(), v.confidence())
}

/// `{<A ==> B>} |- <(--, B) ==> (--, A)>`
#[must_use]
pub fn contraposition(v: TruthValue, k: f32) -> TruthValue {
    let w = and(&[1.0 - v.frequency(), v.confidence()]);
    TruthValue::new(0.0, w2c(w, k))
}

/// Pools the evidence of two judgments on the same content.
#[must_use]
pub fn revision(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let w1 = c2w(v1.confidence(), k);
    let w2 = c2w(v2.confidence(), k);
    let w = w1 + w2;
    if w <= 0.0 {
        return TruthValue::new(v1.frequency(), 0.0);
    }
    let f = w1.mul_add(v1.frequency(), w2 * v2.frequency()) / w;
    TruthValue::new(f, w2c(w, k))
}

/// `{<A --> B>, <B --> C>} |- <A --> C>`
#[must_use]
pub fn deduction(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[f, v1.confidence(), v2.confidence()]);
    TruthValue::new(f, c)
}

/// Single-premise deduction discounted by `reliance`.
#[must_use]
pub fn deduction_reliance(v: TruthValue, reliance: f32) -> TruthValue {
    let c = and(&[v.frequency(), v.confidence(), reliance]);
    TruthValue::new(v.frequency(), c)
}

/// `{<A --> B>, <B <-> C>} |- <A --> C>`
#[must_use]
pub fn analogy(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v2.frequency(), v1.confidence(), v2.confidence()]);
    TruthValue::new(f, c)
}

/// `{<A <-> B>, <B <-> C>} |- <A <-> C>`
#[must_use]
pub fn resemblance(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[
        or(&[v1.frequency(), v2.frequency()]),
        v1.confidence(),
        v2.confidence(),
    ]);
    TruthValue::new(f, c)
}

/// `{<A --> B>, <C --> B>} |- <A --> C>`
#[must_use]
pub fn abduction(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let w = and(&[v2.frequency(), v1.confidence(), v2.confidence()]);
    TruthValue::new(v1.frequency(), w2c(w, k))
}

/// Single-premise abduction discounted by `reliance`.
#[must_use]
pub fn abduction_reliance(v: TruthValue, reliance: f32, k: f32) -> TruthValue {
    let w = and(&[v.confidence(), reliance]);
    TruthValue::new(v.frequency(), w2c(w, k))
}

/// `{<A --> B>, <A --> C>} |- <C --> B>`
#[must_use]
pub fn induction(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    abduction(v2, v1, k)
}

/// `{<A --> B>, <B --> C>} |- <C --> A>`
#[must_use]
pub fn exemplification(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let w = and(&[
        v1.frequency(),
        v2.frequency(),
        v1.confidence(),
        v2.confidence(),
    ]);
    TruthValue::new(1.0, w2c(w, k))
}

/// `{<A --> B>, <A --> C>} |- <B <-> C>`
#[must_use]
pub fn comparison(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let f0 = or(&[v1.frequency(), v2.frequency()]);
    let f = if f0 <= 0.0 {
        0.0
    } else {
        and(&[v1.frequency(), v2.frequency()]) / f0
    };
    let w = and(&[f0, v1.confidence(), v2.confidence()]);
    TruthValue::new(f, w2c(w, k))
}

/// Strong desire inference.
#[must_use]
pub fn desire_strong(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v1.confidence(), v2.confidence(), v2.frequency()]);
    TruthValue::new(f, c)
}

/// Weak desire inference.
#[must_use]
pub fn desire_weak(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v1.confidence(), v2.confidence(), v2.frequency(), w2c(1.0, k)]);
    TruthValue::new(f, c)
}

/// Desire by deduction.
#[must_use]
pub fn desire_ded(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v1.confidence(), v2.confidence()]);
    TruthValue::new(f, c)
}

/// Desire by induction.
#[must_use]
pub fn desire_ind(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let w = and(&[v2.frequency(), v1.confidence(), v2.confidence()]);
    TruthValue::new(v1.frequency(), w2c(w, k))
}

/// `{<M --> S>, <M --> P>} |- <M --> (|, S, P)>`
#[must_use]
pub fn union(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = or(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v1.confidence(), v2.confidence()]);
    TruthValue::new(f, c)
}

/// `{<M --> S>, <M --> P>} |- <M --> (&, S, P)>`
#[must_use]
pub fn intersection(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let f = and(&[v1.frequency(), v2.frequency()]);
    let c = and(&[v1.confidence(), v2.confidence()]);
    TruthValue::new(f, c)
}

/// `{(||, A, B), (--, B)} |- A`
#[must_use]
pub fn reduce_disjunction(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let v0 = intersection(v1, negation(v2));
    deduction_reliance(v0, 1.0)
}

/// `{(--, (&&, A, B)), B} |- (--, A)`
#[must_use]
pub fn reduce_conjunction(v1: TruthValue, v2: TruthValue) -> TruthValue {
    let v0 = intersection(negation(v1), v2);
    negation(deduction_reliance(v0, 1.0))
}

/// `{(--, (&&, A, (--, B))), (--, B)} |- (--, A)`
#[must_use]
pub fn reduce_conjunction_neg(v1: TruthValue, v2: TruthValue) -> TruthValue {
    reduce_conjunction(v1, negation(v2))
}

/// `{(&&, <#x --> S>, <#x --> P>), <M --> P>} |- <M --> S>`
#[must_use]
pub fn anonymous_analogy(v1: TruthValue, v2: TruthValue, k: f32) -> TruthValue {
    let v0 = TruthValue::new(v2.frequency(), w2c(v2.confidence(), k));
    analogy(v1, v0)
}

/// Eternal counterpart of an event's truth.
#[must_use]
pub fn eternalize(v: TruthValue, k: f32) -> TruthValue {
    TruthValue::new(v.frequency(), w2c(v.confidence(), k))
}

/// Confidence factor for moving an event from `source` to `target` as seen
/// at `now`. `decay` keeps the denominator positive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn temporal_projection(source: i64, target: i64, now: i64, decay: f32) -> f32 {
    let distance = (source - target).abs() as f32;
    let span = ((source - now).abs() + (target - now).abs()) as f32 + decay;
    1.0 - distance / span
}
