//! Temporal-order algebra.
//!
//! Every multi-premise rule combines the orders of its premises through one
//! of the combinators below. The case tables are normative; they are not a
//! simplification of some more general law, so each branch mirrors one row
//! of the tables literally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NalError;

/// Two-digit figure code: tens digit for the first premise, units digit for
/// the second, `1` = shared term is the subject, `2` = it is the predicate.
pub type Figure = u8;

/// Builds a figure code from the two component indices (0 = subject).
#[must_use]
pub const fn figure(first_side: usize, second_side: usize) -> Figure {
    ((first_side as u8) + 1) * 10 + (second_side as u8) + 1
}

/// Temporal relation carried by implications, equivalences and conjunctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemporalOrder {
    /// Atemporal; matches anything.
    #[default]
    None,
    /// First happens before second.
    Forward,
    /// Both happen together.
    Concurrent,
    /// First happens after second.
    Backward,
    /// No valid composition exists.
    Invalid,
}

impl TemporalOrder {
    /// Numeric code (`2, 1, 0, -1, -2`).
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::None => 2,
            Self::Forward => 1,
            Self::Concurrent => 0,
            Self::Backward => -1,
            Self::Invalid => -2,
        }
    }

    /// Whether this is the invalid marker.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Whether the order is forward or backward.
    #[must_use]
    pub const fn is_directed(self) -> bool {
        matches!(self, Self::Forward | Self::Backward)
    }

    /// Swaps forward and backward; none, concurrent and invalid are fixed points.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            other => other,
        }
    }

    /// Equal orders, or either side atemporal.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        self == other || self == Self::None || other == Self::None
    }

    /// Combines the orders of two conjoined components.
    #[must_use]
    pub fn compose(first: Self, second: Self) -> Self {
        if first == second && !first.is_invalid() {
            first
        } else {
            Self::Invalid
        }
    }

    /// Order of a deduction/exemplification conclusion.
    #[must_use]
    pub fn ded_exe(order1: Self, order2: Self) -> Self {
        if order1 == order2 || order2 == Self::None {
            order1
        } else if order1 == Self::None || order1 == Self::Concurrent {
            order2
        } else if order2 == Self::Concurrent {
            order1
        } else {
            Self::Invalid
        }
    }

    /// Order of an abduction/induction/comparison conclusion.
    #[must_use]
    pub fn abd_ind_com(order1: Self, order2: Self) -> Self {
        if order2 == Self::None {
            order1
        } else if order1 == Self::None || order1 == Self::Concurrent {
            order2.reverse()
        } else if order2 == Self::Concurrent || order1.code() == -order2.code() {
            order1
        } else {
            Self::Invalid
        }
    }

    /// Order of an analogy conclusion; `order1` belongs to the asymmetric premise.
    #[must_use]
    pub fn analogy(order1: Self, order2: Self, figure: Figure) -> Self {
        if order2 == Self::None || order2 == Self::Concurrent {
            order1
        } else if order1 == Self::None || order1 == Self::Concurrent {
            if figure < 20 {
                order2
            } else {
                order2.reverse()
            }
        } else if order1 == order2 {
            if figure == 12 || figure == 21 {
                order1
            } else {
                Self::Invalid
            }
        } else if order1.code() == -order2.code() {
            if figure == 11 || figure == 22 {
                order1
            } else {
                Self::Invalid
            }
        } else {
            Self::Invalid
        }
    }

    /// Order of a resemblance conclusion.
    #[must_use]
    pub fn resemblance(order1: Self, order2: Self, figure: Figure) -> Self {
        let pick_first = |order: Self| if figure > 20 { order } else { order.reverse() };
        let pick_second = |order: Self| {
            if figure % 10 == 1 {
                order
            } else {
                order.reverse()
            }
        };
        if order2 == Self::None {
            pick_first(order1)
        } else if order1 == Self::None {
            pick_second(order2)
        } else if order2 == Self::Concurrent {
            pick_first(order1)
        } else if order1 == Self::Concurrent {
            pick_second(order2)
        } else if order1 == order2 {
            if figure == 21 {
                order1
            } else {
                order1.reverse()
            }
        } else {
            Self::Invalid
        }
    }

    /// Order implied by the signed distance between two events.
    #[must_use]
    pub const fn from_time_diff(diff: i64) -> Self {
        if diff > 0 {
            Self::Forward
        } else if diff < 0 {
            Self::Backward
        } else {
            Self::Concurrent
        }
    }

    /// Order from the first occurrence to the second.
    ///
    /// Both times must be concrete; eternal sentences have no position on the
    /// time line.
    pub fn between(first: Option<i64>, second: Option<i64>) -> Result<Self, NalError> {
        match (first, second) {
            (Some(a), Some(b)) => Ok(Self::from_time_diff(b - a)),
            _ => Err(NalError::EternalComparison),
        }
    }
}

impl fmt::Display for TemporalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Forward => "forward",
            Self::Concurrent => "concurrent",
            Self::Backward => "backward",
            Self::Invalid => "invalid",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::TemporalOrder as O;
    use super::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    const ALL: [O; 5] = [O::None, O::Forward, O::Concurrent, O::Backward, O::Invalid];
    const FIGURES: [Figure; 4] = [11, 12, 21, 22];

    #[test]
    fn compose_table() {
        assert_eq!(O::compose(O::None, O::None), O::None);
        for order in [O::Forward, O::Backward, O::Concurrent] {
            assert_eq!(O::compose(order, order), order);
            assert_eq!(O::compose(O::None, order), O::Invalid);
        }
        assert_eq!(O::compose(O::Forward, O::Backward), O::Invalid);
        assert_eq!(O::compose(O::Invalid, O::Invalid), O::Invalid);
    }

    #[test]
    fn reverse_is_an_involution() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..64 {
            let order = ALL[rng.gen_range(0..ALL.len())];
            assert_eq!(order.reverse().reverse(), order);
        }
        assert_eq!(O::None.reverse(), O::None);
        assert_eq!(O::Forward.reverse(), O::Backward);
    }

    #[test]
    fn matching_accepts_none_on_either_side() {
        assert!(O::None.matches(O::Forward));
        assert!(O::Backward.matches(O::None));
        assert!(O::Concurrent.matches(O::Concurrent));
        assert!(!O::Forward.matches(O::Backward));
    }

    #[test]
    fn ded_exe_table() {
        assert_eq!(O::ded_exe(O::Forward, O::Forward), O::Forward);
        assert_eq!(O::ded_exe(O::Forward, O::None), O::Forward);
        assert_eq!(O::ded_exe(O::None, O::Backward), O::Backward);
        assert_eq!(O::ded_exe(O::Concurrent, O::Forward), O::Forward);
        assert_eq!(O::ded_exe(O::Backward, O::Concurrent), O::Backward);
        assert_eq!(O::ded_exe(O::Forward, O::Backward), O::Invalid);
    }

    #[test]
    fn abd_ind_com_table() {
        assert_eq!(O::abd_ind_com(O::Forward, O::None), O::Forward);
        assert_eq!(O::abd_ind_com(O::None, O::Forward), O::Backward);
        assert_eq!(O::abd_ind_com(O::Concurrent, O::Backward), O::Forward);
        assert_eq!(O::abd_ind_com(O::Forward, O::Concurrent), O::Forward);
        assert_eq!(O::abd_ind_com(O::Forward, O::Backward), O::Forward);
        assert_eq!(O::abd_ind_com(O::Forward, O::Forward), O::Invalid);
    }

    #[test]
    fn analogy_table() {
        for fig in FIGURES {
            assert_eq!(O::analogy(O::Forward, O::None, fig), O::Forward);
            assert_eq!(O::analogy(O::Backward, O::Concurrent, fig), O::Backward);
        }
        assert_eq!(O::analogy(O::None, O::Forward, 11), O::Forward);
        assert_eq!(O::analogy(O::None, O::Forward, 12), O::Forward);
        assert_eq!(O::analogy(O::Concurrent, O::Forward, 21), O::Backward);
        assert_eq!(O::analogy(O::None, O::Forward, 22), O::Backward);
        assert_eq!(O::analogy(O::Forward, O::Forward, 12), O::Forward);
        assert_eq!(O::analogy(O::Forward, O::Forward, 21), O::Forward);
        assert_eq!(O::analogy(O::Forward, O::Forward, 11), O::Invalid);
        assert_eq!(O::analogy(O::Forward, O::Backward, 11), O::Forward);
        assert_eq!(O::analogy(O::Forward, O::Backward, 22), O::Forward);
        assert_eq!(O::analogy(O::Forward, O::Backward, 12), O::Invalid);
    }

    #[test]
    fn resemblance_table() {
        assert_eq!(O::resemblance(O::Forward, O::None, 21), O::Forward);
        assert_eq!(O::resemblance(O::Forward, O::None, 22), O::Forward);
        assert_eq!(O::resemblance(O::Forward, O::None, 11), O::Backward);
        assert_eq!(O::resemblance(O::Forward, O::None, 12), O::Backward);
        assert_eq!(O::resemblance(O::None, O::Forward, 11), O::Forward);
        assert_eq!(O::resemblance(O::None, O::Forward, 21), O::Forward);
        assert_eq!(O::resemblance(O::None, O::Forward, 12), O::Backward);
        assert_eq!(O::resemblance(O::None, O::Forward, 22), O::Backward);
        assert_eq!(O::resemblance(O::Backward, O::Concurrent, 22), O::Backward);
        assert_eq!(O::resemblance(O::Backward, O::Concurrent, 11), O::Forward);
        assert_eq!(O::resemblance(O::Concurrent, O::Forward, 12), O::Backward);
        assert_eq!(O::resemblance(O::Forward, O::Forward, 21), O::Forward);
        assert_eq!(O::resemblance(O::Forward, O::Forward, 12), O::Backward);
        assert_eq!(O::resemblance(O::Forward, O::Backward, 21), O::Invalid);
        assert_eq!(O::resemblance(O::None, O::None, 11), O::None);
    }

    #[test]
    fn time_diff_orders() {
        assert_eq!(O::from_time_diff(5), O::Forward);
        assert_eq!(O::from_time_diff(-1), O::Backward);
        assert_eq!(O::from_time_diff(0), O::Concurrent);
        assert_eq!(O::between(Some(3), Some(9)), Ok(O::Forward));
        assert_eq!(O::between(None, Some(9)), Err(NalError::EternalComparison));
        assert_eq!(O::between(None, None), Err(NalError::EternalComparison));
    }

    #[test]
    fn figure_codes() {
        assert_eq!(figure(0, 0), 11);
        assert_eq!(figure(0, 1), 12);
        assert_eq!(figure(1, 0), 21);
        assert_eq!(figure(1, 1), 22);
    }
}
