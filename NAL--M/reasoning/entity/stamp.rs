use std::fmt;

use serde::{Deserialize, Serialize};

/// Evidential base plus creation and occurrence time.
///
/// `occurrence == None` marks an eternal sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    base: Vec<u64>,
    creation_time: i64,
    occurrence: Option<i64>,
}

impl Stamp {
    /// Stamp of a fresh input carrying a single serial.
    #[must_use]
    pub fn new(serial: u64, creation_time: i64, occurrence: Option<i64>) -> Self {
        Self {
            base: vec![serial],
            creation_time,
            occurrence,
        }
    }

    /// Stamp over an explicit evidential base.
    #[must_use]
    pub fn with_base(base: Vec<u64>, creation_time: i64, occurrence: Option<i64>) -> Self {
        Self {
            base,
            creation_time,
            occurrence,
        }
    }

    /// Merges two bases, interleaving the second with the first and keeping
    /// at most `max_len` distinct serials. The occurrence time comes from
    /// `first`.
    #[must_use]
    pub fn merge(first: &Self, second: &Self, time: i64, max_len: usize) -> Self {
        let mut base = Vec::with_capacity((first.base.len() + second.base.len()).min(max_len));
        let mut a = first.base.iter();
        let mut b = second.base.iter();
        loop {
            let next_b = b.next();
            let next_a = a.next();
            if next_a.is_none() && next_b.is_none() {
                break;
            }
            for serial in next_b.into_iter().chain(next_a) {
                if base.len() < max_len && !base.contains(serial) {
                    base.push(*serial);
                }
            }
        }
        Self {
            base,
            creation_time: time,
            occurrence: first.occurrence,
        }
    }

    /// Copy created at `time`, same base and occurrence.
    #[must_use]
    pub fn derive(&self, time: i64) -> Self {
        Self {
            creation_time: time,
            ..self.clone()
        }
    }

    /// Whether the two bases share a serial.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.base.iter().any(|serial| other.base.contains(serial))
    }

    /// Serials of the evidential base.
    #[must_use]
    pub fn base(&self) -> &[u64] {
        &self.base
    }

    /// Cycle in which the stamp was made.
    #[must_use]
    pub const fn creation_time(&self) -> i64 {
        self.creation_time
    }

    /// Occurrence time, `None` when eternal.
    #[must_use]
    pub const fn occurrence(&self) -> Option<i64> {
        self.occurrence
    }

    /// Whether the stamp is eternal.
    #[must_use]
    pub const fn is_eternal(&self) -> bool {
        self.occurrence.is_none()
    }

    /// Moves the stamp on the time line.
    pub fn set_occurrence(&mut self, occurrence: Option<i64>) {
        self.occurrence = occurrence;
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self
            .base
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        match self.occurrence {
            Some(at) => write!(f, "{{{} : {} : {}}}", base, self.creation_time, at),
            None => write!(f, "{{{} : {}}}", base, self.creation_time),
        }
    }
}
