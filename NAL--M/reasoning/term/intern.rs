use indexmap::IndexMap;
use parking_lot::RwLock;

use super::Term;

/// Canonical-name term table.
///
/// Interning a term that is structurally equal to a known one returns the
/// known handle, so repeated derivations share storage.
#[derive(Debug, Default)]
pub struct TermInterner {
    terms: RwLock<IndexMap<String, Term>>,
}

impl TermInterner {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored handle for `term`'s name, storing `term` first if
    /// the name is new. A statement whose interval differs from the stored
    /// one is returned as given.
    pub fn intern(&self, term: Term) -> Term {
        if let Some(existing) = self.terms.read().get(term.name()) {
            return Self::pick(existing, term);
        }
        let mut terms = self.terms.write();
        let existing = terms
            .entry(term.name().to_string())
            .or_insert_with(|| term.clone());
        Self::pick(existing, term)
    }

    fn pick(existing: &Term, term: Term) -> Term {
        if existing.interval_len() == term.interval_len() {
            existing.clone()
        } else {
            term
        }
    }

    /// Looks a term up by canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Term> {
        self.terms.read().get(name).cloned()
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.read().len()
    }

    /// Whether nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{term::make, temporal::TemporalOrder};

    #[test]
    fn equal_terms_share_one_handle() {
        let interner = TermInterner::new();
        let ab = make::conjunction(Term::word("a"), Term::word("b"), TemporalOrder::None).unwrap();
        let ba = make::conjunction(Term::word("b"), Term::word("a"), TemporalOrder::None).unwrap();
        assert!(!Term::ptr_eq(&ab, &ba));
        let first = interner.intern(ab);
        let second = interner.intern(ba);
        assert!(Term::ptr_eq(&first, &second));
        assert_eq!(interner.len(), 1);
        assert_eq!(interner.get("(&&,a,b)"), Some(first));
        assert!(interner.get("(&&,a,c)").is_none());
    }

    #[test]
    fn differing_interval_is_not_collapsed() {
        let interner = TermInterner::new();
        let imp = make::implication(Term::word("a"), Term::word("b"), TemporalOrder::Forward).unwrap();
        let stored = interner.intern(imp.clone());
        let timed = interner.intern(imp.with_interval(3));
        assert_eq!(stored, timed);
        assert_eq!(timed.interval_len(), 3);
        assert_eq!(interner.intern(imp).interval_len(), 0);
    }
}
