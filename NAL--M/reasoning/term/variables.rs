//! Substitution, unification and canonical variable renaming.
//!
//! Unification is pure: it fills a fresh [`Unifier`] and the caller decides
//! whether to apply it. Ordered compounds are matched component by
//! component; commutative compounds try every pairing of their components.

use std::collections::HashMap;

use super::{is_commutative, make, Term, TermKind, VarKind};

/// Term-to-term replacement map.
pub type Substitution = HashMap<Term, Term>;

/// Pair of substitutions produced by one unification, one per side.
#[derive(Debug, Default, Clone)]
pub struct Unifier {
    /// Bindings for the first term.
    pub first: Substitution,
    /// Bindings for the second term.
    pub second: Substitution,
}

fn common_variable(kind: VarKind, v1: &Term, v2: &Term) -> Term {
    Term::var(
        kind,
        format!(
            "{}_{}",
            v1.var_id().unwrap_or_default(),
            v2.var_id().unwrap_or_default()
        ),
    )
}

/// Tries to make `t1` and `t2` identical by binding variables of `kind`.
///
/// Bindings are added to `unifier`; on failure it may hold partial
/// bindings and should be discarded.
pub fn find_substitute(kind: VarKind, t1: &Term, t2: &Term, unifier: &mut Unifier) -> bool {
    if t1.var_kind() == Some(kind) {
        if let Some(bound) = unifier.first.get(t1).cloned() {
            return find_substitute(kind, &bound, t2, unifier);
        }
        if t2.var_kind() == Some(kind) {
            let common = common_variable(kind, t1, t2);
            unifier.first.insert(t1.clone(), common.clone());
            unifier.second.insert(t2.clone(), common);
        } else {
            unifier.first.insert(t1.clone(), t2.clone());
        }
        return true;
    }
    if t2.var_kind() == Some(kind) {
        if let Some(bound) = unifier.second.get(t2).cloned() {
            return find_substitute(kind, t1, &bound, unifier);
        }
        unifier.second.insert(t2.clone(), t1.clone());
        return true;
    }
    match (t1.as_compound(), t2.as_compound()) {
        (Some(c1), Some(c2)) => {
            if c1.connector() != c2.connector()
                || c1.order() != c2.order()
                || c1.relation_index() != c2.relation_index()
                || c1.components().len() != c2.components().len()
            {
                return false;
            }
            if is_commutative(c1.connector(), c1.order()) {
                let mut used = vec![false; c2.components().len()];
                match_unordered(kind, c1.components(), c2.components(), &mut used, unifier)
            } else {
                c1.components()
                    .iter()
                    .zip(c2.components())
                    .all(|(a, b)| find_substitute(kind, a, b, unifier))
            }
        }
        _ => t1 == t2,
    }
}

/// Pairs the first of `left` with some unused member of `right`, then the
/// rest recursively. Each attempt runs on a copy so a dead end leaves
/// `unifier` untouched.
fn match_unordered(
    kind: VarKind,
    left: &[Term],
    right: &[Term],
    used: &mut [bool],
    unifier: &mut Unifier,
) -> bool {
    let Some((head, rest)) = left.split_first() else {
        return true;
    };
    for (i, candidate) in right.iter().enumerate() {
        if used[i] {
            continue;
        }
        let mut attempt = unifier.clone();
        if !find_substitute(kind, head, candidate, &mut attempt) {
            continue;
        }
        used[i] = true;
        if match_unordered(kind, rest, right, used, &mut attempt) {
            *unifier = attempt;
            return true;
        }
        used[i] = false;
    }
    false
}

/// Unifies `t1` with `t2` on variables of `kind`, then applies the bindings
/// to `c1` and `c2` and renames their variables canonically.
///
/// Returns `None` when no unifier exists or a substituted compound would be
/// invalid.
#[must_use]
pub fn unify(kind: VarKind, t1: &Term, t2: &Term, c1: &Term, c2: &Term) -> Option<(Term, Term)> {
    let mut unifier = Unifier::default();
    if !find_substitute(kind, t1, t2, &mut unifier) {
        return None;
    }
    let u1 = c1.apply_substitute(&unifier.first)?.rename_variables();
    let u2 = c2.apply_substitute(&unifier.second)?.rename_variables();
    Some((u1, u2))
}

/// Whether `t1` and `t2` unify on variables of `kind`.
#[must_use]
pub fn has_substitute(kind: VarKind, t1: &Term, t2: &Term) -> bool {
    find_substitute(kind, t1, t2, &mut Unifier::default())
}

/// Unifier binding `t2`'s variables to match `t1`, or the reverse.
#[must_use]
pub fn unifier_for(kind: VarKind, t1: &Term, t2: &Term) -> Option<Unifier> {
    let mut unifier = Unifier::default();
    find_substitute(kind, t1, t2, &mut unifier).then_some(unifier)
}

impl Term {
    /// Replaces every occurrence of a key of `map` below this term.
    ///
    /// Returns `None` when a rebuilt compound becomes invalid.
    #[must_use]
    pub fn apply_substitute(&self, map: &Substitution) -> Option<Self> {
        if map.is_empty() {
            return Some(self.clone());
        }
        let Some(compound) = self.as_compound() else {
            return Some(map.get(self).cloned().unwrap_or_else(|| self.clone()));
        };
        let mut changed = false;
        let mut components = Vec::with_capacity(compound.components().len());
        for component in compound.components() {
            let next = match map.get(component) {
                Some(replacement) => replacement.clone(),
                None if component.is_compound() => component.apply_substitute(map)?,
                None => component.clone(),
            };
            changed |= &next != component;
            components.push(next);
        }
        if !changed {
            return Some(self.clone());
        }
        make::rebuild(self, components)
    }

    /// Renumbers variables `1, 2, ...` in depth-first order of appearance.
    ///
    /// Anonymous variables each get a fresh number. Two terms that differ
    /// only in variable names rename to the same term.
    #[must_use]
    pub fn rename_variables(&self) -> Self {
        if !self.has_var() {
            return self.clone();
        }
        let mut seen = HashMap::new();
        let mut next = 0usize;
        self.rename_with(&mut seen, &mut next)
    }

    fn rename_with(&self, seen: &mut HashMap<(VarKind, String), usize>, next: &mut usize) -> Self {
        match self.kind() {
            TermKind::Variable(kind, id) => {
                let number = if id.is_empty() {
                    *next += 1;
                    *next
                } else if let Some(number) = seen.get(&(*kind, id.clone())) {
                    *number
                } else {
                    *next += 1;
                    seen.insert((*kind, id.clone()), *next);
                    *next
                };
                Self::var(*kind, number.to_string())
            }
            TermKind::Compound(compound) if self.has_var() => {
                let components = compound
                    .components()
                    .iter()
                    .map(|c| c.rename_with(seen, next))
                    .collect();
                Self::compound_raw(
                    compound.connector(),
                    components,
                    compound.order(),
                    compound.relation_index(),
                    compound.interval,
                )
            }
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::TemporalOrder;

    fn w(name: &str) -> Term {
        Term::word(name)
    }

    fn ind(id: &str) -> Term {
        Term::var(VarKind::Independent, id)
    }

    #[test]
    fn binds_variable_to_constant() {
        let pattern = make::inheritance(ind("x"), w("bird")).unwrap();
        let fact = make::inheritance(w("robin"), w("bird")).unwrap();
        let conclusion = make::inheritance(ind("x"), w("animal")).unwrap();
        let (a, b) = unify(VarKind::Independent, &pattern, &fact, &conclusion, &fact).unwrap();
        assert_eq!(a.name(), "<robin --> animal>");
        assert_eq!(b, fact);
    }

    #[test]
    fn kinds_do_not_cross() {
        let pattern = make::inheritance(ind("x"), w("bird")).unwrap();
        let fact = make::inheritance(w("robin"), w("bird")).unwrap();
        assert!(!has_substitute(VarKind::Dependent, &pattern, &fact));
        assert!(!has_substitute(
            VarKind::Independent,
            &pattern,
            &make::inheritance(w("robin"), w("fish")).unwrap()
        ));
    }

    #[test]
    fn conflicting_bindings_fail() {
        let pattern = make::product(vec![ind("x"), ind("x")]).unwrap();
        let fact = make::product(vec![w("a"), w("b")]).unwrap();
        assert!(!has_substitute(VarKind::Independent, &pattern, &fact));
        let same = make::product(vec![w("a"), w("a")]).unwrap();
        assert!(has_substitute(VarKind::Independent, &pattern, &same));
    }

    #[test]
    fn variable_pairs_share_a_common_variable() {
        let left = make::inheritance(ind("a"), w("bird")).unwrap();
        let right = make::inheritance(ind("b"), w("bird")).unwrap();
        let (u1, u2) = unify(VarKind::Independent, &left, &right, &left, &right).unwrap();
        assert_eq!(u1, u2);
        assert_eq!(u1.name(), "<$1 --> bird>");
    }

    #[test]
    fn renaming_is_canonical() {
        let t1 = make::implication(
            make::inheritance(ind("q"), w("a")).unwrap(),
            make::inheritance(ind("q"), w("b")).unwrap(),
            TemporalOrder::None,
        )
        .unwrap();
        let t2 = make::implication(
            make::inheritance(ind("z"), w("a")).unwrap(),
            make::inheritance(ind("z"), w("b")).unwrap(),
            TemporalOrder::None,
        )
        .unwrap();
        assert_ne!(t1, t2);
        assert_eq!(t1.rename_variables(), t2.rename_variables());
        assert_eq!(t1.rename_variables().name(), "<<$1 --> a> ==> <$1 --> b>>");
    }

    #[test]
    fn anonymous_variables_stay_distinct() {
        let q = Term::var(VarKind::Query, "");
        let product = make::product(vec![q.clone(), q]).unwrap();
        assert_eq!(product.rename_variables().name(), "(*,?1,?2)");
    }

    #[test]
    fn similarity_unifies_regardless_of_spelling() {
        let query = Term::var(VarKind::Query, "1");
        let pattern = make::similarity(query, w("apple")).unwrap();
        let fact = make::similarity(w("apple"), w("zebra")).unwrap();
        let unifier = unifier_for(VarKind::Query, &pattern, &fact).unwrap();
        assert_eq!(unifier.first[&Term::var(VarKind::Query, "1")], w("zebra"));
    }

    #[test]
    fn conjunction_whose_variable_sorts_first_still_unifies() {
        let dep = Term::var(VarKind::Dependent, "x");
        let pattern = make::conjunction_of(
            vec![
                make::inheritance(dep.clone(), w("bird")).unwrap(),
                make::inheritance(w("tweety"), w("yellow")).unwrap(),
            ],
            TemporalOrder::None,
        )
        .unwrap();
        let fact = make::conjunction_of(
            vec![
                make::inheritance(w("tweety"), w("yellow")).unwrap(),
                make::inheritance(w("zazu"), w("bird")).unwrap(),
            ],
            TemporalOrder::None,
        )
        .unwrap();
        let unifier = unifier_for(VarKind::Dependent, &pattern, &fact).unwrap();
        assert_eq!(unifier.first[&dep], w("zazu"));
    }

    #[test]
    fn sequences_stay_positional() {
        let dep = Term::var(VarKind::Dependent, "x");
        let pattern = make::conjunction_of(
            vec![
                make::inheritance(dep, w("bird")).unwrap(),
                make::inheritance(w("tweety"), w("yellow")).unwrap(),
            ],
            TemporalOrder::Forward,
        )
        .unwrap();
        let fact = make::conjunction_of(
            vec![
                make::inheritance(w("tweety"), w("yellow")).unwrap(),
                make::inheritance(w("zazu"), w("bird")).unwrap(),
            ],
            TemporalOrder::Forward,
        )
        .unwrap();
        assert!(!has_substitute(VarKind::Dependent, &pattern, &fact));
    }

    #[test]
    fn failed_pairing_leaves_no_bindings() {
        let x = ind("x");
        let pattern = make::ext_set(vec![x.clone(), w("b")]).unwrap();
        let fact = make::ext_set(vec![w("c"), w("d")]).unwrap();
        let mut unifier = Unifier::default();
        assert!(!match_unordered(
            VarKind::Independent,
            pattern.components(),
            fact.components(),
            &mut [false, false],
            &mut unifier,
        ));
        assert!(unifier.first.is_empty());
    }

    #[test]
    fn substitution_can_invalidate() {
        let statement = make::inheritance(ind("x"), w("bird")).unwrap();
        let mut map = Substitution::new();
        map.insert(ind("x"), w("bird"));
        assert!(statement.apply_substitute(&map).is_none());
        map.insert(ind("x"), w("robin"));
        assert_eq!(
            statement.apply_substitute(&map).unwrap().name(),
            "<robin --> bird>"
        );
    }
}
