//! Normalizing factories.
//!
//! Every builder returns `None` when the requested term would be invalid or
//! degenerate. Callers treat `None` as "rule not applicable".

use super::{invalid_statement, Connector, Term};
use crate::temporal::TemporalOrder;

fn sorted_unique(mut components: Vec<Term>) -> Vec<Term> {
    components.sort();
    components.dedup();
    components
}

fn flatten(connector: Connector, order: TemporalOrder, components: Vec<Term>) -> Vec<Term> {
    let mut out = Vec::with_capacity(components.len());
    for component in components {
        if component.is(connector) && component.order() == order {
            out.extend(component.components().iter().cloned());
        } else {
            out.push(component);
        }
    }
    out
}

/// Builds any compound from its connector and components.
#[must_use]
pub fn compound(
    connector: Connector,
    components: Vec<Term>,
    order: TemporalOrder,
    relation_index: usize,
) -> Option<Term> {
    match connector {
        Connector::ExtSet => ext_set(components),
        Connector::IntSet => int_set(components),
        Connector::ExtIntersection => ext_intersection_of(components),
        Connector::IntIntersection => int_intersection_of(components),
        Connector::ExtDifference | Connector::IntDifference => {
            let [a, b] = <[Term; 2]>::try_from(components).ok()?;
            if connector == Connector::ExtDifference {
                ext_difference(a, b)
            } else {
                int_difference(a, b)
            }
        }
        Connector::Product => product(components),
        Connector::ExtImage => ext_image(components, relation_index),
        Connector::IntImage => int_image(components, relation_index),
        Connector::Negation => {
            let [inner] = <[Term; 1]>::try_from(components).ok()?;
            negation(inner)
        }
        Connector::Conjunction => conjunction_of(components, order),
        Connector::Disjunction => disjunction_of(components),
        Connector::Inheritance
        | Connector::Similarity
        | Connector::Implication
        | Connector::Equivalence => {
            let [s, p] = <[Term; 2]>::try_from(components).ok()?;
            statement(connector, s, p, order)
        }
    }
}

/// Rebuilds `template` around new components, keeping its connector, order,
/// relation index and interval.
#[must_use]
pub fn rebuild(template: &Term, components: Vec<Term>) -> Option<Term> {
    let connector = template.connector()?;
    let built = compound(
        connector,
        components,
        template.order(),
        template.relation_index(),
    )?;
    if template.is_statement() && built.is_statement() {
        Some(built.with_interval(template.interval_len()))
    } else {
        Some(built)
    }
}

/// Same compound without the listed components.
///
/// A single survivor replaces junctions, intersections and differences.
/// Sets, products and negations with one survivor, and anything with none
/// left, give `None`.
#[must_use]
pub fn reduce_components(compound: &Term, remove: &Term) -> Option<Term> {
    let mut remaining = compound.components().to_vec();
    let before = remaining.len();
    if compound.connector().is_some() && compound.connector() == remove.connector() {
        remaining.retain(|c| !remove.contains_component(c));
    } else {
        remaining.retain(|c| c != remove);
    }
    if remaining.len() == before {
        return None;
    }
    match remaining.len() {
        0 => None,
        1 if matches!(
            compound.connector(),
            Some(
                Connector::Conjunction
                    | Connector::Disjunction
                    | Connector::ExtIntersection
                    | Connector::IntIntersection
                    | Connector::ExtDifference
                    | Connector::IntDifference
            )
        ) =>
        {
            remaining.pop()
        }
        1 => None,
        _ => rebuild(compound, remaining),
    }
}

/// Replaces (or with `None`, removes) the component at `index`.
#[must_use]
pub fn set_component(compound: &Term, index: usize, replacement: Option<Term>) -> Option<Term> {
    let mut components = compound.components().to_vec();
    if index >= components.len() {
        return None;
    }
    match replacement {
        Some(term)
            if term.is_compound()
                && term.connector() == compound.connector()
                && term.order() == compound.order() =>
        {
            components.splice(index..=index, term.components().iter().cloned());
        }
        Some(term) => components[index] = term,
        None => {
            components.remove(index);
        }
    }
    match components.len() {
        0 => None,
        1 if compound.is_commutative() => components.pop(),
        _ => rebuild(compound, components),
    }
}

/// `{a, b, ...}`
#[must_use]
pub fn ext_set(components: Vec<Term>) -> Option<Term> {
    if components.is_empty() {
        return None;
    }
    Some(Term::compound_raw(
        Connector::ExtSet,
        sorted_unique(components),
        TemporalOrder::None,
        0,
        0,
    ))
}

/// `[a, b, ...]`
#[must_use]
pub fn int_set(components: Vec<Term>) -> Option<Term> {
    if components.is_empty() {
        return None;
    }
    Some(Term::compound_raw(
        Connector::IntSet,
        sorted_unique(components),
        TemporalOrder::None,
        0,
        0,
    ))
}

fn set_union(a: &Term, b: &Term) -> Vec<Term> {
    a.components().iter().chain(b.components()).cloned().collect()
}

fn set_intersection(a: &Term, b: &Term) -> Vec<Term> {
    a.components()
        .iter()
        .filter(|c| b.contains_component(c))
        .cloned()
        .collect()
}

fn set_difference(a: &Term, b: &Term) -> Vec<Term> {
    a.components()
        .iter()
        .filter(|c| !b.contains_component(c))
        .cloned()
        .collect()
}

/// `(&, a, b)`; two intensional sets unite, two extensional sets intersect.
#[must_use]
pub fn ext_intersection(a: Term, b: Term) -> Option<Term> {
    match (a.connector(), b.connector()) {
        (Some(Connector::IntSet), Some(Connector::IntSet)) => int_set(set_union(&a, &b)),
        (Some(Connector::ExtSet), Some(Connector::ExtSet)) => ext_set(set_intersection(&a, &b)),
        _ => ext_intersection_of(vec![a, b]),
    }
}

/// `(&, ...)` from a list, flattening nested intersections.
#[must_use]
pub fn ext_intersection_of(components: Vec<Term>) -> Option<Term> {
    junction(Connector::ExtIntersection, components)
}

/// `(|, a, b)`; two extensional sets unite, two intensional sets intersect.
#[must_use]
pub fn int_intersection(a: Term, b: Term) -> Option<Term> {
    match (a.connector(), b.connector()) {
        (Some(Connector::ExtSet), Some(Connector::ExtSet)) => ext_set(set_union(&a, &b)),
        (Some(Connector::IntSet), Some(Connector::IntSet)) => int_set(set_intersection(&a, &b)),
        _ => int_intersection_of(vec![a, b]),
    }
}

/// `(|, ...)` from a list, flattening nested intersections.
#[must_use]
pub fn int_intersection_of(components: Vec<Term>) -> Option<Term> {
    junction(Connector::IntIntersection, components)
}

fn junction(connector: Connector, components: Vec<Term>) -> Option<Term> {
    let mut components = sorted_unique(flatten(connector, TemporalOrder::None, components));
    match components.len() {
        0 => None,
        1 => components.pop(),
        _ => Some(Term::compound_raw(
            connector,
            components,
            TemporalOrder::None,
            0,
            0,
        )),
    }
}

/// `(-, a, b)`; two extensional sets subtract.
#[must_use]
pub fn ext_difference(a: Term, b: Term) -> Option<Term> {
    if a == b {
        return None;
    }
    if a.is(Connector::ExtSet) && b.is(Connector::ExtSet) {
        return ext_set(set_difference(&a, &b));
    }
    Some(Term::compound_raw(
        Connector::ExtDifference,
        vec![a, b],
        TemporalOrder::None,
        0,
        0,
    ))
}

/// `(~, a, b)`; two intensional sets subtract.
#[must_use]
pub fn int_difference(a: Term, b: Term) -> Option<Term> {
    if a == b {
        return None;
    }
    if a.is(Connector::IntSet) && b.is(Connector::IntSet) {
        return int_set(set_difference(&a, &b));
    }
    Some(Term::compound_raw(
        Connector::IntDifference,
        vec![a, b],
        TemporalOrder::None,
        0,
        0,
    ))
}

/// `(*, a, b, ...)`
#[must_use]
pub fn product(components: Vec<Term>) -> Option<Term> {
    if components.is_empty() {
        return None;
    }
    Some(Term::compound_raw(
        Connector::Product,
        components,
        TemporalOrder::None,
        0,
        0,
    ))
}

fn image(connector: Connector, args: Vec<Term>, relation_index: usize) -> Option<Term> {
    if args.len() < 2 || relation_index >= args.len() {
        return None;
    }
    Some(Term::compound_raw(
        connector,
        args,
        TemporalOrder::None,
        relation_index,
        0,
    ))
}

/// `(/, R, ...)` from its arguments; `args[relation_index]` is the relation.
#[must_use]
pub fn ext_image(args: Vec<Term>, relation_index: usize) -> Option<Term> {
    image(Connector::ExtImage, args, relation_index)
}

/// `(\, R, ...)` from its arguments; `args[relation_index]` is the relation.
#[must_use]
pub fn int_image(args: Vec<Term>, relation_index: usize) -> Option<Term> {
    image(Connector::IntImage, args, relation_index)
}

fn image_from_product(
    connector: Connector,
    product: &Term,
    relation: &Term,
    index: usize,
) -> Option<Term> {
    if relation.is(Connector::Product) && product.size() == 2 && relation.size() == 2 {
        // (/,(*,a,b),_,b) reduces to a, and (/,(*,a,b),a,_) to b
        if index == 0 && product.component(1) == relation.component(1) {
            return relation.component(0).cloned();
        }
        if index == 1 && product.component(0) == relation.component(0) {
            return relation.component(1).cloned();
        }
    }
    let mut args = product.components().to_vec();
    if index >= args.len() {
        return None;
    }
    args[index] = relation.clone();
    image(connector, args, index)
}

fn image_from_image(connector: Connector, old: &Term, component: &Term, index: usize) -> Option<Term> {
    let mut args = old.components().to_vec();
    let old_index = old.relation_index();
    if index >= args.len() {
        return None;
    }
    let relation = args[old_index].clone();
    args[old_index] = component.clone();
    args[index] = relation;
    image(connector, args, index)
}

/// Extensional image of `product` with `relation` at `index`.
#[must_use]
pub fn ext_image_from_product(product: &Term, relation: &Term, index: usize) -> Option<Term> {
    image_from_product(Connector::ExtImage, product, relation, index)
}

/// Intensional image of `product` with `relation` at `index`.
#[must_use]
pub fn int_image_from_product(product: &Term, relation: &Term, index: usize) -> Option<Term> {
    image_from_product(Connector::IntImage, product, relation, index)
}

/// Moves the placeholder of an extensional image to `index`, putting
/// `component` where the placeholder was.
#[must_use]
pub fn ext_image_from_image(old: &Term, component: &Term, index: usize) -> Option<Term> {
    image_from_image(Connector::ExtImage, old, component, index)
}

/// Intensional counterpart of [`ext_image_from_image`].
#[must_use]
pub fn int_image_from_image(old: &Term, component: &Term, index: usize) -> Option<Term> {
    image_from_image(Connector::IntImage, old, component, index)
}

/// `(--, t)`; a double negation cancels.
#[must_use]
pub fn negation(t: Term) -> Option<Term> {
    if t.is(Connector::Negation) {
        return t.component(0).cloned();
    }
    Some(Term::compound_raw(
        Connector::Negation,
        vec![t],
        TemporalOrder::None,
        0,
        0,
    ))
}

/// Conjunction of two terms under `order`.
#[must_use]
pub fn conjunction(a: Term, b: Term, order: TemporalOrder) -> Option<Term> {
    conjunction_of(vec![a, b], order)
}

/// Conjunction of a list under `order`.
///
/// Same-order nested conjunctions are flattened. Sequences keep their order
/// and duplicates; the other orders sort and deduplicate. A backward
/// conjunction is stored as the reversed forward sequence.
#[must_use]
pub fn conjunction_of(mut components: Vec<Term>, order: TemporalOrder) -> Option<Term> {
    let order = match order {
        TemporalOrder::Invalid => return None,
        TemporalOrder::Backward => {
            components.reverse();
            TemporalOrder::Forward
        }
        other => other,
    };
    let components = flatten(Connector::Conjunction, order, components);
    let mut components = if order == TemporalOrder::Forward {
        components
    } else {
        sorted_unique(components)
    };
    match components.len() {
        0 => None,
        1 => components.pop(),
        _ => Some(Term::compound_raw(
            Connector::Conjunction,
            components,
            order,
            0,
            0,
        )),
    }
}

/// Disjunction of two terms.
#[must_use]
pub fn disjunction(a: Term, b: Term) -> Option<Term> {
    disjunction_of(vec![a, b])
}

/// Disjunction of a list, flattening nested disjunctions.
#[must_use]
pub fn disjunction_of(components: Vec<Term>) -> Option<Term> {
    junction(Connector::Disjunction, components)
}

fn raw_statement(connector: Connector, s: Term, p: Term, order: TemporalOrder) -> Term {
    Term::compound_raw(connector, vec![s, p], order, 0, 0)
}

/// `<S --> P>`
#[must_use]
pub fn inheritance(subject: Term, predicate: Term) -> Option<Term> {
    if invalid_statement(&subject, &predicate) {
        return None;
    }
    Some(raw_statement(
        Connector::Inheritance,
        subject,
        predicate,
        TemporalOrder::None,
    ))
}

/// `<S <-> P>` with sides in canonical order.
#[must_use]
pub fn similarity(subject: Term, predicate: Term) -> Option<Term> {
    if invalid_statement(&subject, &predicate) {
        return None;
    }
    Some(raw_statement(
        Connector::Similarity,
        subject,
        predicate,
        TemporalOrder::None,
    ))
}

fn is_higher_order(t: &Term) -> bool {
    t.is(Connector::Implication) || t.is(Connector::Equivalence)
}

/// `<S ==> P>` under `order`.
///
/// An implication predicate is folded into the antecedent:
/// `<A ==> <B ==> C>>` becomes `<(&&,A,B) ==> C>`.
#[must_use]
pub fn implication(subject: Term, predicate: Term, order: TemporalOrder) -> Option<Term> {
    if order.is_invalid() || invalid_statement(&subject, &predicate) {
        return None;
    }
    if is_higher_order(&subject) || predicate.is(Connector::Equivalence) {
        return None;
    }
    if predicate.is(Connector::Implication) {
        let (old_condition, consequent) = predicate.sides()?;
        if old_condition.is(Connector::Conjunction) && old_condition.contains_component(&subject) {
            return None;
        }
        let condition = conjunction(subject, old_condition.clone(), order)?;
        return implication(condition, consequent.clone(), order);
    }
    Some(raw_statement(Connector::Implication, subject, predicate, order))
}

/// `<S <=> P>` under `order`; backward equivalences are stored forward with
/// the sides swapped.
#[must_use]
pub fn equivalence(subject: Term, predicate: Term, order: TemporalOrder) -> Option<Term> {
    if order.is_invalid() || is_higher_order(&subject) || is_higher_order(&predicate) {
        return None;
    }
    let (subject, predicate, order) = if order == TemporalOrder::Backward {
        (predicate, subject, TemporalOrder::Forward)
    } else {
        (subject, predicate, order)
    };
    if invalid_statement(&subject, &predicate) {
        return None;
    }
    Some(raw_statement(Connector::Equivalence, subject, predicate, order))
}

/// Statement with copula `copula`; the order only matters for the
/// higher-order copulas.
#[must_use]
pub fn statement(copula: Connector, subject: Term, predicate: Term, order: TemporalOrder) -> Option<Term> {
    match copula {
        Connector::Inheritance => inheritance(subject, predicate),
        Connector::Similarity => similarity(subject, predicate),
        Connector::Implication => implication(subject, predicate, order),
        Connector::Equivalence => equivalence(subject, predicate, order),
        _ => None,
    }
}

/// Statement with the copula of `template`.
#[must_use]
pub fn statement_like(template: &Term, subject: Term, predicate: Term, order: TemporalOrder) -> Option<Term> {
    statement(template.connector()?, subject, predicate, order)
}

/// Symmetric counterpart of `template`'s copula: inheritance gives
/// similarity, implication gives equivalence.
#[must_use]
pub fn statement_sym(template: &Term, subject: Term, predicate: Term, order: TemporalOrder) -> Option<Term> {
    match template.connector()? {
        Connector::Inheritance => similarity(subject, predicate),
        Connector::Implication => equivalence(subject, predicate, order),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(name: &str) -> Term {
        Term::word(name)
    }

    #[test]
    fn unordered_conjunction_is_commutative() {
        let ab = conjunction(w("a"), w("b"), TemporalOrder::None).unwrap();
        let ba = conjunction(w("b"), w("a"), TemporalOrder::None).unwrap();
        assert_eq!(ab, ba);
        let par_ab = conjunction(w("a"), w("b"), TemporalOrder::Concurrent).unwrap();
        let par_ba = conjunction(w("b"), w("a"), TemporalOrder::Concurrent).unwrap();
        assert_eq!(par_ab, par_ba);
        assert_ne!(ab, par_ab);
    }

    #[test]
    fn sequences_keep_order() {
        let ab = conjunction(w("a"), w("b"), TemporalOrder::Forward).unwrap();
        let ba = conjunction(w("b"), w("a"), TemporalOrder::Forward).unwrap();
        assert_ne!(ab, ba);
        let back = conjunction(w("a"), w("b"), TemporalOrder::Backward).unwrap();
        assert_eq!(back, ba);
        let dup = conjunction_of(vec![w("a"), w("a")], TemporalOrder::Forward).unwrap();
        assert_eq!(dup.name(), "(&/,a,a)");
    }

    #[test]
    fn same_order_conjunctions_flatten() {
        let inner = conjunction(w("a"), w("b"), TemporalOrder::None).unwrap();
        let outer = conjunction(inner, w("c"), TemporalOrder::None).unwrap();
        assert_eq!(outer.name(), "(&&,a,b,c)");
        let seq = conjunction(w("a"), w("b"), TemporalOrder::Forward).unwrap();
        let mixed = conjunction(seq.clone(), w("c"), TemporalOrder::None).unwrap();
        assert_eq!(mixed.size(), 2);
        assert!(mixed.contains_component(&seq));
    }

    #[test]
    fn singletons_collapse() {
        assert_eq!(conjunction(w("a"), w("a"), TemporalOrder::None), Some(w("a")));
        assert_eq!(disjunction(w("a"), w("a")), Some(w("a")));
        assert_eq!(ext_intersection(w("a"), w("a")), Some(w("a")));
        assert_eq!(conjunction_of(vec![], TemporalOrder::None), None);
        assert_eq!(conjunction(w("a"), w("b"), TemporalOrder::Invalid), None);
    }

    #[test]
    fn set_algebra() {
        let ab = ext_set(vec![w("a"), w("b")]).unwrap();
        let bc = ext_set(vec![w("b"), w("c")]).unwrap();
        assert_eq!(ext_intersection(ab.clone(), bc.clone()).unwrap().name(), "{b}");
        assert_eq!(int_intersection(ab.clone(), bc.clone()).unwrap().name(), "{a,b,c}");
        assert_eq!(ext_difference(ab.clone(), bc).unwrap().name(), "{a}");
        assert_eq!(ext_difference(ab.clone(), ab.clone()), None);
        let a = ext_set(vec![w("a")]).unwrap();
        assert_eq!(ext_difference(a.clone(), a.clone()), None);
        let c = ext_set(vec![w("c")]).unwrap();
        assert_eq!(ext_intersection(a, c), None);
    }

    #[test]
    fn negation_cancels() {
        let not_a = negation(w("a")).unwrap();
        assert_eq!(not_a.name(), "(--,a)");
        assert_eq!(negation(not_a), Some(w("a")));
    }

    #[test]
    fn images_round_trip_through_products() {
        let product = product(vec![w("acid"), w("base")]).unwrap();
        let image = ext_image_from_product(&product, &w("reaction"), 0).unwrap();
        assert_eq!(image.name(), "(/,reaction,_,base)");
        let moved = ext_image_from_image(&image, &w("acid"), 1).unwrap();
        assert_eq!(moved.name(), "(/,reaction,acid,_)");
        let reduced = ext_image_from_product(&product, &product, 0);
        assert_eq!(reduced, Some(w("acid")));
    }

    #[test]
    fn implication_constraints() {
        let ab = inheritance(w("a"), w("b")).unwrap();
        let cd = inheritance(w("c"), w("d")).unwrap();
        let ef = inheritance(w("e"), w("f")).unwrap();
        let inner = implication(cd.clone(), ef.clone(), TemporalOrder::None).unwrap();
        assert!(implication(inner.clone(), ab.clone(), TemporalOrder::None).is_none());
        let folded = implication(ab.clone(), inner, TemporalOrder::None).unwrap();
        assert_eq!(folded.subject().unwrap(), &conjunction(ab.clone(), cd.clone(), TemporalOrder::None).unwrap());
        assert_eq!(folded.predicate().unwrap(), &ef);
        let eq = equivalence(cd.clone(), ef, TemporalOrder::None).unwrap();
        assert!(implication(ab.clone(), eq, TemporalOrder::None).is_none());
        assert!(implication(ab.clone(), ab, TemporalOrder::None).is_none());
    }

    #[test]
    fn equivalence_normalizes_sides() {
        let ab = inheritance(w("a"), w("b")).unwrap();
        let cd = inheritance(w("c"), w("d")).unwrap();
        let e1 = equivalence(cd.clone(), ab.clone(), TemporalOrder::None).unwrap();
        let e2 = equivalence(ab.clone(), cd.clone(), TemporalOrder::None).unwrap();
        assert_eq!(e1, e2);
        let back = equivalence(ab.clone(), cd.clone(), TemporalOrder::Backward).unwrap();
        assert_eq!(back.order(), TemporalOrder::Forward);
        assert_eq!(back.subject(), Some(&cd));
        assert_eq!(similarity(w("b"), w("a")).unwrap().name(), "<a <-> b>");
    }

    #[test]
    fn reduce_and_replace_components() {
        let abc = conjunction_of(vec![w("a"), w("b"), w("c")], TemporalOrder::None).unwrap();
        assert_eq!(reduce_components(&abc, &w("b")).unwrap().name(), "(&&,a,c)");
        let ab = conjunction(w("a"), w("b"), TemporalOrder::None).unwrap();
        assert_eq!(reduce_components(&ab, &w("a")), Some(w("b")));
        assert_eq!(reduce_components(&ab, &w("z")), None);
        let replaced = set_component(&abc, 0, Some(w("z"))).unwrap();
        assert_eq!(replaced.name(), "(&&,b,c,z)");
        assert_eq!(set_component(&ab, 1, None), Some(w("a")));
    }

    #[test]
    fn replacement_of_the_same_kind_is_spliced_in_place() {
        let pq = product(vec![w("p"), w("q")]).unwrap();
        let xy = product(vec![w("x"), w("y")]).unwrap();
        assert_eq!(set_component(&pq, 0, Some(xy)).unwrap().name(), "(*,x,y,q)");
        let seq = conjunction_of(vec![w("a"), w("b")], TemporalOrder::Forward).unwrap();
        let inner = conjunction_of(vec![w("c"), w("d")], TemporalOrder::Forward).unwrap();
        assert_eq!(set_component(&seq, 0, Some(inner)).unwrap().name(), "(&/,c,d,b)");
        let parallel = conjunction_of(vec![w("c"), w("d")], TemporalOrder::Concurrent).unwrap();
        let nested = set_component(&seq, 0, Some(parallel.clone())).unwrap();
        assert_eq!(nested.component(0), Some(&parallel));
    }

    #[test]
    fn lone_survivor_of_a_set_is_not_a_term() {
        let ab = ext_set(vec![w("a"), w("b")]).unwrap();
        assert_eq!(reduce_components(&ab, &ext_set(vec![w("a")]).unwrap()), None);
        let pq = product(vec![w("p"), w("q")]).unwrap();
        assert_eq!(reduce_components(&pq, &w("p")), None);
        let abc = ext_set(vec![w("a"), w("b"), w("c")]).unwrap();
        assert_eq!(reduce_components(&abc, &w("c")).unwrap().name(), "{a,b}");
    }

    #[test]
    fn rebuild_keeps_statement_interval() {
        let imp = implication(w("a"), w("b"), TemporalOrder::Forward)
            .unwrap()
            .with_interval(4);
        let rebuilt = rebuild(&imp, vec![w("c"), w("b")]).unwrap();
        assert_eq!(rebuilt.order(), TemporalOrder::Forward);
        assert_eq!(rebuilt.interval_len(), 4);
    }
}
