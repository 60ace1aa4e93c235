//! Compound composition and decomposition across two premises, plus the
//! introduction of variables that generalizes co-occurring relations.

use crate::{
    calculus::truth::{
        comparison, induction, intersection, negation, reduce_conjunction,
        reduce_conjunction_neg, reduce_disjunction, union,
    },
    context::DerivationContext,
    entity::{Task, TruthValue},
    memory::Memory,
    temporal::TemporalOrder,
    term::{make, variables::Substitution, Connector, Term, VarKind},
};

/// `{<S --> M>, <P --> M>} |- <(S | P) --> M>, <(S & P) --> M>, ...`
///
/// `index` is the side holding the shared term. When one of the other sides
/// already contains everything in the other, the pair is decomposed
/// instead.
pub fn compose_compound<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task_content: &Term,
    belief_content: &Term,
    index: usize,
) {
    if !ctx.task.sentence().is_judgment() || task_content.connector() != belief_content.connector()
    {
        return;
    }
    let (Some(component_t), Some(component_b), Some(common)) = (
        task_content.component(1 - index),
        belief_content.component(1 - index),
        task_content.component(index),
    ) else {
        return;
    };
    let order = TemporalOrder::compose(task_content.order(), belief_content.order());
    if order.is_invalid() {
        return;
    }
    if component_t.is_compound() && component_t.contains_all_components(component_b) {
        decompose_compound(ctx, component_t, component_b, common, index, true, order);
        return;
    }
    if component_b.is_compound() && component_b.contains_all_components(component_t) {
        decompose_compound(ctx, component_b, component_t, common, index, false, order);
        return;
    }
    let Some(truth_t) = ctx.task.sentence().truth() else {
        return;
    };
    let Some(truth_b) = ctx.belief.as_ref().and_then(|b| b.truth()) else {
        return;
    };
    let truth_or = union(truth_t, truth_b);
    let truth_and = intersection(truth_t, truth_b);
    let (a, b) = (component_t.clone(), component_b.clone());
    let mut difference = None;
    let (term_or, term_and) = if task_content.is(Connector::Inheritance) {
        let (or, and) = if index == 0 {
            (
                make::int_intersection(a.clone(), b.clone()),
                make::ext_intersection(a.clone(), b.clone()),
            )
        } else {
            (
                make::ext_intersection(a.clone(), b.clone()),
                make::int_intersection(a.clone(), b.clone()),
            )
        };
        let diff = if index == 0 {
            make::ext_difference
        } else {
            make::int_difference
        };
        match (truth_t.is_negative(), truth_b.is_negative()) {
            (false, true) => {
                difference = diff(a, b).map(|t| (t, intersection(truth_t, negation(truth_b))));
            }
            (true, false) => {
                difference = diff(b, a).map(|t| (t, intersection(truth_b, negation(truth_t))));
            }
            _ => {}
        }
        (or, and)
    } else if task_content.is(Connector::Implication) {
        let disjunction = make::disjunction(a.clone(), b.clone());
        let conjunction = make::conjunction(a, b, TemporalOrder::None);
        if index == 0 {
            (disjunction, conjunction)
        } else {
            (conjunction, disjunction)
        }
    } else {
        (None, None)
    };
    let composed = [
        term_or.map(|t| (t, truth_or)),
        term_and.map(|t| (t, truth_and)),
        difference,
    ];
    for (term, truth) in composed.into_iter().flatten() {
        let (subject, predicate) = if index == 0 {
            (common.clone(), term)
        } else {
            (term, common.clone())
        };
        process_composed(ctx, task_content, subject, predicate, order, truth);
    }
}

fn process_composed<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    statement: &Term,
    subject: Term,
    predicate: Term,
    order: TemporalOrder,
    truth: TruthValue,
) {
    let Some(content) = make::statement_like(statement, subject, predicate, order) else {
        return;
    };
    let belief_content = ctx.belief.as_ref().map(|b| b.content());
    if &content == statement || Some(&content) == belief_content {
        return;
    }
    let budget = ctx.compound_forward(truth, &content);
    ctx.double_premise_task(content, Some(truth), budget);
}

/// `{<(S | P) --> M>, <P --> M>} |- <S --> M>`
///
/// Removes `component` from `compound` and concludes the residual relation
/// with the shared `term1`; the truth function depends on the connector of
/// the compound and the side it sits on.
pub fn decompose_compound<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    component: &Term,
    term1: &Term,
    index: usize,
    compound_task: bool,
    order: TemporalOrder,
) {
    if compound.is_statement() || compound.is_image() {
        return;
    }
    let Some(term2) = make::reduce_components(compound, component) else {
        return;
    };
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let task = ctx.task.sentence().clone();
    let old_content = task.content();
    let (Some(task_truth), Some(belief_truth)) = (task.truth(), belief.truth()) else {
        return;
    };
    let (v1, v2) = if compound_task {
        (task_truth, belief_truth)
    } else {
        (belief_truth, task_truth)
    };
    let (content, truth) = if index == 0 {
        let content = make::statement_like(old_content, term1.clone(), term2, order);
        let truth = if old_content.is(Connector::Inheritance) {
            match compound.connector() {
                Some(Connector::ExtIntersection) => Some(reduce_conjunction(v1, v2)),
                Some(Connector::IntIntersection) => Some(reduce_disjunction(v1, v2)),
                Some(Connector::IntSet) if component.is(Connector::IntSet) => {
                    Some(reduce_conjunction(v1, v2))
                }
                Some(Connector::ExtSet) if component.is(Connector::ExtSet) => {
                    Some(reduce_disjunction(v1, v2))
                }
                Some(Connector::ExtDifference) if compound.component(0) == Some(component) => {
                    Some(reduce_disjunction(v2, v1))
                }
                Some(Connector::ExtDifference) => Some(reduce_conjunction_neg(v1, v2)),
                _ => None,
            }
        } else if old_content.is(Connector::Implication) {
            match compound.connector() {
                Some(Connector::Conjunction) => Some(reduce_conjunction(v1, v2)),
                Some(Connector::Disjunction) => Some(reduce_disjunction(v1, v2)),
                _ => None,
            }
        } else {
            None
        };
        (content, truth)
    } else {
        let content = make::statement_like(old_content, term2, term1.clone(), order);
        let truth = if old_content.is(Connector::Inheritance) {
            match compound.connector() {
                Some(Connector::IntIntersection) => Some(reduce_conjunction(v1, v2)),
                Some(Connector::ExtIntersection) => Some(reduce_disjunction(v1, v2)),
                Some(Connector::ExtSet) if component.is(Connector::ExtSet) => {
                    Some(reduce_conjunction(v1, v2))
                }
                Some(Connector::IntSet) if component.is(Connector::IntSet) => {
                    Some(reduce_disjunction(v1, v2))
                }
                Some(Connector::IntDifference) if compound.component(1) == Some(component) => {
                    Some(reduce_disjunction(v2, v1))
                }
                Some(Connector::IntDifference) => Some(reduce_conjunction_neg(v1, v2)),
                _ => None,
            }
        } else if old_content.is(Connector::Implication) {
            match compound.connector() {
                Some(Connector::Disjunction) => Some(reduce_conjunction(v1, v2)),
                Some(Connector::Conjunction) => Some(reduce_disjunction(v1, v2)),
                _ => None,
            }
        } else {
            None
        };
        (content, truth)
    };
    if let (Some(content), Some(truth)) = (content, truth) {
        let budget = ctx.compound_forward(truth, &content);
        ctx.double_premise_task(content, Some(truth), budget);
    }
}

/// `{(&&, S, P), P} |- S` and `{(||, S, P), (--, P)} |- S`
///
/// A conjunctive question whose remainder is already believed is answered
/// by conjoining that belief with the current one.
pub fn decompose_statement<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    component: &Term,
    compound_task: bool,
    index: usize,
) {
    let conjunction = compound.is(Connector::Conjunction);
    if conjunction && compound.order() == TemporalOrder::Forward && index != 0 {
        return;
    }
    let Some(content) = make::reduce_components(compound, component) else {
        return;
    };
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let task = ctx.task.clone();
    let sentence = task.sentence();
    if sentence.is_question_like() {
        let budget = ctx.compound_backward(&content);
        ctx.double_premise_task(content.clone(), None, budget);
        if sentence.content().has_var_kind(VarKind::Query) {
            answer_conjunctive_question(ctx, &task, &content, component);
        }
        return;
    }
    let (Some(task_truth), Some(belief_truth)) = (sentence.truth(), belief.truth()) else {
        return;
    };
    let (v1, v2) = if compound_task {
        (task_truth, belief_truth)
    } else {
        (belief_truth, task_truth)
    };
    let truth = match (compound.connector(), sentence.is_goal(), compound_task) {
        (Some(Connector::Conjunction), true, true) => intersection(v1, v2),
        (Some(Connector::Conjunction), false, _) => reduce_conjunction(v1, v2),
        (Some(Connector::Disjunction), true, true) => reduce_conjunction(v2, v1),
        (Some(Connector::Disjunction), false, _) => reduce_disjunction(v1, v2),
        _ => return,
    };
    let budget = ctx.compound_forward(truth, &content);
    ctx.double_premise_task(content, Some(truth), budget);
}

fn answer_conjunctive_question<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task: &Task,
    content: &Term,
    component: &Term,
) {
    let Some(content_belief) = ctx.memory.belief_for(content, task) else {
        return;
    };
    let (Some(content_truth), Some(belief_truth)) = (
        content_belief.truth(),
        ctx.belief.as_ref().and_then(|b| b.truth()),
    ) else {
        return;
    };
    let Some(conjunction) =
        make::conjunction(component.clone(), content.clone(), TemporalOrder::None)
    else {
        return;
    };
    let answering = Task::input(content_belief, task.budget(), ctx.config.novelty_capacity);
    let question = std::mem::replace(&mut ctx.task, answering);
    let truth = intersection(content_truth, belief_truth);
    let budget = ctx.compound_forward(truth, &conjunction);
    ctx.double_premise_task(conjunction, Some(truth), budget);
    ctx.task = question;
}

/// Non-relation component of a two-place image.
fn other_component(image: &Term) -> Option<&Term> {
    if !image.is_image() || image.size() != 2 {
        return None;
    }
    image.component(1 - image.relation_index().min(1))
}

/// Term shared by two image-valued sides, if one side's other component
/// appears in the other side.
fn shared_image_term(t1: &Term, t2: &Term, image: Connector) -> Option<Term> {
    if t1.is(image) {
        if t1.contains_term(t2) {
            return Some(t2.clone());
        }
        if let Some(other) = other_component(t1).filter(|o| t2.contains_term(o)) {
            return Some(other.clone());
        }
    }
    if t2.is(image) {
        if let Some(other) = other_component(t2).filter(|o| t1.contains_term(o)) {
            return Some(other.clone());
        }
    }
    None
}

fn substitute_or_var(t: &Term, map: &Substitution, var: &Term) -> Option<Term> {
    if t.is_compound() {
        t.apply_substitute(map)
    } else if map.contains_key(t) {
        Some(var.clone())
    } else {
        Some(t.clone())
    }
}

/// `{<M --> S>, <M --> P>} |- <<$x --> S> ==> <$x --> P>>`, its converse,
/// the equivalence, and `(&&, <#x --> S>, <#x --> P>)`.
///
/// `index` is the side holding the shared term. Images sharing their other
/// component get a second independent variable.
pub fn intro_var_outer<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task_content: &Term,
    belief_content: &Term,
    index: usize,
) {
    if !task_content.is(Connector::Inheritance) || !belief_content.is(Connector::Inheritance) {
        return;
    }
    let (Some((task_s, task_p)), Some((belief_s, belief_p))) =
        (task_content.sides(), belief_content.sides())
    else {
        return;
    };
    let var1 = Term::var(VarKind::Independent, "1");
    let var2 = Term::var(VarKind::Independent, "2");
    let (t_other, b_other, image) = if index == 0 {
        (task_p, belief_p, Connector::ExtImage)
    } else {
        (task_s, belief_s, Connector::IntImage)
    };
    let (t_general, b_general) = match shared_image_term(t_other, b_other, image) {
        Some(common) => {
            let mut map = Substitution::new();
            map.insert(common, var2.clone());
            let (Some(t), Some(b)) = (
                substitute_or_var(t_other, &map, &var2),
                substitute_or_var(b_other, &map, &var2),
            ) else {
                return;
            };
            (t, b)
        }
        None => (t_other.clone(), b_other.clone()),
    };
    let states = if index == 0 {
        (
            make::inheritance(var1.clone(), t_general),
            make::inheritance(var1, b_general),
        )
    } else {
        (
            make::inheritance(t_general, var1.clone()),
            make::inheritance(b_general, var1),
        )
    };
    let (Some(state1), Some(state2)) = states else {
        return;
    };
    let Some(truth_t) = ctx.task.sentence().truth() else {
        return;
    };
    let Some(truth_b) = ctx.belief.as_ref().and_then(|b| b.truth()) else {
        return;
    };
    let k = ctx.horizon();
    let conclusions = [
        (
            make::implication(state1.clone(), state2.clone(), TemporalOrder::None),
            induction(truth_t, truth_b, k),
        ),
        (
            make::implication(state2.clone(), state1.clone(), TemporalOrder::None),
            induction(truth_b, truth_t, k),
        ),
        (
            make::equivalence(state1, state2, TemporalOrder::None),
            comparison(truth_t, truth_b, k),
        ),
    ];
    for (content, truth) in conclusions {
        if let Some(content) = content {
            let budget = ctx.compound_forward(truth, &content);
            ctx.double_premise_task(content, Some(truth), budget);
        }
    }
    let dep = Term::var(VarKind::Dependent, "1");
    let states = if index == 0 {
        (
            make::inheritance(dep.clone(), t_other.clone()),
            make::inheritance(dep, b_other.clone()),
        )
    } else {
        (
            make::inheritance(t_other.clone(), dep.clone()),
            make::inheritance(b_other.clone(), dep),
        )
    };
    let (Some(state1), Some(state2)) = states else {
        return;
    };
    if let Some(content) = make::conjunction(state1, state2, TemporalOrder::None) {
        let truth = intersection(truth_t, truth_b);
        let budget = ctx.compound_forward(truth, &content);
        ctx.double_premise_task(content, Some(truth), budget);
    }
}

fn second_common_term(t1: &Term, t2: &Term) -> Option<Term> {
    let image = t1.connector().filter(|c| c.is_image())?;
    if t2.connector() != Some(image) {
        return None;
    }
    shared_image_term(t1, t2, image)
}

/// `{<M --> S>, (&&, <M --> P>, ...)} |- (&&, <#x --> S>, <#x --> P>, ...)`
/// and the matching implication with independent variables.
///
/// `premise2` is a component of `old_compound`; both premises must share a
/// subject or a predicate.
pub fn intro_var_inner<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    premise1: &Term,
    premise2: &Term,
    old_compound: &Term,
) {
    if !ctx.task.sentence().is_judgment()
        || premise1.connector() != premise2.connector()
        || old_compound.contains_term(premise1)
    {
        return;
    }
    let (Some((s1, p1)), Some((s2, p2))) = (premise1.sides(), premise2.sides()) else {
        return;
    };
    let (common1, common2) = if s1 == s2 {
        (s1.clone(), second_common_term(p1, p2))
    } else if p1 == p2 {
        (p1.clone(), second_common_term(s1, s2))
    } else {
        return;
    };
    let sentence = ctx.task.sentence().clone();
    let (Some(truth_t), Some(truth_b)) = (
        sentence.truth(),
        ctx.belief.as_ref().and_then(|b| b.truth()),
    ) else {
        return;
    };
    let mut dependent = Substitution::new();
    dependent.insert(common1.clone(), Term::var(VarKind::Dependent, "2"));
    let conjunction = make::conjunction(premise1.clone(), old_compound.clone(), TemporalOrder::None)
        .and_then(|c| c.apply_substitute(&dependent));
    if let Some(content) = conjunction {
        let truth = intersection(truth_t, truth_b);
        let budget = ctx.forward(truth);
        ctx.double_premise_task(content, Some(truth), budget);
    }
    let mut independent = Substitution::new();
    independent.insert(common1, Term::var(VarKind::Independent, "1"));
    if let Some(common2) = common2 {
        independent.insert(common2, Term::var(VarKind::Independent, "2"));
    }
    let implication =
        make::implication(premise1.clone(), old_compound.clone(), TemporalOrder::None)
            .and_then(|c| c.apply_substitute(&independent));
    if let Some(content) = implication {
        let k = ctx.horizon();
        let truth = if premise1 == sentence.content() {
            induction(truth_b, truth_t, k)
        } else {
            induction(truth_t, truth_b, k)
        };
        let budget = ctx.forward(truth);
        ctx.double_premise_task(content, Some(truth), budget);
    }
}
