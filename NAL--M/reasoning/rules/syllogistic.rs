//! Two-premise syllogisms over statements sharing a term, detachment, and
//! the conditional rules that eliminate a conjunct from an antecedent.

use crate::{
    calculus::truth::{
        abduction, analogy as analogy_truth, anonymous_analogy, comparison, deduction,
        desire_ded, desire_ind, desire_strong, desire_weak, exemplification, induction,
        resemblance as resemblance_truth,
    },
    context::DerivationContext,
    entity::{BudgetValue, Sentence, TruthValue},
    memory::Memory,
    temporal::{Figure, TemporalOrder},
    term::{
        invalid_pair, invalid_statement, make,
        variables::{has_substitute, unifier_for, unify},
        Connector, Term, VarKind,
    },
};

/// Truths and budgets for one conclusion; questions carry no truth.
type Conclusion = (Option<TruthValue>, BudgetValue);

/// `{<M --> P>, <S --> M>} |- <S --> P>` plus the exemplification
/// `<P --> S>`.
///
/// `sentence` is the task, `belief` the other premise. Directed conclusions
/// carry the summed intervals of both premises.
pub fn ded_exe<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    term1: &Term,
    term2: &Term,
    sentence: &Sentence,
    belief: &Sentence,
) {
    if invalid_statement(term1, term2) {
        return;
    }
    let order = TemporalOrder::ded_exe(sentence.temporal_order(), belief.temporal_order());
    if order.is_invalid() {
        return;
    }
    let Some(v2) = belief.truth() else {
        return;
    };
    let k = ctx.horizon();
    let (first, second): (Conclusion, Conclusion) = if sentence.is_question() {
        ((None, ctx.backward_weak(v2)), (None, ctx.backward_weak(v2)))
    } else if sentence.is_quest() {
        ((None, ctx.backward(v2)), (None, ctx.backward(v2)))
    } else {
        let Some(v1) = sentence.truth() else {
            return;
        };
        let (t1, t2) = if sentence.is_goal() {
            (desire_weak(v1, v2, k), desire_weak(v1, v2, k))
        } else {
            (deduction(v1, v2), exemplification(v1, v2, k))
        };
        ((Some(t1), ctx.forward(t1)), (Some(t2), ctx.forward(t2)))
    };
    let content = sentence.content();
    let interval = if order.is_directed() {
        content.interval_len() + belief.content().interval_len()
    } else {
        0
    };
    if let Some(c1) = make::statement_like(content, term1.clone(), term2.clone(), order) {
        ctx.double_premise_task(c1.with_interval(interval), first.0, first.1);
    }
    if let Some(c2) = make::statement_like(content, term2.clone(), term1.clone(), order.reverse())
    {
        ctx.double_premise_task(c2.with_interval(interval), second.0, second.1);
    }
}

/// `{<M --> S>, <M --> P>} |- <S --> P>, <P --> S>, <S <-> P>`
///
/// Abduction both ways plus comparison. Pairs where only one side carries
/// an independent variable are refused.
pub fn abd_ind_com<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    term1: &Term,
    term2: &Term,
    sentence1: &Sentence,
    sentence2: &Sentence,
) {
    if invalid_statement(term1, term2) || invalid_pair(term1, term2) {
        return;
    }
    let order = TemporalOrder::abd_ind_com(sentence1.temporal_order(), sentence2.temporal_order());
    if order.is_invalid() {
        return;
    }
    let Some(v2) = sentence2.truth() else {
        return;
    };
    let k = ctx.horizon();
    let conclusions: [Conclusion; 3] = if sentence1.is_question() {
        [
            (None, ctx.backward(v2)),
            (None, ctx.backward_weak(v2)),
            (None, ctx.backward(v2)),
        ]
    } else if sentence1.is_quest() {
        [
            (None, ctx.backward_weak(v2)),
            (None, ctx.backward(v2)),
            (None, ctx.backward_weak(v2)),
        ]
    } else {
        let Some(v1) = sentence1.truth() else {
            return;
        };
        let truths = if sentence1.is_goal() {
            [
                desire_strong(v1, v2),
                desire_weak(v2, v1, k),
                desire_strong(v1, v2),
            ]
        } else {
            [
                abduction(v1, v2, k),
                abduction(v2, v1, k),
                comparison(v1, v2, k),
            ]
        };
        truths.map(|truth| (Some(truth), ctx.forward(truth)))
    };
    let task_content = sentence1.content();
    let contents = [
        make::statement_like(task_content, term1.clone(), term2.clone(), order),
        make::statement_like(task_content, term2.clone(), term1.clone(), order.reverse()),
        make::statement_sym(task_content, term1.clone(), term2.clone(), order),
    ];
    for (content, (truth, budget)) in contents.into_iter().zip(conclusions) {
        if let Some(content) = content {
            ctx.double_premise_task(content, truth, budget);
        }
    }
}

/// `{<S --> P>, <M <-> S>} |- <M --> P>`
pub fn analogy<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    subject: &Term,
    predicate: &Term,
    asym: &Sentence,
    sym: &Sentence,
    figure: Figure,
) {
    if invalid_statement(subject, predicate) {
        return;
    }
    let order = TemporalOrder::analogy(asym.temporal_order(), sym.temporal_order(), figure);
    if order.is_invalid() {
        return;
    }
    let sentence = ctx.task.sentence().clone();
    let commutative = sentence.content().is_commutative();
    let (truth, budget) = if sentence.is_question_like() {
        let budget = if commutative {
            let Some(truth) = asym.truth() else {
                return;
            };
            ctx.backward_weak(truth)
        } else {
            let Some(truth) = sym.truth() else {
                return;
            };
            ctx.backward(truth)
        };
        (None, budget)
    } else {
        let (Some(a), Some(s)) = (asym.truth(), sym.truth()) else {
            return;
        };
        let truth = match (sentence.is_goal(), commutative) {
            (false, _) => analogy_truth(a, s),
            (true, true) => desire_weak(a, s, ctx.horizon()),
            (true, false) => desire_strong(a, s),
        };
        (Some(truth), ctx.forward(truth))
    };
    if let Some(content) =
        make::statement_like(asym.content(), subject.clone(), predicate.clone(), order)
    {
        ctx.double_premise_task(content, truth, budget);
    }
}

/// `{<S <-> M>, <M <-> P>} |- <S <-> P>`
pub fn resemblance<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    term1: &Term,
    term2: &Term,
    belief: &Sentence,
    sentence: &Sentence,
    figure: Figure,
) {
    if invalid_statement(term1, term2) {
        return;
    }
    let order = TemporalOrder::resemblance(belief.temporal_order(), sentence.temporal_order(), figure);
    if order.is_invalid() {
        return;
    }
    let Some(vb) = belief.truth() else {
        return;
    };
    let (truth, budget) = if sentence.is_question_like() {
        (None, ctx.backward(vb))
    } else {
        let Some(vs) = sentence.truth() else {
            return;
        };
        let truth = if sentence.is_goal() {
            desire_strong(vs, vb)
        } else {
            resemblance_truth(vb, vs)
        };
        (Some(truth), ctx.forward(truth))
    };
    if let Some(content) =
        make::statement_like(belief.content(), term1.clone(), term2.clone(), order)
    {
        ctx.double_premise_task(content, truth, budget);
    }
}

/// Modus ponens over an implication or equivalence.
///
/// With `side == 0` the sub-sentence must equal the subject and the
/// predicate is concluded; with `side == 1` the other way around. A goal is
/// not detached across a sequence pointing the wrong way, nor across an
/// atemporal equivalence. Directed conclusions move in time by the
/// statement's interval; concurrent ones happen when the sub-sentence does.
pub fn detachment<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    main: &Sentence,
    sub: &Sentence,
    side: usize,
) -> bool {
    let statement = main.content();
    let equivalence = statement.is(Connector::Equivalence);
    if !equivalence && !statement.is(Connector::Implication) {
        return false;
    }
    let Some((subject, predicate)) = statement.sides() else {
        return false;
    };
    if invalid_statement(subject, predicate) {
        return false;
    }
    let content = match side {
        0 if sub.content() == subject => predicate.clone(),
        1 if sub.content() == predicate => subject.clone(),
        _ => return false,
    };
    if let Some((s, p)) = content.sides() {
        if invalid_statement(s, p) {
            return false;
        }
    }
    let order = statement.order();
    if sub.is_goal()
        && ((equivalence && order == TemporalOrder::None)
            || (side == 0 && order == TemporalOrder::Forward)
            || (side == 1 && order == TemporalOrder::Backward))
    {
        return false;
    }
    let Some(belief_truth) = ctx.belief.as_ref().and_then(Sentence::truth) else {
        return false;
    };
    let task = ctx.task.sentence().clone();
    let mut occurrence = ctx.new_stamp.as_ref().and_then(|stamp| stamp.occurrence());
    if order == TemporalOrder::Concurrent && !task.is_goal() && !task.is_quest() {
        occurrence = sub.occurrence().or(occurrence);
    }
    if order.is_directed() && !task.is_goal() && !task.is_quest() {
        let base = sub.occurrence().unwrap_or(ctx.time);
        let step = match statement.interval_len() {
            0 => ctx.config.duration,
            interval => i64::try_from(interval).unwrap_or(i64::MAX),
        };
        let step = if order == TemporalOrder::Forward { step } else { -step };
        occurrence = Some(if side == 0 { base + step } else { base - step });
    }
    let k = ctx.horizon();
    let (truth, budget) = if task.is_question() {
        let budget = if equivalence || side == 1 {
            ctx.backward(belief_truth)
        } else {
            ctx.backward_weak(belief_truth)
        };
        (None, budget)
    } else if task.is_quest() {
        let budget = if equivalence || side == 1 {
            ctx.backward_weak(belief_truth)
        } else {
            ctx.backward(belief_truth)
        };
        (None, budget)
    } else {
        let (Some(t1), Some(t2)) = (main.truth(), sub.truth()) else {
            return false;
        };
        let truth = match (task.is_goal(), equivalence, side) {
            (true, true, _) => desire_strong(t1, t2),
            (true, false, 0) => desire_ind(t1, t2, k),
            (true, false, _) => desire_ded(t1, t2),
            (false, true, _) => analogy_truth(t2, t1),
            (false, false, 0) => deduction(t1, t2),
            (false, false, _) => abduction(t2, t1, k),
        };
        (Some(truth), ctx.forward(truth))
    };
    ctx.double_premise_task_at(content, truth, budget, occurrence);
    true
}

struct Elimination {
    premise1: Term,
    premise2: Term,
    index: usize,
}

/// Lines up conjunct `index` of `premise1`'s antecedent with the common
/// component of `premise2`, unifying dependent variables when they are not
/// already equal.
fn align_condition(
    premise1: &Term,
    index: usize,
    premise2: &Term,
    side: Option<usize>,
) -> Option<Elimination> {
    let common = common_component(premise2, side)?;
    let condition = premise1.subject()?;
    if !condition.is(Connector::Conjunction) {
        return None;
    }
    if let Some(found) = condition.components().iter().position(|c| c == common) {
        return Some(Elimination {
            premise1: premise1.clone(),
            premise2: premise2.clone(),
            index: found,
        });
    }
    let conjunct = condition.component(index)?;
    let unified = unify(VarKind::Dependent, conjunct, common, premise1, premise2).or_else(|| {
        if common.connector() != condition.connector() {
            return None;
        }
        let inner = common.component(index)?;
        unify(VarKind::Dependent, conjunct, inner, premise1, premise2)
    })?;
    Some(Elimination {
        premise1: unified.0,
        premise2: unified.1,
        index,
    })
}

fn common_component(premise2: &Term, side: Option<usize>) -> Option<&Term> {
    match side {
        Some(0) => premise2.subject(),
        Some(_) => premise2.predicate(),
        None => Some(premise2),
    }
}

fn new_component(premise2: &Term, side: Option<usize>) -> Option<Term> {
    match side {
        Some(0) => premise2.predicate().cloned(),
        Some(_) => premise2.subject().cloned(),
        None => None,
    }
}

/// Forward antecedents only give up their first conjunct, and only to a
/// premise whose own order does not run against the sequence.
fn sequence_allows(condition: &Term, index: usize, premise2: &Term, side: Option<usize>) -> bool {
    if condition.order() != TemporalOrder::Forward {
        return true;
    }
    if index > 0 {
        return false;
    }
    !matches!(
        (side, premise2.order()),
        (Some(0), TemporalOrder::Forward) | (Some(1), TemporalOrder::Backward)
    )
}

/// Antecedent after the common conjunct was replaced (or removed).
fn reduced_condition(elimination: &Elimination, side: Option<usize>) -> Option<Option<Term>> {
    let condition = elimination.premise1.subject()?;
    let common = common_component(&elimination.premise2, side)?;
    if condition == common {
        return Some(None);
    }
    let replacement = new_component(&elimination.premise2, side);
    make::set_component(condition, elimination.index, replacement).map(Some)
}

/// `{<(&&, S1, S2) ==> P>, <M ==> S1>} |- <(&&, M, S2) ==> P>` and its
/// inductive and component-elimination variants.
///
/// `main` is the sentence holding the implication, `side` the position of
/// the shared conjunct in `premise2` (`None` when `premise2` is the conjunct
/// itself).
pub fn conditional_ded_ind<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    main: &Sentence,
    premise1: &Term,
    index: usize,
    premise2: &Term,
    side: Option<usize>,
) {
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let task = ctx.task.sentence().clone();
    let deduction_mode = side != Some(0);
    let conditional_task = has_substitute(VarKind::Independent, premise2, belief.content());
    let Some(elimination) = align_condition(premise1, index, premise2, side) else {
        return;
    };
    let Some(condition) = elimination.premise1.subject() else {
        return;
    };
    if !sequence_allows(condition, elimination.index, &elimination.premise2, side) {
        return;
    }
    let Some(new_condition) = reduced_condition(&elimination, side) else {
        return;
    };
    let Some(consequent) = elimination.premise1.predicate().cloned() else {
        return;
    };
    let content = match new_condition {
        Some(condition) => make::implication(
            condition,
            consequent,
            elimination.premise1.order(),
        ),
        None => Some(consequent),
    };
    let Some(content) = content else {
        return;
    };
    let Some(t2) = belief.truth() else {
        return;
    };
    let k = ctx.horizon();
    let (truth, budget) = if task.is_question_like() {
        (None, ctx.backward_weak(t2))
    } else {
        let Some(t1) = main.truth() else {
            return;
        };
        let truth = match (task.is_goal(), conditional_task, deduction_mode) {
            (true, true, _) => desire_weak(t1, t2, k),
            (true, false, true) => desire_ind(t1, t2, k),
            (true, false, false) => desire_ded(t1, t2),
            (false, _, true) => deduction(t1, t2),
            (false, true, false) => induction(t2, t1, k),
            (false, false, false) => induction(t1, t2, k),
        };
        (Some(truth), ctx.forward(truth))
    };
    ctx.double_premise_task(content, truth, budget);
}

/// `{<(&&, S1, S2) <=> P>, <M <=> S1>} |- <(&&, M, S2) <=> P>` and its
/// component-elimination variant.
///
/// Truth is comparison when the belief depends on the unified variable,
/// analogy otherwise.
pub fn conditional_ana<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    premise1: &Term,
    index: usize,
    premise2: &Term,
    side: Option<usize>,
) {
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let task = ctx.task.sentence().clone();
    let conditional_task = has_substitute(VarKind::Independent, premise2, belief.content());
    let Some(elimination) = align_condition(premise1, index, premise2, side) else {
        return;
    };
    let Some(condition) = elimination.premise1.subject() else {
        return;
    };
    if !sequence_allows(condition, elimination.index, &elimination.premise2, side) {
        return;
    }
    let Some(new_condition) = reduced_condition(&elimination, side) else {
        return;
    };
    let Some(consequent) = elimination.premise1.predicate().cloned() else {
        return;
    };
    let content = match new_condition {
        Some(condition) => make::equivalence(condition, consequent, elimination.premise1.order()),
        None => Some(consequent),
    };
    let Some(content) = content else {
        return;
    };
    let Some(t2) = belief.truth() else {
        return;
    };
    let k = ctx.horizon();
    let (truth, budget) = if task.is_question_like() {
        (None, ctx.backward_weak(t2))
    } else {
        let Some(t1) = task.truth() else {
            return;
        };
        let truth = match (task.is_goal(), conditional_task) {
            (true, true) => desire_weak(t1, t2, k),
            (true, false) => desire_ded(t1, t2),
            (false, true) => comparison(t1, t2, k),
            (false, false) => analogy_truth(t1, t2),
        };
        (Some(truth), ctx.forward(truth))
    };
    ctx.double_premise_task(content, truth, budget);
}

/// `{<(&&, S2, S3) ==> P>, <(&&, S1, S3) ==> P>} |- <S1 ==> S2>`
///
/// Each conjunctive condition loses the components it shares with the
/// other. Returns whether at least one side could be reduced.
pub fn conditional_abd<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    cond1: &Term,
    cond2: &Term,
    st1: &Term,
    st2: &Term,
) -> bool {
    if !st1.is(Connector::Implication) || !st2.is(Connector::Implication) {
        return false;
    }
    if !cond1.is(Connector::Conjunction) && !cond2.is(Connector::Conjunction) {
        return false;
    }
    if st1.order() != st2.order() {
        return false;
    }
    let term1 = cond1
        .is(Connector::Conjunction)
        .then(|| make::reduce_components(cond1, cond2))
        .flatten();
    let term2 = cond2
        .is(Connector::Conjunction)
        .then(|| make::reduce_components(cond2, cond1))
        .flatten();
    if term1.is_none() && term2.is_none() {
        return false;
    }
    let Some(belief) = ctx.belief.clone() else {
        return false;
    };
    let Some(v2) = belief.truth() else {
        return false;
    };
    let sentence = ctx.task.sentence().clone();
    let k = ctx.horizon();
    if let Some(t1) = &term1 {
        let content = match &term2 {
            Some(t2) => make::statement_like(st2, t2.clone(), t1.clone(), st2.order()),
            None => Some(t1.clone()),
        };
        let conclusion = if sentence.is_question_like() {
            Some((None, ctx.backward_weak(v2)))
        } else {
            sentence.truth().map(|v1| {
                let truth = if sentence.is_goal() {
                    desire_strong(v1, v2)
                } else {
                    abduction(v2, v1, k)
                };
                (Some(truth), ctx.forward(truth))
            })
        };
        if let (Some(content), Some((truth, budget))) = (content, conclusion) {
            ctx.double_premise_task(content, truth, budget);
        }
    }
    if let Some(t2) = &term2 {
        let content = match &term1 {
            Some(t1) => make::statement_like(st1, t1.clone(), t2.clone(), st1.order()),
            None => Some(t2.clone()),
        };
        let conclusion = if sentence.is_question_like() {
            Some((None, ctx.backward_weak(v2)))
        } else {
            sentence.truth().map(|v1| {
                let truth = if sentence.is_goal() {
                    desire_weak(v1, v2, k)
                } else {
                    abduction(v1, v2, k)
                };
                (Some(truth), ctx.forward(truth))
            })
        };
        if let (Some(content), Some((truth, budget))) = (content, conclusion) {
            ctx.double_premise_task(content, truth, budget);
        }
    }
    true
}

/// `{(&&, <#x --> S>, <#x --> P>), <M --> P>} |- <M --> S>`
///
/// The conjunct that unifies with `component` on dependent variables is
/// dropped. Sequences are left alone.
pub fn elimi_var_dep<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    component: &Term,
    compound_task: bool,
) {
    if compound.order() == TemporalOrder::Forward {
        return;
    }
    let Some((unifier, matched)) = compound.components().iter().find_map(|t| {
        unifier_for(VarKind::Dependent, t, component).map(|unifier| (unifier, t.clone()))
    }) else {
        return;
    };
    let Some(compound) = compound.apply_substitute(&unifier.first) else {
        return;
    };
    let Some(matched) = matched.apply_substitute(&unifier.first) else {
        return;
    };
    let Some(content) = make::reduce_components(&compound, &matched) else {
        return;
    };
    if let Some((s, p)) = content.sides() {
        if invalid_statement(s, p) {
            return;
        }
    }
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let Some(v2) = belief.truth() else {
        return;
    };
    let sentence = ctx.task.sentence().clone();
    let k = ctx.horizon();
    let (truth, budget) = if sentence.is_question_like() {
        let budget = if compound_task {
            ctx.backward(v2)
        } else {
            ctx.backward_weak(v2)
        };
        (None, budget)
    } else {
        let Some(v1) = sentence.truth() else {
            return;
        };
        let truth = match (sentence.is_goal(), compound_task) {
            (true, true) => desire_ded(v1, v2),
            (true, false) => desire_ind(v1, v2, k),
            (false, true) => anonymous_analogy(v1, v2, k),
            (false, false) => anonymous_analogy(v2, v1, k),
        };
        (Some(truth), ctx.compound_forward(truth, &content))
    };
    ctx.double_premise_task(content, truth, budget);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calculus::budget::truth_to_quality,
        config::ReasonerConfig,
        entity::{Punctuation, Stamp, Task},
        memory::SimpleMemory,
    };

    fn w(name: &str) -> Term {
        Term::word(name)
    }

    fn inh(s: &str, p: &str) -> Term {
        make::inheritance(w(s), w(p)).unwrap()
    }

    fn judgment(content: Term, serial: u64) -> Sentence {
        Sentence::new(
            content,
            Punctuation::Judgment,
            Some(TruthValue::new(1.0, 0.9)),
            Stamp::new(serial, 0, None),
        )
    }

    fn run<F>(task: Sentence, belief: Sentence, rule: F) -> Vec<Task>
    where
        F: FnOnce(&mut DerivationContext<'_, SimpleMemory>, &Sentence, &Sentence),
    {
        let config = ReasonerConfig::default();
        let mut memory = SimpleMemory::new(config.clone());
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        let stamp = Stamp::merge(task.stamp(), belief.stamp(), 0, config.max_evidential_base);
        let input = Task::input(task.clone(), budget, config.novelty_capacity);
        let mut ctx = DerivationContext::new(&mut memory, &config, input, w("m"), budget);
        ctx.belief = Some(belief.clone());
        ctx.new_stamp = Some(stamp);
        rule(&mut ctx, &task, &belief);
        memory.drain_derived()
    }

    #[test]
    fn deduction_and_exemplification() {
        let task = judgment(inh("robin", "bird"), 1);
        let belief = judgment(inh("bird", "animal"), 2);
        let derived = run(task, belief, |ctx, t, b| {
            ded_exe(ctx, &w("robin"), &w("animal"), t, b);
        });
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].content(), &inh("robin", "animal"));
        let truth = derived[0].sentence().truth().unwrap();
        assert!(truth.approx_eq(TruthValue::new(1.0, 0.81), 1e-5));
        assert_eq!(derived[1].content(), &inh("animal", "robin"));
    }

    #[test]
    fn quests_get_the_full_backward_budget() {
        let asked = |punctuation| {
            let task = Sentence::new(
                inh("robin", "bird"),
                punctuation,
                None,
                Stamp::new(1, 0, None),
            );
            let belief = judgment(inh("bird", "animal"), 2);
            run(task, belief, |ctx, t, b| {
                ded_exe(ctx, &w("robin"), &w("animal"), t, b);
            })
        };
        let questions = asked(Punctuation::Question);
        let quests = asked(Punctuation::Quest);
        assert_eq!(quests.len(), 2);
        assert_eq!(questions.len(), 2);
        let expected = truth_to_quality(TruthValue::new(1.0, 0.9));
        for (quest, question) in quests.iter().zip(&questions) {
            assert!(quest.sentence().is_quest());
            assert!((quest.budget().quality() - expected).abs() < 1e-5);
            assert!(question.budget().quality() < quest.budget().quality());
        }
    }

    #[test]
    fn abduction_refuses_mixed_variable_scope() {
        let task = judgment(inh("swan", "bird"), 1);
        let belief = judgment(inh("swan", "swimmer"), 2);
        let derived = run(task, belief, |ctx, t, b| {
            abd_ind_com(ctx, &w("swimmer"), &Term::var(VarKind::Independent, "1"), t, b);
        });
        assert!(derived.is_empty());
    }

    #[test]
    fn abduction_yields_three_conclusions() {
        let task = judgment(inh("swan", "bird"), 1);
        let belief = judgment(inh("swan", "swimmer"), 2);
        let derived = run(task, belief, |ctx, t, b| {
            abd_ind_com(ctx, &w("swimmer"), &w("bird"), t, b);
        });
        let names: Vec<&str> = derived.iter().map(|d| d.content().name()).collect();
        assert_eq!(
            names,
            vec!["<swimmer --> bird>", "<bird --> swimmer>", "<bird <-> swimmer>"]
        );
    }

    #[test]
    fn detachment_concludes_the_predicate() {
        let condition = inh("sky", "cloudy");
        let consequent = inh("street", "wet");
        let rule = make::implication(condition.clone(), consequent.clone(), TemporalOrder::None)
            .unwrap();
        let derived = run(judgment(rule, 1), judgment(condition, 2), |ctx, t, b| {
            assert!(detachment(ctx, t, b, 0));
        });
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].content(), &consequent);
        let truth = derived[0].sentence().truth().unwrap();
        assert!(truth.approx_eq(TruthValue::new(1.0, 0.81), 1e-5));
    }

    #[test]
    fn concurrent_detachment_happens_with_the_condition() {
        let condition = inh("light", "red");
        let consequent = inh("car", "stopped");
        let rule = make::implication(
            condition.clone(),
            consequent.clone(),
            TemporalOrder::Concurrent,
        )
        .unwrap();
        let main = Sentence::new(
            rule,
            Punctuation::Judgment,
            Some(TruthValue::new(1.0, 0.9)),
            Stamp::new(1, 0, Some(2)),
        );
        let sub = Sentence::new(
            condition,
            Punctuation::Judgment,
            Some(TruthValue::new(1.0, 0.9)),
            Stamp::new(2, 0, Some(7)),
        );
        let derived = run(main, sub, |ctx, t, b| {
            assert!(detachment(ctx, t, b, 0));
        });
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].content(), &consequent);
        assert_eq!(derived[0].sentence().occurrence(), Some(7));
    }

    #[test]
    fn detachment_refuses_self_reference() {
        let s = inh("a", "b");
        let contained = Term::compound_raw(
            Connector::Implication,
            vec![make::negation(s.clone()).unwrap(), s.clone()],
            TemporalOrder::None,
            0,
            0,
        );
        let sub = make::negation(s).unwrap();
        let derived = run(judgment(contained, 1), judgment(sub, 2), |ctx, t, b| {
            assert!(!detachment(ctx, t, b, 0));
        });
        assert!(derived.is_empty());
    }

    #[test]
    fn goals_do_not_detach_forward_from_the_subject() {
        let a = inh("door", "open");
        let b = inh("room", "bright");
        let rule = make::implication(a.clone(), b, TemporalOrder::Forward).unwrap();
        let goal = Sentence::new(
            a,
            Punctuation::Goal,
            Some(TruthValue::default()),
            Stamp::new(2, 0, None),
        );
        let derived = run(goal, judgment(rule, 1), |ctx, t, b| {
            assert!(!detachment(ctx, b, t, 0));
        });
        assert!(derived.is_empty());
    }

    #[test]
    fn sequences_keep_their_dependent_conjuncts() {
        let dep = Term::var(VarKind::Dependent, "x");
        let sequence = make::conjunction(
            make::inheritance(dep.clone(), w("key")).unwrap(),
            make::inheritance(dep, w("lock")).unwrap(),
            TemporalOrder::Forward,
        )
        .unwrap();
        let belief = judgment(inh("k1", "key"), 2);
        let derived = run(judgment(sequence.clone(), 1), belief, |ctx, _, b| {
            elimi_var_dep(ctx, &sequence, b.content(), true);
        });
        assert!(derived.is_empty());
    }

    #[test]
    fn dependent_conjunct_is_eliminated() {
        let dep = Term::var(VarKind::Dependent, "x");
        let conjunction = make::conjunction(
            make::inheritance(dep.clone(), w("key")).unwrap(),
            make::inheritance(dep, w("lock")).unwrap(),
            TemporalOrder::None,
        )
        .unwrap();
        let belief = judgment(inh("k1", "key"), 2);
        let derived = run(judgment(conjunction.clone(), 1), belief, |ctx, _, b| {
            elimi_var_dep(ctx, &conjunction, b.content(), true);
        });
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].content(), &inh("k1", "lock"));
    }

    #[test]
    fn conditional_deduction_drops_the_matched_conjunct() {
        let a = inh("a", "x");
        let b = inh("b", "x");
        let c = inh("c", "y");
        let condition = make::conjunction(a.clone(), b.clone(), TemporalOrder::None).unwrap();
        let rule = make::implication(condition, c.clone(), TemporalOrder::None).unwrap();
        let derived = run(judgment(rule.clone(), 1), judgment(a.clone(), 2), |ctx, t, _| {
            let index = rule.subject().unwrap().components().iter().position(|x| x == &a).unwrap();
            conditional_ded_ind(ctx, t, &rule, index, &a, None);
        });
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].content(), &make::implication(b, c, TemporalOrder::None).unwrap());
    }

    #[test]
    fn conditional_abduction_needs_a_reduction() {
        let a = inh("a", "x");
        let b = inh("b", "x");
        let c = inh("c", "y");
        let p = inh("p", "q");
        let ab = make::conjunction(a.clone(), b, TemporalOrder::None).unwrap();
        let ac = make::conjunction(a, c, TemporalOrder::None).unwrap();
        let st1 = make::implication(ab.clone(), p.clone(), TemporalOrder::None).unwrap();
        let st2 = make::implication(ac.clone(), p, TemporalOrder::None).unwrap();
        let derived = run(judgment(st1.clone(), 1), judgment(st2.clone(), 2), |ctx, _, _| {
            assert!(conditional_abd(ctx, &ab, &ac, &st1, &st2));
        });
        assert_eq!(derived.len(), 2);
    }
}
