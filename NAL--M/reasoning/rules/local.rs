//! Rules applied when a task meets a belief or goal on the same content:
//! revision, answering, and the conversions between asymmetric and
//! symmetric relations.

use crate::{
    calculus::{
        budget::solution_eval,
        truth::{
            abduction_reliance, conversion as conversion_truth, deduction_reliance, eternalize,
            intersection, reduce_conjunction, revision as revision_truth, temporal_projection,
        },
    },
    context::DerivationContext,
    entity::{BudgetValue, Punctuation, Sentence, Stamp, Task, TruthValue},
    memory::Memory,
    temporal::Figure,
    term::{make, variables::has_substitute, Connector, VarKind},
};

/// Pairs the current task with `belief`.
///
/// Judgments revise, questions and goals try the belief as an answer, and
/// goals also revise against a stored goal on the same content. Returns
/// whether a revision was derived.
pub fn match_belief<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    belief: &Sentence,
) -> bool {
    let sentence = ctx.task.sentence().clone();
    if sentence.is_judgment() {
        if revisible(&sentence, belief, ctx) {
            return revision(ctx, &sentence, belief, true);
        }
        return false;
    }
    let mut revised = false;
    if sentence.is_goal() {
        if let Some(goal) = ctx.memory.goal_for(sentence.content(), &ctx.task) {
            if revisible(&sentence, &goal, ctx) {
                revised = revision(ctx, &sentence, &goal, true);
            }
        }
    }
    if sentence.temporal_order().matches(belief.temporal_order())
        && has_substitute(VarKind::Query, sentence.content(), belief.content())
    {
        try_solution(ctx, belief);
    }
    revised
}

/// Whether `s1` and `s2` may be merged by revision.
///
/// Both must be revisable with the same content and matching orders, share
/// no evidence, and lie close enough on the time line when both are events.
pub fn revisible<M: Memory + ?Sized>(
    s1: &Sentence,
    s2: &Sentence,
    ctx: &DerivationContext<'_, M>,
) -> bool {
    if let (Some(o1), Some(o2)) = (s1.occurrence(), s2.occurrence()) {
        if (o1 - o2).abs() > ctx.config.revision_max_distance {
            return false;
        }
    }
    s1.revisible()
        && s2.revisible()
        && s1.punctuation() == s2.punctuation()
        && s1.temporal_order().matches(s2.temporal_order())
        && s1.content() == s2.content()
        && !s1.stamp().overlaps(s2.stamp())
}

/// Merges the evidence of `new` and `old`.
///
/// An event meeting an eternal sentence is eternalized first. Two events
/// at different times discount the old confidence by temporal projection
/// towards the new one. The merged sentence goes into its table and is also
/// derived as a task.
pub fn revision<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    new: &Sentence,
    old: &Sentence,
    feedback_to_links: bool,
) -> bool {
    let (Some(new_truth), Some(old_truth)) = (new.truth(), old.truth()) else {
        return false;
    };
    let k = ctx.horizon();
    let (new_truth, old_truth, occurrence) = match (new.occurrence(), old.occurrence()) {
        (None, None) => (new_truth, old_truth, None),
        (Some(_), None) => (eternalize(new_truth, k), old_truth, None),
        (None, Some(_)) => (new_truth, eternalize(old_truth, k), None),
        (Some(at_new), Some(at_old)) => {
            let factor = if at_new == at_old {
                1.0
            } else {
                temporal_projection(at_old, at_new, ctx.time, ctx.config.projection_decay)
            };
            let discounted = old_truth.with_confidence(old_truth.confidence() * factor);
            (new_truth, discounted, Some(at_new))
        }
    };
    let truth = revision_truth(new_truth, old_truth, k);
    let budget = ctx.revise(new_truth, old_truth, truth, feedback_to_links);
    if !budget.above_threshold(ctx.config.budget_threshold) {
        return false;
    }
    let interval = (new.content().interval_len() + old.content().interval_len()) / 2;
    let content = new.content().with_interval(interval);
    let mut stamp = Stamp::merge(
        new.stamp(),
        old.stamp(),
        ctx.time,
        ctx.config.max_evidential_base,
    );
    stamp.set_occurrence(occurrence);
    let revised = Sentence::new(content.clone(), new.punctuation(), Some(truth), stamp.clone());
    if revised.is_judgment() {
        ctx.memory.insert_belief(revised.clone());
    } else {
        let goal = Task::derived(
            revised.clone(),
            budget,
            Some(new.content().clone()),
            Some(old.clone()),
            ctx.config.novelty_capacity,
        );
        ctx.memory.insert_goal(goal);
    }
    if occurrence.is_some() {
        ctx.memory.anticipate(&revised);
    }
    let belief = Some(old.clone());
    ctx.derive(content, new.punctuation(), Some(truth), budget, stamp, belief)
}

/// Quality of `solution` as an answer to `problem`.
///
/// Zero when a query-variable candidate answers a different punctuation or
/// the orders do not match. Yes/no questions are rated by confidence,
/// "what" questions and goals by expectation over complexity.
#[allow(clippy::cast_precision_loss)]
pub fn solution_quality<M: Memory + ?Sized>(
    problem: &Sentence,
    solution: &Sentence,
    ctx: &DerivationContext<'_, M>,
) -> f32 {
    if (problem.punctuation() != solution.punctuation()
        && solution.content().has_var_kind(VarKind::Query))
        || !problem.temporal_order().matches(solution.temporal_order())
    {
        return 0.0;
    }
    let truth = if problem.occurrence() == solution.occurrence() {
        solution.truth()
    } else {
        solution.projection(problem.occurrence(), ctx.time, ctx.config)
    };
    let Some(truth) = truth else {
        return 0.0;
    };
    if problem.is_goal() || problem.content().has_var_kind(VarKind::Query) {
        truth.expectation() / solution.content().complexity() as f32
    } else {
        truth.confidence()
    }
}

/// Offers `belief` as an answer to the current task.
///
/// The task keeps only strict improvements. Input questions get the answer
/// reported; otherwise the solution is re-activated with a budget from
/// solution evaluation.
pub fn try_solution<M: Memory + ?Sized>(ctx: &mut DerivationContext<'_, M>, belief: &Sentence) -> bool {
    let problem = ctx.task.sentence().clone();
    let quality = solution_quality(&problem, belief, ctx);
    if let Some(old) = ctx.task.best_solution() {
        if solution_quality(&problem, old, ctx) >= quality {
            return false;
        }
    }
    ctx.task.set_best_solution(belief.clone());
    ctx.memory.solution_found(&ctx.task, belief);
    if ctx.task.is_input() && problem.is_question_like() {
        ctx.memory.report(belief, true);
        return true;
    }
    let Some(budget) = solution_eval(&problem, belief, quality, ctx.task.budget_mut()) else {
        return false;
    };
    if !budget.above_threshold(ctx.config.budget_threshold) {
        return false;
    }
    let activated = Task::derived(
        belief.clone(),
        budget,
        Some(problem.content().clone()),
        ctx.task.parent_belief().cloned(),
        ctx.config.novelty_capacity,
    );
    ctx.memory.activate(activated);
    true
}

/// `<S --> P>` meets `<P --> S>`: a judgment yields the symmetric relation,
/// a question is answered by conversion.
pub fn match_reverse<M: Memory + ?Sized>(ctx: &mut DerivationContext<'_, M>) {
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let sentence = ctx.task.sentence().clone();
    if !sentence
        .temporal_order()
        .matches(belief.temporal_order().reverse())
    {
        return;
    }
    if sentence.is_judgment() {
        infer_to_sym(ctx, &sentence, &belief);
    } else {
        conversion(ctx);
    }
}

/// `{<S --> P>, <P --> S>} |- <S <-> P>`
fn infer_to_sym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    judgment1: &Sentence,
    judgment2: &Sentence,
) {
    let s1 = judgment1.content();
    let Some((t1, t2)) = s1.sides() else {
        return;
    };
    let content = if s1.is(Connector::Inheritance) {
        make::similarity(t1.clone(), t2.clone())
    } else {
        make::equivalence(t1.clone(), t2.clone(), s1.order())
    };
    let (Some(content), Some(v1), Some(v2)) = (content, judgment1.truth(), judgment2.truth())
    else {
        return;
    };
    let truth = intersection(v1, v2);
    let budget = ctx.forward(truth);
    ctx.double_premise_task(content, Some(truth), budget);
}

/// `{<P --> S>} |- <S --> P>?` answered from the belief.
fn conversion<M: Memory + ?Sized>(ctx: &mut DerivationContext<'_, M>) {
    let Some(truth) = ctx.belief.as_ref().and_then(Sentence::truth) else {
        return;
    };
    let truth = conversion_truth(truth, ctx.horizon());
    let budget = ctx.forward(truth);
    converted_judgment(ctx, truth, budget);
}

/// An asymmetric and a symmetric relation over the same terms: judgments
/// yield the reversed asymmetric relation, questions are answered by
/// converting the belief.
pub fn match_asym_sym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    asym: &Sentence,
    sym: &Sentence,
    _figure: Figure,
) {
    if ctx.task.sentence().is_judgment() {
        infer_to_asym(ctx, asym, sym);
    } else {
        convert_relation(ctx);
    }
}

/// `{<S <-> P>, <P --> S>} |- <S --> P>`
fn infer_to_asym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    asym: &Sentence,
    sym: &Sentence,
) {
    let statement = asym.content();
    let Some((subject, predicate)) = statement.sides() else {
        return;
    };
    let Some(content) = make::statement_like(
        statement,
        predicate.clone(),
        subject.clone(),
        statement.order(),
    ) else {
        return;
    };
    let (Some(sym_truth), Some(asym_truth)) = (sym.truth(), asym.truth()) else {
        return;
    };
    let truth = reduce_conjunction(sym_truth, asym_truth);
    let budget = ctx.forward(truth);
    ctx.double_premise_task(content, Some(truth), budget);
}

/// `{<S --> P>} |- <S <-> P>?` and back, answered from the belief.
fn convert_relation<M: Memory + ?Sized>(ctx: &mut DerivationContext<'_, M>) {
    let Some(truth) = ctx.belief.as_ref().and_then(Sentence::truth) else {
        return;
    };
    let truth = if ctx.task.content().is_commutative() {
        abduction_reliance(truth, 1.0, ctx.horizon())
    } else {
        deduction_reliance(truth, 1.0)
    };
    let budget = ctx.forward(truth);
    converted_judgment(ctx, truth, budget);
}

/// Writes a converted belief as a judgment on the question's content,
/// filling a query variable with the matching side of the belief.
fn converted_judgment<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    truth: TruthValue,
    budget: BudgetValue,
) {
    let Some(belief) = ctx.belief.clone() else {
        return;
    };
    let task_content = ctx.task.content().clone();
    let (Some((subj_t, pred_t)), Some((subj_b, pred_b))) =
        (task_content.sides(), belief.content().sides())
    else {
        return;
    };
    let order = belief.content().order().reverse();
    let content = match (
        subj_t.has_var_kind(VarKind::Query),
        pred_t.has_var_kind(VarKind::Query),
    ) {
        (true, true) => return,
        (true, false) => {
            let other = if pred_t == subj_b { pred_b } else { subj_b };
            make::statement_like(&task_content, other.clone(), pred_t.clone(), order)
        }
        (false, true) => {
            let other = if subj_t == subj_b { pred_b } else { subj_b };
            make::statement_like(&task_content, subj_t.clone(), other.clone(), order)
        }
        (false, false) => Some(task_content.clone()),
    };
    if let Some(content) = content {
        ctx.single_premise_task(content, Punctuation::Judgment, Some(truth), budget);
    }
}
