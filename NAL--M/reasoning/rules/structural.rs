//! Single-premise rules that rewrite a statement through the structure of
//! one of its compounds.

use crate::{
    calculus::truth::{contraposition as contraposition_truth, deduction_reliance, negation},
    context::DerivationContext,
    entity::{BudgetValue, Punctuation, Sentence, TruthValue},
    memory::Memory,
    temporal::TemporalOrder,
    term::{make, Connector, Term, VarKind},
};

/// Differences swap the direction of their second component, images of
/// every component other than the relation.
fn switch_order(compound: &Term, index: usize) -> bool {
    match compound.connector() {
        Some(Connector::ExtDifference | Connector::IntDifference) => index == 1,
        Some(Connector::ExtImage | Connector::IntImage) => index != compound.relation_index(),
        _ => false,
    }
}

fn single_budget<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    truth: Option<TruthValue>,
    content: &Term,
) -> BudgetValue {
    match truth {
        Some(truth) if !ctx.task.sentence().is_question_like() => {
            ctx.compound_forward(truth, content)
        }
        _ => ctx.compound_backward(content),
    }
}

/// Same copula as the task, new sides.
fn structural_statement<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    subject: Term,
    predicate: Term,
    order: TemporalOrder,
    truth: TruthValue,
) {
    let old = ctx.task_content().clone();
    if !old.is_statement() {
        return;
    }
    if let Some(content) = make::statement_like(&old, subject, predicate, order) {
        let budget = ctx.compound_forward(truth, &content);
        ctx.single_premise(content, Some(truth), budget);
    }
}

/// `<S --> P> |- <(S & M) --> P>` and the other one-sided compositions.
///
/// `compound` is the concept's compound containing a side of `statement` at
/// `index`. Judgments only.
pub fn structural_compose1<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    index: usize,
    statement: &Term,
) {
    let sentence = ctx.task.sentence().clone();
    if !sentence.is_judgment() {
        return;
    }
    let (Some(component), Some((subject, predicate)), Some(truth)) =
        (compound.component(index), statement.sides(), sentence.truth())
    else {
        return;
    };
    let order = sentence.temporal_order();
    let truth_ded = deduction_reliance(truth, ctx.config.reliance);
    let truth_n_ded = negation(truth_ded);
    let connector = compound.connector();
    if component == subject {
        let truth = match connector {
            Some(Connector::ExtIntersection) => Some(truth_ded),
            Some(Connector::ExtDifference) if index == 0 => Some(truth_ded),
            Some(Connector::IntDifference) if index == 1 => Some(truth_n_ded),
            _ => None,
        };
        if let Some(truth) = truth {
            structural_statement(ctx, compound.clone(), predicate.clone(), order, truth);
        }
    } else if component == predicate {
        let truth = match connector {
            Some(Connector::IntIntersection) => Some(truth_ded),
            Some(Connector::ExtDifference) if index == 1 => Some(truth_n_ded),
            Some(Connector::IntDifference) if index == 0 => Some(truth_ded),
            _ => None,
        };
        if let Some(truth) = truth {
            structural_statement(ctx, subject.clone(), compound.clone(), order, truth);
        }
    }
}

/// `<S --> P> |- <(S & M) --> (P & M)>`
///
/// Puts the other side of `statement` in place of the shared component.
pub fn structural_compose2<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
) {
    let Some((subject, predicate)) = statement.sides() else {
        return;
    };
    if statement.component(side) == Some(compound) {
        return;
    }
    let components = compound.components();
    let (sub, pred) = if side == 0 {
        if components.contains(predicate) || !components.contains(subject) {
            return;
        }
        let Some(pred) = make::set_component(compound, index, Some(predicate.clone())) else {
            return;
        };
        (compound.clone(), pred)
    } else {
        if components.contains(subject) || !components.contains(predicate) {
            return;
        }
        let Some(sub) = make::set_component(compound, index, Some(subject.clone())) else {
            return;
        };
        (sub, compound.clone())
    };
    let order = statement.order();
    let content = if switch_order(compound, index) {
        make::statement_like(statement, pred, sub, order.reverse())
    } else {
        make::statement_like(statement, sub, pred, order)
    };
    let Some(content) = content else {
        return;
    };
    let Some(truth) = ctx.task.sentence().truth() else {
        return;
    };
    let truth = deduction_reliance(truth, ctx.config.reliance);
    let budget = ctx.compound_forward(truth, &content);
    ctx.single_premise(content, Some(truth), budget);
}

/// `<(S & M) --> P> |- <S --> P>` and the other one-sided decompositions.
pub fn structural_decompose1<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    index: usize,
    statement: &Term,
) {
    let sentence = ctx.task.sentence().clone();
    let (Some(component), Some((subject, predicate)), Some(truth)) =
        (compound.component(index), statement.sides(), sentence.truth())
    else {
        return;
    };
    let order = sentence.temporal_order();
    let truth_ded = deduction_reliance(truth, ctx.config.reliance);
    let truth_n_ded = negation(truth_ded);
    let connector = compound.connector();
    let multiple = compound.size() > 1;
    if compound == subject {
        let derived = match connector {
            Some(Connector::IntIntersection) => Some((component.clone(), truth_ded)),
            Some(Connector::ExtSet) if multiple => {
                make::ext_set(vec![component.clone()]).map(|set| (set, truth_ded))
            }
            Some(Connector::IntDifference) if index == 0 => Some((component.clone(), truth_ded)),
            Some(Connector::IntDifference) => Some((component.clone(), truth_n_ded)),
            _ => None,
        };
        if let Some((new_subject, truth)) = derived {
            structural_statement(ctx, new_subject, predicate.clone(), order, truth);
        }
    } else if compound == predicate {
        let derived = match connector {
            Some(Connector::ExtIntersection) => Some((component.clone(), truth_ded)),
            Some(Connector::IntSet) if multiple => {
                make::int_set(vec![component.clone()]).map(|set| (set, truth_ded))
            }
            Some(Connector::ExtDifference) if index == 0 => Some((component.clone(), truth_ded)),
            Some(Connector::ExtDifference) => Some((component.clone(), truth_n_ded)),
            _ => None,
        };
        if let Some((new_predicate, truth)) = derived {
            structural_statement(ctx, subject.clone(), new_predicate, order, truth);
        }
    }
}

/// `<(*, S, M) --> (*, P, M)> |- <S --> P>`
///
/// Both sides must be products, or images with the same relation slot.
pub fn structural_decompose2<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    statement: &Term,
    index: usize,
) {
    let Some((subject, predicate)) = statement.sides() else {
        return;
    };
    let aligned = match subject.connector() {
        Some(Connector::Product) => true,
        Some(Connector::ExtImage | Connector::IntImage) => {
            subject.relation_index() == predicate.relation_index()
        }
        _ => false,
    };
    if !aligned || subject.connector() != predicate.connector() || subject.size() != predicate.size()
    {
        return;
    }
    let (Some(t1), Some(t2)) = (subject.component(index), predicate.component(index)) else {
        return;
    };
    let order = statement.order();
    let content = if switch_order(subject, index) {
        make::statement_like(statement, t2.clone(), t1.clone(), order.reverse())
    } else {
        make::statement_like(statement, t1.clone(), t2.clone(), order)
    };
    let Some(content) = content else {
        return;
    };
    let truth = ctx.task.sentence().truth();
    let budget = single_budget(ctx, truth, &content);
    ctx.single_premise(content, truth, budget);
}

/// `<{S} --> P> |- <S <-> P>`-style relations between singleton sets and
/// their member.
pub fn transform_set_relation<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    statement: &Term,
    side: usize,
) {
    if compound.size() > 1 {
        return;
    }
    let Some((subject, predicate)) = statement.sides() else {
        return;
    };
    let reversed = (compound.is(Connector::ExtSet) && side == 0)
        || (compound.is(Connector::IntSet) && side == 1);
    let content = if statement.is(Connector::Inheritance) {
        if reversed {
            return;
        }
        make::similarity(subject.clone(), predicate.clone())
    } else if reversed {
        make::inheritance(predicate.clone(), subject.clone())
    } else {
        make::inheritance(subject.clone(), predicate.clone())
    };
    let Some(content) = content else {
        return;
    };
    let truth = ctx.task.sentence().truth();
    let budget = single_budget(ctx, truth, &content);
    ctx.single_premise(content, truth, budget);
}

fn product_from_image(image: &Term, component: &Term, index: usize) -> Option<Term> {
    let mut args = image.components().to_vec();
    *args.get_mut(index)? = component.clone();
    make::product(args)
}

/// Product/image transform of the inheritance `inh` found inside
/// `old_content` at `indices`, e.g. `<(*, a, b) --> R> |- <a --> (/, R, _, b)>`.
///
/// The transformed inheritance is put back into the enclosing statement or
/// conjunction.
pub fn transform_product_image<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    inh: &Term,
    old_content: &Term,
    indices: &[usize],
) {
    let Some((subject, predicate)) = inh.sides() else {
        return;
    };
    if indices.len() < 2 {
        return;
    }
    let index = indices[indices.len() - 1];
    let side = indices[indices.len() - 2];
    if inh == old_content {
        if subject.is_compound() {
            transform_subject_pi(ctx, subject, predicate);
        }
        if predicate.is_compound() {
            transform_predicate_pi(ctx, subject, predicate);
        }
        return;
    }
    let Some(comp) = inh.component(side) else {
        return;
    };
    let Some(relation_slot) = comp.component(index) else {
        return;
    };
    let sides = match (comp.connector(), side) {
        (Some(Connector::Product), 0) => {
            make::ext_image_from_product(comp, predicate, index).map(|p| (relation_slot.clone(), p))
        }
        (Some(Connector::Product), _) => {
            make::int_image_from_product(comp, subject, index).map(|s| (s, relation_slot.clone()))
        }
        (Some(Connector::ExtImage), 1) if index == comp.relation_index() => {
            product_from_image(comp, subject, index).map(|s| (s, relation_slot.clone()))
        }
        (Some(Connector::ExtImage), 1) => {
            make::ext_image_from_image(comp, subject, index).map(|p| (relation_slot.clone(), p))
        }
        (Some(Connector::IntImage), 0) if index == comp.relation_index() => {
            product_from_image(comp, predicate, index).map(|p| (relation_slot.clone(), p))
        }
        (Some(Connector::IntImage), 0) => {
            make::int_image_from_image(comp, predicate, index).map(|s| (s, relation_slot.clone()))
        }
        _ => None,
    };
    let Some(new_inh) = sides.and_then(|(s, p)| make::inheritance(s, p)) else {
        return;
    };
    let content = if indices.len() == 2 {
        Some(new_inh)
    } else if old_content.is_statement() && indices[0] == 1 {
        old_content.subject().and_then(|s| {
            make::statement_like(old_content, s.clone(), new_inh, old_content.order())
        })
    } else {
        replace_in_condition(old_content, indices, new_inh)
    };
    let Some(content) = content else {
        return;
    };
    let truth = ctx.task.sentence().truth();
    let budget = single_budget(ctx, truth, &content);
    ctx.single_premise(content, truth, budget);
}

fn replace_in_condition(old_content: &Term, indices: &[usize], new_inh: Term) -> Option<Term> {
    let conditional =
        old_content.is(Connector::Implication) || old_content.is(Connector::Equivalence);
    let condition = old_content.component(0)?;
    if conditional && condition.is(Connector::Conjunction) {
        let new_condition = make::set_component(condition, *indices.get(1)?, Some(new_inh))?;
        let predicate = old_content.predicate()?.clone();
        return make::statement_like(old_content, new_condition, predicate, old_content.order());
    }
    if old_content.is(Connector::Conjunction) {
        return make::set_component(old_content, indices[0], Some(new_inh));
    }
    if conditional {
        let mut sides = old_content.components().to_vec();
        *sides.get_mut(indices[0])? = new_inh;
        let predicate = sides.pop()?;
        let subject = sides.pop()?;
        return make::statement_like(old_content, subject, predicate, old_content.order());
    }
    None
}

fn emit_transformed<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    subject: Option<Term>,
    predicate: Option<Term>,
) {
    let (Some(subject), Some(predicate)) = (subject, predicate) else {
        return;
    };
    if subject.is_interval() || predicate.is_interval() {
        return;
    }
    let Some(inheritance) = make::inheritance(subject, predicate) else {
        return;
    };
    let truth = ctx.task.sentence().truth();
    let budget = single_budget(ctx, truth, &inheritance);
    ctx.single_premise(inheritance, truth, budget);
}

/// `<(*, a, b) --> R> |- <a --> (/, R, _, b)>` for every slot, and
/// `<(\, R, _, b) --> a> |- <R --> (*, a, b)>`.
fn transform_subject_pi<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    subject: &Term,
    predicate: &Term,
) {
    for i in 0..subject.size() {
        let (new_subject, new_predicate) = match subject.connector() {
            Some(Connector::Product) => (
                subject.component(i).cloned(),
                make::ext_image_from_product(subject, predicate, i),
            ),
            Some(Connector::IntImage) if i == subject.relation_index() => (
                subject.component(i).cloned(),
                product_from_image(subject, predicate, i),
            ),
            Some(Connector::IntImage) => (
                make::int_image_from_image(subject, predicate, i),
                subject.component(i).cloned(),
            ),
            _ => return,
        };
        emit_transformed(ctx, new_subject, new_predicate);
    }
}

/// `<R --> (*, a, b)> |- <(\, R, _, b) --> a>` for every slot, and
/// `<a --> (/, R, _, b)> |- <(*, a, b) --> R>`.
fn transform_predicate_pi<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    subject: &Term,
    predicate: &Term,
) {
    for i in 0..predicate.size() {
        let (new_subject, new_predicate) = match predicate.connector() {
            Some(Connector::Product) => (
                make::int_image_from_product(predicate, subject, i),
                predicate.component(i).cloned(),
            ),
            Some(Connector::ExtImage) if i == predicate.relation_index() => (
                product_from_image(predicate, subject, i),
                predicate.component(i).cloned(),
            ),
            Some(Connector::ExtImage) => (
                predicate.component(i).cloned(),
                make::ext_image_from_image(predicate, subject, i),
            ),
            _ => return,
        };
        emit_transformed(ctx, new_subject, new_predicate);
    }
}

/// `A |- (--, A)` with negated truth.
pub fn transform_negation<M: Memory + ?Sized>(ctx: &mut DerivationContext<'_, M>, content: &Term) {
    let sentence = ctx.task.sentence().clone();
    let (truth, budget) = match sentence.truth() {
        Some(truth) if !sentence.is_question_like() => {
            let truth = negation(truth);
            (Some(truth), ctx.compound_forward(truth, content))
        }
        _ => (None, ctx.compound_backward(content)),
    };
    ctx.single_premise(content.clone(), truth, budget);
}

/// `<A ==> B> |- <(--, B) ==> (--, A)>`
///
/// Questions stay questions; everything else concludes a judgment.
pub fn contraposition<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    statement: &Term,
    sentence: &Sentence,
) {
    let Some((subject, predicate)) = statement.sides() else {
        return;
    };
    let (Some(not_predicate), Some(not_subject)) = (
        make::negation(predicate.clone()),
        make::negation(subject.clone()),
    ) else {
        return;
    };
    let Some(content) =
        make::statement_like(statement, not_predicate, not_subject, statement.order().reverse())
    else {
        return;
    };
    let implication = content.is(Connector::Implication);
    if sentence.is_question_like() {
        let budget = if implication {
            ctx.compound_backward_weak(&content)
        } else {
            ctx.compound_backward(&content)
        };
        ctx.single_premise_task(content, Punctuation::Question, None, budget);
        return;
    }
    let Some(truth) = sentence.truth() else {
        return;
    };
    let truth = if implication {
        contraposition_truth(truth, ctx.horizon())
    } else {
        truth
    };
    let budget = ctx.compound_forward(truth, &content);
    ctx.single_premise_task(content, Punctuation::Judgment, Some(truth), budget);
}

/// `(&&, A, B) |- A` and `A |- (||, A, B)`, with the reverse directions
/// for questions and negated evidence.
pub fn structural_compound<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    component: &Term,
    compound_task: bool,
    index: usize,
) {
    if component.has_var_kind(VarKind::Independent) {
        return;
    }
    let conjunction = compound.is(Connector::Conjunction);
    if conjunction && compound.order() == TemporalOrder::Forward && index != 0 {
        return;
    }
    let content = if compound_task { component } else { compound }.clone();
    let sentence = ctx.task.sentence().clone();
    let (truth, budget) = match sentence.truth() {
        Some(truth) if !sentence.is_question_like() => {
            let reliance = ctx.config.reliance;
            let truth = if sentence.is_judgment() == (compound_task == conjunction) {
                deduction_reliance(truth, reliance)
            } else {
                negation(deduction_reliance(negation(truth), reliance))
            };
            (Some(truth), ctx.forward(truth))
        }
        _ => (None, ctx.compound_backward(&content)),
    };
    ctx.single_premise(content, truth, budget);
}
