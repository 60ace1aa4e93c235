//! Premise-pair dispatch.
//!
//! [`reason`] pairs the task of a task link with the belief behind a term
//! link and routes the pair by the two link types. Statement pairs sharing a
//! term go on to a second table keyed by copula pair and figure.

use crate::{
    config::ReasonerConfig,
    context::DerivationContext,
    entity::{LinkType, Sentence, Stamp, TaskLink, TermLink},
    memory::Memory,
    temporal::{figure, Figure},
    term::{
        variables::{has_substitute, unify},
        Connector, Term, VarKind,
    },
};

use super::{
    compositional::{compose_compound, decompose_statement, intro_var_inner, intro_var_outer},
    local::{match_asym_sym, match_belief, match_reverse},
    structural::{
        contraposition, structural_compose1, structural_compose2, structural_compound,
        structural_decompose1, structural_decompose2, transform_negation,
        transform_product_image, transform_set_relation,
    },
    syllogistic::{
        abd_ind_com, analogy, conditional_abd, conditional_ana, conditional_ded_ind, ded_exe,
        detachment, elimi_var_dep, resemblance,
    },
};

/// Runs one inference step on the task of `task_link` and the term behind
/// `term_link`, both taken from the concept named `concept`.
///
/// A revision of a judgment ends the step. Budgets adjusted by the rules and
/// the task's best solution are written back into the two links.
pub fn reason<M: Memory + ?Sized>(
    concept: &Term,
    task_link: &mut TaskLink,
    term_link: &mut TermLink,
    memory: &mut M,
    config: &ReasonerConfig,
) {
    let task = task_link.task().clone();
    let belief = memory.belief_for(term_link.target(), &task);
    let mut ctx =
        DerivationContext::new(memory, config, task, concept.clone(), task_link.budget());
    ctx.belief_link = Some((term_link.target().clone(), term_link.budget()));
    let mut settled = false;
    if let Some(belief) = belief {
        ctx.new_stamp = Some(Stamp::merge(
            ctx.task.sentence().stamp(),
            belief.stamp(),
            ctx.time,
            config.max_evidential_base,
        ));
        ctx.belief = Some(belief.clone());
        settled = match_belief(&mut ctx, &belief) && ctx.task.sentence().is_judgment();
    }
    if !settled {
        dispatch(&mut ctx, task_link, term_link);
    }
    let DerivationContext {
        task,
        task_link_budget,
        belief_link,
        ..
    } = ctx;
    *task_link.budget_mut() = task_link_budget;
    task_link.set_task(task);
    if let Some((_, budget)) = belief_link {
        *term_link.budget_mut() = budget;
    }
}

/// Single-premise product/image transform of the Inheritance that
/// `task_link` points into.
///
/// The Inheritance is the content itself for two-step paths, a component of
/// the content for three-step paths, and a conjunct of a conditional's
/// antecedent for four-step paths.
pub fn transform_task<M: Memory + ?Sized>(
    concept: &Term,
    task_link: &mut TaskLink,
    memory: &mut M,
    config: &ReasonerConfig,
) {
    let content = task_link.task().content().clone();
    let indices = task_link.indices().to_vec();
    let inh = if indices.len() == 2 || content.is(Connector::Inheritance) {
        Some(content.clone())
    } else if indices.len() == 3 {
        content.component(indices[0]).cloned()
    } else if indices.len() == 4 {
        content.component(indices[0]).and_then(|component| {
            let condition = component.is(Connector::Conjunction)
                && ((content.is(Connector::Implication) && indices[0] == 0)
                    || content.is(Connector::Equivalence));
            condition
                .then(|| component.component(indices[1]).cloned())
                .flatten()
        })
    } else {
        None
    };
    let Some(inh) = inh.filter(|t| t.is(Connector::Inheritance)) else {
        return;
    };
    let task = task_link.task().clone();
    let mut ctx =
        DerivationContext::new(memory, config, task, concept.clone(), task_link.budget());
    transform_product_image(&mut ctx, &inh, &content, &indices);
    *task_link.budget_mut() = ctx.task_link_budget;
    task_link.set_task(ctx.task);
}

fn resentence(sentence: &Sentence, content: Term) -> Sentence {
    Sentence::new(
        content,
        sentence.punctuation(),
        sentence.truth(),
        sentence.stamp().clone(),
    )
}

fn is_set(t: &Term) -> bool {
    matches!(t.connector(), Some(Connector::ExtSet | Connector::IntSet))
}

fn dispatch<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task_link: &TaskLink,
    term_link: &TermLink,
) {
    let task_sentence = ctx.task.sentence().clone();
    let task_term = task_sentence.content().clone();
    let belief = ctx.belief.clone();
    let belief_term = belief
        .as_ref()
        .map_or_else(|| term_link.target().clone(), |b| b.content().clone());
    let concept_term = ctx.term.clone();
    let (t_index, b_index) = (task_link.index(0), term_link.index(0));
    // Self links carry no path; conditional rules then match the whole term.
    let task_side = task_link.indices().first().copied();

    match (task_link.link_type(), term_link.link_type()) {
        (LinkType::SelfLink, LinkType::Component) => {
            compound_and_self(ctx, &task_term, &belief_term, true, b_index);
        }
        (LinkType::SelfLink, LinkType::Compound) => {
            compound_and_self(ctx, &belief_term, &task_term, false, b_index);
        }
        (LinkType::SelfLink, LinkType::ComponentStatement) => {
            if let Some(belief) = &belief {
                if task_term.is_statement() {
                    detachment(ctx, &task_sentence, belief, b_index);
                }
            }
        }
        (LinkType::SelfLink, LinkType::CompoundStatement) => {
            if let Some(belief) = &belief {
                detachment(ctx, belief, &task_sentence, b_index);
            }
        }
        (LinkType::SelfLink, LinkType::ComponentCondition) => {
            if belief.is_some() && task_term.is(Connector::Implication) {
                conditional_ded_ind(
                    ctx,
                    &task_sentence,
                    &task_term,
                    term_link.index(1),
                    &belief_term,
                    task_side,
                );
            }
        }
        (LinkType::SelfLink, LinkType::CompoundCondition) => {
            if let Some(belief) = &belief {
                if belief_term.is(Connector::Implication) {
                    conditional_ded_ind(
                        ctx,
                        belief,
                        &belief_term,
                        term_link.index(1),
                        &task_term,
                        task_side,
                    );
                }
            }
        }
        (LinkType::Compound, LinkType::Compound) => {
            compound_and_compound(ctx, &task_term, t_index, &belief_term, b_index);
        }
        (LinkType::Compound, LinkType::CompoundStatement) => {
            compound_and_statement(ctx, &task_term, t_index, &belief_term, b_index, &belief_term);
        }
        (LinkType::Compound, LinkType::CompoundCondition) => {
            let Some(belief) = &belief else {
                return;
            };
            if belief_term.is(Connector::Implication) {
                let unified = belief_term.subject().and_then(|condition| {
                    unify(
                        VarKind::Independent,
                        condition,
                        &task_term,
                        &belief_term,
                        &task_term,
                    )
                });
                match unified {
                    Some((main, sub)) => detachment_with_var(
                        ctx,
                        &resentence(belief, main),
                        &resentence(&task_sentence, sub),
                        b_index,
                    ),
                    None => conditional_ded_ind(
                        ctx,
                        belief,
                        &belief_term,
                        term_link.index(1),
                        &task_term,
                        None,
                    ),
                }
            } else if belief_term.is(Connector::Equivalence) {
                conditional_ana(ctx, &belief_term, term_link.index(1), &task_term, None);
            }
        }
        (LinkType::CompoundStatement, LinkType::Component) => {
            if task_term.is_statement() && concept_term.is_compound() {
                component_and_statement(ctx, &concept_term, b_index, &task_term, t_index);
            }
        }
        (LinkType::CompoundStatement, LinkType::Compound) => {
            compound_and_statement(ctx, &belief_term, b_index, &task_term, t_index, &belief_term);
        }
        (LinkType::CompoundStatement, LinkType::CompoundStatement) => {
            if let Some(belief) = &belief {
                syllogisms(ctx, &task_sentence, belief, t_index, b_index);
            }
        }
        (LinkType::CompoundStatement, LinkType::CompoundCondition) => {
            if let Some(belief) = &belief {
                if belief_term.is(Connector::Implication) && task_term.is_statement() {
                    conditional_ded_ind_with_var(
                        ctx,
                        belief,
                        &belief_term,
                        term_link.index(1),
                        &task_term,
                        t_index,
                    );
                }
            }
        }
        (LinkType::CompoundCondition, LinkType::Compound) => {
            if let Some(belief) = &belief {
                detachment_with_var(ctx, &task_sentence, belief, t_index);
            }
        }
        (LinkType::CompoundCondition, LinkType::CompoundStatement) => {
            if belief.is_none() || !task_term.is(Connector::Implication) {
                return;
            }
            let Some(subject) = task_term.subject().cloned() else {
                return;
            };
            if subject.is(Connector::Negation) {
                if task_sentence.is_judgment() {
                    component_and_statement(ctx, &subject, b_index, &task_term, t_index);
                } else {
                    component_and_statement(ctx, &subject, t_index, &belief_term, b_index);
                }
            } else {
                conditional_ded_ind_with_var(
                    ctx,
                    &task_sentence,
                    &task_term,
                    task_link.index(1),
                    &belief_term,
                    b_index,
                );
            }
        }
        _ => {}
    }
}

/// Statement pairs sharing a term, routed by copula pair.
fn syllogisms<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task: &Sentence,
    belief: &Sentence,
    t_index: usize,
    b_index: usize,
) {
    let (task_term, belief_term) = (task.content(), belief.content());
    match (task_term.connector(), belief_term.connector()) {
        (Some(Connector::Inheritance), Some(Connector::Inheritance))
        | (Some(Connector::Implication), Some(Connector::Implication)) => {
            asym_asym(ctx, task, belief, figure(b_index, t_index));
        }
        (Some(Connector::Inheritance), Some(Connector::Similarity))
        | (Some(Connector::Implication), Some(Connector::Equivalence)) => {
            asym_sym(ctx, task, belief, figure(t_index, b_index));
        }
        (Some(Connector::Similarity), Some(Connector::Inheritance))
        | (Some(Connector::Equivalence), Some(Connector::Implication)) => {
            asym_sym(ctx, belief, task, figure(b_index, t_index));
        }
        (Some(Connector::Similarity), Some(Connector::Similarity))
        | (Some(Connector::Equivalence), Some(Connector::Equivalence)) => {
            sym_sym(ctx, belief, task, figure(b_index, t_index));
        }
        (Some(Connector::Inheritance), _) => detachment_with_var(ctx, belief, task, b_index),
        (Some(Connector::Implication | Connector::Equivalence), Some(Connector::Inheritance)) => {
            detachment_with_var(ctx, task, belief, t_index);
        }
        _ => {}
    }
}

/// Sides of `statement` picked by `side` (0 = subject).
fn side_of(statement: &Term, side: usize) -> Option<&Term> {
    statement.component(side)
}

/// Both premises asymmetric; the tens digit of `figure` is the belief's
/// side of the shared term, the units digit the task's.
fn asym_asym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task: &Sentence,
    belief: &Sentence,
    figure: Figure,
) {
    let (belief_side, task_side) = (usize::from(figure / 10 - 1), usize::from(figure % 10 - 1));
    let (ts, bs) = (task.content(), belief.content());
    let (Some(shared_t), Some(shared_b)) = (side_of(ts, task_side), side_of(bs, belief_side))
    else {
        return;
    };
    let Some((ts, bs)) = unify(VarKind::Independent, shared_t, shared_b, ts, bs) else {
        return;
    };
    let (Some(other_t), Some(other_b)) = (side_of(&ts, 1 - task_side), side_of(&bs, 1 - belief_side))
    else {
        return;
    };
    let (other_t, other_b) = (other_t.clone(), other_b.clone());
    match figure {
        11 => {
            if ts == bs {
                return;
            }
            abd_ind_com(ctx, &other_b, &other_t, task, belief);
            compose_compound(ctx, &ts, &bs, 0);
            intro_var_outer(ctx, &ts, &bs, 0);
        }
        12 => {
            if has_substitute(VarKind::Query, &other_t, &other_b) {
                match_reverse(ctx);
            } else {
                ded_exe(ctx, &other_t, &other_b, task, belief);
            }
        }
        21 => {
            if has_substitute(VarKind::Query, &other_b, &other_t) {
                match_reverse(ctx);
            } else {
                ded_exe(ctx, &other_b, &other_t, task, belief);
            }
        }
        22 => {
            if ts == bs {
                return;
            }
            if !conditional_abd(ctx, &other_t, &other_b, &ts, &bs) {
                abd_ind_com(ctx, &other_t, &other_b, task, belief);
                compose_compound(ctx, &ts, &bs, 1);
                intro_var_outer(ctx, &ts, &bs, 1);
            }
        }
        _ => {}
    }
}

/// One asymmetric and one symmetric premise; the tens digit of `figure` is
/// the asymmetric premise's side of the shared term.
fn asym_sym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    asym: &Sentence,
    sym: &Sentence,
    figure: Figure,
) {
    let (asym_side, sym_side) = (usize::from(figure / 10 - 1), usize::from(figure % 10 - 1));
    let (a, s) = (asym.content(), sym.content());
    let (Some(shared_a), Some(shared_s)) = (side_of(a, asym_side), side_of(s, sym_side)) else {
        return;
    };
    let Some((a, s)) = unify(VarKind::Independent, shared_a, shared_s, a, s) else {
        return;
    };
    let (Some(t1), Some(t2)) = (side_of(&a, 1 - asym_side), side_of(&s, 1 - sym_side)) else {
        return;
    };
    let (t1, t2) = (t1.clone(), t2.clone());
    if has_substitute(VarKind::Query, &t1, &t2) {
        match_asym_sym(ctx, asym, sym, figure);
    } else if asym_side == 0 {
        analogy(ctx, &t2, &t1, asym, sym, figure);
    } else {
        analogy(ctx, &t1, &t2, asym, sym, figure);
    }
}

/// Both premises symmetric; the tens digit of `figure` is the belief's side.
fn sym_sym<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    belief: &Sentence,
    task: &Sentence,
    figure: Figure,
) {
    let (belief_side, task_side) = (usize::from(figure / 10 - 1), usize::from(figure % 10 - 1));
    let (s1, s2) = (belief.content(), task.content());
    let (Some(shared1), Some(shared2)) = (side_of(s1, belief_side), side_of(s2, task_side)) else {
        return;
    };
    let Some((s1, s2)) = unify(VarKind::Independent, shared1, shared2, s1, s2) else {
        return;
    };
    let (Some(t1), Some(t2)) = (side_of(&s1, 1 - belief_side), side_of(&s2, 1 - task_side)) else {
        return;
    };
    let (t1, t2) = (t1.clone(), t2.clone());
    resemblance(ctx, &t1, &t2, belief, task, figure);
}

/// A compound and one of its components, one of them the task.
fn compound_and_self<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    component: &Term,
    compound_task: bool,
    index: usize,
) {
    match compound.connector() {
        Some(Connector::Conjunction | Connector::Disjunction) => {
            if ctx.belief.is_some() {
                decompose_statement(ctx, compound, component, compound_task, index);
            } else if compound.contains_component(component) {
                structural_compound(ctx, compound, component, compound_task, index);
            }
        }
        Some(Connector::Negation) => {
            if !compound_task {
                transform_negation(ctx, compound);
            } else if let Some(inner) = compound.component(0).filter(|t| t.is_compound()) {
                transform_negation(ctx, inner);
            }
        }
        _ => {}
    }
}

/// Two compounds with the same connector; the larger one is the compound.
fn compound_and_compound<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    task_term: &Term,
    t_index: usize,
    belief_term: &Term,
    b_index: usize,
) {
    if task_term.connector() != belief_term.connector() {
        return;
    }
    match task_term.size().cmp(&belief_term.size()) {
        std::cmp::Ordering::Greater => {
            compound_and_self(ctx, task_term, belief_term, true, b_index);
        }
        std::cmp::Ordering::Less => {
            compound_and_self(ctx, belief_term, task_term, false, t_index);
        }
        std::cmp::Ordering::Equal => {}
    }
}

/// A compound and a statement sharing its `index`-th component on `side`.
fn compound_and_statement<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
    belief_term: &Term,
) {
    let Some(component) = compound.component(index).cloned() else {
        return;
    };
    let judgment = ctx.task.sentence().is_judgment();
    if component.connector() == statement.connector() {
        if !compound.is(Connector::Conjunction) || ctx.belief.is_none() {
            return;
        }
        if let Some((compound, statement)) =
            unify(VarKind::Dependent, &component, statement, compound, statement)
        {
            elimi_var_dep(ctx, &compound, &statement, &statement == belief_term);
        } else if judgment {
            intro_var_inner(ctx, statement, &component, compound);
        } else if let Some((compound, _)) =
            unify(VarKind::Query, &component, statement, compound, statement)
        {
            if let Some(part) = compound.component(index).cloned() {
                decompose_statement(ctx, &compound, &part, true, index);
            }
        }
    } else if judgment {
        if statement.is(Connector::Inheritance) {
            structural_compose1(ctx, compound, index, statement);
            if !is_set(compound) && !compound.is(Connector::Negation) {
                structural_compose2(ctx, compound, index, statement, side);
            }
        } else if statement.is(Connector::Similarity) && !compound.is(Connector::Conjunction) {
            structural_compose2(ctx, compound, index, statement, side);
        }
    }
}

/// A statement task and the compound at its `side`, holding the concept's
/// term at `index`.
fn component_and_statement<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
) {
    match statement.connector() {
        Some(Connector::Inheritance) => {
            structural_decompose1(ctx, compound, index, statement);
            if is_set(compound) {
                transform_set_relation(ctx, compound, statement, side);
            } else {
                structural_decompose2(ctx, statement, index);
            }
        }
        Some(Connector::Similarity) => {
            structural_decompose2(ctx, statement, index);
            if is_set(compound) {
                transform_set_relation(ctx, compound, statement, side);
            }
        }
        Some(Connector::Implication) if compound.is(Connector::Negation) => {
            let sentence = if index == 0 {
                Some(ctx.task.sentence().clone())
            } else {
                ctx.belief.clone()
            };
            if let Some(sentence) = sentence {
                contraposition(ctx, statement, &sentence);
            }
        }
        _ => {}
    }
}

/// Detachment after unifying the `index`-th side of `main` with `sub`.
///
/// Only Inheritance and Negation sides are detached here.
fn detachment_with_var<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    main: &Sentence,
    sub: &Sentence,
    index: usize,
) {
    let statement = main.content();
    let content = sub.content();
    let Some(component) = statement
        .component(index)
        .filter(|c| c.is(Connector::Inheritance) || c.is(Connector::Negation))
    else {
        return;
    };
    if !component.has_var_kind(VarKind::Independent) && !component.has_var_kind(VarKind::Dependent)
    {
        detachment(ctx, main, sub, index);
    } else if let Some((m, s)) =
        unify(VarKind::Independent, component, content, statement, content)
    {
        detachment(ctx, &resentence(main, m), &resentence(sub, s), index);
    } else if let Some(predicate) = statement
        .predicate()
        .filter(|p| statement.is(Connector::Implication) && p.is_statement())
        .filter(|_| ctx.task.sentence().is_judgment())
    {
        if content.is_statement() && predicate.subject() == content.subject() {
            let predicate = predicate.clone();
            intro_var_inner(ctx, content, &predicate, statement);
        }
    } else if let Some((m, s)) = unify(VarKind::Dependent, component, content, statement, content)
    {
        detachment(ctx, &resentence(main, m), &resentence(sub, s), index);
    }
}

/// Conditional deduction or induction once the `index`-th conjunct of the
/// condition unifies with `statement` (or its `side`-th side).
fn conditional_ded_ind_with_var<M: Memory + ?Sized>(
    ctx: &mut DerivationContext<'_, M>,
    conditional_sentence: &Sentence,
    conditional: &Term,
    index: usize,
    statement: &Term,
    side: usize,
) {
    let Some(condition) = conditional.subject().filter(|c| c.is_compound()) else {
        return;
    };
    let Some(component) = condition.component(index) else {
        return;
    };
    let (component2, side) = match statement.connector() {
        Some(Connector::Inheritance) => (statement, None),
        Some(Connector::Implication) => match statement.component(side) {
            Some(part) => (part, Some(side)),
            None => return,
        },
        _ => return,
    };
    if let Some((conditional, statement)) =
        unify(VarKind::Independent, component, component2, conditional, statement)
    {
        conditional_ded_ind(
            ctx,
            conditional_sentence,
            &conditional,
            index,
            &statement,
            side,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{BudgetValue, Punctuation, Task, TruthValue},
        memory::SimpleMemory,
        temporal::TemporalOrder,
        term::make,
    };

    fn w(name: &str) -> Term {
        Term::word(name)
    }

    fn inh(s: &str, p: &str) -> Term {
        make::inheritance(w(s), w(p)).unwrap()
    }

    fn judgment(memory: &mut SimpleMemory, content: Term) -> Task {
        let serial = memory.new_serial();
        Task::input(
            Sentence::new(
                content,
                Punctuation::Judgment,
                Some(TruthValue::new(1.0, 0.9)),
                Stamp::new(serial, 0, None),
            ),
            BudgetValue::new(0.9, 0.9, 0.9),
            10,
        )
    }

    fn links(
        memory: &SimpleMemory,
        concept: &Term,
        task: &Term,
        target: &Term,
    ) -> (TaskLink, TermLink) {
        let concept = memory.concept(concept).unwrap();
        let task_link = concept
            .task_links()
            .iter()
            .find(|l| l.task().content() == task)
            .unwrap()
            .clone();
        let term_link = concept
            .term_links()
            .iter()
            .find(|l| l.target() == target)
            .unwrap()
            .clone();
        (task_link, term_link)
    }

    fn step(memory: &mut SimpleMemory, concept: &Term, task: &Term, target: &Term) -> Vec<Task> {
        let config = ReasonerConfig::default();
        let (mut task_link, mut term_link) = links(memory, concept, task, target);
        reason(concept, &mut task_link, &mut term_link, memory, &config);
        memory.drain_derived()
    }

    #[test]
    fn robin_is_an_animal_by_deduction() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let belief = judgment(&mut memory, inh("bird", "animal"));
        let task = judgment(&mut memory, inh("robin", "bird"));
        memory.add_task(belief);
        memory.add_task(task);
        let derived = step(
            &mut memory,
            &w("bird"),
            &inh("robin", "bird"),
            &inh("bird", "animal"),
        );
        let conclusion = derived
            .iter()
            .find(|t| t.content() == &inh("robin", "animal"))
            .unwrap();
        let truth = conclusion.sentence().truth().unwrap();
        assert!(truth.approx_eq(TruthValue::new(1.0, 0.81), 1e-5));
        assert!(derived.iter().any(|t| t.content() == &inh("animal", "robin")));
    }

    #[test]
    fn similarity_belief_yields_an_analogy() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let sim = make::similarity(w("bird"), w("flyer")).unwrap();
        let belief = judgment(&mut memory, sim.clone());
        let task = judgment(&mut memory, inh("robin", "bird"));
        memory.add_task(belief);
        memory.add_task(task);
        let derived = step(&mut memory, &w("bird"), &inh("robin", "bird"), &sim);
        assert!(derived.iter().any(|t| t.content() == &inh("robin", "flyer")));
    }

    #[test]
    fn revision_ends_the_step() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let first = judgment(&mut memory, inh("bird", "animal"));
        let second = judgment(&mut memory, inh("bird", "animal"));
        memory.add_task(first);
        let config = ReasonerConfig::default();
        let bird = w("bird");
        let content = inh("bird", "animal");
        let (_, mut term_link) = links(&memory, &bird, &content, &content);
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        let mut task_link = TaskLink::new(second, LinkType::CompoundStatement, vec![0], budget);
        reason(&bird, &mut task_link, &mut term_link, &mut memory, &config);
        let derived = memory.drain_derived();
        assert_eq!(derived.len(), 1);
        assert!(derived[0].sentence().truth().unwrap().confidence() > 0.9);
    }

    #[test]
    fn self_link_detaches_through_a_conditional_belief() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let rule = make::implication(inh("a", "b"), inh("c", "d"), TemporalOrder::None).unwrap();
        let belief = judgment(&mut memory, rule.clone());
        let task = judgment(&mut memory, inh("a", "b"));
        memory.add_task(belief);
        memory.add_task(task);
        let derived = step(&mut memory, &inh("a", "b"), &inh("a", "b"), &rule);
        let conclusion = derived
            .iter()
            .find(|t| t.content() == &inh("c", "d"))
            .unwrap();
        let truth = conclusion.sentence().truth().unwrap();
        assert!(truth.approx_eq(TruthValue::new(1.0, 0.81), 1e-5));
    }

    #[test]
    fn symmetric_question_is_answered_whatever_the_spelling() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let fact = make::similarity(w("apple"), w("zebra")).unwrap();
        let belief = judgment(&mut memory, fact.clone());
        memory.add_task(belief);
        let serial = memory.new_serial();
        let query = make::similarity(Term::var(VarKind::Query, "1"), w("apple")).unwrap();
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        let question = Task::input(
            Sentence::new(query, Punctuation::Question, None, Stamp::new(serial, 0, None)),
            budget,
            10,
        );
        let config = ReasonerConfig::default();
        let apple = w("apple");
        let mut task_link =
            TaskLink::new(question, LinkType::CompoundStatement, vec![1], budget);
        let mut term_link =
            TermLink::new(fact.clone(), LinkType::CompoundStatement, vec![0], budget);
        reason(&apple, &mut task_link, &mut term_link, &mut memory, &config);
        let solution = task_link.task().best_solution().unwrap();
        assert_eq!(solution.content(), &fact);
        let reports = memory.drain_reports();
        assert!(reports.iter().any(|answer| answer.content() == &fact));
    }

    #[test]
    fn smaller_task_sequence_is_addressed_by_its_own_index() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let (ax, by, cz) = (inh("a", "x"), inh("b", "y"), inh("c", "z"));
        let whole = make::conjunction_of(
            vec![ax.clone(), by.clone(), cz.clone()],
            TemporalOrder::Forward,
        )
        .unwrap();
        let tail = make::conjunction_of(vec![by.clone(), cz], TemporalOrder::Forward).unwrap();
        let serial = memory.new_serial();
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        memory.add_task(Task::input(
            Sentence::new(
                whole.clone(),
                Punctuation::Judgment,
                Some(TruthValue::new(0.0, 0.9)),
                Stamp::new(serial, 0, None),
            ),
            budget,
            10,
        ));
        let task = judgment(&mut memory, tail);
        let config = ReasonerConfig::default();
        let mut task_link = TaskLink::new(task, LinkType::Compound, vec![0], budget);
        let mut term_link = TermLink::new(whole, LinkType::Compound, vec![1], budget);
        reason(&by, &mut task_link, &mut term_link, &mut memory, &config);
        let derived = memory.drain_derived();
        let conclusion = derived.iter().find(|t| t.content() == &ax).unwrap();
        let truth = conclusion.sentence().truth().unwrap();
        assert!(truth.frequency() < 0.5);
    }

    fn detach_with_var(rule: Term, condition: Term) -> Vec<Task> {
        let config = ReasonerConfig::default();
        let mut memory = SimpleMemory::new(config.clone());
        let main = judgment(&mut memory, rule);
        let sub = judgment(&mut memory, condition.clone()).sentence().clone();
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        let stamp = Stamp::merge(
            main.sentence().stamp(),
            sub.stamp(),
            0,
            config.max_evidential_base,
        );
        let main_sentence = main.sentence().clone();
        let mut ctx = DerivationContext::new(&mut memory, &config, main, condition, budget);
        ctx.belief = Some(sub.clone());
        ctx.new_stamp = Some(stamp);
        detachment_with_var(&mut ctx, &main_sentence, &sub, 0);
        memory.drain_derived()
    }

    #[test]
    fn inheritance_condition_is_detached() {
        let rule = make::implication(inh("a", "b"), inh("c", "d"), TemporalOrder::None).unwrap();
        let derived = detach_with_var(rule, inh("a", "b"));
        assert!(derived.iter().any(|t| t.content() == &inh("c", "d")));
    }

    #[test]
    fn similarity_condition_is_left_to_other_rules() {
        let sim = make::similarity(w("a"), w("b")).unwrap();
        let rule = make::implication(sim.clone(), inh("c", "d"), TemporalOrder::None).unwrap();
        assert!(detach_with_var(rule, sim).is_empty());
    }

    #[test]
    fn unrelated_link_pairs_derive_nothing() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let task = judgment(&mut memory, inh("robin", "bird"));
        memory.add_task(task.clone());
        let config = ReasonerConfig::default();
        let budget = BudgetValue::new(0.9, 0.9, 0.9);
        let mut task_link = TaskLink::new(task, LinkType::Transform, vec![0, 0], budget);
        let mut term_link = TermLink::new(w("animal"), LinkType::Component, vec![1], budget);
        reason(&w("robin"), &mut task_link, &mut term_link, &mut memory, &config);
        assert!(memory.drain_derived().is_empty());
    }

    #[test]
    fn transform_link_turns_a_product_into_images() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let product = make::product(vec![w("acid"), w("base")]).unwrap();
        let content = make::inheritance(product, w("reaction")).unwrap();
        let task = judgment(&mut memory, content);
        memory.add_task(task);
        let acid = w("acid");
        let mut task_link = memory
            .concept(&acid)
            .unwrap()
            .task_links()
            .iter()
            .find(|l| l.link_type() == LinkType::Transform)
            .unwrap()
            .clone();
        let config = ReasonerConfig::default();
        transform_task(&acid, &mut task_link, &mut memory, &config);
        let names: Vec<String> = memory
            .drain_derived()
            .iter()
            .map(|t| t.content().name().to_owned())
            .collect();
        assert!(names.contains(&"<acid --> (/,reaction,_,base)>".to_owned()));
    }
}
