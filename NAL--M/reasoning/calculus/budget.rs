//! Budget functions.

use super::{and, ave_ari, or, w2c};
use crate::entity::{BudgetValue, Sentence, TruthValue};

/// Quality implied by a truth value; negative evidence still has some use.
#[must_use]
pub fn truth_to_quality(truth: TruthValue) -> f32 {
    let exp = truth.expectation();
    exp.max((1.0 - exp) * 0.75)
}

/// Rank of a judgment inside a belief table.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rank_belief(judgment: &Sentence) -> f32 {
    let confidence = judgment.truth().map_or(0.0, TruthValue::confidence);
    let originality = 1.0 / (judgment.stamp().base().len() as f32 + 1.0);
    or(&[confidence, originality])
}

/// Link the derivation ran through, with the activation of its target
/// concept.
#[derive(Debug)]
pub struct BeliefLinkFeedback<'a> {
    /// Budget of the term link that supplied the belief.
    pub budget: &'a mut BudgetValue,
    /// Activation of the term link's target concept.
    pub target_activation: f32,
}

/// Common tail of every forward/backward budget function.
///
/// The source budget supplies priority and durability; the belief link, when
/// present, is combined in and rewarded with the derived quality.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn budget_inference(
    quality: f32,
    complexity: usize,
    source: BudgetValue,
    belief_link: Option<BeliefLinkFeedback<'_>>,
) -> BudgetValue {
    let complexity = complexity.max(1) as f32;
    let mut priority = source.priority();
    let mut durability = source.durability() / complexity;
    let quality = quality / complexity;
    if let Some(link) = belief_link {
        priority = or(&[priority, link.budget.priority()]);
        durability = and(&[durability, link.budget.durability()]);
        link.budget
            .inc_priority(or(&[quality, link.target_activation]));
        link.budget.inc_durability(quality);
    }
    BudgetValue::new(priority, durability, quality)
}

/// Budget weight of a weak backward inference.
#[must_use]
pub fn weak_quality(k: f32) -> f32 {
    w2c(1.0, k)
}

/// Budget for activating a task with a newly found solution.
///
/// Judgment tasks only gain priority and get no new budget. For questions
/// and goals the task gives up priority in proportion to how well it has
/// been answered.
pub fn solution_eval(
    problem: &Sentence,
    solution: &Sentence,
    quality: f32,
    task_budget: &mut BudgetValue,
) -> Option<BudgetValue> {
    if problem.is_judgment() {
        task_budget.inc_priority(quality);
        return None;
    }
    let task_priority = task_budget.priority();
    let budget = BudgetValue::new(
        or(&[task_priority, quality]),
        task_budget.durability(),
        solution.truth().map_or(0.0, truth_to_quality),
    );
    task_budget.set_priority((1.0 - quality).min(task_priority));
    Some(budget)
}

/// Budget of a revision result; both links and the task are discounted by
/// how little the revision changed their expectation.
pub fn revise(
    task_truth: TruthValue,
    belief_truth: TruthValue,
    truth: TruthValue,
    task_budget: &mut BudgetValue,
    links: Option<(&mut BudgetValue, &mut BudgetValue)>,
) -> BudgetValue {
    let dif_task = truth.exp_dif_abs(task_truth);
    task_budget.dec_priority(1.0 - dif_task);
    task_budget.dec_durability(1.0 - dif_task);
    if let Some((task_link, belief_link)) = links {
        task_link.dec_priority(1.0 - dif_task);
        task_link.dec_durability(1.0 - dif_task);
        let dif_belief = truth.exp_dif_abs(belief_truth);
        belief_link.dec_priority(1.0 - dif_belief);
        belief_link.dec_durability(1.0 - dif_belief);
    }
    let dif = truth.confidence() - task_truth.confidence().max(belief_truth.confidence());
    let priority = or(&[dif, task_budget.priority()]);
    let durability = ave_ari(&[dif, task_budget.durability()]);
    BudgetValue::new(priority, durability, truth_to_quality(truth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{Punctuation, Stamp},
        term::Term,
    };

    #[test]
    fn quality_favours_extreme_expectations() {
        let positive = truth_to_quality(TruthValue::new(1.0, 0.9));
        let neutral = truth_to_quality(TruthValue::new(0.5, 0.9));
        let negative = truth_to_quality(TruthValue::new(0.0, 0.9));
        assert!(positive > negative);
        assert!(negative > neutral);
    }

    #[test]
    fn inference_divides_by_complexity_and_feeds_back() {
        let source = BudgetValue::new(0.8, 0.8, 0.5);
        let mut link = BudgetValue::new(0.2, 0.5, 0.5);
        let before = link.priority();
        let out = budget_inference(
            0.9,
            3,
            source,
            Some(BeliefLinkFeedback {
                budget: &mut link,
                target_activation: 0.4,
            }),
        );
        assert!((out.quality() - 0.3).abs() < 1e-6);
        assert!(out.priority() >= 0.8);
        assert!(link.priority() > before);
    }

    #[test]
    fn answered_question_yields_priority() {
        let stamp = Stamp::new(1, 0, None);
        let problem = Sentence::new(Term::word("a"), Punctuation::Question, None, stamp.clone());
        let answer = Sentence::new(
            Term::word("a"),
            Punctuation::Judgment,
            Some(TruthValue::new(1.0, 0.9)),
            stamp,
        );
        let mut task_budget = BudgetValue::new(0.9, 0.8, 0.5);
        let budget = solution_eval(&problem, &answer, 0.9, &mut task_budget).unwrap();
        assert!(budget.priority() >= 0.9);
        assert!(task_budget.priority() <= 0.1 + 1e-6);
    }
}
