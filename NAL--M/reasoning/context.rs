//! Per-step derivation context.
//!
//! One context lives for exactly one reasoning step. It owns copies of the
//! premises and the link budgets the step may adjust; the caller writes them
//! back into the links when the step is over.

use crate::{
    calculus::budget::{budget_inference, revise, weak_quality, BeliefLinkFeedback},
    calculus::{budget::truth_to_quality, w2c},
    config::ReasonerConfig,
    entity::{BudgetValue, Punctuation, Sentence, Stamp, Task, TruthValue},
    memory::Memory,
    term::{Connector, Term, VarKind},
};

/// Everything a rule may read or adjust while handling one premise pair.
pub struct DerivationContext<'a, M: Memory + ?Sized> {
    /// Collaborator receiving derived tasks.
    pub memory: &'a mut M,
    /// Active configuration.
    pub config: &'a ReasonerConfig,
    /// Task under processing.
    pub task: Task,
    /// Belief paired with the task, if any.
    pub belief: Option<Sentence>,
    /// Term of the concept the links belong to.
    pub term: Term,
    /// Budget of the task link.
    pub task_link_budget: BudgetValue,
    /// Target and budget of the term link that supplied the belief.
    pub belief_link: Option<(Term, BudgetValue)>,
    /// Stamp for two-premise conclusions; `None` without a usable belief.
    pub new_stamp: Option<Stamp>,
    /// Cycle of the step.
    pub time: i64,
}

impl<'a, M: Memory + ?Sized> DerivationContext<'a, M> {
    /// Context for `task` in the concept named by `term`, without a belief.
    pub fn new(
        memory: &'a mut M,
        config: &'a ReasonerConfig,
        task: Task,
        term: Term,
        task_link_budget: BudgetValue,
    ) -> Self {
        let time = memory.time();
        Self {
            memory,
            config,
            task,
            belief: None,
            term,
            task_link_budget,
            belief_link: None,
            new_stamp: None,
            time,
        }
    }

    /// Evidential horizon.
    #[must_use]
    pub const fn horizon(&self) -> f32 {
        self.config.horizon
    }

    /// Content of the current task.
    #[must_use]
    pub const fn task_content(&self) -> &Term {
        self.task.content()
    }

    /// Sentence of the current task.
    #[must_use]
    pub const fn task_sentence(&self) -> &Sentence {
        self.task.sentence()
    }

    fn inference(&mut self, quality: f32, complexity: usize) -> BudgetValue {
        let activation = self
            .belief_link
            .as_ref()
            .map(|(target, _)| self.memory.concept_activation(target));
        let feedback = self
            .belief_link
            .as_mut()
            .zip(activation)
            .map(|((_, budget), target_activation)| BeliefLinkFeedback {
                budget,
                target_activation,
            });
        budget_inference(quality, complexity, self.task_link_budget, feedback)
    }

    /// Budget of a forward inference.
    pub fn forward(&mut self, truth: TruthValue) -> BudgetValue {
        self.inference(truth_to_quality(truth), 1)
    }

    /// Budget of a backward inference.
    pub fn backward(&mut self, truth: TruthValue) -> BudgetValue {
        self.inference(truth_to_quality(truth), 1)
    }

    /// Budget of a weak backward inference.
    pub fn backward_weak(&mut self, truth: TruthValue) -> BudgetValue {
        let quality = weak_quality(self.horizon()) * truth_to_quality(truth);
        self.inference(quality, 1)
    }

    /// Budget of a forward inference producing `content`.
    pub fn compound_forward(&mut self, truth: TruthValue, content: &Term) -> BudgetValue {
        self.inference(truth_to_quality(truth), content.complexity())
    }

    /// Budget of a backward inference producing `content`.
    pub fn compound_backward(&mut self, content: &Term) -> BudgetValue {
        self.inference(1.0, content.complexity())
    }

    /// Budget of a weak backward inference producing `content`.
    pub fn compound_backward_weak(&mut self, content: &Term) -> BudgetValue {
        self.inference(w2c(1.0, self.horizon()), content.complexity())
    }

    /// Budget of a revision; optionally discounts both links.
    pub fn revise(
        &mut self,
        task_truth: TruthValue,
        belief_truth: TruthValue,
        truth: TruthValue,
        feedback_to_links: bool,
    ) -> BudgetValue {
        let links = if feedback_to_links {
            self.belief_link
                .as_mut()
                .map(|(_, budget)| (&mut self.task_link_budget, budget))
        } else {
            None
        };
        revise(
            task_truth,
            belief_truth,
            truth,
            self.task.budget_mut(),
            links,
        )
    }

    /// Derives a task from the current task and belief.
    ///
    /// Returns whether a task was handed to the memory.
    pub fn double_premise_task(
        &mut self,
        content: Term,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) -> bool {
        let Some(stamp) = self.new_stamp.clone() else {
            return false;
        };
        self.double_premise_task_at(content, truth, budget, stamp.occurrence())
    }

    /// Same as [`Self::double_premise_task`] with an explicit occurrence
    /// time for the conclusion.
    pub fn double_premise_task_at(
        &mut self,
        content: Term,
        truth: Option<TruthValue>,
        budget: BudgetValue,
        occurrence: Option<i64>,
    ) -> bool {
        let Some(mut stamp) = self.new_stamp.clone() else {
            return false;
        };
        stamp.set_occurrence(occurrence);
        let punctuation = self.task.sentence().punctuation();
        let belief = self.belief.clone();
        self.derive(content, punctuation, truth, budget, stamp, belief)
    }

    /// Derives a task from the current task alone.
    pub fn single_premise_task(
        &mut self,
        content: Term,
        punctuation: Punctuation,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) -> bool {
        if self.task.parent_content() == Some(&content) {
            return false;
        }
        let parent = self.task.sentence();
        let stamp = match &self.belief {
            Some(belief) if !parent.is_judgment() => belief.stamp().derive(self.time),
            _ => parent.stamp().derive(self.time),
        };
        self.derive(content, punctuation, truth, budget, stamp, None)
    }

    /// [`Self::single_premise_task`] with the task's own punctuation.
    pub fn single_premise(
        &mut self,
        content: Term,
        truth: Option<TruthValue>,
        budget: BudgetValue,
    ) -> bool {
        let punctuation = self.task.sentence().punctuation();
        self.single_premise_task(content, punctuation, truth, budget)
    }

    pub(crate) fn derive(
        &mut self,
        content: Term,
        punctuation: Punctuation,
        truth: Option<TruthValue>,
        budget: BudgetValue,
        stamp: Stamp,
        belief: Option<Sentence>,
    ) -> bool {
        if !budget.above_threshold(self.config.budget_threshold) || !content.is_compound() {
            return false;
        }
        if punctuation.has_truth() {
            match truth {
                Some(truth) if truth.confidence() > 0.0 => {}
                _ => return false,
            }
            if content.has_var_kind(VarKind::Query) {
                return false;
            }
        }
        let content = self.memory.intern(content);
        let sentence = Sentence::new(content, punctuation, truth, stamp);
        let task = Task::derived(
            sentence,
            budget,
            Some(self.task.content().clone()),
            belief,
            self.config.novelty_capacity,
        );
        if task.sentence().is_goal() && is_operation(task.content()) {
            self.memory.execute(&task);
        }
        self.memory.derived(task);
        true
    }
}

/// `<(*, args..) --> ^op>`
#[must_use]
pub fn is_operation(t: &Term) -> bool {
    t.sides().is_some_and(|(subject, predicate)| {
        t.is(Connector::Inheritance) && subject.is(Connector::Product) && predicate.is_operator()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::SimpleMemory, term::make};

    fn fixture() -> (SimpleMemory, ReasonerConfig, Task) {
        let config = ReasonerConfig::default();
        let memory = SimpleMemory::new(config.clone());
        let content = make::inheritance(Term::word("robin"), Term::word("bird")).unwrap();
        let task = Task::input(
            Sentence::new(
                content,
                Punctuation::Judgment,
                Some(TruthValue::default()),
                Stamp::new(1, 0, None),
            ),
            BudgetValue::new(0.8, 0.8, 0.9),
            config.novelty_capacity,
        );
        (memory, config, task)
    }

    #[test]
    fn two_premise_derivation_needs_a_stamp() {
        let (mut memory, config, task) = fixture();
        let budget = BudgetValue::new(0.8, 0.8, 0.9);
        let content = make::inheritance(Term::word("robin"), Term::word("animal")).unwrap();
        let mut ctx = DerivationContext::new(&mut memory, &config, task, Term::word("bird"), budget);
        assert!(!ctx.double_premise_task(content.clone(), Some(TruthValue::default()), budget));
        ctx.new_stamp = Some(Stamp::with_base(vec![1, 2], 0, None));
        assert!(ctx.double_premise_task(content, Some(TruthValue::default()), budget));
        let derived = memory.drain_derived();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].sentence().stamp().base(), &[1, 2]);
    }

    #[test]
    fn judgments_need_positive_confidence_and_no_query() {
        let (mut memory, config, task) = fixture();
        let budget = BudgetValue::new(0.8, 0.8, 0.9);
        let mut ctx = DerivationContext::new(&mut memory, &config, task, Term::word("bird"), budget);
        ctx.new_stamp = Some(Stamp::with_base(vec![1, 2], 0, None));
        let query = make::inheritance(Term::var(VarKind::Query, "x"), Term::word("bird")).unwrap();
        assert!(!ctx.double_premise_task(query, Some(TruthValue::default()), budget));
        let plain = make::inheritance(Term::word("a"), Term::word("b")).unwrap();
        assert!(!ctx.double_premise_task(plain.clone(), Some(TruthValue::new(1.0, 0.0)), budget));
        assert!(!ctx.double_premise_task(plain.clone(), None, budget));
        let faint = BudgetValue::new(0.0, 0.0, 0.0);
        assert!(!ctx.double_premise_task(plain, Some(TruthValue::default()), faint));
    }

    #[test]
    fn single_premise_refuses_the_parent_content() {
        let (mut memory, config, input) = fixture();
        let parent = input.content().clone();
        let child = make::inheritance(Term::word("bird"), Term::word("robin")).unwrap();
        let task = Task::derived(
            Sentence::new(
                child,
                Punctuation::Judgment,
                Some(TruthValue::default()),
                Stamp::new(1, 0, None),
            ),
            input.budget(),
            Some(parent.clone()),
            None,
            config.novelty_capacity,
        );
        let budget = task.budget();
        let mut ctx = DerivationContext::new(&mut memory, &config, task, Term::word("bird"), budget);
        assert!(!ctx.single_premise(parent, Some(TruthValue::default()), budget));
        let other = make::inheritance(Term::word("robin"), Term::word("animal")).unwrap();
        assert!(ctx.single_premise(other, Some(TruthValue::default()), budget));
    }

    #[test]
    fn belief_link_is_rewarded_by_inference() {
        let (mut memory, config, task) = fixture();
        let budget = BudgetValue::new(0.5, 0.5, 0.5);
        let mut ctx = DerivationContext::new(&mut memory, &config, task, Term::word("bird"), budget);
        ctx.belief_link = Some((Term::word("animal"), BudgetValue::new(0.1, 0.1, 0.1)));
        let out = ctx.forward(TruthValue::default());
        let (_, link) = ctx.belief_link.unwrap();
        assert!(link.priority() > 0.1);
        assert!(out.priority() >= 0.5);
    }

    #[test]
    fn operations_are_recognized() {
        let op = Term::operator("^go").unwrap();
        let args = make::product(vec![Term::word("home")]).unwrap();
        assert!(is_operation(&make::inheritance(args, op).unwrap()));
        assert!(!is_operation(&Term::word("home")));
    }
}
