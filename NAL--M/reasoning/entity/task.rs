use indexmap::IndexSet;
use serde::Serialize;
use uuid::Uuid;

use super::{BudgetValue, Sentence, TermLink};
use crate::term::Term;

/// A sentence competing for processing.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: Uuid,
    sentence: Sentence,
    budget: BudgetValue,
    parent_content: Option<Term>,
    parent_belief: Option<Sentence>,
    best_solution: Option<Sentence>,
    input: bool,
    novelty: IndexSet<String>,
    novelty_capacity: usize,
}

impl Task {
    /// Task entered from outside the system.
    #[must_use]
    pub fn input(sentence: Sentence, budget: BudgetValue, novelty_capacity: usize) -> Self {
        Self::build(sentence, budget, None, None, true, novelty_capacity)
    }

    /// Task produced by a rule.
    #[must_use]
    pub fn derived(
        sentence: Sentence,
        budget: BudgetValue,
        parent_content: Option<Term>,
        parent_belief: Option<Sentence>,
        novelty_capacity: usize,
    ) -> Self {
        Self::build(
            sentence,
            budget,
            parent_content,
            parent_belief,
            false,
            novelty_capacity,
        )
    }

    fn build(
        sentence: Sentence,
        budget: BudgetValue,
        parent_content: Option<Term>,
        parent_belief: Option<Sentence>,
        input: bool,
        novelty_capacity: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sentence,
            budget,
            parent_content,
            parent_belief,
            best_solution: None,
            input,
            novelty: IndexSet::new(),
            novelty_capacity: novelty_capacity.max(1),
        }
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The sentence.
    #[must_use]
    pub const fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    /// Content of the sentence.
    #[must_use]
    pub const fn content(&self) -> &Term {
        self.sentence.content()
    }

    /// Budget.
    #[must_use]
    pub const fn budget(&self) -> BudgetValue {
        self.budget
    }

    /// Mutable budget.
    pub fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }

    /// Content of the task this one was derived from.
    #[must_use]
    pub const fn parent_content(&self) -> Option<&Term> {
        self.parent_content.as_ref()
    }

    /// Belief used to derive this task.
    #[must_use]
    pub const fn parent_belief(&self) -> Option<&Sentence> {
        self.parent_belief.as_ref()
    }

    /// Best answer found so far.
    #[must_use]
    pub const fn best_solution(&self) -> Option<&Sentence> {
        self.best_solution.as_ref()
    }

    /// Records a better answer.
    pub fn set_best_solution(&mut self, solution: Sentence) {
        self.best_solution = Some(solution);
    }

    /// Whether the task came from outside.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        self.input
    }

    /// Recorded peer keys, oldest first.
    pub fn novelty_record(&self) -> impl Iterator<Item = &str> {
        self.novelty.iter().map(String::as_str)
    }

    /// Whether pairing with `term_link` would be new.
    ///
    /// A link back to the task's own content is never novel. A fresh key is
    /// recorded, dropping the oldest one when the record is full.
    pub fn novel(&mut self, term_link: &TermLink) -> bool {
        if term_link.target() == self.content() {
            return false;
        }
        let key = term_link.key();
        if self.novelty.contains(&key) {
            return false;
        }
        if self.novelty.len() >= self.novelty_capacity {
            self.novelty.shift_remove_index(0);
        }
        self.novelty.insert(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{LinkType, Punctuation, Stamp, TruthValue},
        term::make,
    };

    fn task(capacity: usize) -> Task {
        let content = make::inheritance(Term::word("robin"), Term::word("bird")).unwrap();
        let sentence = Sentence::new(
            content,
            Punctuation::Judgment,
            Some(TruthValue::default()),
            Stamp::new(1, 0, None),
        );
        Task::input(sentence, BudgetValue::new(0.8, 0.8, 0.9), capacity)
    }

    fn link(target: Term) -> TermLink {
        TermLink::new(target, LinkType::Compound, vec![0], BudgetValue::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn rejects_own_content() {
        let mut task = task(4);
        let own = task.content().clone();
        assert!(!task.novel(&link(own)));
        assert_eq!(task.novelty_record().count(), 0);
    }

    #[test]
    fn records_fresh_keys_once() {
        let mut task = task(4);
        let peer = link(make::inheritance(Term::word("bird"), Term::word("animal")).unwrap());
        assert!(task.novel(&peer));
        assert!(!task.novel(&peer));
        assert_eq!(task.novelty_record().count(), 1);
    }

    #[test]
    fn record_is_bounded() {
        let mut task = task(2);
        let links: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| link(Term::word(name)))
            .collect();
        for l in &links {
            assert!(task.novel(l));
        }
        assert_eq!(task.novelty_record().count(), 2);
        assert!(task.novel(&links[0]));
        assert!(!task.novel(&links[2]));
    }
}
