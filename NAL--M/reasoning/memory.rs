//! The collaborator the rules talk to, plus a small in-memory implementation.
//!
//! [`Memory`] is everything a rule may ask of the system around it: the
//! clock, fresh serials, belief and goal lookup, term interning and the
//! places derived tasks, answers and activations are handed over to.
//! [`SimpleMemory`] keeps concepts in insertion order with bounded belief and
//! goal tables. It has no bags and forgets nothing except what falls off the
//! end of a full table.

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    calculus::budget::rank_belief,
    config::ReasonerConfig,
    entity::{
        prepare_component_links, BudgetValue, LinkType, Sentence, Task, TaskLink, TermLink,
    },
    term::{Term, TermInterner},
};

/// Services the inference rules consume.
pub trait Memory {
    /// Current cycle.
    fn time(&self) -> i64;

    /// Allocates a serial for a new evidential base.
    fn new_serial(&mut self) -> u64;

    /// First belief on `term` whose evidence is disjoint from `task`'s.
    fn belief_for(&self, term: &Term, task: &Task) -> Option<Sentence>;

    /// First goal on `term` whose evidence is disjoint from `task`'s.
    fn goal_for(&self, _term: &Term, _task: &Task) -> Option<Sentence> {
        None
    }

    /// Activation of the concept named by `term`, zero when there is none.
    fn concept_activation(&self, term: &Term) -> f32;

    /// Shared instance of a structurally equal term.
    fn intern(&self, term: Term) -> Term;

    /// Looks up an interned term by canonical name.
    fn term(&self, name: &str) -> Option<Term>;

    /// Accepts a newly derived task.
    fn derived(&mut self, task: Task);

    /// Accepts a task re-activated by a solution.
    fn activate(&mut self, task: Task);

    /// Publishes an answer; `input` marks answers to input questions.
    fn report(&mut self, sentence: &Sentence, input: bool);

    /// Runs an operation goal; returns whether anything was executed.
    fn execute(&mut self, _task: &Task) -> bool {
        false
    }

    /// Stores a judgment in its concept's belief table.
    fn insert_belief(&mut self, sentence: Sentence);

    /// Stores a goal in its concept's goal table.
    fn insert_goal(&mut self, task: Task);

    /// Hook for anticipation of revised events.
    fn anticipate(&mut self, _sentence: &Sentence) {}

    /// Hook called after `task` recorded a better solution.
    fn solution_found(&mut self, _task: &Task, _solution: &Sentence) {}
}

/// A term with its beliefs, goals and links.
#[derive(Debug, Clone, Serialize)]
pub struct Concept {
    term: Term,
    priority: f32,
    beliefs: Vec<Sentence>,
    goals: Vec<Task>,
    task_links: Vec<TaskLink>,
    term_links: Vec<TermLink>,
}

impl Concept {
    fn new(term: Term, priority: f32) -> Self {
        Self {
            term,
            priority,
            beliefs: Vec::new(),
            goals: Vec::new(),
            task_links: Vec::new(),
            term_links: Vec::new(),
        }
    }

    /// Term the concept is named by.
    #[must_use]
    pub const fn term(&self) -> &Term {
        &self.term
    }

    /// Activation level.
    #[must_use]
    pub const fn priority(&self) -> f32 {
        self.priority
    }

    /// Beliefs, best ranked first.
    #[must_use]
    pub fn beliefs(&self) -> &[Sentence] {
        &self.beliefs
    }

    /// Goals, best ranked first.
    #[must_use]
    pub fn goals(&self) -> &[Task] {
        &self.goals
    }

    /// Task links in insertion order.
    #[must_use]
    pub fn task_links(&self) -> &[TaskLink] {
        &self.task_links
    }

    /// Term links in insertion order.
    #[must_use]
    pub fn term_links(&self) -> &[TermLink] {
        &self.term_links
    }

    fn put_task_link(&mut self, link: TaskLink) {
        let key = link.key();
        match self.task_links.iter_mut().find(|old| old.key() == key) {
            Some(old) => {
                let mut budget = old.budget();
                budget.merge(link.budget());
                *old = link;
                *old.budget_mut() = budget;
            }
            None => self.task_links.push(link),
        }
    }

    fn put_term_link(&mut self, link: TermLink) {
        let key = link.key();
        match self.term_links.iter_mut().find(|old| old.key() == key) {
            Some(old) => old.budget_mut().merge(link.budget()),
            None => self.term_links.push(link),
        }
    }
}

fn equivalent(a: &Sentence, b: &Sentence) -> bool {
    a.content() == b.content()
        && a.truth() == b.truth()
        && a.stamp().base() == b.stamp().base()
        && a.occurrence() == b.occurrence()
}

/// Inserts by rank, skipping exact duplicates, and truncates to `capacity`.
fn add_to_table<T>(table: &mut Vec<T>, item: T, capacity: usize, sentence: impl Fn(&T) -> &Sentence) {
    if table
        .iter()
        .any(|old| equivalent(sentence(old), sentence(&item)))
    {
        return;
    }
    let rank = rank_belief(sentence(&item));
    let position = table
        .iter()
        .position(|old| rank >= rank_belief(sentence(old)))
        .unwrap_or(table.len());
    table.insert(position, item);
    table.truncate(capacity);
}

#[allow(clippy::cast_precision_loss)]
fn distribute(budget: BudgetValue, links: usize) -> BudgetValue {
    let share = (links.max(1) as f32).sqrt();
    BudgetValue::new(
        budget.priority() / share,
        budget.durability(),
        budget.quality(),
    )
}

/// Insertion-ordered concept store.
#[derive(Debug)]
pub struct SimpleMemory {
    config: ReasonerConfig,
    concepts: IndexMap<Term, Concept>,
    interner: TermInterner,
    time: i64,
    serial: u64,
    derived: Vec<Task>,
    activated: Vec<Task>,
    reports: Vec<Sentence>,
    anticipations: Vec<Sentence>,
    executed: Vec<Task>,
    solutions: IndexMap<Uuid, Sentence>,
}

impl SimpleMemory {
    /// Empty memory using `config` for table sizes.
    #[must_use]
    pub fn new(config: ReasonerConfig) -> Self {
        Self {
            config,
            concepts: IndexMap::new(),
            interner: TermInterner::new(),
            time: 0,
            serial: 0,
            derived: Vec::new(),
            activated: Vec::new(),
            reports: Vec::new(),
            anticipations: Vec::new(),
            executed: Vec::new(),
            solutions: IndexMap::new(),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// Advances the clock by one cycle.
    pub fn tick(&mut self) {
        self.time += 1;
    }

    /// Sets the clock.
    pub fn set_time(&mut self, time: i64) {
        self.time = time;
    }

    /// Concept named by `term`.
    #[must_use]
    pub fn concept(&self, term: &Term) -> Option<&Concept> {
        self.concepts.get(term)
    }

    /// Every concept in creation order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Number of concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether no concept exists yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    fn concept_or_insert(&mut self, term: &Term, priority: f32) -> &mut Concept {
        let term = self.interner.intern(term.clone());
        let concept = self
            .concepts
            .entry(term.clone())
            .or_insert_with(|| Concept::new(term, priority));
        concept.priority = concept.priority.max(priority);
        concept
    }

    /// Files a task: stores judgments and goals in their tables and links
    /// the task and its content into every component concept.
    pub fn add_task(&mut self, task: Task) {
        let content = self.interner.intern(task.content().clone());
        let budget = task.budget();
        let fresh = !self.concepts.contains_key(&content);
        let (belief_capacity, goal_capacity) =
            (self.config.belief_capacity, self.config.goal_capacity);
        let concept = self.concept_or_insert(&content, budget.priority());
        if task.sentence().is_judgment() {
            add_to_table(
                &mut concept.beliefs,
                task.sentence().clone(),
                belief_capacity,
                |s| s,
            );
        } else if task.sentence().is_goal() {
            add_to_table(&mut concept.goals, task.clone(), goal_capacity, Task::sentence);
        }
        concept.put_task_link(TaskLink::new(
            task.clone(),
            LinkType::SelfLink,
            Vec::new(),
            budget,
        ));
        let templates = prepare_component_links(&content);
        let share = distribute(budget, templates.len());
        for template in &templates {
            let component = self.concept_or_insert(&template.target, share.priority());
            component.put_task_link(TaskLink::new(
                task.clone(),
                template.link_type,
                template.index.clone(),
                share,
            ));
        }
        if fresh {
            self.build_term_links(&content, share);
        }
    }

    fn build_term_links(&mut self, content: &Term, budget: BudgetValue) {
        for template in prepare_component_links(content) {
            if template.link_type == LinkType::Transform {
                continue;
            }
            let target = self.interner.intern(template.target.clone());
            self.concept_or_insert(content, budget.priority())
                .put_term_link(TermLink::new(
                    target.clone(),
                    template.link_type.to_component(),
                    template.index.clone(),
                    budget,
                ));
            self.concept_or_insert(&target, budget.priority())
                .put_term_link(TermLink::new(
                    content.clone(),
                    template.link_type,
                    template.index,
                    budget,
                ));
        }
    }

    /// Writes a task link back into `concept`, replacing the link with the
    /// same key.
    pub fn store_task_link(&mut self, concept: &Term, link: TaskLink) {
        if let Some(concept) = self.concepts.get_mut(concept) {
            let key = link.key();
            if let Some(old) = concept.task_links.iter_mut().find(|old| old.key() == key) {
                *old = link;
            }
        }
    }

    /// Writes a term link back into `concept`, replacing the link with the
    /// same key.
    pub fn store_term_link(&mut self, concept: &Term, link: TermLink) {
        if let Some(concept) = self.concepts.get_mut(concept) {
            let key = link.key();
            if let Some(old) = concept.term_links.iter_mut().find(|old| old.key() == key) {
                *old = link;
            }
        }
    }

    /// Takes the tasks derived since the last call.
    pub fn drain_derived(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.derived)
    }

    /// Takes the tasks activated since the last call.
    pub fn drain_activated(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.activated)
    }

    /// Takes the answers reported since the last call.
    pub fn drain_reports(&mut self) -> Vec<Sentence> {
        std::mem::take(&mut self.reports)
    }

    /// Events passed to the anticipation hook.
    #[must_use]
    pub fn anticipations(&self) -> &[Sentence] {
        &self.anticipations
    }

    /// Goals handed to [`Memory::execute`].
    #[must_use]
    pub fn executed(&self) -> &[Task] {
        &self.executed
    }

    /// Best answer recorded for the task with `id`.
    #[must_use]
    pub fn best_solution(&self, id: Uuid) -> Option<&Sentence> {
        self.solutions.get(&id)
    }
}

impl Memory for SimpleMemory {
    fn time(&self) -> i64 {
        self.time
    }

    fn new_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    fn belief_for(&self, term: &Term, task: &Task) -> Option<Sentence> {
        let stamp = task.sentence().stamp();
        self.concepts
            .get(term)?
            .beliefs
            .iter()
            .find(|belief| !belief.stamp().overlaps(stamp))
            .cloned()
    }

    fn goal_for(&self, term: &Term, task: &Task) -> Option<Sentence> {
        let stamp = task.sentence().stamp();
        self.concepts
            .get(term)?
            .goals
            .iter()
            .map(Task::sentence)
            .find(|goal| !goal.stamp().overlaps(stamp))
            .cloned()
    }

    fn concept_activation(&self, term: &Term) -> f32 {
        self.concepts.get(term).map_or(0.0, Concept::priority)
    }

    fn intern(&self, term: Term) -> Term {
        self.interner.intern(term)
    }

    fn term(&self, name: &str) -> Option<Term> {
        self.interner.get(name)
    }

    fn derived(&mut self, task: Task) {
        self.derived.push(task);
    }

    fn activate(&mut self, task: Task) {
        self.activated.push(task);
    }

    fn report(&mut self, sentence: &Sentence, _input: bool) {
        self.reports.push(sentence.clone());
    }

    fn execute(&mut self, task: &Task) -> bool {
        self.executed.push(task.clone());
        true
    }

    fn insert_belief(&mut self, sentence: Sentence) {
        let capacity = self.config.belief_capacity;
        let concept = self.concept_or_insert(&sentence.content().clone(), 0.0);
        add_to_table(&mut concept.beliefs, sentence, capacity, |s| s);
    }

    fn insert_goal(&mut self, task: Task) {
        let capacity = self.config.goal_capacity;
        let priority = task.budget().priority();
        let concept = self.concept_or_insert(&task.content().clone(), priority);
        add_to_table(&mut concept.goals, task, capacity, Task::sentence);
    }

    fn anticipate(&mut self, sentence: &Sentence) {
        self.anticipations.push(sentence.clone());
    }

    fn solution_found(&mut self, task: &Task, solution: &Sentence) {
        self.solutions.insert(task.id(), solution.clone());
        for concept in self.concepts.values_mut() {
            for link in &mut concept.task_links {
                if link.task().id() == task.id() {
                    link.task_mut().set_best_solution(solution.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{Punctuation, Stamp, TruthValue},
        term::make,
    };

    fn judgment(memory: &mut SimpleMemory, s: &str, p: &str, truth: TruthValue) -> Task {
        let content = make::inheritance(Term::word(s), Term::word(p)).unwrap();
        let serial = memory.new_serial();
        let sentence = Sentence::new(
            content,
            Punctuation::Judgment,
            Some(truth),
            Stamp::new(serial, memory.time(), None),
        );
        Task::input(sentence, BudgetValue::new(0.8, 0.8, 0.9), 10)
    }

    #[test]
    fn add_task_links_components_both_ways() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let task = judgment(&mut memory, "bird", "animal", TruthValue::default());
        let content = task.content().clone();
        memory.add_task(task);
        let own = memory.concept(&content).unwrap();
        assert_eq!(own.beliefs().len(), 1);
        assert_eq!(own.task_links()[0].link_type(), LinkType::SelfLink);
        assert!(own
            .term_links()
            .iter()
            .all(|l| l.link_type() == LinkType::ComponentStatement));
        let bird = memory.concept(&Term::word("bird")).unwrap();
        assert_eq!(bird.task_links()[0].link_type(), LinkType::CompoundStatement);
        assert_eq!(bird.term_links()[0].target(), &content);
        assert_eq!(bird.term_links()[0].index(0), 0);
    }

    #[test]
    fn belief_lookup_skips_overlapping_evidence() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let task = judgment(&mut memory, "bird", "animal", TruthValue::default());
        let content = task.content().clone();
        memory.add_task(task.clone());
        assert!(memory.belief_for(&content, &task).is_none());
        let other = judgment(&mut memory, "bird", "animal", TruthValue::new(0.0, 0.5));
        assert!(memory.belief_for(&content, &other).is_some());
    }

    #[test]
    fn belief_table_is_ranked_and_bounded() {
        let config = ReasonerConfig {
            belief_capacity: 2,
            ..ReasonerConfig::default()
        };
        let mut memory = SimpleMemory::new(config);
        for confidence in [0.3, 0.9, 0.6] {
            let task = judgment(&mut memory, "a", "b", TruthValue::new(1.0, confidence));
            memory.insert_belief(task.sentence().clone());
        }
        let content = make::inheritance(Term::word("a"), Term::word("b")).unwrap();
        let beliefs = memory.concept(&content).unwrap().beliefs();
        assert_eq!(beliefs.len(), 2);
        assert!((beliefs[0].truth().unwrap().confidence() - 0.9).abs() < 1e-6);
        assert!((beliefs[1].truth().unwrap().confidence() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn duplicates_are_not_stored_twice() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let task = judgment(&mut memory, "a", "b", TruthValue::default());
        memory.insert_belief(task.sentence().clone());
        memory.insert_belief(task.sentence().clone());
        let beliefs = memory.concept(task.content()).unwrap().beliefs();
        assert_eq!(beliefs.len(), 1);
    }

    #[test]
    fn solutions_reach_every_link_copy() {
        let mut memory = SimpleMemory::new(ReasonerConfig::default());
        let content = make::inheritance(Term::word("a"), Term::word("b")).unwrap();
        let question = Task::input(
            Sentence::new(
                content.clone(),
                Punctuation::Question,
                None,
                Stamp::new(1, 0, None),
            ),
            BudgetValue::new(0.9, 0.9, 0.9),
            10,
        );
        memory.add_task(question.clone());
        let answer = judgment(&mut memory, "a", "b", TruthValue::default());
        memory.solution_found(&question, answer.sentence());
        let link = &memory.concept(&Term::word("a")).unwrap().task_links()[0];
        assert!(link.task().best_solution().is_some());
        assert!(memory.best_solution(question.id()).is_some());
    }
}
