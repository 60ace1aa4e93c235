use anyhow::Result;
use serde_json::{json, Value};
use shared_logging::LogLevel;

use crate::{
    config::ReasonerConfig,
    entity::{BudgetValue, LinkType, Punctuation, Sentence, Stamp, Task, TruthValue},
    memory::{Memory, SimpleMemory},
    rules::{reason, transform_task},
    telemetry::ReasonerTelemetry,
    term::Term,
};

/// Drives the rules over a [`SimpleMemory`] one concept at a time.
#[derive(Debug)]
pub struct Reasoner {
    memory: SimpleMemory,
    config: ReasonerConfig,
    telemetry: ReasonerTelemetry,
}

impl Reasoner {
    /// Creates a reasoner with an in-memory trace only.
    pub fn new(config: ReasonerConfig) -> Result<Self> {
        let telemetry = ReasonerTelemetry::builder("reasoning")
            .trace_capacity(config.trace_capacity)
            .build()?;
        Self::with_telemetry(config, telemetry)
    }

    /// Creates a reasoner reporting into `telemetry`.
    pub fn with_telemetry(config: ReasonerConfig, telemetry: ReasonerTelemetry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            memory: SimpleMemory::new(config.clone()),
            config,
            telemetry,
        })
    }

    /// Concept store.
    #[must_use]
    pub const fn memory(&self) -> &SimpleMemory {
        &self.memory
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// Derivation trace.
    #[must_use]
    pub const fn telemetry(&self) -> &ReasonerTelemetry {
        &self.telemetry
    }

    /// Current cycle.
    #[must_use]
    pub fn time(&self) -> i64 {
        self.memory.time()
    }

    /// Accepts an input sentence with a fresh evidential base.
    pub fn input(
        &mut self,
        content: Term,
        punctuation: Punctuation,
        truth: Option<TruthValue>,
        budget: BudgetValue,
        occurrence: Option<i64>,
    ) -> Task {
        let serial = self.memory.new_serial();
        let stamp = Stamp::new(serial, self.memory.time(), occurrence);
        let sentence = Sentence::new(content, punctuation, truth, stamp);
        let task = Task::input(sentence, budget, self.config.novelty_capacity);
        self.log(LogLevel::Info, "nal.input", describe(&task));
        self.memory.add_task(task.clone());
        task
    }

    /// Pairs every task link of `concept` with every term link it has not
    /// met yet. Returns the number of derived tasks filed.
    pub fn step(&mut self, concept: &Term) -> usize {
        let Some(found) = self.memory.concept(concept) else {
            return 0;
        };
        let task_links = found.task_links().to_vec();
        let mut term_links = found.term_links().to_vec();
        for mut task_link in task_links {
            if task_link.link_type() == LinkType::Transform {
                continue;
            }
            for term_link in &mut term_links {
                if !task_link.task_mut().novel(term_link) {
                    self.log(
                        LogLevel::Debug,
                        "nal.novelty.rejected",
                        json!({
                            "task": task_link.task().content().name(),
                            "term_link": term_link.key(),
                        }),
                    );
                    continue;
                }
                reason(concept, &mut task_link, term_link, &mut self.memory, &self.config);
            }
            self.memory.store_task_link(concept, task_link);
        }
        for term_link in term_links {
            self.memory.store_term_link(concept, term_link);
        }
        self.absorb_derived()
    }

    /// Runs the product/image transform on every transform link of
    /// `concept`. Returns the number of derived tasks filed.
    pub fn transform(&mut self, concept: &Term) -> usize {
        let Some(found) = self.memory.concept(concept) else {
            return 0;
        };
        let task_links: Vec<_> = found
            .task_links()
            .iter()
            .filter(|link| link.link_type() == LinkType::Transform)
            .cloned()
            .collect();
        for mut task_link in task_links {
            transform_task(concept, &mut task_link, &mut self.memory, &self.config);
            self.memory.store_task_link(concept, task_link);
        }
        self.absorb_derived()
    }

    /// Advances the clock, then transforms and steps every concept in
    /// creation order.
    pub fn cycle(&mut self) -> usize {
        self.memory.tick();
        let concepts: Vec<Term> = self.memory.concepts().map(|c| c.term().clone()).collect();
        concepts
            .iter()
            .map(|concept| self.transform(concept) + self.step(concept))
            .sum()
    }

    fn absorb_derived(&mut self) -> usize {
        let derived = self.memory.drain_derived();
        let count = derived.len();
        for task in derived {
            let revised = task.sentence().is_judgment()
                && task.parent_content() == Some(task.content())
                && task.parent_belief().is_some();
            let message = if revised { "nal.revised" } else { "nal.derived" };
            self.log(LogLevel::Debug, message, describe(&task));
            self.memory.add_task(task);
        }
        for answer in self.memory.drain_reports() {
            self.log(LogLevel::Info, "nal.answer", describe_sentence(&answer));
        }
        for task in self.memory.drain_activated() {
            self.log(LogLevel::Debug, "nal.activated", describe(&task));
            self.memory.add_task(task);
        }
        count
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        let _ = self
            .telemetry
            .log(level, self.memory.time(), message, metadata);
    }
}

fn describe_sentence(sentence: &Sentence) -> Value {
    json!({
        "content": sentence.content().name(),
        "punctuation": sentence.punctuation().symbol().to_string(),
        "frequency": sentence.truth().map(TruthValue::frequency),
        "confidence": sentence.truth().map(TruthValue::confidence),
        "occurrence": sentence.occurrence(),
    })
}

fn describe(task: &Task) -> Value {
    let mut value = describe_sentence(task.sentence());
    if let Value::Object(map) = &mut value {
        map.insert("task_id".into(), json!(task.id().to_string()));
        map.insert("priority".into(), json!(task.budget().priority()));
    }
    value
}
