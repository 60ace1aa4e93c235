#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Non-Axiomatic Logic inference core: terms, temporal orders, truth and
//! budget calculus, and the rule tables that turn a task and a belief into
//! derived tasks.

/// Contract-violation errors.
#[path = "../error.rs"]
pub mod error;

/// Reasoner parameters.
#[path = "../config.rs"]
pub mod config;

/// Temporal orders and figure codes.
#[path = "../temporal.rs"]
pub mod temporal;

/// Terms, term construction and unification.
#[path = "../term/main.rs"]
pub mod term;

/// Truth, budget, stamp, sentence, task and links.
#[path = "../entity/main.rs"]
pub mod entity;

/// Truth and budget functions.
#[path = "../calculus/main.rs"]
pub mod calculus;

/// Memory collaborator.
#[path = "../memory.rs"]
pub mod memory;

/// Per-step derivation context.
#[path = "../context.rs"]
pub mod context;

/// Inference rules and dispatch.
#[path = "../rules/main.rs"]
pub mod rules;

/// Derivation trace.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Reasoner runtime.
#[path = "../main.rs"]
pub mod runtime;

pub use config::ReasonerConfig;
pub use context::DerivationContext;
pub use entity::{
    BudgetValue, LinkType, Punctuation, Sentence, Stamp, Task, TaskLink, TermLink, TruthValue,
};
pub use error::NalError;
pub use memory::{Concept, Memory, SimpleMemory};
pub use rules::{reason, transform_task};
pub use runtime::Reasoner;
pub use telemetry::{ReasonerTelemetry, ReasonerTelemetryBuilder};
pub use temporal::TemporalOrder;
pub use term::{Connector, Term, VarKind};
