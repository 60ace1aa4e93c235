//! Values the rules read and produce: truth, budget, stamp, sentence, task
//! and the links that connect concepts.

/// Priority, durability and quality.
pub mod budget;
/// Task links, term links and link templates.
pub mod link;
/// Punctuated sentences.
pub mod sentence;
/// Evidential bases and occurrence times.
pub mod stamp;
/// Budgeted sentences with their novelty record.
pub mod task;
/// Frequency and confidence.
pub mod truth;

pub use budget::BudgetValue;
pub use link::{prepare_component_links, LinkTemplate, LinkType, TaskLink, TermLink};
pub use sentence::{Punctuation, Sentence};
pub use stamp::Stamp;
pub use task::Task;
pub use truth::{TruthValue, MAX_CONFIDENCE};
