//! Inference rules.
//!
//! Every rule reads its premises from a [`DerivationContext`] and hands
//! conclusions back through it. [`reason`] and [`transform_task`] are the two
//! entry points; the other modules are the rule tables they route into.
//!
//! [`DerivationContext`]: crate::context::DerivationContext

/// Composition and decomposition of compounds, variable introduction.
pub mod compositional;
/// Premise-pair dispatch.
pub mod dispatch;
/// Revision, answering and conversion between premises on one content.
pub mod local;
/// Single-premise structural transforms.
pub mod structural;
/// Syllogisms, detachment and conditional rules.
pub mod syllogistic;

pub use dispatch::{reason, transform_task};
