use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Stamp, TruthValue};
use crate::{
    calculus::truth::{eternalize, temporal_projection},
    config::ReasonerConfig,
    temporal::TemporalOrder,
    term::{Connector, Term, VarKind},
};

/// Sentence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    /// `.`
    Judgment,
    /// `?`
    Question,
    /// `!`
    Goal,
    /// `@`
    Quest,
}

impl Punctuation {
    /// Narsese mark.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Judgment => '.',
            Self::Question => '?',
            Self::Goal => '!',
            Self::Quest => '@',
        }
    }

    /// Judgments and goals carry a truth value.
    #[must_use]
    pub const fn has_truth(self) -> bool {
        matches!(self, Self::Judgment | Self::Goal)
    }
}

/// Content plus punctuation, truth and stamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentence {
    content: Term,
    punctuation: Punctuation,
    truth: Option<TruthValue>,
    stamp: Stamp,
    revisible: bool,
}

impl Sentence {
    /// Builds a sentence; variables in `content` are renamed canonically and
    /// truth is dropped for questions and quests.
    #[must_use]
    pub fn new(
        content: Term,
        punctuation: Punctuation,
        truth: Option<TruthValue>,
        stamp: Stamp,
    ) -> Self {
        let content = content.rename_variables();
        let revisible =
            !(content.is(Connector::Conjunction) && content.has_var_kind(VarKind::Dependent));
        let truth = if punctuation.has_truth() { truth } else { None };
        Self {
            content,
            punctuation,
            truth,
            stamp,
            revisible,
        }
    }

    /// Content term.
    #[must_use]
    pub const fn content(&self) -> &Term {
        &self.content
    }

    /// Punctuation.
    #[must_use]
    pub const fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    /// Truth value, absent for questions and quests.
    #[must_use]
    pub const fn truth(&self) -> Option<TruthValue> {
        self.truth
    }

    /// Evidence stamp.
    #[must_use]
    pub const fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    /// Whether revision may merge this sentence with another.
    #[must_use]
    pub const fn revisible(&self) -> bool {
        self.revisible
    }

    /// `.`
    #[must_use]
    pub fn is_judgment(&self) -> bool {
        self.punctuation == Punctuation::Judgment
    }

    /// `?`
    #[must_use]
    pub fn is_question(&self) -> bool {
        self.punctuation == Punctuation::Question
    }

    /// `!`
    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.punctuation == Punctuation::Goal
    }

    /// `@`
    #[must_use]
    pub fn is_quest(&self) -> bool {
        self.punctuation == Punctuation::Quest
    }

    /// Questions and quests, the two punctuations without truth.
    #[must_use]
    pub fn is_question_like(&self) -> bool {
        !self.punctuation.has_truth()
    }

    /// Occurrence time, `None` when eternal.
    #[must_use]
    pub const fn occurrence(&self) -> Option<i64> {
        self.stamp.occurrence()
    }

    /// Whether the sentence is eternal.
    #[must_use]
    pub const fn is_eternal(&self) -> bool {
        self.stamp.is_eternal()
    }

    /// Temporal order of the content.
    #[must_use]
    pub fn temporal_order(&self) -> TemporalOrder {
        self.content.order()
    }

    /// Same sentence with its truth replaced.
    #[must_use]
    pub fn with_truth(&self, truth: TruthValue) -> Self {
        Self {
            truth: Some(truth),
            ..self.clone()
        }
    }

    /// Truth as seen from `target`.
    ///
    /// An event is eternalized; if the target is itself an event the
    /// temporally projected confidence wins when it is higher.
    #[must_use]
    pub fn projection(
        &self,
        target: Option<i64>,
        now: i64,
        config: &ReasonerConfig,
    ) -> Option<TruthValue> {
        let truth = self.truth?;
        let Some(occurrence) = self.occurrence() else {
            return Some(truth);
        };
        let mut projected = eternalize(truth, config.horizon);
        if let Some(target) = target {
            let factor = temporal_projection(occurrence, target, now, config.projection_decay);
            let confidence = factor * truth.confidence();
            if confidence > projected.confidence() {
                projected = truth.with_confidence(confidence);
            }
        }
        Some(projected)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.content, self.punctuation.symbol())?;
        if let Some(truth) = self.truth {
            write!(f, " {truth}")?;
        }
        if let Some(at) = self.occurrence() {
            write!(f, " :|{at}:")?;
        }
        Ok(())
    }
}
