use thiserror::Error;

/// Contract violations raised by the inference core.
///
/// Inapplicable rules never produce one of these; they simply derive nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NalError {
    /// Two occurrence times were compared while at least one was eternal.
    #[error("cannot order eternal occurrence times")]
    EternalComparison,
    /// A connector or copula symbol is not part of the language.
    #[error("unknown connector symbol: {0}")]
    UnknownConnector(String),
    /// Operator names must start with `^` and carry at least one character.
    #[error("malformed operator name: {0}")]
    MalformedOperator(String),
    /// A link index path does not address a component of its term.
    #[error("index path {path:?} does not address a component of {term}")]
    InvalidIndexPath {
        /// Offending path.
        path: Vec<usize>,
        /// Term the path was applied to.
        term: String,
    },
    /// Configuration value outside its admissible range.
    #[error("invalid configuration: {0}")]
    Config(String),
}
