//! Term model: atoms, variables, compounds and statements.
//!
//! A [`Term`] is an immutable, reference-counted tree. Its identity is the
//! canonical name computed once at construction, so equality, hashing and
//! ordering never walk the tree. Substitution and unification build new
//! trees and leave their inputs untouched.

/// Canonical-key interning.
pub mod intern;
/// Normalizing factories for every connector.
pub mod make;
/// Substitution, unification and variable renaming.
pub mod variables;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Deserialize, Serialize, Serializer};

use crate::{error::NalError, temporal::TemporalOrder};

pub use intern::TermInterner;
pub use variables::{Substitution, Unifier};

const FLAG_VAR_INDEPENDENT: u8 = 0b0001;
const FLAG_VAR_DEPENDENT: u8 = 0b0010;
const FLAG_VAR_QUERY: u8 = 0b0100;
const FLAG_INTERVAL: u8 = 0b1000;
const FLAG_ANY_VAR: u8 = FLAG_VAR_INDEPENDENT | FLAG_VAR_DEPENDENT | FLAG_VAR_QUERY;

/// The three variable kinds of NAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VarKind {
    /// `$x`, universally quantified across a statement.
    Independent,
    /// `#x`, existentially quantified inside a compound.
    Dependent,
    /// `?x`, the unknown of a question.
    Query,
}

impl VarKind {
    /// Prefix character used in canonical names.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Independent => '$',
            Self::Dependent => '#',
            Self::Query => '?',
        }
    }

    const fn flag(self) -> u8 {
        match self {
            Self::Independent => FLAG_VAR_INDEPENDENT,
            Self::Dependent => FLAG_VAR_DEPENDENT,
            Self::Query => FLAG_VAR_QUERY,
        }
    }
}

/// Term connectors, copulas included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    /// `{a, b}`
    ExtSet,
    /// `[a, b]`
    IntSet,
    /// `(&, a, b)`
    ExtIntersection,
    /// `(|, a, b)`
    IntIntersection,
    /// `(-, a, b)`
    ExtDifference,
    /// `(~, a, b)`
    IntDifference,
    /// `(*, a, b)`
    Product,
    /// `(/, R, _, b)`
    ExtImage,
    /// `(\, R, _, b)`
    IntImage,
    /// `(--, a)`
    Negation,
    /// `(&&, a, b)`, `(&/, a, b)`, `(&|, a, b)`
    Conjunction,
    /// `(||, a, b)`
    Disjunction,
    /// `<S --> P>`
    Inheritance,
    /// `<S <-> P>`
    Similarity,
    /// `<S ==> P>` and its temporal variants.
    Implication,
    /// `<S <=> P>` and its temporal variants.
    Equivalence,
}

impl Connector {
    /// Copulas relate exactly a subject and a predicate.
    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            Self::Inheritance | Self::Similarity | Self::Implication | Self::Equivalence
        )
    }

    /// Image connectors carry a relation index.
    #[must_use]
    pub const fn is_image(self) -> bool {
        matches!(self, Self::ExtImage | Self::IntImage)
    }

    /// Connectors whose terms carry a temporal order.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Conjunction | Self::Implication | Self::Equivalence)
    }

    /// Symmetric copulas.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::Similarity | Self::Equivalence)
    }

    /// Canonical symbol for this connector under `order`.
    #[must_use]
    pub const fn symbol(self, order: TemporalOrder) -> &'static str {
        match self {
            Self::ExtSet => "{}",
            Self::IntSet => "[]",
            Self::ExtIntersection => "&",
            Self::IntIntersection => "|",
            Self::ExtDifference => "-",
            Self::IntDifference => "~",
            Self::Product => "*",
            Self::ExtImage => "/",
            Self::IntImage => "\\",
            Self::Negation => "--",
            Self::Disjunction => "||",
            Self::Inheritance => "-->",
            Self::Similarity => "<->",
            Self::Conjunction => match order {
                TemporalOrder::Forward => "&/",
                TemporalOrder::Concurrent => "&|",
                _ => "&&",
            },
            Self::Implication => match order {
                TemporalOrder::Forward => "=/>",
                TemporalOrder::Concurrent => "=|>",
                TemporalOrder::Backward => "=\\>",
                _ => "==>",
            },
            Self::Equivalence => match order {
                TemporalOrder::Forward => "</>",
                TemporalOrder::Concurrent => "<|>",
                _ => "<=>",
            },
        }
    }

    /// Resolves a connector or copula symbol, with the order it implies.
    pub fn parse(symbol: &str) -> Result<(Self, TemporalOrder), NalError> {
        let none = TemporalOrder::None;
        let parsed = match symbol {
            "{}" => (Self::ExtSet, none),
            "[]" => (Self::IntSet, none),
            "&" => (Self::ExtIntersection, none),
            "|" => (Self::IntIntersection, none),
            "-" => (Self::ExtDifference, none),
            "~" => (Self::IntDifference, none),
            "*" => (Self::Product, none),
            "/" => (Self::ExtImage, none),
            "\\" => (Self::IntImage, none),
            "--" => (Self::Negation, none),
            "||" => (Self::Disjunction, none),
            "&&" => (Self::Conjunction, none),
            "&/" => (Self::Conjunction, TemporalOrder::Forward),
            "&|" => (Self::Conjunction, TemporalOrder::Concurrent),
            "-->" => (Self::Inheritance, none),
            "<->" => (Self::Similarity, none),
            "==>" => (Self::Implication, none),
            "=/>" => (Self::Implication, TemporalOrder::Forward),
            "=|>" => (Self::Implication, TemporalOrder::Concurrent),
            "=\\>" => (Self::Implication, TemporalOrder::Backward),
            "<=>" => (Self::Equivalence, none),
            "</>" => (Self::Equivalence, TemporalOrder::Forward),
            "<|>" => (Self::Equivalence, TemporalOrder::Concurrent),
            other => return Err(NalError::UnknownConnector(other.to_string())),
        };
        Ok(parsed)
    }
}

/// Structure of a compound term.
#[derive(Debug, Clone)]
pub struct Compound {
    connector: Connector,
    components: Vec<Term>,
    order: TemporalOrder,
    relation_index: usize,
    interval: u64,
}

impl Compound {
    /// Connector of the compound.
    #[must_use]
    pub const fn connector(&self) -> Connector {
        self.connector
    }

    /// Ordered components.
    #[must_use]
    pub fn components(&self) -> &[Term] {
        &self.components
    }

    /// Temporal order; [`TemporalOrder::None`] for atemporal connectors.
    #[must_use]
    pub const fn order(&self) -> TemporalOrder {
        self.order
    }

    /// Placeholder position of an image; zero elsewhere.
    #[must_use]
    pub const fn relation_index(&self) -> usize {
        self.relation_index
    }
}

/// Variant view of a term.
#[derive(Debug, Clone)]
pub enum TermKind {
    /// Plain constant word.
    Word(String),
    /// Executable operator, named with a leading `^`.
    Operator(String),
    /// Elapsed-time marker inside sequences.
    Interval(u64),
    /// Variable of some kind with its identifier (empty = anonymous).
    Variable(VarKind, String),
    /// Any compound, statements included.
    Compound(Compound),
}

#[derive(Debug)]
struct TermData {
    kind: TermKind,
    name: String,
    complexity: usize,
    flags: u8,
}

/// Immutable NAL term keyed by its canonical name.
#[derive(Clone)]
pub struct Term(Arc<TermData>);

impl Term {
    fn from_parts(kind: TermKind, name: String, complexity: usize, flags: u8) -> Self {
        Self(Arc::new(TermData {
            kind,
            name,
            complexity,
            flags,
        }))
    }

    /// Constant word.
    #[must_use]
    pub fn word(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_parts(TermKind::Word(name.clone()), name, 1, 0)
    }

    /// Operator term; the name must carry its `^` prefix.
    pub fn operator(name: impl Into<String>) -> Result<Self, NalError> {
        let name = name.into();
        if name.len() < 2 || !name.starts_with('^') {
            return Err(NalError::MalformedOperator(name));
        }
        Ok(Self::from_parts(
            TermKind::Operator(name[1..].to_string()),
            name,
            1,
            0,
        ))
    }

    /// Interval of `magnitude` time steps.
    #[must_use]
    pub fn interval(magnitude: u64) -> Self {
        Self::from_parts(
            TermKind::Interval(magnitude),
            format!("+{magnitude}"),
            1,
            FLAG_INTERVAL,
        )
    }

    /// Variable of `kind` named `id`.
    #[must_use]
    pub fn var(kind: VarKind, id: impl Into<String>) -> Self {
        let id = id.into();
        let name = format!("{}{id}", kind.symbol());
        Self::from_parts(TermKind::Variable(kind, id), name, 1, kind.flag())
    }

    /// Builds a compound without normalization beyond canonical ordering of
    /// commutative components. Validity is the caller's concern; rules go
    /// through [`make`].
    pub(crate) fn compound_raw(
        connector: Connector,
        components: Vec<Term>,
        order: TemporalOrder,
        relation_index: usize,
        interval: u64,
    ) -> Self {
        let order = if connector.is_temporal() {
            order
        } else {
            TemporalOrder::None
        };
        let components = canonical_components(connector, order, components);
        let name = compound_name(connector, &components, order, relation_index);
        let complexity = 1 + components.iter().map(Term::complexity).sum::<usize>();
        let flags = components.iter().fold(0, |acc, c| acc | c.0.flags);
        let interval = if connector.is_statement() { interval } else { 0 };
        let relation_index = if connector.is_image() {
            relation_index
        } else {
            0
        };
        Self::from_parts(
            TermKind::Compound(Compound {
                connector,
                components,
                order,
                relation_index,
                interval,
            }),
            name,
            complexity,
            flags,
        )
    }

    /// Canonical name, the structural identity key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Variant view.
    #[must_use]
    pub fn kind(&self) -> &TermKind {
        &self.0.kind
    }

    /// 1 for atoms, 1 + the sum of the children for compounds.
    #[must_use]
    pub fn complexity(&self) -> usize {
        self.0.complexity
    }

    /// Whether both handles share the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Compound structure, if any.
    #[must_use]
    pub fn as_compound(&self) -> Option<&Compound> {
        match &self.0.kind {
            TermKind::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Connector of a compound.
    #[must_use]
    pub fn connector(&self) -> Option<Connector> {
        self.as_compound().map(Compound::connector)
    }

    /// Whether the term is a compound with connector `connector`.
    #[must_use]
    pub fn is(&self, connector: Connector) -> bool {
        self.connector() == Some(connector)
    }

    /// Whether the term is one of the four statements.
    #[must_use]
    pub fn is_statement(&self) -> bool {
        self.connector().is_some_and(Connector::is_statement)
    }

    /// Whether the term is an extensional or intensional image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.connector().is_some_and(Connector::is_image)
    }

    /// Whether the term is a compound.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        self.as_compound().is_some()
    }

    /// Whether the term is a variable.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self.0.kind, TermKind::Variable(..))
    }

    /// Whether the term is an operator.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self.0.kind, TermKind::Operator(_))
    }

    /// Whether the term is an interval.
    #[must_use]
    pub fn is_interval(&self) -> bool {
        matches!(self.0.kind, TermKind::Interval(_))
    }

    /// Variable kind, if the term is a variable.
    #[must_use]
    pub fn var_kind(&self) -> Option<VarKind> {
        match &self.0.kind {
            TermKind::Variable(kind, _) => Some(*kind),
            _ => None,
        }
    }

    /// Variable identifier, if the term is a variable.
    #[must_use]
    pub fn var_id(&self) -> Option<&str> {
        match &self.0.kind {
            TermKind::Variable(_, id) => Some(id),
            _ => None,
        }
    }

    /// Whether the term is or contains any variable.
    #[must_use]
    pub fn has_var(&self) -> bool {
        self.0.flags & FLAG_ANY_VAR != 0
    }

    /// Whether the term is or contains a variable of `kind`.
    #[must_use]
    pub fn has_var_kind(&self, kind: VarKind) -> bool {
        self.0.flags & kind.flag() != 0
    }

    /// Whether the term is or contains an interval.
    #[must_use]
    pub fn has_interval(&self) -> bool {
        self.0.flags & FLAG_INTERVAL != 0
    }

    /// No free variables anywhere in the term.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        !self.has_var()
    }

    /// Components of a compound; empty for atoms.
    #[must_use]
    pub fn components(&self) -> &[Term] {
        self.as_compound().map_or(&[], Compound::components)
    }

    /// Number of components.
    #[must_use]
    pub fn size(&self) -> usize {
        self.components().len()
    }

    /// Temporal order; [`TemporalOrder::None`] for everything atemporal.
    #[must_use]
    pub fn order(&self) -> TemporalOrder {
        self.as_compound()
            .map_or(TemporalOrder::None, Compound::order)
    }

    /// Elapsed time carried by a statement; not part of its identity.
    #[must_use]
    pub fn interval_len(&self) -> u64 {
        match &self.0.kind {
            TermKind::Compound(compound) => compound.interval,
            TermKind::Interval(magnitude) => *magnitude,
            _ => 0,
        }
    }

    /// Image placeholder position.
    #[must_use]
    pub fn relation_index(&self) -> usize {
        self.as_compound().map_or(0, Compound::relation_index)
    }

    /// Order of components is irrelevant for this term.
    #[must_use]
    pub fn is_commutative(&self) -> bool {
        self.connector()
            .is_some_and(|connector| is_commutative(connector, self.order()))
    }

    /// Subject and predicate of a statement.
    #[must_use]
    pub fn sides(&self) -> Option<(&Term, &Term)> {
        match self.as_compound() {
            Some(compound) if compound.connector.is_statement() => {
                Some((&compound.components[0], &compound.components[1]))
            }
            _ => None,
        }
    }

    /// Subject of a statement.
    #[must_use]
    pub fn subject(&self) -> Option<&Term> {
        self.sides().map(|(subject, _)| subject)
    }

    /// Predicate of a statement.
    #[must_use]
    pub fn predicate(&self) -> Option<&Term> {
        self.sides().map(|(_, predicate)| predicate)
    }

    /// Component at `index`.
    #[must_use]
    pub fn component(&self, index: usize) -> Option<&Term> {
        self.components().get(index)
    }

    /// Follows an index path down the tree.
    #[must_use]
    pub fn component_at(&self, path: &[usize]) -> Option<&Term> {
        path.iter()
            .try_fold(self, |term, &index| term.component(index))
    }

    /// Same as [`Term::component_at`] but reports the bad path.
    pub fn expect_component_at(&self, path: &[usize]) -> Result<&Term, NalError> {
        self.component_at(path)
            .ok_or_else(|| NalError::InvalidIndexPath {
                path: path.to_vec(),
                term: self.name().to_string(),
            })
    }

    /// `t` is a direct component.
    #[must_use]
    pub fn contains_component(&self, t: &Term) -> bool {
        self.components().contains(t)
    }

    /// `t` occurs anywhere below this term.
    #[must_use]
    pub fn contains_term(&self, t: &Term) -> bool {
        self.components()
            .iter()
            .any(|c| c == t || c.contains_term(t))
    }

    /// Every component of `t` (or `t` itself, for a different connector) is
    /// a component of this term.
    #[must_use]
    pub fn contains_all_components(&self, t: &Term) -> bool {
        if self.connector().is_some() && self.connector() == t.connector() {
            t.components().iter().all(|c| self.contains_component(c))
        } else {
            self.contains_component(t)
        }
    }

    /// Copy of a statement carrying a different interval.
    #[must_use]
    pub fn with_interval(&self, interval: u64) -> Self {
        match self.as_compound() {
            Some(compound) if compound.connector.is_statement() => Self::from_parts(
                TermKind::Compound(Compound {
                    interval,
                    ..compound.clone()
                }),
                self.0.name.clone(),
                self.0.complexity,
                self.0.flags,
            ),
            _ => self.clone(),
        }
    }
}

/// Commutativity of a connector under a temporal order.
#[must_use]
pub const fn is_commutative(connector: Connector, order: TemporalOrder) -> bool {
    match connector {
        Connector::ExtSet
        | Connector::IntSet
        | Connector::ExtIntersection
        | Connector::IntIntersection
        | Connector::Disjunction
        | Connector::Similarity => true,
        Connector::Conjunction => !matches!(order, TemporalOrder::Forward),
        Connector::Equivalence => !matches!(order, TemporalOrder::Forward),
        _ => false,
    }
}

/// A statement is invalid when its sides are equal, when one (non-image)
/// side contains the other, or when both sides are mirrored statements.
#[must_use]
pub fn invalid_statement(subject: &Term, predicate: &Term) -> bool {
    if subject == predicate {
        return true;
    }
    if invalid_reflexive(subject, predicate) || invalid_reflexive(predicate, subject) {
        return true;
    }
    if let (Some((s1, p1)), Some((s2, p2))) = (subject.sides(), predicate.sides()) {
        if s1 == p2 && p1 == s2 {
            return true;
        }
    }
    false
}

fn invalid_reflexive(container: &Term, t: &Term) -> bool {
    container.is_compound() && !container.is_image() && container.contains_term(t)
}

/// Exactly one of the two terms has an independent variable.
#[must_use]
pub fn invalid_pair(t1: &Term, t2: &Term) -> bool {
    t1.has_var_kind(VarKind::Independent) != t2.has_var_kind(VarKind::Independent)
}

fn canonical_components(
    connector: Connector,
    order: TemporalOrder,
    mut components: Vec<Term>,
) -> Vec<Term> {
    if connector.is_statement() {
        if is_commutative(connector, order) && components.len() == 2 && components[0] > components[1]
        {
            components.swap(0, 1);
        }
    } else if is_commutative(connector, order) {
        components.sort();
        components.dedup();
    }
    components
}

fn compound_name(
    connector: Connector,
    components: &[Term],
    order: TemporalOrder,
    relation_index: usize,
) -> String {
    let joined = || {
        components
            .iter()
            .map(Term::name)
            .collect::<Vec<_>>()
            .join(",")
    };
    match connector {
        _ if connector.is_statement() => format!(
            "<{} {} {}>",
            components[0],
            connector.symbol(order),
            components[1]
        ),
        Connector::ExtSet => format!("{{{}}}", joined()),
        Connector::IntSet => format!("[{}]", joined()),
        Connector::ExtImage | Connector::IntImage => {
            let mut name = format!("({},{}", connector.symbol(order), components[relation_index]);
            for (i, component) in components.iter().enumerate() {
                name.push(',');
                if i == relation_index {
                    name.push('_');
                } else {
                    name.push_str(component.name());
                }
            }
            name.push(')');
            name
        }
        _ => format!("({},{})", connector.symbol(order), joined()),
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.0.name == other.0.name
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.name.cmp(&other.0.name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self.0.name)
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.name)
    }
}
