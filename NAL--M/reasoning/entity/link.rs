//! Task links, term links and the templates that connect a compound to its
//! components.

use serde::{Deserialize, Serialize};

use super::{BudgetValue, Task};
use crate::term::{Connector, Term};

/// Structural relation between a concept's term and a link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// The target is the concept's own term.
    SelfLink,
    /// The target is a component of the concept's term.
    Component,
    /// The target is a compound containing the concept's term.
    Compound,
    /// The target is a component of the concept's statement.
    ComponentStatement,
    /// The target is a statement containing the concept's term.
    CompoundStatement,
    /// The target is a component of a conditional's antecedent.
    ComponentCondition,
    /// The target is a conditional whose antecedent holds the concept's term.
    CompoundCondition,
    /// The target sits inside a product or image and can be transformed.
    Transform,
}

impl LinkType {
    /// Numeric code used in link keys.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::SelfLink => 0,
            Self::Component => 1,
            Self::Compound => 2,
            Self::ComponentStatement => 3,
            Self::CompoundStatement => 4,
            Self::ComponentCondition => 5,
            Self::CompoundCondition => 6,
            Self::Transform => 8,
        }
    }

    /// Component-side counterpart of a compound-side type.
    #[must_use]
    pub const fn to_component(self) -> Self {
        match self {
            Self::Compound => Self::Component,
            Self::CompoundStatement => Self::ComponentStatement,
            Self::CompoundCondition => Self::ComponentCondition,
            other => other,
        }
    }
}

fn link_key(link_type: LinkType, index: &[usize], target: &Term) -> String {
    let index = index
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("@{}({}){}", link_type.code(), index, target)
}

/// Link from a concept to a related term.
#[derive(Debug, Clone, Serialize)]
pub struct TermLink {
    target: Term,
    link_type: LinkType,
    index: Vec<usize>,
    budget: BudgetValue,
}

impl TermLink {
    /// Creates a link.
    #[must_use]
    pub fn new(target: Term, link_type: LinkType, index: Vec<usize>, budget: BudgetValue) -> Self {
        Self {
            target,
            link_type,
            index,
            budget,
        }
    }

    /// Linked term.
    #[must_use]
    pub const fn target(&self) -> &Term {
        &self.target
    }

    /// Link type.
    #[must_use]
    pub const fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Index path from the compound to the component.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.index
    }

    /// Index at `depth`, zero when the path is shorter.
    #[must_use]
    pub fn index(&self, depth: usize) -> usize {
        self.index.get(depth).copied().unwrap_or(0)
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

    /// Identity key: type, index path and target name.
    #[must_use]
    pub fn key(&self) -> String {
        link_key(self.link_type, &self.index, &self.target)
    }
}

/// Link from a concept to a task whose content relates to the concept's term.
#[derive(Debug, Clone, Serialize)]
pub struct TaskLink {
    task: Task,
    link_type: LinkType,
    index: Vec<usize>,
    budget: BudgetValue,
}

impl TaskLink {
    /// Creates a link carrying its own copy of `task`.
    #[must_use]
    pub fn new(task: Task, link_type: LinkType, index: Vec<usize>, budget: BudgetValue) -> Self {
        Self {
            task,
            link_type,
            index,
            budget,
        }
    }

    /// Linked task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Replaces the linked task, e.g. after it recorded a solution.
    pub fn set_task(&mut self, task: Task) {
        self.task = task;
    }

    /// Mutable access to the linked task.
    pub fn task_mut(&mut self) -> &mut Task {
        &mut self.task
    }

    /// Link type.
    #[must_use]
    pub const fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Index path from the task content to the concept's term.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.index
    }

    /// Index at `depth`, zero when the path is shorter.
    #[must_use]
    pub fn index(&self, depth: usize) -> usize {
        self.index.get(depth).copied().unwrap_or(0)
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

    /// Identity key: type, index path and task content.
    #[must_use]
    pub fn key(&self) -> String {
        link_key(self.link_type, &self.index, self.task.content())
    }
}

/// Compound-side description of one link to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    /// Component the link points at.
    pub target: Term,
    /// Type from the compound's point of view.
    pub link_type: LinkType,
    /// Index path from the compound to `target`.
    pub index: Vec<usize>,
}

fn is_product_like(t: &Term) -> bool {
    matches!(
        t.connector(),
        Some(Connector::Product | Connector::ExtImage | Connector::IntImage)
    )
}

fn is_condition_container(whole: &Term, position: usize) -> bool {
    whole.is(Connector::Equivalence) || (whole.is(Connector::Implication) && position == 0)
}

/// Templates for every constant component a compound links to.
///
/// Components are reached up to two levels deep, three through products and
/// images. The antecedent conjunction of a conditional is expanded with
/// condition links whose paths start with `0`.
#[must_use]
pub fn prepare_component_links(term: &Term) -> Vec<LinkTemplate> {
    let mut templates = Vec::new();
    if !term.is_compound() {
        return templates;
    }
    let link_type = if term.is_statement() {
        LinkType::CompoundStatement
    } else {
        LinkType::Compound
    };
    collect(term, term, link_type, &[], &mut templates);
    templates
}

fn collect(
    whole: &Term,
    term: &Term,
    link_type: LinkType,
    prefix: &[usize],
    out: &mut Vec<LinkTemplate>,
) {
    let path = |rest: &[usize]| -> Vec<usize> { prefix.iter().chain(rest).copied().collect() };
    let condition = link_type == LinkType::CompoundCondition;
    for (i, t1) in term.components().iter().enumerate() {
        if t1.is_constant() {
            out.push(LinkTemplate {
                target: t1.clone(),
                link_type,
                index: path(&[i]),
            });
        }
        let expands_condition = !condition
            && is_condition_container(whole, i)
            && (t1.is(Connector::Conjunction) || t1.is(Connector::Negation));
        if expands_condition {
            collect(whole, t1, LinkType::CompoundCondition, &[0], out);
            continue;
        }
        for (j, t2) in t1.components().iter().enumerate() {
            if t2.is_constant() {
                let (kind, index) = if is_product_like(t1) {
                    (LinkType::Transform, path(&[i, j]))
                } else {
                    (link_type, path(&[i, j]))
                };
                out.push(LinkTemplate {
                    target: t2.clone(),
                    link_type: kind,
                    index,
                });
            }
            if is_product_like(t2) {
                for (k, t3) in t2.components().iter().enumerate() {
                    if t3.is_constant() {
                        out.push(LinkTemplate {
                            target: t3.clone(),
                            link_type: LinkType::Transform,
                            index: path(&[i, j, k]),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        temporal::TemporalOrder,
        term::{make, VarKind},
    };

    fn w(name: &str) -> Term {
        Term::word(name)
    }

    fn find<'a>(templates: &'a [LinkTemplate], name: &str) -> Vec<&'a LinkTemplate> {
        templates.iter().filter(|t| t.target.name() == name).collect()
    }

    #[test]
    fn statement_links_reach_both_sides() {
        let inh = make::inheritance(w("robin"), w("bird")).unwrap();
        let templates = prepare_component_links(&inh);
        assert_eq!(templates.len(), 2);
        assert!(templates
            .iter()
            .all(|t| t.link_type == LinkType::CompoundStatement));
        assert_eq!(find(&templates, "bird")[0].index, vec![1]);
    }

    #[test]
    fn products_produce_transform_links() {
        let product = make::product(vec![w("acid"), w("base")]).unwrap();
        let inh = make::inheritance(product, w("reaction")).unwrap();
        let templates = prepare_component_links(&inh);
        let acid = find(&templates, "acid");
        assert_eq!(acid.len(), 1);
        assert_eq!(acid[0].link_type, LinkType::Transform);
        assert_eq!(acid[0].index, vec![0, 0]);
    }

    #[test]
    fn conditions_get_prefixed_paths() {
        let a = make::inheritance(w("a"), w("x")).unwrap();
        let b = make::inheritance(w("b"), w("x")).unwrap();
        let c = make::inheritance(w("c"), w("y")).unwrap();
        let condition = make::conjunction(a.clone(), b, TemporalOrder::None).unwrap();
        let imp = make::implication(condition, c, TemporalOrder::None).unwrap();
        let templates = prepare_component_links(&imp);
        let link = find(&templates, a.name());
        assert_eq!(link[0].link_type, LinkType::CompoundCondition);
        assert_eq!(link[0].index, vec![0, 0]);
        let atom = find(&templates, "a");
        assert_eq!(atom[0].index, vec![0, 0, 0]);
    }

    #[test]
    fn variables_are_not_linked() {
        let inh = make::inheritance(Term::var(VarKind::Independent, "1"), w("bird")).unwrap();
        let templates = prepare_component_links(&inh);
        assert_eq!(templates.len(), 1);
        assert_eq!(LinkType::CompoundCondition.to_component(), LinkType::ComponentCondition);
    }
}
