//! Ordering error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::ComponentId;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::InternedString;

use super::dot;
use super::node::{NameKind, NodeGraph};

/// Error registering declarations or ordering the chain.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ChainError {
    #[error("`{name}` is used both as a {existing} and as a {requested}")]
    #[diagnostic(
        code(phasechain::register::conflicting_name_kind),
        help("a component cannot provide the same name as a phase; rename one of them")
    )]
    ConflictingNameKind {
        name: InternedString,
        existing: NameKind,
        requested: NameKind,
        /// Who made the conflicting declaration, e.g. "component `lexer`".
        declared_by: String,
    },

    #[error("component `{component}` does not provide any names")]
    #[diagnostic(
        code(phasechain::register::missing_provides),
        help("every component must provide at least one name")
    )]
    MissingProvides { component: ComponentId },

    #[error("component `{component}` is registered more than once")]
    #[diagnostic(code(phasechain::register::duplicate_component))]
    DuplicateComponent { component: ComponentId },

    #[error("{owner} uses an empty name")]
    #[diagnostic(code(phasechain::register::empty_name))]
    EmptyName { owner: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cycle(#[from] CycleError),
}

impl ChainError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ChainError::ConflictingNameKind {
                name,
                existing,
                requested,
                declared_by,
            } => Diagnostic::error(format!("conflicting use of name `{}`", name))
                .with_context(format!("`{}` is already a {}", name, existing))
                .with_context(format!("{} uses it as a {}", declared_by, requested))
                .with_suggestion("Rename the phase or the provided capability")
                .with_suggestion(
                    "A component cannot provide the same name as a phase; order it \
                     against the phase with `before`/`after` instead",
                ),

            ChainError::MissingProvides { component } => {
                Diagnostic::error(format!("component `{}` provides nothing", component))
                    .with_suggestion(format!(
                        "Add `provides = [\"{}\"]` to the component",
                        component
                    ))
            }

            ChainError::DuplicateComponent { component } => {
                Diagnostic::error(format!("component `{}` is declared twice", component))
                    .with_suggestion("Give each component a unique id")
            }

            ChainError::EmptyName { owner } => {
                Diagnostic::error(format!("{} uses an empty name", owner))
                    .with_suggestion("Remove the empty entry from `provides`, `before` or `after`")
            }

            ChainError::Cycle(cycle) => cycle.to_diagnostic(),
        }
    }
}

/// Warning for a name that no phase declares and no component provides.
pub fn unbound_name_diagnostic(name: &InternedString) -> Diagnostic {
    Diagnostic::warning(format!("`{}` is referenced but never declared or provided", name))
        .with_context("it only orders the declarations that mention it")
        .with_suggestion(format!(
            "Declare a phase named \"{}\" or provide it from a component",
            name
        ))
        .with_suggestion("Check the name for a typo")
}

/// The declared constraints admit no total order.
///
/// Carries the whole graph as it stood when ordering stalled. Nodes that were
/// never removed form the unresolved subgraph rendered by [`CycleError::to_dot`].
#[derive(Debug, Error, MietteDiagnostic)]
#[error(
    "ordering constraints form a cycle: {} of {} components could not be placed",
    .stuck.len(),
    .total
)]
#[diagnostic(
    code(phasechain::order::cycle),
    help("render the unresolved graph with `dot` to find the contradictory declaration")
)]
pub struct CycleError {
    graph: NodeGraph,
    stuck: Vec<ComponentId>,
    cycles: Vec<Vec<String>>,
    total: usize,
}

impl CycleError {
    pub(crate) fn new(graph: NodeGraph, total: usize) -> Self {
        let stuck = graph
            .unresolved()
            .filter_map(|(_, node)| node.as_component().map(|leaf| leaf.id.clone()))
            .collect();
        let cycles = dot::cycles(&dot::project(&graph, |node| !node.removed));

        CycleError {
            graph,
            stuck,
            cycles,
            total,
        }
    }

    /// The graph as it stood when ordering stalled.
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Components that never became ready, in registration order.
    pub fn stuck_components(&self) -> &[ComponentId] {
        &self.stuck
    }

    /// Groups of nodes waiting on each other, by label.
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    /// DOT rendering of the nodes that never became ready.
    pub fn to_dot(&self) -> String {
        dot::render(&dot::project(&self.graph, |node| !node.removed))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error("ordering constraints form a cycle");

        for group in &self.cycles {
            let mut path = group.clone();
            path.push(group[0].clone());
            diag = diag.with_context(format!("cycle: {}", path.join(" -> ")));
        }

        let stuck: Vec<&str> = self.stuck.iter().map(|id| id.as_str()).collect();
        diag = diag.with_context(format!(
            "{} of {} components could not be placed: {}",
            stuck.len(),
            self.total,
            stuck.join(", ")
        ));

        diag.with_suggestion("Remove or invert one `before`/`after` declaration in the cycle")
            .with_suggestion(suggestions::RENDER_CYCLE)
    }
}
