//! Chain builder.
//!
//! Registration grows the node graph; [`ChainBuilder::order_nodes`] consumes
//! the builder and drains the graph once:
//!
//! 1. Every name provider that is already ready is queued.
//! 2. The lowest `(kind priority, insertion priority)` node is popped and
//!    removed, which may wire new edges and release more nodes. Popped
//!    component leaves are appended to the chain.
//! 3. When the queue runs dry the catch-all phase `*` is removed by force,
//!    once, and draining resumes.
//! 4. Any component left over means the constraints contain a cycle.

use std::collections::HashSet;

use crate::core::{ComponentDeclaration, ComponentId, Phase};
use crate::util::InternedString;

use super::dot;
use super::errors::{ChainError, CycleError};
use super::node::{NameKind, NodeGraph};
use super::queue::ReadyQueue;

/// Collects phases and components, then orders them into a chain.
///
/// Registration may happen in any order. Ordering consumes the builder, so a
/// registry can never be ordered twice.
#[derive(Debug)]
pub struct ChainBuilder<C> {
    graph: NodeGraph,
    components: Vec<Option<C>>,
    ids: HashSet<ComponentId>,
}

impl<C> ChainBuilder<C> {
    pub fn new() -> Self {
        ChainBuilder {
            graph: NodeGraph::new(),
            components: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Declare a phase, or add edges to an already declared one.
    pub fn add_phase(&mut self, phase: &Phase) -> Result<(), ChainError> {
        let owner = || format!("phase `{}`", phase.name);
        check_name(&phase.name, owner)?;
        for name in phase.before.iter().chain(&phase.after) {
            check_name(name, owner)?;
        }

        if let Some(NameKind::Capability) = self.graph.name_kind(&phase.name) {
            return Err(ChainError::ConflictingNameKind {
                name: phase.name.clone(),
                existing: NameKind::Capability,
                requested: NameKind::Phase,
                declared_by: owner(),
            });
        }

        let id = self.graph.name_node(&phase.name);
        self.graph.bind(id, NameKind::Phase);

        for name in &phase.before {
            let target = self.graph.name_node(name);
            self.graph.before(id, target);
        }
        for name in &phase.after {
            let source = self.graph.name_node(name);
            self.graph.add_consumer(source, id);
        }

        tracing::debug!(
            "registered phase `{}` (before: {}, after: {})",
            phase.name,
            phase.before.len(),
            phase.after.len()
        );
        Ok(())
    }

    /// Register a component.
    ///
    /// Nothing is added to the graph unless every check passes.
    pub fn add_component(&mut self, decl: ComponentDeclaration<C>) -> Result<(), ChainError> {
        let owner = || format!("component `{}`", decl.id);

        if decl.provides.is_empty() {
            return Err(ChainError::MissingProvides { component: decl.id.clone() });
        }
        if self.ids.contains(&decl.id) {
            return Err(ChainError::DuplicateComponent { component: decl.id.clone() });
        }
        for name in decl.names() {
            check_name(name, owner)?;
        }
        for name in &decl.provides {
            if let Some(NameKind::Phase) = self.graph.name_kind(name) {
                return Err(ChainError::ConflictingNameKind {
                    name: name.clone(),
                    existing: NameKind::Phase,
                    requested: NameKind::Capability,
                    declared_by: owner(),
                });
            }
        }

        let slot = self.components.len();
        let leaf = self.graph.add_component(decl.id.clone(), slot);

        for name in &decl.provides {
            let barrier = self.graph.name_node(name);
            self.graph.bind(barrier, NameKind::Capability);
            self.graph.add_provider(barrier, leaf);
        }
        for name in &decl.before {
            let target = self.graph.name_node(name);
            self.graph.before(leaf, target);
        }
        for name in &decl.after {
            let source = self.graph.name_node(name);
            self.graph.add_consumer(source, leaf);
        }

        tracing::debug!(
            "registered component `{}` (provides: {}, before: {}, after: {})",
            decl.id,
            decl.provides.len(),
            decl.before.len(),
            decl.after.len()
        );

        self.ids.insert(decl.id);
        self.components.push(Some(decl.component));
        Ok(())
    }

    /// Names mentioned in a `before`/`after` set that no phase declares and
    /// no component provides, in the order they were first mentioned.
    pub fn unbound_names(&self) -> Vec<InternedString> {
        self.graph.unbound_names().collect()
    }

    /// DOT rendering of everything registered so far.
    pub fn to_dot(&self) -> String {
        dot::render(&dot::project(&self.graph, |_| true))
    }

    /// Order the registered components.
    ///
    /// Returns the components in chain order, or [`ChainError::Cycle`] when
    /// some of them can never become ready.
    pub fn order_nodes(self) -> Result<Vec<C>, ChainError> {
        let ChainBuilder {
            mut graph,
            mut components,
            ..
        } = self;
        let total = components.len();

        let _span = tracing::debug_span!("order_nodes", components = total).entered();

        for name in graph.unbound_names() {
            tracing::debug!("`{}` is referenced but never declared or provided", name);
        }

        let mut queue = ReadyQueue::new();
        let seeds: Vec<_> = graph.seeds().collect();
        for id in seeds {
            queue.push(id, graph.node(id));
        }

        let mut chain = Vec::with_capacity(total);
        let mut forced = false;
        loop {
            while let Some(id) = queue.pop() {
                if !graph.remove(id, &mut queue) {
                    continue;
                }
                if let Some(leaf) = graph.node(id).as_component() {
                    if let Some(component) = components[leaf.slot].take() {
                        chain.push(component);
                    }
                }
            }

            if forced {
                break;
            }
            forced = true;
            let catch_all = graph.catch_all();
            tracing::debug!("ready queue drained, releasing catch-all phase");
            graph.remove(catch_all, &mut queue);
        }

        if chain.len() != total {
            let err = CycleError::new(graph, total);
            tracing::debug!("ordering stalled: {}", err);
            return Err(err.into());
        }

        tracing::debug!("ordered {} components", total);
        Ok(chain)
    }
}

impl<C> Default for ChainBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(name: &InternedString, owner: impl Fn() -> String) -> Result<(), ChainError> {
    if name.trim().is_empty() {
        return Err(ChainError::EmptyName { owner: owner() });
    }
    Ok(())
}
