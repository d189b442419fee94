//! The ordering graph.
//!
//! Nodes live in an arena addressed by [`NodeId`]. There are two families:
//! name providers, one per phase or capability name, and component leaves,
//! one per registered component. An edge `a -> b` means `b` cannot be ready
//! until `a` has been removed.
//!
//! Capability barriers do not connect their providers to their consumers up
//! front. The provider-to-consumer edges are materialized only when the
//! barrier itself is removed (see [`NodeGraph::deferred_edges`]), which keeps
//! the graph linear in the number of declarations and makes a stuck graph
//! readable.

use std::collections::HashMap;
use std::fmt;

use crate::core::ComponentId;
use crate::util::InternedString;

use super::queue::ReadyQueue;

/// Name of the catch-all phase present in every graph.
pub const CATCH_ALL: &str = "*";

/// Handle to a node in a [`NodeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a name currently stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Mentioned in a `before`/`after` set but not yet declared or provided.
    Referenced,
    /// Declared with `add_phase`.
    Phase,
    /// Provided by at least one component.
    Capability,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Referenced => write!(f, "referenced name"),
            NameKind::Phase => write!(f, "phase"),
            NameKind::Capability => write!(f, "capability"),
        }
    }
}

/// Symbolic node standing in for a phase or capability name.
#[derive(Debug, Clone)]
pub struct NameProvider {
    pub name: InternedString,
    pub kind: NameKind,
    /// Components providing this name, in registration order.
    pub providers: Vec<NodeId>,
    /// Nodes that declared `after` this name, in registration order.
    pub consumers: Vec<NodeId>,
}

/// Leaf wrapping one registered component.
#[derive(Debug, Clone)]
pub struct ComponentLeaf {
    pub id: ComponentId,
    /// Index of the component payload held by the builder.
    pub slot: usize,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Name(NameProvider),
    Component(ComponentLeaf),
}

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Added while registering a phase or component.
    Declared,
    /// Materialized from provider to consumer when a capability was removed.
    Wired,
}

impl fmt::Display for EdgeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOrigin::Declared => write!(f, "declared"),
            EdgeOrigin::Wired => write!(f, "wired"),
        }
    }
}

/// Outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub to: NodeId,
    pub origin: EdgeOrigin,
}

/// An edge to be added, `from` before `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Insertion order; unique within a graph.
    pub priority: u32,
    /// Predecessors not yet removed.
    pub pending: usize,
    pub successors: Vec<Link>,
    pub removed: bool,
}

impl Node {
    pub fn ready(&self) -> bool {
        self.pending == 0
    }

    /// Tie-break between nodes that become ready together. Lower runs first.
    ///
    /// Components and phases share `0`; capability barriers (and names that
    /// were only ever referenced) use `1`, so ready components are emitted
    /// before another capability is opened.
    pub fn kind_priority(&self) -> u8 {
        match &self.kind {
            NodeKind::Component(_) => 0,
            NodeKind::Name(provider) => match provider.kind {
                NameKind::Phase => 0,
                NameKind::Capability | NameKind::Referenced => 1,
            },
        }
    }

    pub fn as_name(&self) -> Option<&NameProvider> {
        match &self.kind {
            NodeKind::Name(provider) => Some(provider),
            NodeKind::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentLeaf> {
        match &self.kind {
            NodeKind::Component(leaf) => Some(leaf),
            NodeKind::Name(_) => None,
        }
    }

    /// Short label used in logs and diagnostics.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Component(leaf) => leaf.id.to_string(),
            NodeKind::Name(provider) => match provider.kind {
                NameKind::Phase => format!("phase:{}", provider.name),
                NameKind::Capability => format!("cap:{}", provider.name),
                NameKind::Referenced => format!("name:{}", provider.name),
            },
        }
    }
}

/// Arena of nodes plus the name registry.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    names: HashMap<InternedString, NodeId>,
    catch_all: NodeId,
}

impl NodeGraph {
    /// Create a graph holding only the catch-all phase.
    pub fn new() -> Self {
        let mut graph = NodeGraph {
            nodes: Vec::new(),
            names: HashMap::new(),
            catch_all: NodeId(0),
        };
        let catch_all = graph.name_node(&InternedString::new(CATCH_ALL));
        graph.bind(catch_all, NameKind::Phase);
        graph.catch_all = catch_all;
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn catch_all(&self) -> NodeId {
        self.catch_all
    }

    /// Look up the node for a name without creating it.
    pub fn lookup(&self, name: &InternedString) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Kind currently bound to `name`, if the name is known.
    pub fn name_kind(&self, name: &InternedString) -> Option<NameKind> {
        self.lookup(name)
            .and_then(|id| self.node(id).as_name())
            .map(|provider| provider.kind)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            priority: id.0 as u32,
            pending: 0,
            successors: Vec::new(),
            removed: false,
        });
        id
    }

    /// Node for `name`, created as [`NameKind::Referenced`] on first use.
    pub fn name_node(&mut self, name: &InternedString) -> NodeId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.push(NodeKind::Name(NameProvider {
            name: name.clone(),
            kind: NameKind::Referenced,
            providers: Vec::new(),
            consumers: Vec::new(),
        }));
        self.names.insert(name.clone(), id);
        tracing::trace!("created name node {} for `{}`", id.0, name);
        id
    }

    /// Add a leaf for a component.
    pub fn add_component(&mut self, id: ComponentId, slot: usize) -> NodeId {
        self.push(NodeKind::Component(ComponentLeaf { id, slot }))
    }

    /// Bind a name node to a kind. Callers check for conflicts first.
    pub fn bind(&mut self, id: NodeId, kind: NameKind) {
        if let NodeKind::Name(provider) = &mut self.nodes[id.0].kind {
            provider.kind = kind;
        }
    }

    /// Register `leaf` as a provider of the capability `name_id`.
    ///
    /// The barrier gates its providers: none of them can run before everything
    /// declared `before` the name has been removed.
    pub fn add_provider(&mut self, name_id: NodeId, leaf: NodeId) {
        if let NodeKind::Name(provider) = &mut self.nodes[name_id.0].kind {
            provider.providers.push(leaf);
        }
        self.before(name_id, leaf);
    }

    /// Register `node` as running after every provider of `name_id`.
    pub fn add_consumer(&mut self, name_id: NodeId, node: NodeId) {
        if let NodeKind::Name(provider) = &mut self.nodes[name_id.0].kind {
            if !provider.consumers.contains(&node) {
                provider.consumers.push(node);
            }
        }
        self.before(name_id, node);
    }

    /// `to` cannot be ready until `from` is removed.
    pub fn before(&mut self, from: NodeId, to: NodeId) {
        self.link(from, to, EdgeOrigin::Declared);
    }

    fn link(&mut self, from: NodeId, to: NodeId, origin: EdgeOrigin) {
        let successors = &self.nodes[from.0].successors;
        if successors.iter().any(|link| link.to == to) {
            return;
        }
        debug_assert!(!self.nodes[to.0].removed, "edge into a removed node");
        self.nodes[from.0].successors.push(Link { to, origin });
        self.nodes[to.0].pending += 1;
    }

    /// Edges that removing `id` must add before releasing its successors.
    ///
    /// Only capability barriers produce any: one edge from each provider to
    /// each consumer, providers in registration order. Consumers that are
    /// already gone (only possible for the force-removed catch-all) are
    /// skipped.
    pub fn deferred_edges(&self, id: NodeId) -> Vec<Edge> {
        let Some(provider) = self.node(id).as_name() else {
            return Vec::new();
        };

        let mut edges = Vec::with_capacity(provider.providers.len() * provider.consumers.len());
        for &from in &provider.providers {
            for &to in &provider.consumers {
                if !self.node(to).removed {
                    edges.push(Edge { from, to });
                }
            }
        }
        edges
    }

    /// Remove `id`: wire its deferred edges, then release its successors.
    ///
    /// Successors whose pending count drops to zero are pushed onto `queue`,
    /// except the catch-all phase, which is only ever processed by force.
    /// Returns `false` if the node had already been removed.
    pub fn remove(&mut self, id: NodeId, queue: &mut ReadyQueue) -> bool {
        if self.nodes[id.0].removed {
            return false;
        }

        for edge in self.deferred_edges(id) {
            tracing::trace!(
                "wiring {} -> {}",
                self.node(edge.from).label(),
                self.node(edge.to).label()
            );
            self.link(edge.from, edge.to, EdgeOrigin::Wired);
        }

        self.nodes[id.0].removed = true;
        tracing::debug!("removed {}", self.node(id).label());

        let successors = self.nodes[id.0].successors.clone();
        for link in successors {
            let node = &mut self.nodes[link.to.0];
            node.pending -= 1;
            if node.ready() && !node.removed && link.to != self.catch_all {
                queue.push(link.to, node);
            }
        }

        true
    }

    /// Name providers that are ready before anything has been removed.
    ///
    /// Component leaves are never seeded; each one is gated by the barrier
    /// of every name it provides.
    pub fn seeds(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(|(id, node)| {
                *id != self.catch_all && node.as_name().is_some() && node.ready()
            })
            .map(|(id, _)| id)
    }

    /// Names mentioned somewhere but never declared or provided.
    pub fn unbound_names(&self) -> impl Iterator<Item = InternedString> + '_ {
        self.nodes.iter().filter_map(|node| match node.as_name() {
            Some(provider) if provider.kind == NameKind::Referenced => Some(provider.name.clone()),
            _ => None,
        })
    }

    /// Nodes that were never removed.
    pub fn unresolved(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes().filter(|(_, node)| !node.removed)
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}
