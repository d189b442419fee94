//! GraphViz rendering of the ordering graph.
//!
//! The arena is projected onto a petgraph `DiGraph` so that rendering and
//! cycle analysis use petgraph's `Dot` and `tarjan_scc` instead of walking
//! our own successor lists.

use std::collections::HashMap;
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use super::node::{EdgeOrigin, NameKind, Node, NodeGraph, NodeId, NodeKind};

/// A node as it appears in a rendered graph.
#[derive(Debug, Clone)]
pub struct DotNode {
    pub id: NodeId,
    pub label: String,
    shape: &'static str,
    dashed: bool,
}

impl DotNode {
    fn from_node(id: NodeId, node: &Node) -> Self {
        let (shape, dashed) = match &node.kind {
            NodeKind::Component(_) => ("box", false),
            NodeKind::Name(provider) => match provider.kind {
                NameKind::Phase => ("hexagon", false),
                NameKind::Capability => ("ellipse", false),
                NameKind::Referenced => ("ellipse", true),
            },
        };
        DotNode {
            id,
            label: node.label(),
            shape,
            dashed,
        }
    }
}

impl fmt::Display for DotNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub type DiagnosticGraph = DiGraph<DotNode, EdgeOrigin>;

/// Project the nodes accepted by `keep`, and the edges between them.
pub fn project(graph: &NodeGraph, keep: impl Fn(&Node) -> bool) -> DiagnosticGraph {
    let mut out = DiagnosticGraph::new();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();

    for (id, node) in graph.nodes().filter(|(_, node)| keep(node)) {
        index.insert(id, out.add_node(DotNode::from_node(id, node)));
    }

    for (id, node) in graph.nodes() {
        let Some(&from) = index.get(&id) else {
            continue;
        };
        for link in &node.successors {
            if let Some(&to) = index.get(&link.to) {
                out.add_edge(from, to, link.origin);
            }
        }
    }

    out
}

fn edge_attributes(_: &DiagnosticGraph, edge: EdgeReference<'_, EdgeOrigin>) -> String {
    match edge.weight() {
        EdgeOrigin::Declared => String::new(),
        EdgeOrigin::Wired => "style = dashed ".to_string(),
    }
}

fn node_attributes(_: &DiagnosticGraph, (_, node): (NodeIndex, &DotNode)) -> String {
    if node.dashed {
        format!("shape = {} style = dashed ", node.shape)
    } else {
        format!("shape = {} ", node.shape)
    }
}

/// Render a projected graph in the DOT language.
pub fn render(graph: &DiagnosticGraph) -> String {
    let dot = Dot::with_attr_getters(
        graph,
        &[Config::EdgeNoLabel],
        &edge_attributes,
        &node_attributes,
    );
    format!("{}", dot)
}

/// Groups of nodes that wait on each other, as labels.
///
/// A group is either a strongly connected component of more than one node or
/// a single node with an edge to itself. Groups are sorted by their earliest
/// node so the output is stable.
pub fn cycles(graph: &DiagnosticGraph) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<NodeIndex>> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|mut scc| {
            scc.sort_by_key(|&ix| graph[ix].id);
            scc
        })
        .collect();
    groups.sort_by_key(|scc| graph[scc[0]].id);

    groups
        .into_iter()
        .map(|scc| scc.into_iter().map(|ix| graph[ix].label.clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComponentId;
    use crate::util::InternedString;

    fn two_node_loop() -> NodeGraph {
        let mut graph = NodeGraph::new();
        let a = graph.add_component(ComponentId::new("A"), 0);
        let b = graph.add_component(ComponentId::new("B"), 1);
        graph.before(a, b);
        graph.before(b, a);
        graph
    }

    #[test]
    fn test_project_keeps_only_selected_nodes() {
        let mut graph = two_node_loop();
        let loose = graph.name_node(&InternedString::new("loose"));
        let star = graph.catch_all();
        graph.before(loose, star);

        let projected = project(&graph, |node| node.as_component().is_some());
        assert_eq!(projected.node_count(), 2);
        assert_eq!(projected.edge_count(), 2);
    }

    #[test]
    fn test_render_contains_labels_and_shapes() {
        let graph = two_node_loop();
        let dot = render(&project(&graph, |_| true));

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("\"A\""));
        assert!(dot.contains("\"B\""));
        assert!(dot.contains("shape = box"));
        assert!(dot.contains("\"phase:*\""));
        assert!(dot.contains("->"));
    }

    #[test]
    fn test_cycles_found() {
        let graph = two_node_loop();
        let projected = project(&graph, |node| !node.removed);

        assert_eq!(cycles(&projected), vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let mut graph = NodeGraph::new();
        let a = graph.add_component(ComponentId::new("A"), 0);
        let b = graph.add_component(ComponentId::new("B"), 1);
        graph.before(a, b);

        assert!(cycles(&project(&graph, |_| true)).is_empty());
    }
}
